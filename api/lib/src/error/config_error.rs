//! Client configuration errors.

use thiserror::Error;

/// Errors raised while building or reconfiguring a client.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// None of the base URL environment variables is set.
    #[error("API base URL is not configured (set one of: {})", .env_vars.join(", "))]
    MissingBaseUrl {
        /// The variables that were consulted, in priority order.
        env_vars: Vec<&'static str>,
    },

    /// The base URL could not be parsed.
    #[error("Invalid base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The base URL parsed but cannot carry HTTP requests.
    #[error("Unsupported base URL scheme '{scheme}' (expected http or https)")]
    UnsupportedScheme {
        /// The scheme found in the configured URL.
        scheme: String,
    },

    /// The configured timeout is not a positive whole number of milliseconds.
    #[error("Invalid timeout '{value}': expected a positive number of milliseconds")]
    InvalidTimeout {
        /// The raw value that failed to parse.
        value: String,
    },

    /// A header name or value is not valid HTTP.
    #[error("Invalid header '{name}': {message}")]
    InvalidHeader {
        /// The offending header name.
        name: String,
        /// Why the header was rejected.
        message: String,
    },

    /// The underlying HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

impl ConfigError {
    /// Creates an invalid header error.
    pub fn invalid_header(name: impl Into<String>, message: impl ToString) -> Self {
        Self::InvalidHeader {
            name: name.into(),
            message: message.to_string(),
        }
    }
}
