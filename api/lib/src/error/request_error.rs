//! Per-request failures carried inside the response envelope.

use thiserror::Error;

/// Why a request did not produce data.
///
/// [`RequestError::Http`] carries the received HTTP status, as does
/// [`RequestError::Decode`] when the body parsed but did not fit the target
/// type. Everything else reports status `0`. The `Display`
/// output is the envelope's `error` string, so it stays short and
/// user-facing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// The request did not complete within its timeout.
    #[error("Request timeout")]
    Timeout {
        /// The timeout that expired, in milliseconds.
        duration_ms: u64,
    },

    /// The caller cancelled the request through its cancellation handle.
    #[error("Request cancelled")]
    Cancelled,

    /// Network, DNS, TLS or protocol failure.
    #[error("{0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("{message}")]
    Http {
        /// The HTTP status code returned.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },

    /// The response body could not be parsed or decoded into the target type.
    #[error("{message}")]
    Decode {
        /// The HTTP status the body arrived with, or `0` if the body could not
        /// be parsed at all.
        status: u16,
        /// What did not fit.
        message: String,
    },

    /// The request body could not be serialized to JSON.
    #[error("{0}")]
    Encode(String),

    /// A header could not be applied to the request.
    #[error("{0}")]
    InvalidHeader(String),
}

impl RequestError {
    /// The envelope status for this failure: the received HTTP status when
    /// there was one, `0` otherwise.
    pub fn status(&self) -> u16 {
        match self {
            Self::Http { status, .. } | Self::Decode { status, .. } => *status,
            _ => 0,
        }
    }

    /// Returns `true` if no HTTP status was obtained.
    pub fn is_transport(&self) -> bool {
        self.status() == 0
    }
}

impl From<reqwest::Error> for RequestError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode {
                status: err.status().map_or(0, |status| status.as_u16()),
                message: err.to_string(),
            }
        } else {
            Self::Transport(err.to_string())
        }
    }
}
