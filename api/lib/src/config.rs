//! Client configuration.
//!
//! An [`ApiClientConfig`] is built once per client: the base URL is fixed
//! for the client's lifetime while headers seed the client's mutable
//! default-header map. [`ConfigOverrides`] describes a partial config
//! applied on top of a freshly resolved one when the global client is
//! reconfigured.

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use url::Url;

use crate::error::ConfigError;

/// Default request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Environment variables consulted for the base URL, highest priority first.
pub const BASE_URL_ENV_VARS: [&str; 2] = ["NEXT_PUBLIC_API_URL", "API_URL"];

/// Environment variable holding the default timeout in milliseconds.
pub const TIMEOUT_ENV_VAR: &str = "API_TIMEOUT_MS";

/// Configuration for an [`ApiClient`](crate::ApiClient).
///
/// ## Examples
///
/// ```rust
/// use std::time::Duration;
/// use xplat_api::ApiClientConfig;
///
/// let config = ApiClientConfig::new("https://api.example.com/")?
///     .with_timeout(Duration::from_secs(5))
///     .with_header("X-Client", "docs")?;
///
/// assert_eq!(config.base_url(), "https://api.example.com");
/// # Ok::<(), xplat_api::ConfigError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    base_url: String,
    timeout: Duration,
    headers: HeaderMap,
}

impl ApiClientConfig {
    /// Creates a config for the given base URL with default timeout and a
    /// `Content-Type: application/json` default header.
    ///
    /// Trailing slashes are stripped from the base URL.
    ///
    /// ## Errors
    ///
    /// Returns an error if the URL does not parse or is not http(s).
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, ConfigError> {
        let base_url = normalize_base_url(base_url.as_ref())?;
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(Self {
            base_url,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            headers,
        })
    }

    /// Resolves a config from the process environment.
    ///
    /// The base URL comes from the first non-blank variable in
    /// [`BASE_URL_ENV_VARS`]; the timeout from [`TIMEOUT_ENV_VAR`] when set.
    ///
    /// ## Errors
    ///
    /// Returns [`ConfigError::MissingBaseUrl`] when no base URL is set, or a
    /// parse error for a malformed URL or timeout.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = BASE_URL_ENV_VARS
            .iter()
            .find_map(|var| non_blank_env(var))
            .ok_or_else(|| ConfigError::MissingBaseUrl {
                env_vars: BASE_URL_ENV_VARS.to_vec(),
            })?;

        let mut config = Self::new(base_url)?;
        if let Some(raw) = non_blank_env(TIMEOUT_ENV_VAR) {
            config.timeout = parse_timeout_ms(&raw)?;
        }
        Ok(config)
    }

    /// Sets the default request timeout. A zero duration restores
    /// [`DEFAULT_TIMEOUT_MS`].
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = if timeout.is_zero() {
            Duration::from_millis(DEFAULT_TIMEOUT_MS)
        } else {
            timeout
        };
        self
    }

    /// Adds (or replaces) a default header.
    ///
    /// ## Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn with_header(
        mut self,
        name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<Self, ConfigError> {
        let (name, value) = parse_header(name.as_ref(), value.as_ref())?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Overlays a header map onto the defaults; incoming values win.
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        overlay_headers(&mut self.headers, &headers);
        self
    }

    /// The base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The default request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The default headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub(crate) fn into_parts(self) -> (String, Duration, HeaderMap) {
        (self.base_url, self.timeout, self.headers)
    }
}

/// Partial configuration applied when the global client is reconfigured.
///
/// Unset fields fall back to the freshly resolved environment config. A
/// previously set bearer token is dropped unless [`keep_auth_token`] is set.
///
/// [`keep_auth_token`]: ConfigOverrides::keep_auth_token
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Replacement base URL.
    pub base_url: Option<String>,
    /// Replacement default timeout.
    pub timeout: Option<Duration>,
    /// Extra default headers, overlaid onto the resolved defaults.
    pub headers: HeaderMap,
    /// Carry the current client's `Authorization` header into the new client.
    pub keep_auth_token: bool,
}

impl ConfigOverrides {
    /// Overrides the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Overrides the default timeout. A zero duration leaves the resolved
    /// timeout in place.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Adds a default header.
    ///
    /// ## Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn header(
        mut self,
        name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<Self, ConfigError> {
        let (name, value) = parse_header(name.as_ref(), value.as_ref())?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Keeps the existing bearer token across the reconfiguration.
    pub fn keep_auth_token(mut self) -> Self {
        self.keep_auth_token = true;
        self
    }

    /// Builds the resulting config.
    ///
    /// The environment is only consulted when no base URL override is given.
    ///
    /// ## Errors
    ///
    /// Returns an error if the base URL is missing or invalid.
    pub fn resolve(self) -> Result<ApiClientConfig, ConfigError> {
        let mut config = match self.base_url {
            Some(base_url) => {
                let mut config = ApiClientConfig::new(base_url)?;
                if let Some(raw) = non_blank_env(TIMEOUT_ENV_VAR) {
                    config.timeout = parse_timeout_ms(&raw)?;
                }
                config
            }
            None => ApiClientConfig::from_env()?,
        };
        if let Some(timeout) = self.timeout.filter(|t| !t.is_zero()) {
            config.timeout = timeout;
        }
        Ok(config.with_headers(self.headers))
    }
}

/// Validates a header pair.
pub(crate) fn parse_header(
    name: &str,
    value: &str,
) -> Result<(HeaderName, HeaderValue), ConfigError> {
    let header_name =
        HeaderName::try_from(name).map_err(|e| ConfigError::invalid_header(name, e))?;
    let header_value =
        HeaderValue::try_from(value).map_err(|e| ConfigError::invalid_header(name, e))?;
    Ok((header_name, header_value))
}

/// Shallow merge: every key in `overrides` replaces the same key in `target`.
pub(crate) fn overlay_headers(target: &mut HeaderMap, overrides: &HeaderMap) {
    for name in overrides.keys() {
        target.remove(name);
    }
    for (name, value) in overrides {
        target.append(name.clone(), value.clone());
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed)?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::UnsupportedScheme {
            scheme: parsed.scheme().to_string(),
        });
    }
    Ok(trimmed.to_string())
}

fn parse_timeout_ms(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => Ok(Duration::from_millis(ms)),
        _ => Err(ConfigError::InvalidTimeout {
            value: raw.to_string(),
        }),
    }
}

fn non_blank_env(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScopedEnv;

    #[test]
    fn test_new_strips_trailing_slash() {
        let config = ApiClientConfig::new("https://api.example.com/v1/").unwrap();
        assert_eq!(config.base_url(), "https://api.example.com/v1");
        assert_eq!(config.timeout(), Duration::from_millis(DEFAULT_TIMEOUT_MS));
    }

    #[test]
    fn test_new_sets_json_content_type() {
        let config = ApiClientConfig::new("http://localhost:3000").unwrap();
        assert_eq!(
            config.headers().get(CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[test]
    fn test_new_rejects_invalid_url() {
        assert!(matches!(
            ApiClientConfig::new("not a url"),
            Err(ConfigError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_new_rejects_non_http_scheme() {
        assert!(matches!(
            ApiClientConfig::new("ftp://files.example.com"),
            Err(ConfigError::UnsupportedScheme { .. })
        ));
    }

    #[test]
    fn test_with_header_overrides_content_type() {
        let config = ApiClientConfig::new("https://api.example.com")
            .unwrap()
            .with_header("content-type", "application/vnd.api+json")
            .unwrap();
        assert_eq!(
            config.headers().get(CONTENT_TYPE).unwrap(),
            "application/vnd.api+json"
        );
        assert_eq!(config.headers().len(), 1);
    }

    #[test]
    fn test_with_header_rejects_invalid_value() {
        let result = ApiClientConfig::new("https://api.example.com")
            .unwrap()
            .with_header("X-Trace", "line\nbreak");
        assert!(matches!(result, Err(ConfigError::InvalidHeader { .. })));
    }

    #[test]
    fn test_overlay_headers_is_shallow_overwrite() {
        let mut target = HeaderMap::new();
        target.insert("x-a", HeaderValue::from_static("1"));
        target.insert("x-b", HeaderValue::from_static("2"));

        let mut overrides = HeaderMap::new();
        overrides.insert("x-b", HeaderValue::from_static("3"));
        overrides.insert("x-c", HeaderValue::from_static("4"));

        overlay_headers(&mut target, &overrides);
        assert_eq!(target.get("x-a").unwrap(), "1");
        assert_eq!(target.get("x-b").unwrap(), "3");
        assert_eq!(target.get("x-c").unwrap(), "4");
        assert_eq!(target.len(), 3);
    }

    #[test]
    #[serial_test::serial]
    fn test_from_env_prefers_public_url() {
        let _public = ScopedEnv::set("NEXT_PUBLIC_API_URL", "https://public.example.com/");
        let _private = ScopedEnv::set("API_URL", "https://private.example.com");
        let _timeout = ScopedEnv::unset(TIMEOUT_ENV_VAR);

        let config = ApiClientConfig::from_env().unwrap();
        assert_eq!(config.base_url(), "https://public.example.com");
    }

    #[test]
    #[serial_test::serial]
    fn test_from_env_falls_back_to_api_url() {
        let _public = ScopedEnv::set("NEXT_PUBLIC_API_URL", "   ");
        let _private = ScopedEnv::set("API_URL", "https://private.example.com");
        let _timeout = ScopedEnv::set(TIMEOUT_ENV_VAR, "2500");

        let config = ApiClientConfig::from_env().unwrap();
        assert_eq!(config.base_url(), "https://private.example.com");
        assert_eq!(config.timeout(), Duration::from_millis(2500));
    }

    #[test]
    #[serial_test::serial]
    fn test_from_env_missing_base_url_is_fatal() {
        let _public = ScopedEnv::unset("NEXT_PUBLIC_API_URL");
        let _private = ScopedEnv::unset("API_URL");

        assert!(matches!(
            ApiClientConfig::from_env(),
            Err(ConfigError::MissingBaseUrl { .. })
        ));
    }

    #[test]
    #[serial_test::serial]
    fn test_from_env_rejects_bad_timeout() {
        let _private = ScopedEnv::set("API_URL", "https://private.example.com");
        let _timeout = ScopedEnv::set(TIMEOUT_ENV_VAR, "ten seconds");

        assert!(matches!(
            ApiClientConfig::from_env(),
            Err(ConfigError::InvalidTimeout { .. })
        ));
    }

    #[test]
    #[serial_test::serial]
    fn test_from_env_rejects_zero_timeout() {
        let _private = ScopedEnv::set("API_URL", "https://private.example.com");
        let _timeout = ScopedEnv::set(TIMEOUT_ENV_VAR, "0");

        assert!(matches!(
            ApiClientConfig::from_env(),
            Err(ConfigError::InvalidTimeout { value }) if value == "0"
        ));
    }

    #[test]
    fn test_with_zero_timeout_keeps_default() {
        let config = ApiClientConfig::new("https://api.example.com")
            .unwrap()
            .with_timeout(Duration::from_secs(3))
            .with_timeout(Duration::ZERO);
        assert_eq!(config.timeout(), Duration::from_millis(DEFAULT_TIMEOUT_MS));
    }

    #[test]
    #[serial_test::serial]
    fn test_overrides_ignore_zero_timeout() {
        let _timeout = ScopedEnv::set(TIMEOUT_ENV_VAR, "2500");

        let config = ConfigOverrides::default()
            .base_url("https://other.example.com")
            .timeout(Duration::ZERO)
            .resolve()
            .unwrap();

        assert_eq!(config.timeout(), Duration::from_millis(2500));
    }

    #[test]
    #[serial_test::serial]
    fn test_overrides_with_base_url_skip_env_lookup() {
        let _public = ScopedEnv::unset("NEXT_PUBLIC_API_URL");
        let _private = ScopedEnv::unset("API_URL");
        let _timeout = ScopedEnv::unset(TIMEOUT_ENV_VAR);

        let config = ConfigOverrides::default()
            .base_url("https://other.example.com/")
            .timeout(Duration::from_secs(3))
            .header("X-Tenant", "acme")
            .unwrap()
            .resolve()
            .unwrap();

        assert_eq!(config.base_url(), "https://other.example.com");
        assert_eq!(config.timeout(), Duration::from_secs(3));
        assert_eq!(config.headers().get("x-tenant").unwrap(), "acme");
        assert_eq!(
            config.headers().get(CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }
}
