//! The stateful client facade.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::client::executor::{PreparedRequest, execute};
use crate::client::options::RequestOptions;
use crate::config::{ApiClientConfig, overlay_headers, parse_header};
use crate::error::{ConfigError, RequestError};
use crate::method::RestMethod;
use crate::response::ApiResponse;

/// Convenience for verb calls that send no body.
///
/// ```rust,ignore
/// let refreshed = client.post::<TokenRefresh, _>("/auth/refresh", NO_BODY, None).await;
/// ```
pub const NO_BODY: Option<&'static ()> = None;

/// Async HTTP client for a single API base URL.
///
/// The client owns a connection pool, an immutable base URL and timeout, and
/// a mutable default-header map that carries the bearer token. Share it
/// across tasks with `Arc<ApiClient>`; header writes are visible to requests
/// started afterwards, while in-flight requests keep the snapshot taken when
/// they started.
///
/// ## Examples
///
/// ```rust,ignore
/// use xplat_api::{ApiClient, ApiClientConfig};
///
/// #[derive(serde::Deserialize)]
/// struct User { id: u64, name: String }
///
/// let client = ApiClient::new(ApiClientConfig::new("https://api.example.com")?)?;
/// client.set_auth_token("eyJhbGciOi...")?;
///
/// let users = client.get::<Vec<User>>("/users", None).await;
/// match users.as_result() {
///     Ok(users) => println!("{} users", users.len()),
///     Err(err) => eprintln!("failed ({}): {err}", users.status()),
/// }
/// ```
#[derive(Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
    headers: RwLock<HeaderMap>,
}

impl ApiClient {
    /// Creates a client from a config.
    ///
    /// ## Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: ApiClientConfig) -> Result<Self, ConfigError> {
        let (base_url, timeout, headers) = config.into_parts();
        let http = reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .build()?;

        info!(
            base_url = %base_url,
            timeout_ms = timeout.as_millis(),
            "API client created"
        );

        Ok(Self {
            http,
            base_url,
            timeout,
            headers: RwLock::new(headers),
        })
    }

    /// Creates a client from the process environment.
    ///
    /// ## Errors
    ///
    /// Returns an error if no base URL is configured or it is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(ApiClientConfig::from_env()?)
    }

    /// The base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The default timeout applied when a call sets none.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// A snapshot of the current default headers.
    pub fn default_headers(&self) -> HeaderMap {
        self.read_headers().clone()
    }

    /// The bearer token currently applied to requests, if any.
    pub fn auth_token(&self) -> Option<String> {
        self.read_headers()
            .get(AUTHORIZATION)?
            .to_str()
            .ok()?
            .strip_prefix("Bearer ")
            .map(str::to_string)
    }

    /// Joins an endpoint onto the base URL with exactly one `/` between them.
    pub fn url_for(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    /// Sends `Authorization: Bearer <token>` on every subsequent request.
    ///
    /// ## Errors
    ///
    /// Returns an error if the token contains characters not allowed in a
    /// header value; the previous token, if any, is left in place.
    pub fn set_auth_token(&self, token: &str) -> Result<(), ConfigError> {
        let mut value = HeaderValue::try_from(format!("Bearer {token}"))
            .map_err(|e| ConfigError::invalid_header(AUTHORIZATION.as_str(), e))?;
        value.set_sensitive(true);
        self.write_headers().insert(AUTHORIZATION, value);
        debug!("bearer token set");
        Ok(())
    }

    /// Stops sending the `Authorization` header.
    pub fn remove_auth_token(&self) {
        if self.write_headers().remove(AUTHORIZATION).is_some() {
            debug!("bearer token removed");
        }
    }

    /// Shallow-merges headers into the defaults; incoming keys replace
    /// existing ones, other keys are untouched.
    pub fn update_default_headers(&self, headers: &HeaderMap) {
        overlay_headers(&mut self.write_headers(), headers);
    }

    /// Sets a single default header.
    ///
    /// ## Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn set_default_header(
        &self,
        name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<(), ConfigError> {
        let (name, value) = parse_header(name.as_ref(), value.as_ref())?;
        self.write_headers().insert(name, value);
        Ok(())
    }

    /// Issues a GET request.
    pub async fn get<T>(&self, endpoint: &str, options: Option<RequestOptions>) -> ApiResponse<T>
    where
        T: DeserializeOwned,
    {
        self.request(RestMethod::Get, endpoint, NO_BODY, options)
            .await
    }

    /// Issues a POST request with an optional JSON body.
    pub async fn post<T, B>(
        &self,
        endpoint: &str,
        body: Option<&B>,
        options: Option<RequestOptions>,
    ) -> ApiResponse<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(RestMethod::Post, endpoint, body, options).await
    }

    /// Issues a PUT request with an optional JSON body.
    pub async fn put<T, B>(
        &self,
        endpoint: &str,
        body: Option<&B>,
        options: Option<RequestOptions>,
    ) -> ApiResponse<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(RestMethod::Put, endpoint, body, options).await
    }

    /// Issues a PATCH request with an optional JSON body.
    pub async fn patch<T, B>(
        &self,
        endpoint: &str,
        body: Option<&B>,
        options: Option<RequestOptions>,
    ) -> ApiResponse<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(RestMethod::Patch, endpoint, body, options).await
    }

    /// Issues a DELETE request.
    pub async fn delete<T>(&self, endpoint: &str, options: Option<RequestOptions>) -> ApiResponse<T>
    where
        T: DeserializeOwned,
    {
        self.request(RestMethod::Delete, endpoint, NO_BODY, options)
            .await
    }

    /// Issues a request with any supported method.
    ///
    /// The body is serialized as JSON only for POST, PUT and PATCH. Every
    /// failure, including body serialization, is reported in the envelope.
    pub async fn request<T, B>(
        &self,
        method: RestMethod,
        endpoint: &str,
        body: Option<&B>,
        options: Option<RequestOptions>,
    ) -> ApiResponse<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let options = options.unwrap_or_default();

        let mut headers = self.default_headers();
        overlay_headers(&mut headers, &options.headers);

        let body = match body.filter(|_| method.has_body()).map(serde_json::to_vec) {
            None => None,
            Some(Ok(bytes)) => Some(bytes),
            Some(Err(e)) => return ApiResponse::failure(RequestError::Encode(e.to_string())),
        };

        let request = PreparedRequest {
            method,
            url: self.url_for(endpoint),
            headers,
            body,
            timeout: options
                .timeout
                .filter(|t| !t.is_zero())
                .unwrap_or(self.timeout),
            cancellation: options.cancellation,
        };

        execute(&self.http, request).await
    }

    fn read_headers(&self) -> RwLockReadGuard<'_, HeaderMap> {
        self.headers.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_headers(&self) -> RwLockWriteGuard<'_, HeaderMap> {
        self.headers.write().unwrap_or_else(PoisonError::into_inner)
    }
}
