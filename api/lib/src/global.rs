//! Process-wide default client and free-function shortcuts.
//!
//! The default client lives in a single slot with an explicit lifecycle:
//!
//! - [`client`] returns the installed client, building one from the
//!   environment on first use.
//! - [`install`] puts a caller-built client in the slot.
//! - [`reconfigure`] replaces the slot with a freshly configured client.
//! - [`reset`] empties the slot.
//!
//! The verb shortcuts ([`get`], [`post`], ...) resolve the slot on every
//! call, so they always use the most recently installed client. They only
//! return `Err` when no client can be built; request failures are still
//! reported inside the [`ApiResponse`].
//!
//! ## Reconfiguration drops the bearer token
//!
//! [`reconfigure`] builds a brand-new client, so a token set on the old one
//! is not carried over unless [`ConfigOverrides::keep_auth_token`] is set.

use std::sync::{Arc, PoisonError, RwLock};

use reqwest::header::{AUTHORIZATION, HeaderMap};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::info;

use crate::client::{ApiClient, RequestOptions};
use crate::config::ConfigOverrides;
use crate::error::ConfigError;
use crate::response::ApiResponse;

static DEFAULT_CLIENT: RwLock<Option<Arc<ApiClient>>> = RwLock::new(None);

/// Returns the default client, building it from the environment if the
/// slot is empty.
///
/// ## Errors
///
/// Returns [`ConfigError::MissingBaseUrl`] if no client is installed and
/// the environment does not name a base URL.
pub fn client() -> Result<Arc<ApiClient>, ConfigError> {
    if let Some(existing) = DEFAULT_CLIENT
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
    {
        return Ok(Arc::clone(existing));
    }

    let mut slot = DEFAULT_CLIENT
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    // Another caller may have filled the slot between the two locks.
    if let Some(existing) = slot.as_ref() {
        return Ok(Arc::clone(existing));
    }

    let created = Arc::new(ApiClient::from_env()?);
    info!(base_url = created.base_url(), "default API client initialized");
    *slot = Some(Arc::clone(&created));
    Ok(created)
}

/// Installs a caller-built client as the default, returning the shared handle.
pub fn install(client: ApiClient) -> Arc<ApiClient> {
    let shared = Arc::new(client);
    install_shared(Arc::clone(&shared));
    shared
}

/// Installs an already shared client as the default.
pub fn install_shared(client: Arc<ApiClient>) {
    info!(base_url = client.base_url(), "default API client installed");
    *DEFAULT_CLIENT
        .write()
        .unwrap_or_else(PoisonError::into_inner) = Some(client);
}

/// Replaces the default client with one built from freshly resolved
/// configuration plus `overrides`.
///
/// In-flight requests on the previous client complete normally.
///
/// ## Errors
///
/// Returns an error if the resulting configuration is invalid; the current
/// default client is left untouched in that case.
pub fn reconfigure(overrides: ConfigOverrides) -> Result<Arc<ApiClient>, ConfigError> {
    let carried_token = if overrides.keep_auth_token {
        current().and_then(|existing| existing.default_headers().get(AUTHORIZATION).cloned())
    } else {
        None
    };

    let replacement = ApiClient::new(overrides.resolve()?)?;
    if let Some(token) = carried_token {
        let mut auth = HeaderMap::new();
        auth.insert(AUTHORIZATION, token);
        replacement.update_default_headers(&auth);
    }

    let shared = Arc::new(replacement);
    *DEFAULT_CLIENT
        .write()
        .unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&shared));
    info!(base_url = shared.base_url(), "default API client reconfigured");
    Ok(shared)
}

/// Empties the slot; the next [`client`] call rebuilds from the environment.
pub fn reset() {
    DEFAULT_CLIENT
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .take();
}

/// Returns the installed client without building one.
pub fn current() -> Option<Arc<ApiClient>> {
    DEFAULT_CLIENT
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// GET through the default client.
///
/// ## Errors
///
/// Returns an error only if the default client cannot be built.
pub async fn get<T>(
    endpoint: &str,
    options: Option<RequestOptions>,
) -> Result<ApiResponse<T>, ConfigError>
where
    T: DeserializeOwned,
{
    Ok(client()?.get(endpoint, options).await)
}

/// POST through the default client.
///
/// ## Errors
///
/// Returns an error only if the default client cannot be built.
pub async fn post<T, B>(
    endpoint: &str,
    body: Option<&B>,
    options: Option<RequestOptions>,
) -> Result<ApiResponse<T>, ConfigError>
where
    T: DeserializeOwned,
    B: Serialize + ?Sized,
{
    Ok(client()?.post(endpoint, body, options).await)
}

/// PUT through the default client.
///
/// ## Errors
///
/// Returns an error only if the default client cannot be built.
pub async fn put<T, B>(
    endpoint: &str,
    body: Option<&B>,
    options: Option<RequestOptions>,
) -> Result<ApiResponse<T>, ConfigError>
where
    T: DeserializeOwned,
    B: Serialize + ?Sized,
{
    Ok(client()?.put(endpoint, body, options).await)
}

/// PATCH through the default client.
///
/// ## Errors
///
/// Returns an error only if the default client cannot be built.
pub async fn patch<T, B>(
    endpoint: &str,
    body: Option<&B>,
    options: Option<RequestOptions>,
) -> Result<ApiResponse<T>, ConfigError>
where
    T: DeserializeOwned,
    B: Serialize + ?Sized,
{
    Ok(client()?.patch(endpoint, body, options).await)
}

/// DELETE through the default client. Named `del` because `delete` reads
/// poorly as a free function next to the verb methods.
///
/// ## Errors
///
/// Returns an error only if the default client cannot be built.
pub async fn del<T>(
    endpoint: &str,
    options: Option<RequestOptions>,
) -> Result<ApiResponse<T>, ConfigError>
where
    T: DeserializeOwned,
{
    Ok(client()?.delete(endpoint, options).await)
}

/// Sets the bearer token on the default client.
///
/// ## Errors
///
/// Returns an error if the default client cannot be built or the token is
/// not a valid header value.
pub fn set_auth_token(token: &str) -> Result<(), ConfigError> {
    client()?.set_auth_token(token)
}

/// Removes the bearer token from the default client.
///
/// ## Errors
///
/// Returns an error only if the default client cannot be built.
pub fn remove_auth_token() -> Result<(), ConfigError> {
    client()?.remove_auth_token();
    Ok(())
}

/// Shallow-merges headers into the default client's defaults.
///
/// ## Errors
///
/// Returns an error only if the default client cannot be built.
pub fn update_default_headers(headers: &HeaderMap) -> Result<(), ConfigError> {
    client()?.update_default_headers(headers);
    Ok(())
}
