//! Typed HTTP API client.
//!
//! `xplat_api` is the request layer shared by the web and mobile apps: a
//! configurable client with timeout and cancellation handling, bearer-token
//! session management, a uniform response envelope, and an authentication
//! client built on top of it.
//!
//! ## Features
//!
//! - **Envelope results**: every call resolves to an [`ApiResponse`]; network
//!   failures, timeouts and HTTP errors never surface as `Err`
//! - **Bearer sessions**: [`ApiClient::set_auth_token`] /
//!   [`ApiClient::remove_auth_token`] manage the `Authorization` header
//! - **Per-call options**: header overrides, timeouts and a
//!   [`CancellationHandle`] via [`RequestOptions`]
//! - **Default client**: [`global`] holds a process-wide client built from
//!   `NEXT_PUBLIC_API_URL` / `API_URL`, with free-function shortcuts
//! - **Auth endpoints**: [`auth::AuthClient`] for login, registration,
//!   social tokens, refresh, logout and password flows
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use xplat_api::{ApiClient, ApiClientConfig};
//! use xplat_api::auth::{AuthClient, LoginCredentials};
//!
//! let api = Arc::new(ApiClient::new(ApiClientConfig::new("https://api.example.com")?)?);
//! let auth = AuthClient::new(Arc::clone(&api));
//!
//! let session = auth.login(&LoginCredentials::new("a@b.com", "secret")).await;
//! match session.as_result() {
//!     Ok(session) => api.set_auth_token(&session.token)?,
//!     Err(err) => eprintln!("login failed ({}): {err}", session.status()),
//! }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod global;
pub mod method;
pub mod response;

#[cfg(test)]
mod test_support;

// Re-exports for convenience
pub use client::{ApiClient, CancellationHandle, NO_BODY, RequestOptions};
pub use config::{ApiClientConfig, ConfigOverrides};
pub use error::{ConfigError, RequestError};
pub use method::RestMethod;
pub use response::{ApiResponse, BodyFormat};
