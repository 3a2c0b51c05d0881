//! Layered error types for the client.
//!
//! - [`ConfigError`] - Construction-time failures (base URL, headers, timeout).
//!   These are the only errors returned as `Err`.
//! - [`RequestError`] - Per-request failures. These never escape as `Err`;
//!   they travel inside the [`ApiResponse`](crate::ApiResponse) envelope.

mod config_error;
mod request_error;

pub use config_error::ConfigError;
pub use request_error::RequestError;
