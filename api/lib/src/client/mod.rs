//! HTTP client module.
//!
//! [`ApiClient`] is the verb-level facade holding default headers and the
//! bearer token; the executor performs single exchanges with timeout and
//! cancellation, folding every outcome into an
//! [`ApiResponse`](crate::ApiResponse).
//!
//! ## Examples
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use xplat_api::{ApiClient, ApiClientConfig, RequestOptions};
//!
//! #[derive(serde::Deserialize)]
//! struct User { id: u64, name: String }
//!
//! let client = ApiClient::new(ApiClientConfig::new("https://api.example.com")?)?;
//!
//! let options = RequestOptions::new().timeout(Duration::from_secs(2));
//! let user = client.get::<User>("/users/1", Some(options)).await;
//!
//! let created = client
//!     .post::<User, _>("/users", Some(&serde_json::json!({"name": "Ada"})), None)
//!     .await;
//! ```

mod api_client;
mod executor;
mod options;

pub use api_client::{ApiClient, NO_BODY};
pub use options::{CancellationHandle, RequestOptions};
