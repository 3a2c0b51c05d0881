//! Authentication client.
//!
//! [`AuthClient`] maps the backend's `/auth/*` endpoints onto named methods
//! over a shared [`ApiClient`](crate::ApiClient). [`shortcuts`] exposes the
//! same operations as free functions bound to the process-wide default
//! client.

mod client;
pub mod shortcuts;
mod types;

pub use client::AuthClient;
pub use types::{
    AuthErrorBody, AuthResponse, AuthUser, ExternalProvider, ExternalTokenAuth, LoginCredentials,
    MessageResponse, RegisterData, TokenRefresh,
};
