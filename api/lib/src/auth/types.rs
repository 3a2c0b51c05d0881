//! Authentication payloads.
//!
//! These records pass through the client unchanged; field names follow the
//! backend's camelCase wire format.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Email and password credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

impl LoginCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Sign-up payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterData {
    pub email: String,
    pub password: String,
    pub name: String,
    pub confirm_password: String,
}

/// The authenticated user as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Successful login, registration or external-token exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: AuthUser,
    pub token: String,
    pub expires_at: String,
}

/// A refreshed session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRefresh {
    pub token: String,
    pub expires_at: String,
}

/// Acknowledgement carrying a human-readable message.
///
/// Endpoints that may answer with an empty body return it as
/// `Option<MessageResponse>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Issuer of a third-party token exchanged at `/auth/external`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ExternalProvider {
    Google,
    Facebook,
    Github,
    Custom,
}

/// A third-party token to exchange for a local session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalTokenAuth {
    pub provider: ExternalProvider,
    pub token: String,
    /// Some providers do not embed the email in their token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl ExternalTokenAuth {
    pub fn new(provider: ExternalProvider, token: impl Into<String>) -> Self {
        Self {
            provider,
            token: token.into(),
            email: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Error body returned by the auth endpoints.
///
/// Not decoded by the client itself (failures surface as envelope errors);
/// exposed for callers that want to parse structured auth errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthErrorBody {
    pub message: String,
    pub code: String,
}
