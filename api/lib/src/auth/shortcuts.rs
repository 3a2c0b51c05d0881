//! Auth operations over the process-wide default client.
//!
//! Each call binds a fresh [`AuthClient`] to whatever
//! [`global::client`](crate::global::client) currently returns, so a
//! reconfigured default client is picked up immediately.

use crate::auth::client::AuthClient;
use crate::auth::types::{
    AuthResponse, AuthUser, ExternalTokenAuth, LoginCredentials, MessageResponse, RegisterData,
    TokenRefresh,
};
use crate::error::ConfigError;
use crate::global;
use crate::response::ApiResponse;

/// An [`AuthClient`] bound to the current default client.
///
/// ## Errors
///
/// Returns an error if the default client cannot be built.
pub fn auth_client() -> Result<AuthClient, ConfigError> {
    Ok(AuthClient::new(global::client()?))
}

pub async fn login(credentials: &LoginCredentials) -> Result<ApiResponse<AuthResponse>, ConfigError> {
    Ok(auth_client()?.login(credentials).await)
}

pub async fn register(data: &RegisterData) -> Result<ApiResponse<AuthResponse>, ConfigError> {
    Ok(auth_client()?.register(data).await)
}

pub async fn authenticate_with_external_token(
    auth: &ExternalTokenAuth,
) -> Result<ApiResponse<AuthResponse>, ConfigError> {
    Ok(auth_client()?.authenticate_with_external_token(auth).await)
}

pub async fn authenticate_with_token(token: &str) -> Result<ApiResponse<AuthUser>, ConfigError> {
    Ok(auth_client()?.authenticate_with_token(token).await)
}

pub async fn validate_token() -> Result<ApiResponse<AuthUser>, ConfigError> {
    Ok(auth_client()?.validate_token().await)
}

pub async fn get_profile() -> Result<ApiResponse<AuthUser>, ConfigError> {
    Ok(auth_client()?.get_profile().await)
}

pub async fn refresh_token() -> Result<ApiResponse<TokenRefresh>, ConfigError> {
    Ok(auth_client()?.refresh_token().await)
}

/// Logs out and clears the default client's token.
pub async fn logout() -> Result<ApiResponse<Option<MessageResponse>>, ConfigError> {
    Ok(auth_client()?.logout().await)
}

pub async fn request_password_reset(
    email: &str,
) -> Result<ApiResponse<Option<MessageResponse>>, ConfigError> {
    Ok(auth_client()?.request_password_reset(email).await)
}

pub async fn reset_password(
    token: &str,
    new_password: &str,
) -> Result<ApiResponse<Option<MessageResponse>>, ConfigError> {
    Ok(auth_client()?.reset_password(token, new_password).await)
}

pub async fn change_password(
    current_password: &str,
    new_password: &str,
) -> Result<ApiResponse<Option<MessageResponse>>, ConfigError> {
    Ok(auth_client()?
        .change_password(current_password, new_password)
        .await)
}

pub async fn login_with_google(token: &str) -> Result<ApiResponse<AuthResponse>, ConfigError> {
    Ok(auth_client()?.login_with_google(token).await)
}

pub async fn login_with_facebook(token: &str) -> Result<ApiResponse<AuthResponse>, ConfigError> {
    Ok(auth_client()?.login_with_facebook(token).await)
}

pub async fn login_with_github(token: &str) -> Result<ApiResponse<AuthResponse>, ConfigError> {
    Ok(auth_client()?.login_with_github(token).await)
}
