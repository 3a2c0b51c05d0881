//! Named authentication operations over an [`ApiClient`].

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::auth::types::{
    AuthResponse, AuthUser, ExternalProvider, ExternalTokenAuth, LoginCredentials,
    MessageResponse, RegisterData, TokenRefresh,
};
use crate::client::{ApiClient, NO_BODY};
use crate::error::RequestError;
use crate::response::ApiResponse;

const LOGIN: &str = "/auth/login";
const REGISTER: &str = "/auth/register";
const EXTERNAL: &str = "/auth/external";
const ME: &str = "/auth/me";
const VALIDATE: &str = "/auth/validate";
const PROFILE: &str = "/auth/profile";
const REFRESH: &str = "/auth/refresh";
const LOGOUT: &str = "/auth/logout";
const FORGOT_PASSWORD: &str = "/auth/forgot-password";
const RESET_PASSWORD: &str = "/auth/reset-password";
const CHANGE_PASSWORD: &str = "/auth/change-password";

#[derive(Serialize)]
struct ForgotPassword<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct ResetPassword<'a> {
    token: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChangePassword<'a> {
    current_password: &'a str,
    new_password: &'a str,
}

/// Authentication endpoints bound to a shared [`ApiClient`].
///
/// Each method maps to exactly one REST call and returns its envelope as-is.
/// Only two methods touch the client's token: [`authenticate_with_token`]
/// sets it before validating, and [`logout`] always removes it afterwards.
/// A successful [`login`] does not store the returned token; call
/// [`ApiClient::set_auth_token`] with it.
///
/// [`authenticate_with_token`]: Self::authenticate_with_token
/// [`logout`]: Self::logout
/// [`login`]: Self::login
///
/// ## Examples
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use xplat_api::auth::{AuthClient, LoginCredentials};
///
/// let auth = AuthClient::new(Arc::clone(&api));
/// let session = auth.login(&LoginCredentials::new("a@b.com", "secret")).await;
/// if let Some(session) = session.data() {
///     api.set_auth_token(&session.token)?;
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthClient {
    api: Arc<ApiClient>,
}

impl AuthClient {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// The underlying API client.
    pub fn api(&self) -> &Arc<ApiClient> {
        &self.api
    }

    /// `POST /auth/login`
    pub async fn login(&self, credentials: &LoginCredentials) -> ApiResponse<AuthResponse> {
        self.api.post(LOGIN, Some(credentials), None).await
    }

    /// `POST /auth/register`
    pub async fn register(&self, data: &RegisterData) -> ApiResponse<AuthResponse> {
        self.api.post(REGISTER, Some(data), None).await
    }

    /// `POST /auth/external`: exchanges a third-party token for a session.
    pub async fn authenticate_with_external_token(
        &self,
        auth: &ExternalTokenAuth,
    ) -> ApiResponse<AuthResponse> {
        self.api.post(EXTERNAL, Some(auth), None).await
    }

    /// Installs `token` on the client, then confirms it with `GET /auth/me`.
    ///
    /// The token stays installed even if the backend rejects it. A token that
    /// is not a valid header value is reported as a status-0 envelope and
    /// nothing is sent.
    pub async fn authenticate_with_token(&self, token: &str) -> ApiResponse<AuthUser> {
        if let Err(err) = self.api.set_auth_token(token) {
            return ApiResponse::failure(RequestError::InvalidHeader(err.to_string()));
        }
        self.api.get(ME, None).await
    }

    /// `GET /auth/validate`
    pub async fn validate_token(&self) -> ApiResponse<AuthUser> {
        self.api.get(VALIDATE, None).await
    }

    /// `GET /auth/profile`
    pub async fn get_profile(&self) -> ApiResponse<AuthUser> {
        self.api.get(PROFILE, None).await
    }

    /// `POST /auth/refresh`
    pub async fn refresh_token(&self) -> ApiResponse<TokenRefresh> {
        self.api.post(REFRESH, NO_BODY, None).await
    }

    /// `POST /auth/logout`, then removes the local token whatever the
    /// server answered. An empty success body (`204`) decodes as `None`.
    pub async fn logout(&self) -> ApiResponse<Option<MessageResponse>> {
        let response = self.api.post(LOGOUT, NO_BODY, None).await;
        self.api.remove_auth_token();
        debug!(status = response.status(), "logged out");
        response
    }

    /// `POST /auth/forgot-password`
    pub async fn request_password_reset(&self, email: &str) -> ApiResponse<Option<MessageResponse>> {
        self.api
            .post(FORGOT_PASSWORD, Some(&ForgotPassword { email }), None)
            .await
    }

    /// `POST /auth/reset-password` with the emailed reset token.
    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> ApiResponse<Option<MessageResponse>> {
        let body = ResetPassword {
            token,
            password: new_password,
        };
        self.api.post(RESET_PASSWORD, Some(&body), None).await
    }

    /// `PUT /auth/change-password` for the signed-in user.
    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> ApiResponse<Option<MessageResponse>> {
        let body = ChangePassword {
            current_password,
            new_password,
        };
        self.api.put(CHANGE_PASSWORD, Some(&body), None).await
    }

    pub async fn login_with_google(&self, token: &str) -> ApiResponse<AuthResponse> {
        self.login_with_provider(ExternalProvider::Google, token)
            .await
    }

    pub async fn login_with_facebook(&self, token: &str) -> ApiResponse<AuthResponse> {
        self.login_with_provider(ExternalProvider::Facebook, token)
            .await
    }

    pub async fn login_with_github(&self, token: &str) -> ApiResponse<AuthResponse> {
        self.login_with_provider(ExternalProvider::Github, token)
            .await
    }

    async fn login_with_provider(
        &self,
        provider: ExternalProvider,
        token: &str,
    ) -> ApiResponse<AuthResponse> {
        self.authenticate_with_external_token(&ExternalTokenAuth::new(provider, token))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiClientConfig;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn auth_for(server: &MockServer) -> AuthClient {
        let api = ApiClient::new(ApiClientConfig::new(server.uri()).unwrap()).unwrap();
        AuthClient::new(Arc::new(api))
    }

    fn session_body(token: &str) -> serde_json::Value {
        json!({
            "user": {"id": "u1", "email": "a@b.com", "name": "Ada"},
            "token": token,
            "expiresAt": "2030-01-01T00:00:00Z"
        })
    }

    #[tokio::test]
    async fn test_login_returns_session() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .and(body_json(json!({"email": "a@b.com", "password": "x"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(session_body("T")))
            .expect(1)
            .mount(&mock_server)
            .await;

        let auth = auth_for(&mock_server);
        let response = auth
            .login(&LoginCredentials::new("a@b.com", "x"))
            .await;

        assert_eq!(response.data().map(|s| s.token.as_str()), Some("T"));
        assert!(auth.api().auth_token().is_none());
    }

    #[tokio::test]
    async fn test_register_sends_camel_case() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/register"))
            .and(body_json(json!({
                "email": "a@b.com",
                "password": "pw",
                "name": "Ada",
                "confirmPassword": "pw"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(session_body("R")))
            .expect(1)
            .mount(&mock_server)
            .await;

        let auth = auth_for(&mock_server);
        let response = auth
            .register(&RegisterData {
                email: "a@b.com".to_string(),
                password: "pw".to_string(),
                name: "Ada".to_string(),
                confirm_password: "pw".to_string(),
            })
            .await;

        assert_eq!(response.status(), 201);
        assert_eq!(response.data().map(|s| s.user.name.as_str()), Some("Ada"));
    }

    #[tokio::test]
    async fn test_social_logins_use_fixed_provider() {
        let mock_server = MockServer::start().await;

        for provider in ["google", "facebook", "github"] {
            Mock::given(method("POST"))
                .and(path("/auth/external"))
                .and(body_json(json!({"provider": provider, "token": "tok"})))
                .respond_with(ResponseTemplate::new(200).set_body_json(session_body(provider)))
                .expect(1)
                .mount(&mock_server)
                .await;
        }

        let auth = auth_for(&mock_server);
        let google = auth.login_with_google("tok").await;
        let facebook = auth.login_with_facebook("tok").await;
        let github = auth.login_with_github("tok").await;

        assert_eq!(google.data().map(|s| s.token.as_str()), Some("google"));
        assert_eq!(facebook.data().map(|s| s.token.as_str()), Some("facebook"));
        assert_eq!(github.data().map(|s| s.token.as_str()), Some("github"));
    }

    #[tokio::test]
    async fn test_external_token_forwards_email() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/external"))
            .and(body_json(json!({
                "provider": "custom",
                "token": "sso",
                "email": "dev@example.com"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(session_body("S")))
            .expect(1)
            .mount(&mock_server)
            .await;

        let auth = auth_for(&mock_server);
        let request =
            ExternalTokenAuth::new(ExternalProvider::Custom, "sso").with_email("dev@example.com");
        let response = auth.authenticate_with_external_token(&request).await;

        assert!(response.is_success());
    }

    #[tokio::test]
    async fn test_authenticate_with_token_sets_then_validates() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .and(header("authorization", "Bearer existing-jwt"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "u1", "email": "a@b.com", "name": "Ada", "avatar": "https://img/a.png"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let auth = auth_for(&mock_server);
        let response = auth.authenticate_with_token("existing-jwt").await;

        assert_eq!(
            response.data().and_then(|u| u.avatar.as_deref()),
            Some("https://img/a.png")
        );
        assert_eq!(auth.api().auth_token().as_deref(), Some("existing-jwt"));
    }

    #[tokio::test]
    async fn test_authenticate_with_invalid_token_sends_nothing() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let auth = auth_for(&mock_server);
        let response = auth.authenticate_with_token("bad\r\ntoken").await;

        assert_eq!(response.status(), 0);
        assert!(matches!(
            response.request_error(),
            Some(RequestError::InvalidHeader(_))
        ));
    }

    #[tokio::test]
    async fn test_validate_and_profile() {
        let mock_server = MockServer::start().await;
        let user = json!({"id": "u1", "email": "a@b.com", "name": "Ada"});

        Mock::given(method("GET"))
            .and(path("/auth/validate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(user.clone()))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/auth/profile"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "expired"})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let auth = auth_for(&mock_server);
        assert_eq!(
            auth.validate_token().await.data().map(|u| u.id.as_str()),
            Some("u1")
        );

        let profile = auth.get_profile().await;
        assert_eq!(profile.status(), 401);
        assert_eq!(profile.error().as_deref(), Some("expired"));
    }

    #[tokio::test]
    async fn test_refresh_token() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/refresh"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token": "fresh", "expiresAt": "2031-01-01T00:00:00Z"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let auth = auth_for(&mock_server);
        let response = auth.refresh_token().await;

        assert_eq!(response.data().map(|r| r.token.as_str()), Some("fresh"));
    }

    #[tokio::test]
    async fn test_logout_removes_token_even_on_server_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/logout"))
            .and(header("authorization", "Bearer session"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let auth = auth_for(&mock_server);
        auth.api().set_auth_token("session").unwrap();

        let response = auth.logout().await;

        assert_eq!(response.status(), 500);
        assert!(auth.api().auth_token().is_none());
        assert!(!auth
            .api()
            .default_headers()
            .contains_key(reqwest::header::AUTHORIZATION));
    }

    #[tokio::test]
    async fn test_logout_accepts_no_content() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/logout"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&mock_server)
            .await;

        let auth = auth_for(&mock_server);
        auth.api().set_auth_token("session").unwrap();

        let response = auth.logout().await;

        assert!(response.is_success());
        assert_eq!(response.status(), 204);
        assert_eq!(response.data(), Some(&None));
        assert!(response.error().is_none());
        assert!(auth.api().auth_token().is_none());
    }

    #[tokio::test]
    async fn test_password_flows() {
        let mock_server = MockServer::start().await;
        let ok = json!({"message": "ok"});

        Mock::given(method("POST"))
            .and(path("/auth/forgot-password"))
            .and(body_json(json!({"email": "a@b.com"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok.clone()))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/reset-password"))
            .and(body_json(json!({"token": "reset-1", "password": "new-pw"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok.clone()))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/auth/change-password"))
            .and(body_json(json!({"currentPassword": "old-pw", "newPassword": "new-pw"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok))
            .expect(1)
            .mount(&mock_server)
            .await;

        let auth = auth_for(&mock_server);
        let forgot = auth.request_password_reset("a@b.com").await;
        let reset = auth.reset_password("reset-1", "new-pw").await;
        let changed = auth.change_password("old-pw", "new-pw").await;

        for response in [forgot, reset, changed] {
            assert_eq!(
                response.data().and_then(Option::as_ref).map(|m| m.message.as_str()),
                Some("ok")
            );
        }
    }
}
