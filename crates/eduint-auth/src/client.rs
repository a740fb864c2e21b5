//! GoTrue-compatible authentication client.
//!
//! All requests carry the project's public `apikey` header. Calls that can
//! fail transiently (sign-up, sign-in) go through the client's
//! [`RetryPolicy`].

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Url};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::retry::RetryPolicy;
use crate::{AuthError, OAuthProvider, Result, Session, SignUpOutcome, User};

/// Minimum password length accepted at sign-up.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Checks a sign-up form before anything is sent.
pub fn validate_sign_up(password: &str, confirm: &str) -> Result<()> {
    if password != confirm {
        return Err(AuthError::PasswordMismatch);
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::PasswordTooShort {
            min: MIN_PASSWORD_LENGTH,
        });
    }
    Ok(())
}

/// Error body shapes the service uses.
///
/// Sign-up errors carry `error_code` and `msg`; token errors carry
/// `error`, `error_description` and, on newer servers, `error_code`.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ErrorBody {
    fn message(&self) -> Option<&str> {
        self.msg
            .as_deref()
            .or(self.message.as_deref())
            .or(self.error_description.as_deref())
            .or(self.error.as_deref())
    }
}

/// Maps an error response to an [`AuthError`].
///
/// The provider's `error_code` decides when present. Older servers send
/// only a message, so known phrases are matched as a fallback.
fn classify(status: u16, body: &str) -> AuthError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = parsed.message().unwrap_or(body).trim().to_string();

    if let Some(code) = parsed.error_code.as_deref() {
        match code {
            "user_already_exists" | "email_exists" => return AuthError::AlreadyRegistered,
            "invalid_credentials" => return AuthError::InvalidCredentials,
            "bad_jwt" | "session_not_found" | "session_expired" => {
                return AuthError::SessionExpired
            }
            _ => {}
        }
    } else if message.contains("already registered") {
        return AuthError::AlreadyRegistered;
    } else if message.contains("Invalid login credentials") {
        return AuthError::InvalidCredentials;
    }

    if status == 401 {
        return AuthError::SessionExpired;
    }

    let message = if message.is_empty() {
        format!("Authentication service error: {status}")
    } else {
        message
    };
    AuthError::provider(status, message)
}

/// Client for the authentication service.
#[derive(Clone)]
pub struct AuthClient {
    http: reqwest::Client,
    base_url: Url,
    anon_key: String,
    redirect_to: String,
    retry: RetryPolicy,
}

impl std::fmt::Debug for AuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthClient")
            .field("base_url", &self.base_url.as_str())
            .field("redirect_to", &self.redirect_to)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl AuthClient {
    /// Creates a client for the service at `base_url`.
    pub fn new(
        base_url: &str,
        anon_key: impl Into<String>,
        redirect_to: impl Into<String>,
    ) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| AuthError::InvalidUrl(e.to_string()))?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(AuthError::network)?;
        Ok(Self {
            http,
            base_url,
            anon_key: anon_key.into(),
            redirect_to: redirect_to.into(),
            retry: RetryPolicy::default(),
        })
    }

    /// Replaces the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// The retry policy in use.
    #[must_use]
    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| AuthError::InvalidUrl(e.to_string()))
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.anon_key)
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response> {
        let resp = request.send().await.map_err(|e| {
            debug!(error = %e, "Authentication request failed");
            AuthError::network(e)
        })?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(classify(status.as_u16(), &body))
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Registers a new account.
    ///
    /// The form is validated locally first; nothing is sent if it fails.
    pub async fn sign_up(&self, email: &str, password: &str, confirm: &str) -> Result<SignUpOutcome> {
        validate_sign_up(password, confirm)?;
        let outcome = self
            .retry
            .run("sign_up", move || self.sign_up_once(email, password))
            .await?;
        info!(
            confirmed = matches!(outcome, SignUpOutcome::SignedIn(_)),
            "Account created"
        );
        Ok(outcome)
    }

    async fn sign_up_once(&self, email: &str, password: &str) -> Result<SignUpOutcome> {
        let mut url = self.endpoint("auth/v1/signup")?;
        url.query_pairs_mut()
            .append_pair("redirect_to", &self.redirect_to);
        let resp = self
            .send(
                self.request(Method::POST, url)
                    .json(&json!({ "email": email, "password": password })),
            )
            .await?;
        let body: Value = resp
            .json()
            .await
            .map_err(|e| AuthError::Malformed(e.to_string()))?;
        parse_sign_up(body)
    }

    /// Signs in with email and password.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let session = self
            .retry
            .run("sign_in", move || self.sign_in_once(email, password))
            .await?;
        info!(user = %session.user.id, "Signed in");
        Ok(session)
    }

    async fn sign_in_once(&self, email: &str, password: &str) -> Result<Session> {
        let mut url = self.endpoint("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");
        let resp = self
            .send(
                self.request(Method::POST, url)
                    .json(&json!({ "email": email, "password": password })),
            )
            .await?;
        resp.json()
            .await
            .map_err(|e| AuthError::Malformed(e.to_string()))
    }

    /// URL that starts an OAuth sign-in and returns to the configured page.
    pub fn oauth_url(&self, provider: OAuthProvider) -> Result<Url> {
        let mut url = self.endpoint("auth/v1/authorize")?;
        url.query_pairs_mut()
            .append_pair("provider", provider.as_str())
            .append_pair("redirect_to", &self.redirect_to);
        Ok(url)
    }

    /// Revokes the session's tokens.
    pub async fn sign_out(&self, session: &Session) -> Result<()> {
        let url = self.endpoint("auth/v1/logout")?;
        match self
            .send(
                self.request(Method::POST, url)
                    .bearer_auth(&session.access_token),
            )
            .await
        {
            Ok(_) | Err(AuthError::SessionExpired) => {
                info!(user = %session.user.id, "Signed out");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Sign-out failed");
                Err(e)
            }
        }
    }

    /// Fetches the user a token belongs to.
    pub async fn current_user(&self, access_token: &str) -> Result<User> {
        let url = self.endpoint("auth/v1/user")?;
        let resp = self
            .send(self.request(Method::GET, url).bearer_auth(access_token))
            .await?;
        resp.json()
            .await
            .map_err(|e| AuthError::Malformed(e.to_string()))
    }
}

/// A sign-up reply is a session when the account was auto-confirmed and a
/// bare user when a confirmation email went out.
fn parse_sign_up(body: Value) -> Result<SignUpOutcome> {
    if body.get("access_token").is_some() {
        serde_json::from_value(body)
            .map(SignUpOutcome::SignedIn)
            .map_err(|e| AuthError::Malformed(e.to_string()))
    } else {
        let user = body.get("user").cloned().unwrap_or(body);
        serde_json::from_value(user)
            .map(SignUpOutcome::ConfirmationRequired)
            .map_err(|e| AuthError::Malformed(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    fn client() -> AuthClient {
        AuthClient::new("https://auth.example.test", "anon", "http://localhost:8080/").unwrap()
    }

    #[test]
    fn test_validate_sign_up() {
        assert!(matches!(
            validate_sign_up("secret1", "secret2"),
            Err(AuthError::PasswordMismatch)
        ));
        assert!(matches!(
            validate_sign_up("abc", "abc"),
            Err(AuthError::PasswordTooShort { min: 6 })
        ));
        assert!(validate_sign_up("abcdef", "abcdef").is_ok());
    }

    #[test]
    fn test_classify_by_error_code() {
        let body = r#"{"code": 422, "error_code": "user_already_exists", "msg": "User already registered"}"#;
        assert!(matches!(classify(422, body), AuthError::AlreadyRegistered));

        let body = r#"{"error": "invalid_grant", "error_description": "Invalid login credentials", "error_code": "invalid_credentials"}"#;
        assert!(matches!(classify(400, body), AuthError::InvalidCredentials));
    }

    #[test]
    fn test_classify_falls_back_to_message() {
        let body = r#"{"msg": "User already registered"}"#;
        assert!(matches!(classify(400, body), AuthError::AlreadyRegistered));

        let body = r#"{"error": "invalid_grant", "error_description": "Invalid login credentials"}"#;
        assert!(matches!(classify(400, body), AuthError::InvalidCredentials));
    }

    #[test]
    fn test_classify_code_wins_over_message() {
        let body = r#"{"error_code": "weak_password", "msg": "Password should be at least 6 characters. already registered"}"#;
        match classify(422, body) {
            AuthError::Provider { status, message } => {
                assert_eq!(status, 422);
                assert!(message.starts_with("Password should be"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_classify_server_errors_are_transient() {
        let err = classify(503, "upstream unavailable");
        assert!(err.is_transient());
        assert_eq!(err.to_string(), "upstream unavailable");

        let err = classify(500, "");
        assert_eq!(err.to_string(), "Authentication service error: 500");
    }

    #[test]
    fn test_classify_unauthorized() {
        assert!(matches!(
            classify(401, r#"{"msg": "invalid JWT"}"#),
            AuthError::SessionExpired
        ));
    }

    #[test]
    fn test_oauth_url() {
        let url = client().oauth_url(OAuthProvider::Google).unwrap();
        assert_eq!(
            url.as_str(),
            "https://auth.example.test/auth/v1/authorize?provider=google&redirect_to=http%3A%2F%2Flocalhost%3A8080%2F"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = AuthClient::new("not a url", "anon", "/").unwrap_err();
        assert!(matches!(err, AuthError::InvalidUrl(_)));
    }

    #[test]
    fn test_parse_sign_up_session() {
        let body = json!({
            "access_token": "jwt",
            "refresh_token": "r",
            "expires_in": 3600,
            "token_type": "bearer",
            "user": { "id": "u1", "email": "a@b.c" }
        });
        match parse_sign_up(body).unwrap() {
            SignUpOutcome::SignedIn(session) => assert_eq!(session.user.id, "u1"),
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn test_parse_sign_up_confirmation() {
        let body = json!({ "id": "u2", "email": "x@y.z", "confirmation_sent_at": "2025-01-01T00:00:00Z" });
        assert!(matches!(
            parse_sign_up(body).unwrap(),
            SignUpOutcome::ConfirmationRequired(User { ref id, .. }) if id == "u2"
        ));
    }

    #[tokio::test]
    async fn test_sign_up_validation_sends_nothing() {
        // The base URL is unroutable; reaching the network would fail differently.
        let client = AuthClient::new("http://127.0.0.1:9", "anon", "/")
            .unwrap()
            .with_retry(RetryPolicy::no_retry());
        let err = client.sign_up("a@b.c", "abc", "abc").await.unwrap_err();
        assert!(matches!(err, AuthError::PasswordTooShort { .. }));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_network_error() {
        let client = AuthClient::new("http://127.0.0.1:9", "anon", "/")
            .unwrap()
            .with_retry(RetryPolicy::no_retry());
        let err = client.sign_in("a@b.c", "secret1").await.unwrap_err();
        assert!(matches!(err, AuthError::Network { .. }));
    }
}
