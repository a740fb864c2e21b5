//! Integration tests for the authentication client against a mock
//! GoTrue-compatible service.
//!
//! Covers bounded retry of transient failures, non-retry of validation
//! errors, session restore and the page gate.

use std::collections::HashMap;
use std::net::TcpListener;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use eduint_auth::{
    guard, AuthClient, AuthError, AuthState, Navigation, OAuthProvider, RetryPolicy, SignUpOutcome,
};
use eduint_exercise::Page;

// ============================================================================
// Mock Service
// ============================================================================

/// Helper to find an available port for testing.
fn find_available_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .expect("Failed to bind to port")
        .local_addr()
        .expect("Failed to get local addr")
        .port()
}

const ANON_KEY: &str = "anon-key";
const VALID_TOKEN: &str = "valid-token";

#[derive(Clone, Default)]
struct MockAuth {
    /// Number of token requests answered with 503 before succeeding.
    token_failures: u32,
    token_calls: Arc<AtomicU32>,
    signup_calls: Arc<AtomicU32>,
    logout_calls: Arc<AtomicU32>,
}

fn user_json(email: &str) -> Value {
    json!({ "id": "user-1", "email": email, "created_at": "2025-01-01T00:00:00Z" })
}

fn session_json(email: &str) -> Value {
    json!({
        "access_token": VALID_TOKEN,
        "refresh_token": "refresh",
        "expires_in": 3600,
        "token_type": "bearer",
        "user": user_json(email)
    })
}

fn has_api_key(headers: &HeaderMap) -> bool {
    headers.get("apikey").and_then(|v| v.to_str().ok()) == Some(ANON_KEY)
}

fn no_api_key() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "No API key found in request" })),
    )
}

async fn token(
    State(mock): State<MockAuth>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if !has_api_key(&headers) {
        return no_api_key();
    }
    let call = mock.token_calls.fetch_add(1, Ordering::SeqCst) + 1;
    if call <= mock.token_failures {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "msg": "upstream unavailable" })),
        );
    }
    if query.get("grant_type").map(String::as_str) != Some("password") {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "unsupported_grant_type" })),
        );
    }
    if body["password"] == "wrong-password" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_grant",
                "error_description": "Invalid login credentials",
                "error_code": "invalid_credentials"
            })),
        );
    }
    let email = body["email"].as_str().unwrap_or_default();
    (StatusCode::OK, Json(session_json(email)))
}

async fn signup(
    State(mock): State<MockAuth>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if !has_api_key(&headers) {
        return no_api_key();
    }
    mock.signup_calls.fetch_add(1, Ordering::SeqCst);
    assert_eq!(
        query.get("redirect_to").map(String::as_str),
        Some("http://localhost:8080/")
    );
    let email = body["email"].as_str().unwrap_or_default();
    match email {
        "taken@example.com" => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "code": 422,
                "error_code": "user_already_exists",
                "msg": "User already registered"
            })),
        ),
        "auto@example.com" => (StatusCode::OK, Json(session_json(email))),
        _ => (StatusCode::OK, Json(user_json(email))),
    }
}

async fn user(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if !has_api_key(&headers) {
        return no_api_key();
    }
    let bearer = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if bearer == format!("Bearer {VALID_TOKEN}") {
        (StatusCode::OK, Json(user_json("learner@example.com")))
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "code": 401, "error_code": "bad_jwt", "msg": "invalid JWT" })),
        )
    }
}

async fn logout(State(mock): State<MockAuth>, headers: HeaderMap) -> StatusCode {
    if !has_api_key(&headers) {
        return StatusCode::UNAUTHORIZED;
    }
    mock.logout_calls.fetch_add(1, Ordering::SeqCst);
    StatusCode::NO_CONTENT
}

/// Starts the mock service and returns its base URL.
async fn spawn_mock_auth(mock: MockAuth) -> String {
    let router = Router::new()
        .route("/auth/v1/token", post(token))
        .route("/auth/v1/signup", post(signup))
        .route("/auth/v1/user", get(user))
        .route("/auth/v1/logout", post(logout))
        .with_state(mock);

    let port = find_available_port();
    let addr = format!("127.0.0.1:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Server failed");
    });

    // Give the server a moment to start
    tokio::time::sleep(Duration::from_millis(50)).await;

    format!("http://{addr}")
}

fn fast_retry() -> RetryPolicy {
    RetryPolicy::new(3, Duration::from_millis(5), Duration::from_millis(20))
}

fn client(base_url: &str) -> AuthClient {
    AuthClient::new(base_url, ANON_KEY, "http://localhost:8080/")
        .expect("Failed to build auth client")
        .with_retry(fast_retry())
}

// ============================================================================
// Retry Behaviour
// ============================================================================

/// A transient failure followed by success signs the learner in on the
/// second attempt.
#[tokio::test]
async fn test_transient_failure_then_sign_in() {
    let mock = MockAuth {
        token_failures: 1,
        ..MockAuth::default()
    };
    let base = spawn_mock_auth(mock.clone()).await;

    let session = client(&base)
        .sign_in("learner@example.com", "secret123")
        .await
        .unwrap();

    assert_eq!(session.user.id, "user-1");
    assert_eq!(session.access_token, VALID_TOKEN);
    assert_eq!(mock.token_calls.load(Ordering::SeqCst), 2);
}

/// Persistent server errors stop after the configured attempts.
#[tokio::test]
async fn test_gives_up_after_max_attempts() {
    let mock = MockAuth {
        token_failures: 10,
        ..MockAuth::default()
    };
    let base = spawn_mock_auth(mock.clone()).await;

    let err = client(&base)
        .sign_in("learner@example.com", "secret123")
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::Provider { status: 503, .. }));
    assert_eq!(mock.token_calls.load(Ordering::SeqCst), 3);
}

/// A duplicate email is a validation error and is never retried.
#[tokio::test]
async fn test_duplicate_email_not_retried() {
    let mock = MockAuth::default();
    let base = spawn_mock_auth(mock.clone()).await;

    let err = client(&base)
        .sign_up("taken@example.com", "secret123", "secret123")
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::AlreadyRegistered));
    assert_eq!(
        err.to_string(),
        "This email is already registered. Please sign in instead."
    );
    assert_eq!(mock.signup_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_invalid_credentials_not_retried() {
    let mock = MockAuth::default();
    let base = spawn_mock_auth(mock.clone()).await;

    let err = client(&base)
        .sign_in("learner@example.com", "wrong-password")
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::InvalidCredentials));
    assert_eq!(mock.token_calls.load(Ordering::SeqCst), 1);
}

/// Nothing listening: every attempt fails in transport.
#[tokio::test]
async fn test_unreachable_service_is_network_error() {
    let base = format!("http://127.0.0.1:{}", find_available_port());
    let auth = AuthClient::new(&base, ANON_KEY, "/")
        .unwrap()
        .with_retry(RetryPolicy::new(2, Duration::from_millis(1), Duration::from_millis(1)));

    let err = auth
        .sign_in("learner@example.com", "secret123")
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::Network { .. }));
    assert_eq!(
        err.to_string(),
        "Unable to connect. Please check your internet connection and try again."
    );
}

// ============================================================================
// Sign-up
// ============================================================================

#[tokio::test]
async fn test_password_rules_checked_before_request() {
    let mock = MockAuth::default();
    let base = spawn_mock_auth(mock.clone()).await;
    let auth = client(&base);

    let err = auth
        .sign_up("new@example.com", "secret123", "secret124")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Passwords don't match");

    let err = auth
        .sign_up("new@example.com", "abc", "abc")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Password must be at least 6 characters");

    assert_eq!(mock.signup_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_sign_up_outcomes() {
    let base = spawn_mock_auth(MockAuth::default()).await;
    let auth = client(&base);

    let outcome = auth
        .sign_up("new@example.com", "secret123", "secret123")
        .await
        .unwrap();
    assert!(matches!(outcome, SignUpOutcome::ConfirmationRequired(_)));
    assert_eq!(
        outcome.message(),
        "Account created! Please check your email to verify."
    );

    let outcome = auth
        .sign_up("auto@example.com", "secret123", "secret123")
        .await
        .unwrap();
    match outcome {
        SignUpOutcome::SignedIn(session) => {
            assert_eq!(session.user.email.as_deref(), Some("auto@example.com"));
        }
        other => panic!("Expected a session, got {other:?}"),
    }
}

// ============================================================================
// Session and Gate
// ============================================================================

/// A restored session opens gated pages; a stale one redirects to sign-in.
#[tokio::test]
async fn test_session_restore_drives_gate() {
    let base = spawn_mock_auth(MockAuth::default()).await;
    let auth = client(&base);

    let session = auth.sign_in("learner@example.com", "secret123").await.unwrap();
    let user = auth.current_user(&session.access_token).await.unwrap();
    let state = AuthState::SignedIn(user);
    assert_eq!(guard(Page::MockTests, &state), Navigation::Render);

    let err = auth.current_user("stale-token").await.unwrap_err();
    assert!(matches!(err, AuthError::SessionExpired));
    assert_eq!(
        guard(Page::MockTests, &AuthState::SignedOut),
        Navigation::Redirect {
            to: Page::Auth,
            notice: "Please sign in to access mock tests",
        }
    );
    assert_eq!(guard(Page::MockTests, &AuthState::Loading), Navigation::Wait);
}

#[tokio::test]
async fn test_sign_out() {
    let mock = MockAuth::default();
    let base = spawn_mock_auth(mock.clone()).await;
    let auth = client(&base);

    let session = auth.sign_in("learner@example.com", "secret123").await.unwrap();
    auth.sign_out(&session).await.unwrap();
    assert_eq!(mock.logout_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_oauth_url_targets_service() {
    let base = spawn_mock_auth(MockAuth::default()).await;
    let url = client(&base).oauth_url(OAuthProvider::Facebook).unwrap();

    assert!(url.as_str().starts_with(&format!("{base}/auth/v1/authorize?")));
    let pairs: HashMap<String, String> = url.query_pairs().into_owned().collect();
    assert_eq!(pairs["provider"], "facebook");
    assert_eq!(pairs["redirect_to"], "http://localhost:8080/");
}
