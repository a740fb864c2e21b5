//! Eduint authentication
//!
//! Client for the GoTrue-compatible authentication service, bounded retry
//! for transient failures, and the page access gate.
//!
//! # Modules
//!
//! - [`client`] - Sign-up, sign-in, OAuth URLs, sign-out, current user
//! - [`retry`] - Exponential backoff for transient errors
//! - [`gate`] - Which pages render for which auth state

pub mod client;
pub mod gate;
pub mod retry;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use client::{validate_sign_up, AuthClient, MIN_PASSWORD_LENGTH};
pub use gate::{guard, AuthState, Navigation};
pub use retry::RetryPolicy;

/// A specialized `Result` type for authentication operations.
pub type Result<T> = std::result::Result<T, AuthError>;

// ============================================================================
// Error Types
// ============================================================================

/// Errors raised by authentication operations.
///
/// Display text is shown to the learner as-is.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Sign-up password and confirmation differ.
    #[error("Passwords don't match")]
    PasswordMismatch,

    /// Sign-up password is too short.
    #[error("Password must be at least {min} characters")]
    PasswordTooShort {
        /// Minimum length.
        min: usize,
    },

    /// The email already has an account.
    #[error("This email is already registered. Please sign in instead.")]
    AlreadyRegistered,

    /// Wrong email or password.
    #[error("Invalid email or password. Please try again.")]
    InvalidCredentials,

    /// The access token was rejected.
    #[error("Your session has expired. Please sign in again.")]
    SessionExpired,

    /// Provider name not supported.
    #[error("Unsupported sign-in provider '{name}': expected 'google' or 'facebook'")]
    UnsupportedProvider {
        /// The name given.
        name: String,
    },

    /// The service could not be reached.
    #[error("Unable to connect. Please check your internet connection and try again.")]
    Network {
        /// Transport error, for logs.
        detail: String,
    },

    /// The service answered with an error not covered above.
    #[error("{message}")]
    Provider {
        /// HTTP status.
        status: u16,
        /// Provider message.
        message: String,
    },

    /// The service answered with a body we could not read.
    #[error("Unexpected response from authentication service: {0}")]
    Malformed(String),

    /// The configured service URL is not usable.
    #[error("Invalid authentication URL: {0}")]
    InvalidUrl(String),
}

impl AuthError {
    /// Creates a new `Network` error.
    #[must_use]
    pub fn network(detail: impl fmt::Display) -> Self {
        Self::Network {
            detail: detail.to_string(),
        }
    }

    /// Creates a new `Provider` error.
    #[must_use]
    pub fn provider(status: u16, message: impl Into<String>) -> Self {
        Self::Provider {
            status,
            message: message.into(),
        }
    }

    /// Returns `true` if the same call may succeed when retried.
    ///
    /// Only transport failures and provider 5xx responses qualify; validation
    /// and credential errors never do.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Network { .. } => true,
            Self::Provider { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

// ============================================================================
// Session Types
// ============================================================================

/// A signed-up user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User id.
    pub id: String,
    /// Email address, absent for some OAuth accounts.
    #[serde(default)]
    pub email: Option<String>,
    /// Creation time as sent by the provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Tokens for a signed-in user.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token for API calls.
    pub access_token: String,
    /// Token to obtain a new access token.
    #[serde(default)]
    pub refresh_token: String,
    /// Lifetime of the access token in seconds.
    #[serde(default)]
    pub expires_in: u64,
    /// Usually "bearer".
    #[serde(default)]
    pub token_type: String,
    /// The signed-in user.
    pub user: User,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

/// Result of a successful sign-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpOutcome {
    /// Auto-confirmed: the user is signed in.
    SignedIn(Session),
    /// A verification email was sent.
    ConfirmationRequired(User),
}

impl SignUpOutcome {
    /// Message for the learner.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::SignedIn(_) => "Account created successfully! You're now logged in.",
            Self::ConfirmationRequired(_) => "Account created! Please check your email to verify.",
        }
    }
}

/// Supported OAuth providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OAuthProvider {
    /// Google.
    Google,
    /// Facebook.
    Facebook,
}

impl OAuthProvider {
    /// Parses a provider name case-insensitively.
    pub fn from_name(name: &str) -> Result<Self> {
        match name.trim().to_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "facebook" => Ok(Self::Facebook),
            _ => Err(AuthError::UnsupportedProvider {
                name: name.to_string(),
            }),
        }
    }

    /// Wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Facebook => "facebook",
        }
    }
}

impl fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
