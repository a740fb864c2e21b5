//! Error types for the generation endpoints.
//!
//! Every failure a handler can hit maps to one HTTP status and one message
//! for the `{ "error": ... }` body. Gateway failures carry a
//! [`GatewayErrorKind`] so callers can tell rate limits and billing problems
//! apart from outages without inspecting message text.

use std::path::PathBuf;

use axum::http::StatusCode;

/// A specialized `Result` type for generation operations.
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Errors raised while serving a generation request.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid JSON syntax in the configuration file.
    #[error("Invalid JSON in config file '{path}': {message}\n\nSuggestion: Validate your eduint.json with a JSON linter")]
    ConfigParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Description of the parse error.
        message: String,
    },

    /// Configuration validation failed.
    #[error("Invalid configuration: {message}\n\nSuggestion: {suggestion}")]
    ConfigValidationError {
        /// Description of the validation failure.
        message: String,
        /// Actionable suggestion for the user.
        suggestion: String,
    },

    /// The gateway API key environment variable is unset or empty.
    #[error("{env} is not configured")]
    MissingApiKey {
        /// Name of the environment variable.
        env: String,
    },

    // ========================================================================
    // Request Errors
    // ========================================================================
    /// The request body was malformed.
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// What was wrong.
        message: String,
    },

    // ========================================================================
    // Gateway Errors
    // ========================================================================
    /// The AI gateway call failed.
    #[error("{message}")]
    Gateway {
        /// Failure category.
        kind: GatewayErrorKind,
        /// Message for the caller.
        message: String,
    },

    /// The model replied, but not with the requested JSON shape.
    #[error("Failed to parse {what}")]
    ParseError {
        /// What was being generated (e.g. "generated questions").
        what: &'static str,
        /// Parser detail, for logs only.
        detail: String,
    },
}

/// Categories of gateway failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayErrorKind {
    /// HTTP 429 from the gateway.
    RateLimit,
    /// HTTP 402 from the gateway: credits exhausted.
    PaymentRequired,
    /// Any other non-success status.
    Server,
    /// Connection, TLS or timeout failure.
    Network,
    /// The gateway replied without a usable completion.
    Parse,
}

impl std::fmt::Display for GatewayErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RateLimit => write!(f, "rate_limit"),
            Self::PaymentRequired => write!(f, "payment_required"),
            Self::Server => write!(f, "server"),
            Self::Network => write!(f, "network"),
            Self::Parse => write!(f, "parse"),
        }
    }
}

impl GatewayErrorKind {
    /// HTTP status relayed to the caller.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::RateLimit => StatusCode::TOO_MANY_REQUESTS,
            Self::PaymentRequired => StatusCode::PAYMENT_REQUIRED,
            Self::Server | Self::Network | Self::Parse => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ServiceError {
    /// Creates a new `ConfigParseError` with the given path and message.
    #[must_use]
    pub fn config_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ConfigParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new `ConfigValidationError` with the given message and suggestion.
    #[must_use]
    pub fn config_validation(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::ConfigValidationError {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Creates a new `MissingApiKey` error.
    #[must_use]
    pub fn missing_api_key(env: impl Into<String>) -> Self {
        Self::MissingApiKey { env: env.into() }
    }

    /// Creates a new `InvalidRequest` error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Gateway answered 429.
    #[must_use]
    pub fn rate_limited() -> Self {
        Self::Gateway {
            kind: GatewayErrorKind::RateLimit,
            message: "Rate limit exceeded. Please try again later.".to_string(),
        }
    }

    /// Gateway answered 402.
    #[must_use]
    pub fn payment_required() -> Self {
        Self::Gateway {
            kind: GatewayErrorKind::PaymentRequired,
            message: "Payment required. Please add credits to your workspace.".to_string(),
        }
    }

    /// Gateway answered with another non-success status.
    #[must_use]
    pub fn gateway_status(status: u16) -> Self {
        Self::Gateway {
            kind: GatewayErrorKind::Server,
            message: format!("AI gateway error: {status}"),
        }
    }

    /// The gateway could not be reached.
    #[must_use]
    pub fn gateway_network(message: impl std::fmt::Display) -> Self {
        Self::Gateway {
            kind: GatewayErrorKind::Network,
            message: format!("AI gateway unreachable: {message}"),
        }
    }

    /// The gateway reply had no completion text.
    #[must_use]
    pub fn gateway_malformed(message: impl std::fmt::Display) -> Self {
        Self::Gateway {
            kind: GatewayErrorKind::Parse,
            message: format!("AI gateway returned an unexpected response: {message}"),
        }
    }

    /// Creates a new `ParseError`.
    #[must_use]
    pub fn parse(what: &'static str, detail: impl Into<String>) -> Self {
        Self::ParseError {
            what,
            detail: detail.into(),
        }
    }

    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Gateway { kind, .. } => kind.status(),
            Self::InvalidRequest { .. }
            | Self::ConfigParseError { .. }
            | Self::ConfigValidationError { .. }
            | Self::MissingApiKey { .. }
            | Self::ParseError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns `true` if retrying the same request later may succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Gateway {
                kind: GatewayErrorKind::RateLimit
                    | GatewayErrorKind::Server
                    | GatewayErrorKind::Network,
                ..
            }
        )
    }

    /// Returns `true` if the server cannot serve any request until fixed.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ConfigParseError { .. }
                | Self::ConfigValidationError { .. }
                | Self::MissingApiKey { .. }
                | Self::Gateway {
                    kind: GatewayErrorKind::PaymentRequired,
                    ..
                }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_messages() {
        assert_eq!(
            ServiceError::rate_limited().to_string(),
            "Rate limit exceeded. Please try again later."
        );
        assert_eq!(
            ServiceError::payment_required().to_string(),
            "Payment required. Please add credits to your workspace."
        );
        assert_eq!(
            ServiceError::gateway_status(503).to_string(),
            "AI gateway error: 503"
        );
        assert_eq!(
            ServiceError::missing_api_key("LOVABLE_API_KEY").to_string(),
            "LOVABLE_API_KEY is not configured"
        );
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ServiceError::rate_limited().status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            ServiceError::payment_required().status(),
            StatusCode::PAYMENT_REQUIRED
        );
        assert_eq!(
            ServiceError::invalid_request("essay must not be empty").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ServiceError::gateway_status(500).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ServiceError::parse("generated questions", "EOF").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ServiceError::missing_api_key("KEY").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_parse_error_hides_detail() {
        let err = ServiceError::parse("generated questions", "expected value at line 1 column 1");
        assert_eq!(err.to_string(), "Failed to parse generated questions");
    }

    #[test]
    fn test_is_transient() {
        assert!(ServiceError::rate_limited().is_transient());
        assert!(ServiceError::gateway_network("connection refused").is_transient());
        assert!(!ServiceError::payment_required().is_transient());
        assert!(!ServiceError::parse("x", "y").is_transient());
    }

    #[test]
    fn test_is_fatal() {
        assert!(ServiceError::missing_api_key("KEY").is_fatal());
        assert!(ServiceError::payment_required().is_fatal());
        assert!(!ServiceError::rate_limited().is_fatal());
    }

    #[test]
    fn test_gateway_error_kind_display() {
        assert_eq!(GatewayErrorKind::RateLimit.to_string(), "rate_limit");
        assert_eq!(GatewayErrorKind::PaymentRequired.to_string(), "payment_required");
    }
}
