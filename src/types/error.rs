//! Unified Error Type System
//!
//! Centralized error types for the gateway with a fixed taxonomy mapped to
//! user-facing messages and HTTP statuses.
//!
//! ## Error Taxonomy
//!
//! - **InvalidInput**: user-correctable, surfaced verbatim, never forwarded
//!   to the model
//! - **UnknownArtifactKind**: configuration error, fatal to one request only
//! - **Auth / QuotaExceeded / RateLimited**: classified upstream credential
//!   and limit failures, each with a distinct user-facing message
//! - **Upstream / Network**: everything else; retry is suggested to the user
//!   but never performed automatically
//! - **DemoMode**: static-only path with no configured credential
//!
//! No error message ever contains the credential value.

use thiserror::Error;

// =============================================================================
// Error Kinds
// =============================================================================

/// Stable error classification for routing and HTTP status mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input empty or outside the accepted length band
    InvalidInput,
    /// Requested kind has no catalog registration
    UnknownArtifactKind,
    /// Credential missing or rejected upstream
    Auth,
    /// Account quota exhausted (distinct from transient rate limiting)
    QuotaExceeded,
    /// Transient 429
    RateLimited,
    /// Non-2xx, malformed, or empty upstream response
    Upstream,
    /// The call never completed (timeout, DNS, connection refused)
    Network,
    /// Static-only hosting with no session credential configured
    DemoMode,
}

impl ErrorKind {
    /// HTTP status for the server-backed surface
    pub fn http_status(&self) -> u16 {
        match self {
            Self::InvalidInput => 400,
            Self::Auth => 401,
            Self::QuotaExceeded | Self::RateLimited => 429,
            // DemoMode never crosses the HTTP surface; the server path always
            // has either a credential or a configuration failure.
            Self::UnknownArtifactKind | Self::Upstream | Self::Network | Self::DemoMode => 500,
        }
    }

    /// User-correctable errors are surfaced verbatim; the rest get mapped
    /// messages.
    pub fn is_user_correctable(&self) -> bool {
        matches!(self, Self::InvalidInput | Self::DemoMode)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::InvalidInput => "INVALID_INPUT",
            Self::UnknownArtifactKind => "UNKNOWN_ARTIFACT_KIND",
            Self::Auth => "AUTH",
            Self::QuotaExceeded => "QUOTA_EXCEEDED",
            Self::RateLimited => "RATE_LIMITED",
            Self::Upstream => "UPSTREAM",
            Self::Network => "NETWORK",
            Self::DemoMode => "DEMO_MODE",
        };
        f.write_str(s)
    }
}

// =============================================================================
// Gateway Error (user-facing)
// =============================================================================

/// Error shape handed back to callers: a kind for routing plus a message
/// that is safe to render. Raw upstream detail stays in logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayError {
    pub kind: ErrorKind,
    pub message: String,
}

impl GatewayError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, message)
    }

    pub fn unknown_kind(kind_name: impl std::fmt::Display) -> Self {
        Self::new(
            ErrorKind::UnknownArtifactKind,
            format!("No prompt template registered for kind '{}'", kind_name),
        )
    }
}

impl std::fmt::Display for GatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

impl std::error::Error for GatewayError {}

// =============================================================================
// Model Error (raw upstream detail)
// =============================================================================

/// Classified failure of a single chat-completion call. Carries the raw
/// upstream detail for logging; the gateway maps it to a `GatewayError`
/// before anything reaches a caller.
#[derive(Debug, Clone, Error)]
#[error("[{kind}] {message}")]
pub struct ModelError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ModelError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Auth, message)
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Upstream, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network, message)
    }
}

// =============================================================================
// Error Classifier
// =============================================================================

/// Classifies upstream chat-completion failures into the taxonomy.
///
/// The OpenAI error body shape is `{"error":{"message","type","code"}}`;
/// the `code` distinguishes quota exhaustion from transient rate limiting
/// on an otherwise identical 429.
pub struct ErrorClassifier;

impl ErrorClassifier {
    /// Classify a non-2xx response from status code plus raw body
    pub fn classify_http(status: u16, body: &str) -> ModelError {
        let (code, message) = Self::parse_error_body(body);
        let code = code.unwrap_or_default();
        let detail = message.unwrap_or_else(|| {
            let body = body.trim();
            if body.is_empty() {
                format!("HTTP {}", status)
            } else {
                body.chars().take(200).collect()
            }
        });

        // Status is authoritative; the quota substring heuristic applies only
        // to a 429 with no explicit code.
        match status {
            401 | 403 => ModelError::auth(detail),
            429 if code == "insufficient_quota" || detail.to_lowercase().contains("quota") => {
                ModelError::new(ErrorKind::QuotaExceeded, detail)
            }
            429 => ModelError::new(ErrorKind::RateLimited, detail),
            _ if code == "invalid_api_key" => ModelError::auth(detail),
            _ if code == "insufficient_quota" => ModelError::new(ErrorKind::QuotaExceeded, detail),
            _ => ModelError::upstream(format!("HTTP {}: {}", status, detail)),
        }
    }

    /// Classify a transport-level reqwest failure
    pub fn classify_transport(err: &reqwest::Error) -> ModelError {
        if err.is_timeout() || err.is_connect() || err.is_request() {
            ModelError::network(err.to_string())
        } else if err.is_decode() {
            ModelError::upstream(format!("Malformed response body: {}", err))
        } else {
            ModelError::network(err.to_string())
        }
    }

    /// Extract `error.code` and `error.message` from an OpenAI-style body
    fn parse_error_body(body: &str) -> (Option<String>, Option<String>) {
        let parsed: serde_json::Value = match serde_json::from_str(body) {
            Ok(v) => v,
            Err(_) => return (None, None),
        };
        let error = &parsed["error"];
        let code = error["code"]
            .as_str()
            .or_else(|| error["type"].as_str())
            .map(String::from);
        let message = error["message"].as_str().map(String::from);
        (code, message)
    }
}

// =============================================================================
// Application Error
// =============================================================================

/// Process-level errors: configuration, I/O, and startup failures. Request
/// outcomes use `GatewayResult`, not this type.
#[derive(Debug, Error)]
pub enum PreppyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Model client error: {0}")]
    Model(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, PreppyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(ErrorKind::InvalidInput.http_status(), 400);
        assert_eq!(ErrorKind::Auth.http_status(), 401);
        assert_eq!(ErrorKind::QuotaExceeded.http_status(), 429);
        assert_eq!(ErrorKind::RateLimited.http_status(), 429);
        assert_eq!(ErrorKind::Upstream.http_status(), 500);
        assert_eq!(ErrorKind::UnknownArtifactKind.http_status(), 500);
    }

    #[test]
    fn test_classify_quota_vs_rate_limit() {
        let quota = ErrorClassifier::classify_http(
            429,
            r#"{"error":{"message":"You exceeded your current quota","type":"insufficient_quota","code":"insufficient_quota"}}"#,
        );
        assert_eq!(quota.kind, ErrorKind::QuotaExceeded);

        let rate = ErrorClassifier::classify_http(
            429,
            r#"{"error":{"message":"Rate limit reached for requests","type":"requests","code":"rate_limit_exceeded"}}"#,
        );
        assert_eq!(rate.kind, ErrorKind::RateLimited);
    }

    #[test]
    fn test_classify_auth() {
        let err = ErrorClassifier::classify_http(
            401,
            r#"{"error":{"message":"Incorrect API key provided","code":"invalid_api_key"}}"#,
        );
        assert_eq!(err.kind, ErrorKind::Auth);
        assert!(err.message.contains("Incorrect API key"));
    }

    #[test]
    fn test_401_mentioning_quota_is_still_auth() {
        let err = ErrorClassifier::classify_http(
            401,
            r#"{"error":{"message":"Incorrect API key provided; quota checks unavailable","code":"invalid_api_key"}}"#,
        );
        assert_eq!(err.kind, ErrorKind::Auth);
    }

    #[test]
    fn test_classify_upstream_with_opaque_body() {
        let err = ErrorClassifier::classify_http(502, "bad gateway");
        assert_eq!(err.kind, ErrorKind::Upstream);
        assert!(err.message.contains("502"));
    }

    #[test]
    fn test_unknown_kind_message() {
        let err = GatewayError::unknown_kind("erd");
        assert_eq!(err.kind, ErrorKind::UnknownArtifactKind);
        assert!(err.message.contains("erd"));
    }
}
