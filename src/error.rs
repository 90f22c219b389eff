//! Error types for the Embed SDK
//!
//! Every failure a caller can observe is one of four kinds:
//! - configuration problems (bad base URL, missing API key, unknown endpoint)
//! - validation failures, raised before any I/O
//! - terminal HTTP failures, network failures and deadline expiry, raised by
//!   the executor once its retry budget is spent
//! - decoding failures for 2xx responses whose body is not the expected JSON

use crate::schema::ValidationError;
use std::borrow::Cow;
use thiserror::Error;

/// Result type alias for SDK operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the Embed SDK
#[derive(Debug, Error)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    #[error("Configuration error: {message}")]
    Config {
        message: Cow<'static, str>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidConfig {
        key: &'static str,
        message: Cow<'static, str>,
    },

    #[error("Endpoint {endpoint} requires an API key; pass one explicitly or set {var}")]
    MissingApiKey {
        endpoint: &'static str,
        var: &'static str,
    },

    #[error("Unknown endpoint: {name}")]
    UnknownEndpoint { name: String },

    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error(transparent)]
    Validation(#[from] ValidationError),

    // ========================================================================
    // API Errors
    // ========================================================================
    #[error("HTTP {status} {status_text} from {url}")]
    HttpRequest {
        status: u16,
        status_text: String,
        url: String,
        body: String,
    },

    #[error("Network error calling {url}: {message}")]
    Network {
        message: Cow<'static, str>,
        url: String,
    },

    #[error("{message} (timeout {timeout_ms}ms)")]
    Timeout {
        message: Cow<'static, str>,
        timeout_ms: u64,
    },

    #[error("Failed to decode response from {url}: {message}")]
    Decode {
        url: String,
        message: Cow<'static, str>,
    },

    // ========================================================================
    // Serialization Errors
    // ========================================================================
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    // ========================================================================
    // Constructors for common error patterns
    // ========================================================================

    /// Create a configuration error
    pub fn config(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn config_with_source(
        message: impl Into<Cow<'static, str>>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a network error
    pub fn network(message: impl Into<Cow<'static, str>>, url: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create a timeout error
    pub fn timeout(message: impl Into<Cow<'static, str>>, timeout_ms: u64) -> Self {
        Self::Timeout {
            message: message.into(),
            timeout_ms,
        }
    }

    /// Create a decode error
    pub fn decode(url: impl Into<String>, message: impl Into<Cow<'static, str>>) -> Self {
        Self::Decode {
            url: url.into(),
            message: message.into(),
        }
    }

    // ========================================================================
    // Error Classification
    // ========================================================================

    /// Returns true if retrying the same call later may succeed.
    ///
    /// The executor has already spent its retry budget by the time one of
    /// these reaches a caller; this is a hint for the caller's own policy.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Network { .. } | Error::Timeout { .. } => true,
            Error::HttpRequest { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Returns true if the caller's input was rejected before any I/O
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    /// Returns true if this error should be logged at error level
    pub fn is_error_level(&self) -> bool {
        matches!(
            self,
            Error::Decode { .. } | Error::Json(_) | Error::UnknownEndpoint { .. }
        )
    }

    /// HTTP status of a terminal HTTP failure
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::HttpRequest { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Stable machine-readable code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Config { .. }
            | Error::InvalidConfig { .. }
            | Error::MissingApiKey { .. }
            | Error::UnknownEndpoint { .. } => "CONFIG_ERROR",
            Error::Validation(_) => "VALIDATION_ERROR",
            Error::HttpRequest { .. } => "HTTP_REQUEST_ERROR",
            Error::Network { .. } => "NETWORK_ERROR",
            Error::Timeout { .. } => "TIMEOUT",
            Error::Decode { .. } | Error::Json(_) => "SERIALIZATION_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Violation;

    #[test]
    fn test_error_retryable() {
        assert!(Error::network("connection refused", "http://x").is_retryable());
        assert!(Error::timeout("deadline exceeded", 100).is_retryable());
        assert!(Error::HttpRequest {
            status: 503,
            status_text: "Service Unavailable".into(),
            url: "http://x".into(),
            body: String::new(),
        }
        .is_retryable());
        assert!(!Error::HttpRequest {
            status: 404,
            status_text: "Not Found".into(),
            url: "http://x".into(),
            body: String::new(),
        }
        .is_retryable());
        assert!(!Error::config("bad").is_retryable());
    }

    #[test]
    fn test_error_codes() {
        let validation = Error::from(ValidationError::new(vec![Violation::new(
            "top_k",
            "must be at least 1",
        )]));
        assert!(validation.is_validation());
        assert_eq!(validation.error_code(), "VALIDATION_ERROR");
        assert_eq!(
            Error::MissingApiKey {
                endpoint: "feed.for_you",
                var: "EMBED_API_KEY"
            }
            .error_code(),
            "CONFIG_ERROR"
        );
        assert_eq!(Error::timeout("slow", 5).error_code(), "TIMEOUT");
    }

    #[test]
    fn test_http_error_display() {
        let err = Error::HttpRequest {
            status: 401,
            status_text: "Unauthorized".into(),
            url: "https://api.mbd.xyz/v2/feed/list".into(),
            body: "{}".into(),
        };
        assert_eq!(err.status(), Some(401));
        assert_eq!(
            err.to_string(),
            "HTTP 401 Unauthorized from https://api.mbd.xyz/v2/feed/list"
        );
    }

    #[test]
    fn test_error_levels_and_codes_by_kind() {
        let json = Error::from(serde_json::from_str::<u32>("nope").unwrap_err());
        assert_eq!(json.error_code(), "SERIALIZATION_ERROR");
        assert!(json.is_error_level());

        let invalid = Error::InvalidConfig {
            key: "EMBED_TIMEOUT_MS",
            message: "Invalid value 'soon'".into(),
        };
        assert_eq!(invalid.error_code(), "CONFIG_ERROR");
        assert!(!invalid.is_error_level());

        let unknown = Error::UnknownEndpoint {
            name: "feed.nope".into(),
        };
        assert_eq!(unknown.error_code(), "CONFIG_ERROR");
        assert!(unknown.is_error_level());
    }
}
