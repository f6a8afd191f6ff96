// ── Core error types ──
//
// Failures surfaced by coordinators and the query cache. The
// `From<hot22_api::Error>` impl folds transport detail into a small set
// of variants; `ErrorInfo` is the normalized form stored in slices.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message shown for failures where the server never answered.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error: unable to reach the server";

/// Unified error type for the core crate.
#[derive(Debug, Clone, Error)]
pub enum CoreError {
    // ── Connectivity ─────────────────────────────────────────────────
    #[error("Cannot reach the server: {message}")]
    Network { message: String },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Server responses ─────────────────────────────────────────────
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Not found: {message}")]
    NotFound {
        message: String,
        payload: Option<serde_json::Value>,
    },

    #[error("Server error ({status}): {message}")]
    Api {
        status: u16,
        message: String,
        payload: Option<serde_json::Value>,
    },

    #[error("Unexpected response: {message}")]
    Decode { message: String },

    // ── Local ────────────────────────────────────────────────────────
    #[error("File error: {message}")]
    Io { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Validation failed: {message}")]
    Validation { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// HTTP status, when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::NotFound { .. } => Some(404),
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn payload(&self) -> Option<&serde_json::Value> {
        match self {
            Self::NotFound { payload, .. } | Self::Api { payload, .. } => payload.as_ref(),
            _ => None,
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Timeout { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<hot22_api::Error> for CoreError {
    fn from(err: hot22_api::Error) -> Self {
        match err {
            hot22_api::Error::Network { message } => CoreError::Network { message },
            hot22_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            hot22_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            hot22_api::Error::Http {
                status: 401,
                message,
                ..
            } => CoreError::Unauthorized { message },
            hot22_api::Error::Http {
                status: 404,
                message,
                body,
            } => CoreError::NotFound {
                message,
                payload: body,
            },
            hot22_api::Error::Http {
                status,
                message,
                body,
            } => CoreError::Api {
                status,
                message,
                payload: body,
            },
            hot22_api::Error::Deserialization { message, body: _ } => {
                CoreError::Decode { message }
            }
            hot22_api::Error::InvalidRequest(message) => CoreError::Internal(message),
            hot22_api::Error::Io(e) => CoreError::Io {
                message: e.to_string(),
            },
        }
    }
}

// ── Slice-level error ────────────────────────────────────────────────

/// A failure as stored in a slice: what to show, plus the raw server
/// payload when one was returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub message: String,
    pub status: Option<u16>,
    pub payload: Option<serde_json::Value>,
}

impl ErrorInfo {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            payload: None,
        }
    }
}

impl From<&CoreError> for ErrorInfo {
    fn from(err: &CoreError) -> Self {
        let message = match err {
            CoreError::Network { .. } | CoreError::Timeout { .. } => {
                NETWORK_ERROR_MESSAGE.to_owned()
            }
            CoreError::Unauthorized { message }
            | CoreError::NotFound { message, .. }
            | CoreError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        };
        Self {
            message,
            status: err.status(),
            payload: err.payload().cloned(),
        }
    }
}

impl std::fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} (HTTP {status})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn server_payload_is_preserved() {
        let err = CoreError::from(hot22_api::Error::Http {
            status: 422,
            message: "startDate is invalid".into(),
            body: Some(json!({ "success": false, "message": "startDate is invalid" })),
        });
        let info = ErrorInfo::from(&err);
        assert_eq!(info.message, "startDate is invalid");
        assert_eq!(info.status, Some(422));
        assert_eq!(info.payload, Some(json!({ "success": false, "message": "startDate is invalid" })));
    }

    #[test]
    fn network_failures_get_a_generic_message() {
        let err = CoreError::from(hot22_api::Error::Network {
            message: "tcp connect error: Connection refused (os error 111)".into(),
        });
        let info = ErrorInfo::from(&err);
        assert_eq!(info.message, NETWORK_ERROR_MESSAGE);
        assert_eq!(info.status, None);
    }

    #[test]
    fn status_codes_map_to_variants() {
        let unauthorized = CoreError::from(hot22_api::Error::Http {
            status: 401,
            message: "Unauthorized".into(),
            body: None,
        });
        let missing = CoreError::from(hot22_api::Error::Http {
            status: 404,
            message: "Error log not found".into(),
            body: None,
        });
        assert!(matches!(unauthorized, CoreError::Unauthorized { .. }));
        assert!(matches!(missing, CoreError::NotFound { .. }));
        assert_eq!(missing.status(), Some(404));
    }
}
