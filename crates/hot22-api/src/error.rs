use thiserror::Error;

/// Top-level error type for the `hot22-api` crate.
///
/// Covers every failure mode of the HTTP adapter: transport, HTTP status,
/// payload decoding, and local file I/O for uploads and downloads.
/// `hot22-core` normalizes these into slice-level `ErrorInfo` values.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// No response was received (connection refused, DNS failure, reset).
    #[error("Network error: {message}")]
    Network { message: String },

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── HTTP ────────────────────────────────────────────────────────
    /// Non-2xx response. `body` holds the parsed JSON payload if the server
    /// sent one, verbatim.
    #[error("HTTP {status}: {message}")]
    Http {
        status: u16,
        message: String,
        body: Option<serde_json::Value>,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// The request could not be built (bad header, unreadable body, etc.)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    // ── Local files ─────────────────────────────────────────────────
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse failure class, used only to pick a log message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Unauthorized,
    Network,
    Http,
    Other,
}

impl Error {
    /// Map a `reqwest` failure that carries no HTTP response.
    pub(crate) fn from_transport(err: &reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout { timeout_secs }
        } else if err.is_builder() {
            Self::InvalidRequest(err.to_string())
        } else {
            Self::Network {
                message: err.to_string(),
            }
        }
    }

    /// Returns `true` for failures where no response was received.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Timeout { .. })
    }

    /// HTTP status code, when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// The server's error payload, if one was returned.
    pub fn body(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Http { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    pub fn classify(&self) -> ErrorClass {
        match self {
            Self::Http { status: 401, .. } => ErrorClass::Unauthorized,
            Self::Http { .. } => ErrorClass::Http,
            Self::Network { .. } | Self::Timeout { .. } => ErrorClass::Network,
            _ => ErrorClass::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_separates_unauthorized_from_other_statuses() {
        let unauthorized = Error::Http {
            status: 401,
            message: "Unauthorized".into(),
            body: None,
        };
        let server = Error::Http {
            status: 500,
            message: "Internal Server Error".into(),
            body: None,
        };
        assert_eq!(unauthorized.classify(), ErrorClass::Unauthorized);
        assert_eq!(server.classify(), ErrorClass::Http);
        assert_eq!(
            Error::Timeout { timeout_secs: 30 }.classify(),
            ErrorClass::Network
        );
    }

    #[test]
    fn body_is_exposed_only_for_http_errors() {
        let err = Error::Http {
            status: 422,
            message: "Unprocessable Entity".into(),
            body: Some(serde_json::json!({ "message": "bad date" })),
        };
        assert_eq!(err.body().and_then(|b| b["message"].as_str()), Some("bad date"));
        assert!(Error::Network { message: "refused".into() }.body().is_none());
    }
}
