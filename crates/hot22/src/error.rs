//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a stable exit code.

use miette::Diagnostic;
use thiserror::Error;

use hot22_config::ConfigError;
use hot22_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the HOT22 API")]
    #[diagnostic(
        code(hot22::connection_failed),
        help(
            "Check that the API server is running.\n\
             Reason: {reason}\n\
             Try: hot22 health --api-url http://localhost:3000"
        )
    )]
    ConnectionFailed { reason: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(hot22::timeout),
        help("Increase the timeout with --timeout or check server load.")
    )]
    Timeout { seconds: u64 },

    // ── API ──────────────────────────────────────────────────────────
    #[error("Not found: {message}")]
    #[diagnostic(code(hot22::not_found))]
    NotFound { message: String },

    #[error("Unauthorized: {message}")]
    #[diagnostic(code(hot22::unauthorized))]
    Unauthorized { message: String },

    #[error("API error ({status}): {message}")]
    #[diagnostic(code(hot22::api_error))]
    Api { status: u16, message: String },

    #[error("API reports status '{status}'")]
    #[diagnostic(code(hot22::unhealthy), help("Run: hot22 dashboard for collection details"))]
    Unhealthy { status: String },

    #[error("Unexpected response from the API: {message}")]
    #[diagnostic(
        code(hot22::decode),
        help("The server answered with a shape this client does not understand.")
    )]
    Decode { message: String },

    #[error("Internal error: {message}")]
    #[diagnostic(code(hot22::internal))]
    Internal { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(hot22::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(hot22::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: hot22 config set-profile {name} --api-url <URL>"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(hot22::config), help("Config file: {path}"))]
    Config { message: String, path: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(hot22::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    #[diagnostic(code(hot22::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Network { message } => CliError::ConnectionFailed { reason: message },
            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },
            CoreError::Unauthorized { message } => CliError::Unauthorized { message },
            CoreError::NotFound { message, .. } => CliError::NotFound { message },
            CoreError::Api {
                status, message, ..
            } => CliError::Api { status, message },
            CoreError::Decode { message } => CliError::Decode { message },
            CoreError::Io { message } => CliError::Io(std::io::Error::other(message)),
            CoreError::Config { message } => CliError::Config {
                message,
                path: hot22_config::config_path().display().to_string(),
            },
            CoreError::Validation { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },
            CoreError::Internal(message) => CliError::Internal { message },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::ProfileNotFound { name } => CliError::ProfileNotFound {
                name,
                available: String::new(),
            },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
                path: hot22_config::config_path().display().to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_error_class() {
        let cases = [
            (
                CliError::from(CoreError::Network {
                    message: "refused".into(),
                }),
                exit_code::CONNECTION,
            ),
            (
                CliError::from(CoreError::Timeout { timeout_secs: 30 }),
                exit_code::TIMEOUT,
            ),
            (
                CliError::from(CoreError::NotFound {
                    message: "no office".into(),
                    payload: None,
                }),
                exit_code::NOT_FOUND,
            ),
            (
                CliError::from(CoreError::Validation {
                    message: "empty".into(),
                }),
                exit_code::USAGE,
            ),
            (
                CliError::from(CoreError::Api {
                    status: 500,
                    message: "boom".into(),
                    payload: None,
                }),
                exit_code::GENERAL,
            ),
        ];
        for (err, code) in cases {
            assert_eq!(err.exit_code(), code, "{err}");
        }
    }

    #[test]
    fn config_validation_is_a_usage_error() {
        let err = CliError::from(ConfigError::Validation {
            field: "api_url".into(),
            reason: "invalid URL".into(),
        });
        assert_eq!(err.exit_code(), exit_code::USAGE);
        assert_eq!(err.to_string(), "Invalid value for api_url: invalid URL");
    }
}
