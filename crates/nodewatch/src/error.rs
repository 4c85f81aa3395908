//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use nodewatch_config::ConfigError;
use nodewatch_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
#[allow(unused_assignments)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the dashboard backend")]
    #[diagnostic(
        code(nodewatch::connection_failed),
        help(
            "Check that the backend is running and reachable.\n\
             Reason: {reason}\n\
             Set the URL with --api-url or: nodewatch config set api_url <URL>"
        )
    )]
    ConnectionFailed { reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(nodewatch::timeout),
        help(
            "Increase the timeout with --timeout or check backend responsiveness.\n\
             Reason: {reason}"
        )
    )]
    Timeout { reason: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("Node '{pubkey}' not found")]
    #[diagnostic(
        code(nodewatch::not_found),
        help("Run: nodewatch nodes list to see available nodes")
    )]
    NotFound { pubkey: String },

    // ── Backend ──────────────────────────────────────────────────────
    #[error("Backend error: {message}")]
    #[diagnostic(code(nodewatch::api_error))]
    Api { message: String },

    #[error("Unexpected response from backend: {message}")]
    #[diagnostic(
        code(nodewatch::malformed_payload),
        help("The backend may be running an incompatible version. Try: nodewatch health")
    )]
    MalformedPayload { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(nodewatch::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration file already exists at {path}")]
    #[diagnostic(
        code(nodewatch::config_exists),
        help("Use --force to overwrite it, or edit it with: nodewatch config set <key> <value>")
    )]
    ConfigExists { path: String },

    #[error(transparent)]
    #[diagnostic(code(nodewatch::config))]
    Config(ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Transport {
                message,
                timed_out: true,
            } => CliError::Timeout { reason: message },

            CoreError::Transport { message, .. } => CliError::ConnectionFailed { reason: message },

            CoreError::Response { message, .. } => CliError::Api { message },

            CoreError::MalformedPayload { message } => CliError::MalformedPayload { message },

            CoreError::NodeNotFound { pubkey } => CliError::NotFound { pubkey },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::UnknownKey(key) => CliError::Validation {
                field: "key".into(),
                reason: format!(
                    "unknown key '{key}' (expected one of: {})",
                    nodewatch_config::KEYS.join(", ")
                ),
            },
            other => CliError::Config(other),
        }
    }
}
