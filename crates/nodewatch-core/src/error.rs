// ── Core error types ──
//
// Errors surfaced by the registry. Consumers never see reqwest errors or
// serde failures directly; the `From<nodewatch_api::Error>` impl folds
// them into transport, response and payload variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    // ── Fetch failures ───────────────────────────────────────────────
    /// The upstream could not be reached. Timeouts land here too.
    #[error("{message}")]
    Transport { message: String, timed_out: bool },

    /// The upstream answered with a non-success status.
    #[error("{message}")]
    Response {
        status: u16,
        message: String,
        endpoint: Option<String>,
    },

    /// The upstream answered, but not with the expected shape.
    #[error("Malformed payload: {message}")]
    MalformedPayload { message: String },

    // ── Lookup ───────────────────────────────────────────────────────
    #[error("Node not found: {pubkey}")]
    NodeNotFound { pubkey: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// HTTP status code, when the upstream answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Response { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport { timed_out: true, .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<nodewatch_api::Error> for CoreError {
    fn from(err: nodewatch_api::Error) -> Self {
        match err {
            nodewatch_api::Error::Transport { .. } => CoreError::Transport {
                timed_out: err.is_timeout(),
                message: err.to_string(),
            },
            nodewatch_api::Error::Http {
                status,
                ref endpoint,
                ..
            } => CoreError::Response {
                status,
                endpoint: Some(endpoint.clone()),
                message: err.to_string(),
            },
            nodewatch_api::Error::Deserialization { message, body: _ } => {
                CoreError::MalformedPayload { message }
            }
            nodewatch_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            nodewatch_api::Error::ClientBuild(message) => CoreError::Config { message },
        }
    }
}
