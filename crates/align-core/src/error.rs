//! Error types for the sync engine.

use crate::agent::Agent;

/// Validation failure raised by a per-agent transform.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransformError {
    /// A network server is missing `type` and/or `url`.
    #[error(
        "{agent} validation error: network-based server {server:?} is missing required field(s): {}. Network servers must have both 'type' and 'url' fields",
        missing.join(", ")
    )]
    MissingFields {
        agent: Agent,
        server: String,
        missing: Vec<&'static str>,
    },
}

/// Errors produced while syncing servers to agent destinations.
///
/// Only [`SyncError::EmptyInput`] aborts a whole run; every other variant is
/// reported per destination.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("server list cannot be empty")]
    EmptyInput,

    #[error("target agent {name:?} not supported")]
    UnsupportedAgent { name: String },

    #[error("failed to get home directory for the default {agent} config path")]
    HomeDirUnavailable { agent: Agent },

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error("failed to render {agent} config: {source}")]
    Render {
        agent: Agent,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, SyncError>;
