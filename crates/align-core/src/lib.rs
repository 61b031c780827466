//! Agent Align Core Library
//!
//! Keeps the MCP server definitions of several coding assistants in sync
//! from one canonical source, rewriting each agent's config file in its own
//! format while preserving the settings it does not manage.

pub mod agent;
pub mod config;
pub mod error;
pub mod merge;
pub mod mirror;
pub mod model;
pub mod output;
pub mod render;
pub mod shell;
pub mod source;
pub mod sync;
pub mod transform;

/// Re-exports of commonly used types
pub mod prelude {
    // Catalog
    pub use crate::agent::{
        Agent, AgentContext, AgentDescriptor, ConfigFormat, SECTION_NAMESPACE, supported_agents,
    };

    // Configuration
    pub use crate::config::{AdditionalJsonTarget, AgentEntry, AppConfig};

    // Errors
    pub use crate::error::{SyncError, TransformError};

    // Model
    pub use crate::model::{AttrValue, ServerDefinition, ServerModel};

    // Sync
    pub use crate::merge::{DestinationReader, FsReader};
    pub use crate::sync::{AgentOutput, AgentTarget, DestinationFailure, SyncResult, Syncer};
}
