//! Per-agent transforms.
//!
//! A transform rewrites an agent's private copy of the server model so it fits
//! the agent's schema, or rejects it. Each agent gets exactly one; agents
//! without special rules get [`Identity`].

mod field_strip;
mod token_relocation;
mod tool_manifest;
mod transport;

use crate::agent::Agent;
use crate::error::TransformError;
use crate::model::ServerModel;

pub use field_strip::FieldStripping;
pub use token_relocation::{CODEX_GITHUB_TOKEN_ENV, TokenRelocation};
pub use tool_manifest::ToolManifest;
pub use transport::TransportNormalization;

/// Trait for agent-specific rewrites of the server model.
pub trait Transform: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Mutate `servers` in place, or fail validation.
    fn apply(&self, servers: &mut ServerModel) -> Result<(), TransformError>;
}

/// Leaves the model untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct Identity;

impl Transform for Identity {
    fn name(&self) -> &'static str {
        "identity"
    }

    fn apply(&self, _servers: &mut ServerModel) -> Result<(), TransformError> {
        Ok(())
    }
}

/// Select the transform for an agent.
pub fn transform_for(agent: Agent) -> Box<dyn Transform> {
    match agent {
        Agent::Copilot => Box::new(ToolManifest::new(agent)),
        Agent::Codex => Box::new(TokenRelocation),
        Agent::ClaudeCode => Box::new(TransportNormalization),
        Agent::Gemini => Box::new(FieldStripping),
        Agent::VsCode | Agent::KiloCode => Box::new(Identity),
    }
}

/// Canonical transport name for a raw `type` value, if it needs renaming.
fn normalized_transport(raw: &str) -> Option<&'static str> {
    match raw.trim().to_lowercase().as_str() {
        "stdio" => Some("local"),
        "streamable-http" => Some("http"),
        _ => None,
    }
}
