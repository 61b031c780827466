//! Format renderers for agent config files.
//!
//! Renderers turn a (transformed) server model into the agent's native text.
//! `render` produces only the managed content; `render_merged` folds it into
//! whatever the destination file already holds (see [`crate::merge`]).

pub mod json;
pub mod sections;

use crate::agent::{AgentDescriptor, ConfigFormat, SECTION_NAMESPACE};
use crate::error::{Result, SyncError};
use crate::merge;
use crate::model::ServerModel;

pub use json::JsonRenderer;
pub use sections::SectionRenderer;

/// Trait for rendering the server model into one destination format.
pub trait ConfigRenderer: Send + Sync {
    /// Render only the managed content.
    fn render(&self, servers: &ServerModel) -> Result<String>;

    /// Render the managed content merged into the existing file content.
    ///
    /// `existing` is `None` when the destination does not exist yet.
    fn render_merged(&self, existing: Option<&str>, servers: &ServerModel) -> Result<String>;

    /// Get the format this renderer produces.
    fn format(&self) -> ConfigFormat;
}

impl ConfigRenderer for JsonRenderer {
    fn render(&self, servers: &ServerModel) -> Result<String> {
        json::render_document(self.root_key(), servers).map_err(|source| SyncError::Render {
            agent: self.agent(),
            source,
        })
    }

    fn render_merged(&self, existing: Option<&str>, servers: &ServerModel) -> Result<String> {
        merge::json::merge_document(existing, self.root_key(), servers).map_err(|source| {
            SyncError::Render {
                agent: self.agent(),
                source,
            }
        })
    }

    fn format(&self) -> ConfigFormat {
        ConfigFormat::Json
    }
}

impl ConfigRenderer for SectionRenderer {
    fn render(&self, servers: &ServerModel) -> Result<String> {
        Ok(sections::render_sections(self.namespace(), servers))
    }

    fn render_merged(&self, existing: Option<&str>, servers: &ServerModel) -> Result<String> {
        let rendered = self.render(servers)?;
        Ok(merge::sections::merge_sections(
            existing.unwrap_or_default(),
            &rendered,
            self.namespace(),
        ))
    }

    fn format(&self) -> ConfigFormat {
        ConfigFormat::Toml
    }
}

/// Create a renderer for the given destination.
pub fn renderer_for(descriptor: &AgentDescriptor) -> Box<dyn ConfigRenderer> {
    match descriptor.format {
        ConfigFormat::Json => Box::new(JsonRenderer::new(descriptor.agent, descriptor.root_key)),
        ConfigFormat::Toml => Box::new(SectionRenderer::new(SECTION_NAMESPACE)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentContext;

    #[test]
    fn renderer_for_matches_descriptor_format() {
        let ctx = AgentContext::with_home_dir("/home/user");
        for name in ["copilot", "vscode", "claudecode", "gemini", "kilocode"] {
            let desc = AgentDescriptor::resolve(name, None, &ctx).expect("supported");
            assert_eq!(renderer_for(&desc).format(), ConfigFormat::Json);
        }
        let codex = AgentDescriptor::resolve("codex", None, &ctx).expect("supported");
        assert_eq!(renderer_for(&codex).format(), ConfigFormat::Toml);
    }
}
