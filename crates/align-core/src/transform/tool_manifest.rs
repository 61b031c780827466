//! Copilot rules: every server carries a `tools` manifest, transport names use
//! Copilot's vocabulary, and network servers declare both `type` and `url`.

use crate::agent::Agent;
use crate::error::TransformError;
use crate::model::{AttrValue, ServerDefinition, ServerModel};

use super::{Transform, normalized_transport};

#[derive(Debug, Clone, Copy)]
pub struct ToolManifest {
    agent: Agent,
}

impl ToolManifest {
    pub fn new(agent: Agent) -> Self {
        Self { agent }
    }
}

impl Transform for ToolManifest {
    fn name(&self) -> &'static str {
        "tool-manifest"
    }

    fn apply(&self, servers: &mut ServerModel) -> Result<(), TransformError> {
        for (name, server) in servers.iter_mut() {
            if !server.contains_key("tools") {
                server.insert("tools", AttrValue::empty_list());
            }

            let renamed = server.get_str("type").and_then(normalized_transport);
            if let Some(transport) = renamed {
                server.insert("type", transport);
            }

            self.validate_network_server(name, server)?;
        }
        Ok(())
    }
}

impl ToolManifest {
    fn validate_network_server(
        &self,
        name: &str,
        server: &ServerDefinition,
    ) -> Result<(), TransformError> {
        let has_type = server.contains_key("type");
        let has_url = server.contains_key("url");
        if !has_type && !has_url {
            return Ok(());
        }

        // Local transports run a command and need no URL.
        if server
            .get_str("type")
            .is_some_and(|t| t.trim().eq_ignore_ascii_case("local"))
        {
            return Ok(());
        }

        let mut missing = Vec::new();
        if !has_type {
            missing.push("type");
        }
        if !has_url {
            missing.push("url");
        }
        if missing.is_empty() {
            return Ok(());
        }

        Err(TransformError::MissingFields {
            agent: self.agent,
            server: name.to_string(),
            missing,
        })
    }
}
