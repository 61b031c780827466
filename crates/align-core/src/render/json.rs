//! JSON destination rendering.

use serde_json::{Map, Value};

use crate::agent::Agent;
use crate::model::ServerModel;

/// Renders servers nested under a root key of a JSON object.
#[derive(Debug, Clone)]
pub struct JsonRenderer {
    agent: Agent,
    root_key: &'static str,
}

impl JsonRenderer {
    pub fn new(agent: Agent, root_key: &'static str) -> Self {
        Self { agent, root_key }
    }

    pub fn agent(&self) -> Agent {
        self.agent
    }

    pub fn root_key(&self) -> &'static str {
        self.root_key
    }
}

/// Render a fresh document holding only the servers.
pub fn render_document(root_key: &str, servers: &ServerModel) -> Result<String, serde_json::Error> {
    let document = wrap_servers(Map::new(), root_key, servers)?;
    to_pretty(&document)
}

/// Place `servers` under `root_key` in `document`, or replace it when the key is empty.
pub(crate) fn wrap_servers(
    mut document: Map<String, Value>,
    root_key: &str,
    servers: &ServerModel,
) -> Result<Value, serde_json::Error> {
    let rendered = serde_json::to_value(servers)?;
    if root_key.is_empty() {
        return Ok(rendered);
    }
    document.insert(root_key.to_string(), rendered);
    Ok(Value::Object(document))
}

/// Pretty-print with two-space indentation and one trailing newline.
pub(crate) fn to_pretty(value: &Value) -> Result<String, serde_json::Error> {
    let mut out = serde_json::to_string_pretty(value)?;
    out.push('\n');
    Ok(out)
}
