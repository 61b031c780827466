//! Root-key replacement for JSON destinations.

use serde_json::{Map, Value};
use tracing::warn;

use crate::model::ServerModel;
use crate::render::json::{to_pretty, wrap_servers};

/// Parse existing text as a JSON object, falling back to an empty object.
pub(crate) fn parse_object(existing: Option<&str>) -> Map<String, Value> {
    let Some(text) = existing.filter(|t| !t.trim().is_empty()) else {
        return Map::new();
    };
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            warn!(kind = json_kind(&other), "existing JSON root is not an object; starting empty");
            Map::new()
        }
        Err(err) => {
            warn!(error = %err, "existing JSON is unparseable; starting empty");
            Map::new()
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Replace `root_key` in the existing document with `servers`.
///
/// Every other top-level key is preserved. An empty `root_key` replaces the
/// whole document.
pub fn merge_document(
    existing: Option<&str>,
    root_key: &str,
    servers: &ServerModel,
) -> Result<String, serde_json::Error> {
    let document = if root_key.is_empty() {
        Map::new()
    } else {
        parse_object(existing)
    };
    to_pretty(&wrap_servers(document, root_key, servers)?)
}
