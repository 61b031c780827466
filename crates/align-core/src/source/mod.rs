//! MCP server source file loading.
//!
//! The source is a YAML file with a top-level `servers` (or `mcpServers`)
//! mapping. String values are environment-expanded after parsing.

pub mod env;

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::model::{AttrValue, ServerDefinition, ServerModel};

#[derive(Debug, Default, Deserialize)]
struct SourceFile {
    #[serde(default)]
    servers: Option<Mapping>,
    #[serde(default, rename = "mcpServers")]
    mcp_servers: Option<Mapping>,
}

/// Load servers from a YAML source file, expanding the process environment.
pub fn load_servers(path: &Path) -> Result<ServerModel> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read MCP config: {}", path.display()))?;
    parse_servers(&content, path, |name| std::env::var(name).ok())
}

/// Parse servers from YAML text using `lookup` for variable expansion.
///
/// `path` is only used in error messages.
pub fn parse_servers<F>(content: &str, path: &Path, lookup: F) -> Result<ServerModel>
where
    F: Fn(&str) -> Option<String>,
{
    let file: SourceFile = serde_yaml::from_str(content)
        .with_context(|| format!("failed to parse MCP config at {:?}", path.display().to_string()))?;

    let servers = match (file.servers, file.mcp_servers) {
        (Some(servers), _) if !servers.is_empty() => servers,
        (_, Some(servers)) if !servers.is_empty() => servers,
        _ => bail!("no MCP servers found in {}", path.display()),
    };

    let mut model = ServerModel::new();
    for (name, value) in servers {
        let name = scalar_key(&name);
        let Value::Mapping(attrs) = value else {
            bail!("server {name:?} must be a mapping");
        };
        let mut attrs = convert_mapping(attrs);
        for value in attrs.values_mut() {
            env::expand_value(value, &lookup);
        }
        model.insert(name, ServerDefinition::from(attrs));
    }

    debug!(path = %path.display(), servers = model.len(), "loaded MCP servers");
    Ok(model)
}

fn scalar_key(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

fn convert_mapping(mapping: Mapping) -> BTreeMap<String, AttrValue> {
    mapping
        .into_iter()
        .filter_map(|(key, value)| convert(value).map(|value| (scalar_key(&key), value)))
        .collect()
}

/// Convert a YAML value, dropping nulls.
fn convert(value: Value) -> Option<AttrValue> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(AttrValue::Bool(b)),
        Value::Number(n) => Some(match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => AttrValue::Integer(i),
            (None, Some(x)) => AttrValue::Float(x),
            (None, None) => AttrValue::String(n.to_string()),
        }),
        Value::String(s) => Some(AttrValue::String(s)),
        Value::Sequence(items) => Some(AttrValue::List(
            items.into_iter().filter_map(convert).collect(),
        )),
        Value::Mapping(mapping) => Some(AttrValue::Map(convert_mapping(mapping))),
        Value::Tagged(tagged) => convert(tagged.value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn parse(content: &str) -> Result<ServerModel> {
        parse_servers(content, Path::new("/tmp/mcp.yml"), no_env)
    }

    #[test]
    fn reads_servers_key() {
        let model = parse(
            r#"
servers:
  fs:
    command: npx
    args: ["-y", "@modelcontextprotocol/server-filesystem"]
    timeout: 30
    ratio: 0.5
    enabled: true
"#,
        )
        .expect("parse");

        let fs = model.get("fs").unwrap();
        assert_eq!(fs.get_str("command"), Some("npx"));
        assert_eq!(fs.get("timeout"), Some(&AttrValue::Integer(30)));
        assert_eq!(fs.get("ratio"), Some(&AttrValue::Float(0.5)));
        assert_eq!(fs.get("enabled"), Some(&AttrValue::Bool(true)));
        assert_eq!(fs.get("args").and_then(AttrValue::as_list).map(<[_]>::len), Some(2));
    }

    #[test]
    fn falls_back_to_mcp_servers() {
        let model = parse("servers: {}\nmcpServers:\n  github:\n    url: https://x.test\n")
            .expect("parse");
        assert!(model.contains("github"));
    }

    #[test]
    fn servers_wins_over_mcp_servers() {
        let model = parse("servers:\n  a: {command: x}\nmcpServers:\n  b: {command: y}\n")
            .expect("parse");
        assert!(model.contains("a"));
        assert!(!model.contains("b"));
    }

    #[test]
    fn empty_source_is_an_error() {
        let err = parse("other: 1\n").unwrap_err();
        assert_eq!(err.to_string(), "no MCP servers found in /tmp/mcp.yml");
    }

    #[test]
    fn non_mapping_server_is_an_error() {
        let err = parse("servers:\n  broken: just-a-string\n").unwrap_err();
        assert_eq!(err.to_string(), "server \"broken\" must be a mapping");
    }

    #[test]
    fn invalid_yaml_names_path() {
        let err = parse("servers: [unclosed").unwrap_err();
        assert!(err.to_string().contains("/tmp/mcp.yml"));
    }

    #[test]
    fn null_values_are_dropped() {
        let model = parse("servers:\n  fs:\n    command: npx\n    cwd:\n").expect("parse");
        assert!(!model.get("fs").unwrap().contains_key("cwd"));
    }

    #[test]
    fn expands_environment_in_values() {
        let lookup = |name: &str| (name == "TOKEN").then(|| "abc".to_string());
        let model = parse_servers(
            "servers:\n  gh:\n    headers:\n      Authorization: Bearer ${TOKEN}\n    args: [\"$TOKEN\", \"${MISSING:-none}\"]\n",
            Path::new("mcp.yml"),
            lookup,
        )
        .expect("parse");

        let gh = model.get("gh").unwrap();
        let headers = gh.get("headers").and_then(AttrValue::as_map).unwrap();
        assert_eq!(headers["Authorization"], AttrValue::from("Bearer abc"));
        assert_eq!(
            gh.get("args"),
            Some(&AttrValue::List(vec!["abc".into(), "none".into()]))
        );
    }

    #[test]
    fn load_servers_reads_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("agent-align-mcp.yml");
        std::fs::write(&path, "servers:\n  fs:\n    command: npx\n").unwrap();

        let model = load_servers(&path).expect("load");

        assert_eq!(model.len(), 1);
    }

    #[test]
    fn load_servers_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = load_servers(&temp.path().join("absent.yml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read MCP config"));
    }
}
