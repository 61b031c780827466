//! Section-text (TOML-like) rendering.
//!
//! Each server becomes `[<namespace>.<server>]` followed by its simple keys in
//! sorted order; mapping-valued attributes become nested sections after them.
//! Every section is closed by one blank line and the output carries no
//! trailing newline, so the merge step controls file termination.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use anyhow::{Context, Result, bail};

use crate::model::{AttrValue, ServerDefinition, ServerModel};

/// Renders servers as sections under a fixed namespace.
#[derive(Debug, Clone)]
pub struct SectionRenderer {
    namespace: &'static str,
}

impl SectionRenderer {
    pub fn new(namespace: &'static str) -> Self {
        Self { namespace }
    }

    pub fn namespace(&self) -> &'static str {
        self.namespace
    }
}

/// Render every server as a section under `namespace`.
pub fn render_sections(namespace: &str, servers: &ServerModel) -> String {
    let mut out = String::new();
    for (name, server) in servers {
        let header = format!("{namespace}.{}", format_key(name));
        write_section(&mut out, &header, server.as_map());
    }
    out.trim_end_matches(['\n', '\r']).to_string()
}

fn write_section(out: &mut String, header: &str, attrs: &BTreeMap<String, AttrValue>) {
    let _ = writeln!(out, "[{header}]");
    for (key, value) in attrs.iter().filter(|(_, value)| !value.is_map()) {
        let _ = writeln!(out, "{} = {}", format_key(key), format_value(value));
    }
    out.push('\n');

    for (key, value) in attrs {
        if let AttrValue::Map(nested) = value {
            write_section(out, &format!("{header}.{}", format_key(key)), nested);
        }
    }
}

/// Key or header segment, quoted by the TOML encoder when it is not bare.
fn format_key(key: &str) -> String {
    toml_edit::Key::new(key).to_string()
}

fn format_value(value: &AttrValue) -> String {
    to_toml(value).to_string()
}

fn to_toml(value: &AttrValue) -> toml_edit::Value {
    match value {
        AttrValue::Bool(b) => toml_edit::Value::from(*b),
        AttrValue::Integer(i) => toml_edit::Value::from(*i),
        AttrValue::Float(x) => toml_edit::Value::from(*x),
        AttrValue::String(s) => toml_edit::Value::from(s.as_str()),
        AttrValue::List(items) => {
            toml_edit::Value::Array(items.iter().map(to_toml).collect::<toml_edit::Array>())
        }
        AttrValue::Map(map) => toml_edit::Value::InlineTable(
            map.iter()
                .map(|(k, v)| (k.as_str(), to_toml(v)))
                .collect::<toml_edit::InlineTable>(),
        ),
    }
}

/// Read the sections under `namespace` back into a server model.
///
/// Content outside the namespace is ignored. A missing namespace yields an
/// empty model.
pub fn parse_sections(text: &str, namespace: &str) -> Result<ServerModel> {
    let table: toml::Table = text.parse().context("failed to parse section text")?;

    let Some(servers) = table.get(namespace) else {
        return Ok(ServerModel::new());
    };
    let Some(servers) = servers.as_table() else {
        bail!("[{namespace}] must be a table");
    };

    let mut model = ServerModel::new();
    for (name, value) in servers {
        let Some(attrs) = value.as_table() else {
            bail!("[{namespace}.{name}] must be a table");
        };
        let definition: ServerDefinition = attrs
            .iter()
            .map(|(k, v)| (k.clone(), from_toml(v)))
            .collect();
        model.insert(name.clone(), definition);
    }
    Ok(model)
}

fn from_toml(value: &toml::Value) -> AttrValue {
    match value {
        toml::Value::String(s) => AttrValue::String(s.clone()),
        toml::Value::Integer(i) => AttrValue::Integer(*i),
        toml::Value::Float(x) => AttrValue::Float(*x),
        toml::Value::Boolean(b) => AttrValue::Bool(*b),
        toml::Value::Datetime(dt) => AttrValue::String(dt.to_string()),
        toml::Value::Array(items) => AttrValue::List(items.iter().map(from_toml).collect()),
        toml::Value::Table(table) => AttrValue::Map(
            table
                .iter()
                .map(|(k, v)| (k.clone(), from_toml(v)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn servers(value: serde_json::Value) -> ServerModel {
        serde_json::from_value(value).expect("valid model")
    }

    #[test]
    fn renders_simple_keys_then_nested_sections() {
        let model = servers(json!({
            "github": {
                "url": "https://api.githubcopilot.com/mcp/",
                "headers": {"X-Trace": "1"},
                "enabled": true,
                "timeout": 30
            }
        }));

        let out = render_sections("mcp_servers", &model);

        assert_eq!(
            out,
            "[mcp_servers.github]\n\
             enabled = true\n\
             timeout = 30\n\
             url = \"https://api.githubcopilot.com/mcp/\"\n\
             \n\
             [mcp_servers.github.headers]\n\
             X-Trace = \"1\""
        );
    }

    #[test]
    fn servers_are_separated_by_one_blank_line() {
        let model = servers(json!({
            "b": {"command": "two"},
            "a": {"command": "one"}
        }));

        let out = render_sections("mcp_servers", &model);

        assert_eq!(
            out,
            "[mcp_servers.a]\ncommand = \"one\"\n\n[mcp_servers.b]\ncommand = \"two\""
        );
    }

    #[test]
    fn empty_list_renders_brackets() {
        let model = servers(json!({"s": {"tools": []}}));
        assert_eq!(render_sections("ns", &model), "[ns.s]\ntools = []");
    }

    #[test]
    fn definition_without_simple_keys() {
        let model = servers(json!({"s": {"env": {"A": "1"}}}));
        assert_eq!(render_sections("ns", &model), "[ns.s]\n\n[ns.s.env]\nA = \"1\"");
    }

    #[test]
    fn lists_and_scalars() {
        let model = servers(json!({
            "s": {"args": ["-y", "pkg", 3, false], "ratio": 1.0, "scale": 0.25}
        }));

        let out = render_sections("ns", &model);

        assert!(out.contains("args = [\"-y\", \"pkg\", 3, false]\n"));
        assert!(out.contains("ratio = 1.0\n"));
        assert!(out.ends_with("scale = 0.25"));
    }

    #[test]
    fn escapes_strings_and_quotes_keys() {
        let model = servers(json!({
            "my server": {"cmd": "say \"hi\"\\\n", "dotted.key": "x"}
        }));

        let out = render_sections("ns", &model);

        assert!(out.starts_with("[ns.\"my server\"]\n"));
        assert!(out.contains("\"dotted.key\" = \"x\""));
        assert_eq!(parse_sections(&out, "ns").expect("parse"), model);
    }

    #[test]
    fn special_floats_and_control_characters() {
        let model = servers(json!({"s": {"big": 1e20, "bell": "a\u{7}b", "tab": "x\ty"}}));

        let out = render_sections("ns", &model);

        assert!(out.contains("big = 100000000000000000000.0\n"));
        assert_eq!(parse_sections(&out, "ns").expect("parse"), model);
    }

    #[test]
    fn maps_inside_lists_are_inline_tables() {
        let model = servers(json!({
            "s": {"items": [{"b": 2, "a": "x"}, {}]}
        }));

        let out = render_sections("ns", &model);

        assert!(out.contains("items = [{ a = \"x\", b = 2 }, {}]"));
    }

    #[test]
    fn empty_model_renders_nothing() {
        assert_eq!(render_sections("ns", &ServerModel::new()), "");
    }

    #[test]
    fn parse_of_render_renders_identically() {
        let model = servers(json!({
            "github": {
                "bearer_token_env_var": "TOKEN",
                "url": "https://api.githubcopilot.com/mcp/",
                "headers": {"X-Trace": "1", "nested": {"deep": [1, 2]}}
            },
            "fs": {
                "command": "npx",
                "args": ["-y", "@scope/fs", "quote\"d"],
                "tools": [],
                "env": {},
                "weight": 2.0,
                "items": [{"k": "v"}]
            },
            "odd name": {"command": "x"}
        }));

        let first = render_sections("mcp_servers", &model);
        let parsed = parse_sections(&first, "mcp_servers").expect("parse");
        let second = render_sections("mcp_servers", &parsed);

        assert_eq!(parsed, model);
        assert_eq!(first, second);
    }

    #[test]
    fn parse_ignores_other_tables() {
        let text = "model = \"o3\"\n\n[profiles.default]\nx = 1\n\n[mcp_servers.a]\ncommand = \"run\"\n";

        let model = parse_sections(text, "mcp_servers").expect("parse");

        assert_eq!(model.len(), 1);
        assert_eq!(model.get("a").unwrap().get_str("command"), Some("run"));
    }

    #[test]
    fn parse_without_namespace_is_empty() {
        let model = parse_sections("a = 1\n", "mcp_servers").expect("parse");
        assert!(model.is_empty());
    }

    #[test]
    fn parse_rejects_non_table_namespace() {
        assert!(parse_sections("mcp_servers = 1\n", "mcp_servers").is_err());
        assert!(parse_sections("not toml [", "mcp_servers").is_err());
    }
}
