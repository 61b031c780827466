//! Mirroring the canonical servers into arbitrary JSON files.
//!
//! Additional targets receive the untransformed model at a dotted path
//! (`.mcpServers`, `tools.mcp.servers`) inside an existing JSON document.

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde_json::{Map, Value};

use crate::config::AdditionalJsonTarget;
use crate::merge::DestinationReader;
use crate::merge::json::parse_object;
use crate::model::ServerModel;
use crate::render::json::to_pretty;

/// Split a dotted JSON path; a leading `.` is optional and `""`/`.` mean the root.
pub fn json_path_segments(path: &str) -> Vec<&str> {
    path.trim()
        .trim_start_matches('.')
        .split('.')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// Human-readable form of a JSON path.
pub fn display_json_path(path: &str) -> String {
    let segments = json_path_segments(path);
    if segments.is_empty() {
        "<root>".to_string()
    } else {
        format!(".{}", segments.join("."))
    }
}

/// Render the content an additional JSON target should hold after sync.
pub fn build_additional_json<R: DestinationReader + ?Sized>(
    target: &AdditionalJsonTarget,
    servers: &ServerModel,
    reader: &R,
) -> Result<String> {
    let path = Path::new(&target.file_path);
    let rendered = serde_json::to_value(servers).context("Failed to serialize MCP servers")?;

    let segments = json_path_segments(&target.json_path);
    let document = if segments.is_empty() {
        rendered
    } else {
        let existing = reader.read_lenient(path);
        let mut root = parse_object(existing.as_deref());
        set_value_at_path(&mut root, &segments, rendered).with_context(|| {
            format!(
                "Cannot place servers at {} in {}",
                display_json_path(&target.json_path),
                path.display()
            )
        })?;
        Value::Object(root)
    };

    to_pretty(&document).context("Failed to serialize JSON document")
}

fn set_value_at_path(root: &mut Map<String, Value>, path: &[&str], value: Value) -> Result<()> {
    let Some((last, parents)) = path.split_last() else {
        return Ok(());
    };

    let mut current = root;
    for segment in parents {
        let next = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        match next {
            Value::Object(map) => current = map,
            _ => bail!("Expected '{}' to be a JSON object", segment),
        }
    }
    current.insert(last.to_string(), value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::FsReader;
    use serde_json::json;
    use tempfile::TempDir;

    fn servers() -> ServerModel {
        serde_json::from_value(json!({"fs": {"command": "npx"}})).expect("valid model")
    }

    fn target(dir: &TempDir, json_path: &str) -> AdditionalJsonTarget {
        AdditionalJsonTarget {
            file_path: dir.path().join("settings.json").display().to_string(),
            json_path: json_path.to_string(),
        }
    }

    #[test]
    fn path_segments() {
        assert_eq!(json_path_segments(".mcpServers"), vec!["mcpServers"]);
        assert_eq!(json_path_segments("a.b"), vec!["a", "b"]);
        assert!(json_path_segments(" . ").is_empty());
        assert_eq!(display_json_path(""), "<root>");
        assert_eq!(display_json_path("tools.mcp"), ".tools.mcp");
    }

    #[test]
    fn nests_into_existing_document() {
        let temp = TempDir::new().unwrap();
        let target = target(&temp, ".tools.mcp");
        std::fs::write(&target.file_path, r#"{"theme": "dark", "tools": {"other": 1}}"#).unwrap();

        let out = build_additional_json(&target, &servers(), &FsReader).unwrap();

        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(
            parsed,
            json!({"theme": "dark", "tools": {"other": 1, "mcp": {"fs": {"command": "npx"}}}})
        );
    }

    #[test]
    fn missing_file_creates_intermediate_objects() {
        let temp = TempDir::new().unwrap();
        let target = target(&temp, "a.b");

        let out = build_additional_json(&target, &servers(), &FsReader).unwrap();

        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, json!({"a": {"b": {"fs": {"command": "npx"}}}}));
    }

    #[test]
    fn root_path_replaces_document() {
        let temp = TempDir::new().unwrap();
        let target = target(&temp, ".");
        std::fs::write(&target.file_path, r#"{"theme": "dark"}"#).unwrap();

        let out = build_additional_json(&target, &servers(), &FsReader).unwrap();

        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, json!({"fs": {"command": "npx"}}));
    }

    #[test]
    fn non_object_on_path_is_an_error() {
        let temp = TempDir::new().unwrap();
        let target = target(&temp, ".tools.mcp");
        std::fs::write(&target.file_path, r#"{"tools": [1, 2]}"#).unwrap();

        let err = build_additional_json(&target, &servers(), &FsReader).unwrap_err();

        assert!(format!("{err:#}").contains("Expected 'tools' to be a JSON object"));
    }

    #[test]
    fn unparseable_file_starts_empty() {
        let temp = TempDir::new().unwrap();
        let target = target(&temp, "servers");
        std::fs::write(&target.file_path, "{oops").unwrap();

        let out = build_additional_json(&target, &servers(), &FsReader).unwrap();

        assert!(out.starts_with("{\n  \"servers\""));
    }
}
