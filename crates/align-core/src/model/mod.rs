//! Canonical MCP server model.
//!
//! The model is format-agnostic: every destination renders from it, and each
//! destination works on its own clone so per-agent rewrites never leak into
//! another agent's output.

mod value;

use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::{Deserialize, Serialize};

pub use value::AttrValue;

/// Attributes of a single MCP server (`command`, `args`, `env`, `url`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServerDefinition {
    attrs: BTreeMap<String, AttrValue>,
}

impl ServerDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.attrs.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut AttrValue> {
        self.attrs.get_mut(key)
    }

    /// Get an attribute only if it holds a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).and_then(AttrValue::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.attrs.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Option<AttrValue> {
        self.attrs.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<AttrValue> {
        self.attrs.remove(key)
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    /// Attributes in sorted key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, AttrValue> {
        self.attrs.iter()
    }

    pub fn as_map(&self) -> &BTreeMap<String, AttrValue> {
        &self.attrs
    }
}

impl From<BTreeMap<String, AttrValue>> for ServerDefinition {
    fn from(attrs: BTreeMap<String, AttrValue>) -> Self {
        Self { attrs }
    }
}

impl<K: Into<String>, V: Into<AttrValue>> FromIterator<(K, V)> for ServerDefinition {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            attrs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ServerDefinition {
    type Item = (&'a String, &'a AttrValue);
    type IntoIter = btree_map::Iter<'a, String, AttrValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.attrs.iter()
    }
}

/// The full set of MCP servers keyed by (case-sensitive) server name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServerModel {
    servers: BTreeMap<String, ServerDefinition>,
}

impl ServerModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        name: impl Into<String>,
        definition: ServerDefinition,
    ) -> Option<ServerDefinition> {
        self.servers.insert(name.into(), definition)
    }

    pub fn get(&self, name: &str) -> Option<&ServerDefinition> {
        self.servers.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut ServerDefinition> {
        self.servers.get_mut(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<ServerDefinition> {
        self.servers.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.servers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    /// Servers in sorted name order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, ServerDefinition> {
        self.servers.iter()
    }

    pub fn iter_mut(&mut self) -> btree_map::IterMut<'_, String, ServerDefinition> {
        self.servers.iter_mut()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.servers.keys().map(String::as_str)
    }

    /// Drop every server whose name is listed in `names`.
    pub fn without(mut self, names: &[String]) -> Self {
        for name in names {
            self.servers.remove(name);
        }
        self
    }
}

impl FromIterator<(String, ServerDefinition)> for ServerModel {
    fn from_iter<I: IntoIterator<Item = (String, ServerDefinition)>>(iter: I) -> Self {
        Self {
            servers: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ServerModel {
    type Item = (&'a String, &'a ServerDefinition);
    type IntoIter = btree_map::Iter<'a, String, ServerDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.servers.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn model_deserializes_from_json() {
        let model: ServerModel = serde_json::from_value(json!({
            "fs": {"command": "npx", "args": ["-y", "fs"]},
            "remote": {"type": "http", "url": "https://example.test"}
        }))
        .expect("deserialize");

        assert_eq!(model.len(), 2);
        assert_eq!(model.get("fs").and_then(|d| d.get_str("command")), Some("npx"));
        assert_eq!(model.names().collect::<Vec<_>>(), vec!["fs", "remote"]);
    }

    #[test]
    fn clone_is_independent() {
        let mut original = ServerModel::new();
        original.insert("a", ServerDefinition::from_iter([("command", "npx")]));

        let mut copy = original.clone();
        copy.get_mut("a").expect("exists").insert("command", "uvx");

        assert_eq!(original.get("a").and_then(|d| d.get_str("command")), Some("npx"));
    }

    #[test]
    fn without_drops_listed_servers() {
        let mut model = ServerModel::new();
        model.insert("keep", ServerDefinition::new());
        model.insert("drop", ServerDefinition::new());

        let model = model.without(&["drop".to_string(), "missing".to_string()]);

        assert!(model.contains("keep"));
        assert!(!model.contains("drop"));
    }
}
