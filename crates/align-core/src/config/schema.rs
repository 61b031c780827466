//! Configuration schema for agent-align.yml
//!
//! ```yaml
//! mcpServers:
//!   configPath: ~/agent-align-mcp.yml
//!   targets:
//!     agents:
//!       - copilot
//!       - name: codex
//!         path: ~/custom/config.toml
//!         disabledMcpServers: [github]
//!     additionalTargets:
//!       json:
//!         - filePath: ~/.config/tool/settings.json
//!           jsonPath: .mcpServers
//! ```

use serde::{Deserialize, Serialize};

use crate::sync::AgentTarget;

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(rename = "mcpServers", default)]
    pub mcp: McpSection,
}

/// Where servers come from and where they go.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct McpSection {
    /// MCP source file; defaults to `agent-align-mcp.yml` next to the config.
    #[serde(rename = "configPath", default, skip_serializing_if = "String::is_empty")]
    pub config_path: String,

    #[serde(default)]
    pub targets: TargetsConfig,
}

/// Agent destinations plus additional mirrored files.
///
/// Accepts either a bare sequence of agents or a mapping with `agents` and
/// `additionalTargets`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawTargets")]
pub struct TargetsConfig {
    pub agents: Vec<AgentEntry>,

    #[serde(rename = "additionalTargets", skip_serializing_if = "AdditionalTargets::is_empty")]
    pub additional: AdditionalTargets,
}

impl TargetsConfig {
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty() && self.additional.is_empty()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTargets {
    Empty,
    Agents(Vec<AgentEntry>),
    Detailed {
        #[serde(default)]
        agents: Vec<AgentEntry>,
        #[serde(default)]
        additional: AdditionalTargets,
        #[serde(rename = "additionalTargets", default)]
        additional_targets: AdditionalTargets,
    },
}

impl From<RawTargets> for TargetsConfig {
    fn from(raw: RawTargets) -> Self {
        match raw {
            RawTargets::Empty => Self::default(),
            RawTargets::Agents(agents) => Self {
                agents,
                additional: AdditionalTargets::default(),
            },
            RawTargets::Detailed {
                agents,
                additional,
                additional_targets,
            } => Self {
                agents,
                additional: if additional_targets.is_empty() {
                    additional
                } else {
                    additional_targets
                },
            },
        }
    }
}

/// One agent destination: a bare name or a mapping with overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawAgentEntry", into = "RawAgentEntry")]
pub struct AgentEntry {
    pub name: String,
    pub path: Option<String>,
    pub disabled_mcp_servers: Vec<String>,
}

impl AgentEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn to_target(&self) -> AgentTarget {
        AgentTarget {
            name: self.name.clone(),
            path_override: self.path.clone(),
            disabled_servers: self.disabled_mcp_servers.clone(),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawAgentEntry {
    Name(String),
    Detailed {
        #[serde(default)]
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<String>,
        #[serde(rename = "disabledMcpServers", default, skip_serializing_if = "Vec::is_empty")]
        disabled_mcp_servers: Vec<String>,
    },
}

impl From<RawAgentEntry> for AgentEntry {
    fn from(raw: RawAgentEntry) -> Self {
        match raw {
            RawAgentEntry::Name(name) => Self::new(name),
            RawAgentEntry::Detailed {
                name,
                path,
                disabled_mcp_servers,
            } => Self {
                name,
                path,
                disabled_mcp_servers,
            },
        }
    }
}

impl From<AgentEntry> for RawAgentEntry {
    fn from(entry: AgentEntry) -> Self {
        if entry.path.is_none() && entry.disabled_mcp_servers.is_empty() {
            return RawAgentEntry::Name(entry.name);
        }
        RawAgentEntry::Detailed {
            name: entry.name,
            path: entry.path,
            disabled_mcp_servers: entry.disabled_mcp_servers,
        }
    }
}

/// Non-agent destinations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalTargets {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub json: Vec<AdditionalJsonTarget>,
}

impl AdditionalTargets {
    pub fn is_empty(&self) -> bool {
        self.json.is_empty()
    }
}

/// A JSON file that receives the untransformed servers at `json_path`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalJsonTarget {
    #[serde(rename = "filePath", default)]
    pub file_path: String,

    /// Dotted path such as `.mcpServers`; empty means the whole document.
    #[serde(rename = "jsonPath", default, skip_serializing_if = "String::is_empty")]
    pub json_path: String,
}
