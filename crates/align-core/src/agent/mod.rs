//! Agent catalog.
//!
//! Fixed, compiled-in table of the coding assistants whose MCP config files
//! can be kept in sync:
//! - where each agent keeps its config by default
//! - which format the file uses (JSON object or TOML-like sections)
//! - under which key the server map is nested

mod paths;

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SyncError};

pub use paths::default_config_path;

/// Namespace used for section-text (TOML) destinations.
pub const SECTION_NAMESPACE: &str = "mcp_servers";

/// Supported agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Agent {
    /// GitHub Copilot CLI
    Copilot,
    /// Visual Studio Code
    VsCode,
    /// Codex CLI
    Codex,
    /// Claude Code
    ClaudeCode,
    /// Gemini CLI
    Gemini,
    /// Kilo Code extension
    KiloCode,
}

impl Agent {
    /// Every agent, in catalog order.
    pub const ALL: [Agent; 6] = [
        Agent::Copilot,
        Agent::VsCode,
        Agent::Codex,
        Agent::ClaudeCode,
        Agent::Gemini,
        Agent::KiloCode,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Agent::Copilot => "copilot",
            Agent::VsCode => "vscode",
            Agent::Codex => "codex",
            Agent::ClaudeCode => "claudecode",
            Agent::Gemini => "gemini",
            Agent::KiloCode => "kilocode",
        }
    }

    /// Look up an agent by name. Matching ignores case and surrounding whitespace.
    pub fn parse(name: &str) -> Option<Agent> {
        let normalized = normalize_name(name);
        Agent::ALL.into_iter().find(|agent| agent.id() == normalized)
    }

    pub fn format(self) -> ConfigFormat {
        match self {
            Agent::Codex => ConfigFormat::Toml,
            _ => ConfigFormat::Json,
        }
    }

    /// Key under which servers are nested; empty for section-text destinations.
    pub fn root_key(self) -> &'static str {
        match self {
            Agent::VsCode => "servers",
            Agent::Codex => "",
            Agent::Copilot | Agent::ClaudeCode | Agent::Gemini | Agent::KiloCode => "mcpServers",
        }
    }
}

impl fmt::Display for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Names of every supported agent, in catalog order.
pub fn supported_agents() -> Vec<&'static str> {
    Agent::ALL.iter().map(|agent| agent.id()).collect()
}

/// Lowercase and trim an agent name.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Destination file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigFormat {
    /// Structured JSON object.
    Json,
    /// Section-oriented TOML-like text.
    Toml,
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigFormat::Json => f.write_str("json"),
            ConfigFormat::Toml => f.write_str("toml"),
        }
    }
}

/// Environment needed to resolve default paths.
#[derive(Debug, Clone, Default)]
pub struct AgentContext {
    pub home_dir: Option<PathBuf>,
}

impl AgentContext {
    /// Context rooted at the current user's home directory.
    pub fn from_env() -> Self {
        Self {
            home_dir: dirs::home_dir(),
        }
    }

    pub fn with_home_dir(home_dir: impl Into<PathBuf>) -> Self {
        Self {
            home_dir: Some(home_dir.into()),
        }
    }
}

/// A resolved destination: agent, file location and format details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentDescriptor {
    pub agent: Agent,
    pub file_path: PathBuf,
    pub root_key: &'static str,
    pub format: ConfigFormat,
}

impl AgentDescriptor {
    /// Resolve a destination by name, applying an optional path override.
    pub fn resolve(name: &str, path_override: Option<&str>, ctx: &AgentContext) -> Result<Self> {
        let agent = Agent::parse(name).ok_or_else(|| SyncError::UnsupportedAgent {
            name: name.to_string(),
        })?;

        let file_path = match path_override.map(str::trim).filter(|p| !p.is_empty()) {
            Some(path) => PathBuf::from(path),
            None => {
                let home = ctx
                    .home_dir
                    .as_deref()
                    .ok_or(SyncError::HomeDirUnavailable { agent })?;
                default_config_path(agent, home)
            }
        };

        Ok(Self {
            agent,
            file_path,
            root_key: agent.root_key(),
            format: agent.format(),
        })
    }

    pub fn name(&self) -> &'static str {
        self.agent.id()
    }
}
