//! Application configuration.
//!
//! The config names which agents to keep in sync, optional per-agent path
//! overrides and disabled servers, extra JSON files to mirror into, and where
//! the MCP source file lives.

pub mod parser;
pub mod schema;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub use parser::{expand_user_path, parse_config, parse_config_str, to_yaml};
pub use schema::{AdditionalJsonTarget, AdditionalTargets, AgentEntry, AppConfig, McpSection, TargetsConfig};

use crate::agent::normalize_name;
use crate::sync::AgentTarget;

/// File name of the application config.
pub const CONFIG_FILE_NAME: &str = "agent-align.yml";

/// File name of the MCP source, placed next to the config by default.
pub const MCP_CONFIG_FILE_NAME: &str = "agent-align-mcp.yml";

/// Default config location: `<config_dir>/agent-align/agent-align.yml`.
pub fn default_config_path() -> Result<PathBuf> {
    let base = dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    Ok(base.join("agent-align").join(CONFIG_FILE_NAME))
}

/// Default MCP source location for a given config file.
pub fn default_mcp_config_path(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(dir) => dir.join(MCP_CONFIG_FILE_NAME),
        None => PathBuf::from(MCP_CONFIG_FILE_NAME),
    }
}

impl AppConfig {
    /// Sync targets for every configured agent.
    pub fn agent_targets(&self) -> Vec<AgentTarget> {
        self.mcp.targets.agents.iter().map(AgentEntry::to_target).collect()
    }

    /// First configured entry for `name`, used for path overrides.
    pub fn agent(&self, name: &str) -> Option<&AgentEntry> {
        let name = normalize_name(name);
        self.mcp.targets.agents.iter().find(|entry| entry.name == name)
    }

    pub fn additional_json(&self) -> &[AdditionalJsonTarget] {
        &self.mcp.targets.additional.json
    }

    /// Configured MCP source, or the default next to `config_path`.
    pub fn mcp_config_path(&self, config_path: &Path) -> PathBuf {
        if self.mcp.config_path.is_empty() {
            default_mcp_config_path(config_path)
        } else {
            PathBuf::from(&self.mcp.config_path)
        }
    }
}

/// Load and normalize the config at `path`.
pub fn load_config(path: &Path) -> Result<AppConfig> {
    parse_config(path)
}

/// Write `config` as YAML, creating parent directories.
pub fn write_config(path: &Path, config: &AppConfig) -> Result<()> {
    let yaml = to_yaml(config)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
    }
    std::fs::write(path, yaml)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;
    Ok(())
}
