//! Default config path resolution per agent.

use std::path::{Path, PathBuf};

use super::Agent;

/// Default location of an agent's MCP config, relative to the home directory.
pub fn default_config_path(agent: Agent, home_dir: &Path) -> PathBuf {
    match agent {
        Agent::Copilot => home_dir.join(".copilot").join("mcp-config.json"),
        Agent::VsCode => home_dir.join(".config").join("Code").join("User").join("mcp.json"),
        Agent::Codex => home_dir.join(".codex").join("config.toml"),
        Agent::ClaudeCode => home_dir.join(".claude.json"),
        Agent::Gemini => home_dir.join(".gemini").join("settings.json"),
        Agent::KiloCode => kilocode_path(home_dir),
    }
}

#[cfg(windows)]
fn kilocode_path(home_dir: &Path) -> PathBuf {
    home_dir
        .join("AppData")
        .join("Roaming")
        .join("Code")
        .join("user")
        .join("mcp.json")
}

#[cfg(not(windows))]
fn kilocode_path(home_dir: &Path) -> PathBuf {
    home_dir
        .join(".config")
        .join("Code")
        .join("User")
        .join("globalStorage")
        .join("kilocode.kilo-code")
        .join("settings")
        .join("mcp_settings.json")
}
