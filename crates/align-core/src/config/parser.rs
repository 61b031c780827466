//! YAML parser with helpful error messages and post-parse normalization.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use super::schema::{AgentEntry, AppConfig};
use crate::agent::normalize_name;

/// Parse and normalize a config file.
pub fn parse_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_config_str(&content, path, dirs::home_dir().as_deref())
        .with_context(|| format!("Failed to load config file: {}", path.display()))
}

/// Parse config content, expanding `~` against `home`.
///
/// `path` names the config in error messages.
pub fn parse_config_str(content: &str, path: &Path, home: Option<&Path>) -> Result<AppConfig> {
    let config: AppConfig =
        serde_yaml::from_str(content).map_err(|e| enhance_yaml_error(e, content))?;
    normalize(config, path, home)
}

/// Enhance YAML parsing errors with the offending lines
fn enhance_yaml_error(error: serde_yaml::Error, content: &str) -> anyhow::Error {
    match error.location() {
        Some(location) => {
            let line_num = location.line();
            let context = get_line_context(content, line_num);
            anyhow::anyhow!(
                "YAML parsing error at line {}:\n{}\n\nError: {}",
                line_num,
                context,
                error
            )
        }
        None => anyhow::anyhow!("YAML parsing error: {}", error),
    }
}

fn get_line_context(content: &str, line_num: usize) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let start = line_num.saturating_sub(2).min(lines.len());
    let end = (line_num + 2).min(lines.len());

    lines[start..end]
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let num = start + i + 1;
            let marker = if num == line_num { ">>>" } else { "   " };
            format!("{} {:4} | {}", marker, num, line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn normalize(mut config: AppConfig, path: &Path, home: Option<&Path>) -> Result<AppConfig> {
    let mcp = &mut config.mcp;

    mcp.config_path = expand_user_path(&mcp.config_path, home);
    mcp.targets.agents = normalize_agents(std::mem::take(&mut mcp.targets.agents), home);

    for target in &mut mcp.targets.additional.json {
        target.json_path = target.json_path.trim().to_string();
        if target.file_path.trim().is_empty() {
            bail!(
                "config at {:?} has an additional JSON target without a filePath",
                path.display().to_string()
            );
        }
        target.file_path = expand_user_path(&target.file_path, home);
    }

    if mcp.targets.is_empty() {
        bail!(
            "config at {:?} must define at least one target",
            path.display().to_string()
        );
    }
    Ok(config)
}

fn normalize_agents(agents: Vec<AgentEntry>, home: Option<&Path>) -> Vec<AgentEntry> {
    let mut seen = HashSet::new();
    agents
        .into_iter()
        .filter_map(|entry| {
            let name = normalize_name(&entry.name);
            if name.is_empty() {
                return None;
            }
            let path = entry
                .path
                .as_deref()
                .map(|p| expand_user_path(p, home))
                .filter(|p| !p.is_empty());
            let disabled: Vec<String> = entry
                .disabled_mcp_servers
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            Some(AgentEntry {
                name,
                path,
                disabled_mcp_servers: disabled,
            })
        })
        .filter(|entry| seen.insert(entry.clone()))
        .collect()
}

/// Trim `value` and expand a leading `~` or `~/` to `home`.
///
/// `~user` forms, and any value when `home` is unknown, are returned trimmed.
pub fn expand_user_path(value: &str, home: Option<&Path>) -> String {
    let value = value.trim();
    let (Some(rest), Some(home)) = (value.strip_prefix('~'), home) else {
        return value.to_string();
    };
    if rest.is_empty() {
        return home.display().to_string();
    }
    if !rest.starts_with(['/', '\\']) {
        return value.to_string();
    }
    let remainder = rest.trim_start_matches(['/', '\\']);
    if remainder.is_empty() {
        return home.display().to_string();
    }
    let joined: PathBuf = home.join(remainder);
    joined.display().to_string()
}

/// Serialize a configuration to YAML
pub fn to_yaml(config: &AppConfig) -> Result<String> {
    serde_yaml::to_string(config).context("Failed to serialize configuration to YAML")
}
