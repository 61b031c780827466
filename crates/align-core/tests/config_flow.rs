use std::path::Path;

use serde_json::{Value, json};
use tempfile::TempDir;

use align_core::agent::AgentContext;
use align_core::config::{AgentEntry, AppConfig, load_config, write_config};
use align_core::merge::FsReader;
use align_core::mirror::build_additional_json;
use align_core::source::load_servers;
use align_core::sync::Syncer;

fn write(path: &Path, content: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

#[test]
fn config_drives_targets_overrides_and_mirrors() {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("agent-align.yml");
    let mcp_path = temp.path().join("agent-align-mcp.yml");
    let vscode_path = temp.path().join("project").join(".vscode").join("mcp.json");
    let mirror_path = temp.path().join("tool").join("settings.json");

    write(
        &mcp_path,
        "mcpServers:\n  fs:\n    command: npx\n  github:\n    url: https://api.githubcopilot.com/mcp/\n    type: http\n",
    );
    write(
        &config_path,
        &format!(
            r#"mcpServers:
  targets:
    agents:
      - name: VSCode
        path: {}
        disabledMcpServers: [github]
    additionalTargets:
      json:
        - filePath: {}
          jsonPath: .tools.mcp
"#,
            vscode_path.display(),
            mirror_path.display()
        ),
    );
    write(&mirror_path, r#"{"theme": "light"}"#);

    let config = load_config(&config_path).unwrap();
    assert_eq!(config.mcp_config_path(&config_path), mcp_path);

    let servers = load_servers(&config.mcp_config_path(&config_path)).unwrap();
    let syncer = Syncer::with_reader(config.agent_targets(), AgentContext::default(), FsReader);
    let result = syncer.sync(&servers).unwrap();

    let vscode = &result.agents["vscode"][0];
    assert_eq!(vscode.descriptor.file_path, vscode_path);
    let rendered: Value = serde_json::from_str(&vscode.content).unwrap();
    assert_eq!(rendered, json!({"servers": {"fs": {"command": "npx"}}}));

    let mirror = build_additional_json(&config.additional_json()[0], &result.servers, &FsReader)
        .unwrap();
    let mirror: Value = serde_json::from_str(&mirror).unwrap();
    assert_eq!(mirror["theme"], json!("light"));
    assert_eq!(
        mirror["tools"]["mcp"]["github"],
        json!({"type": "http", "url": "https://api.githubcopilot.com/mcp/"})
    );
}

#[test]
fn written_config_loads_back() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("conf").join("agent-align.yml");
    let mut config = AppConfig::default();
    config.mcp.targets.agents = vec![AgentEntry::new("codex"), AgentEntry::new("gemini")];

    write_config(&path, &config).unwrap();

    assert_eq!(load_config(&path).unwrap(), config);
}

#[test]
fn missing_source_servers_is_reported() {
    let temp = TempDir::new().unwrap();
    let mcp_path = temp.path().join("mcp.yml");
    write(&mcp_path, "servers: {}\n");

    let err = load_servers(&mcp_path).unwrap_err();

    assert_eq!(
        err.to_string(),
        format!("no MCP servers found in {}", mcp_path.display())
    );
}
