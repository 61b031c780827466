//! agent-align - MCP server config sync for coding agents
//!
//! Usage:
//!   agent-align                    # Sync agents listed in the config
//!   agent-align --agents a,b       # Sync the given agents
//!   agent-align --dry-run          # Preview without writing
//!   agent-align init               # Create a config interactively

mod interactive;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use console::style;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use align_core::agent::{Agent, supported_agents};
use align_core::config::{
    AdditionalJsonTarget, AppConfig, default_config_path, default_mcp_config_path, load_config,
    write_config,
};
use align_core::merge::FsReader;
use align_core::mirror::{build_additional_json, display_json_path};
use align_core::model::ServerModel;
use align_core::output::write_destination;
use align_core::shell::server_command;
use align_core::source::load_servers;
use align_core::sync::{AgentTarget, SyncResult, Syncer};

use crate::interactive::{InitWizard, PrefilledInit, confirm};

#[derive(Parser)]
#[command(name = "agent-align", version)]
#[command(about = "Keep MCP server configs in sync across coding agents", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    sync: SyncArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a configuration file interactively
    Init {
        /// Path of the configuration file to create
        #[arg(long)]
        config: Option<PathBuf>,

        /// Comma-separated agents to configure (skips the agent prompt)
        #[arg(long)]
        agents: Option<String>,
    },
}

#[derive(Args)]
struct SyncArgs {
    /// Comma-separated agents to sync (defaults to the agents in the config)
    #[arg(long)]
    agents: Option<String>,

    /// Path to the YAML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to the YAML file defining MCP servers
    /// (defaults to agent-align-mcp.yml next to the configuration)
    #[arg(long = "mcp-config")]
    mcp_config: Option<PathBuf>,

    /// Show what would change without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Apply changes without asking (useful for cron jobs)
    #[arg(long)]
    confirm: bool,

    /// Print a shell command to test each MCP server and exit
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "align_core=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init { config, agents }) => run_init(config, agents.as_deref()),
        None => run_sync(cli.sync),
    }
}

fn resolve_config_path(path: Option<PathBuf>) -> Result<PathBuf> {
    match path {
        Some(path) => Ok(path),
        None => default_config_path(),
    }
}

fn run_init(config: Option<PathBuf>, agents: Option<&str>) -> Result<()> {
    let path = resolve_config_path(config)?;
    let prefilled = PrefilledInit {
        agents: agents.map(init_agents).transpose()?,
    };

    if path.exists() {
        let prompt = format!("Configuration already exists at {}. Overwrite?", path.display());
        if !confirm(&prompt, false)? {
            println!("Init cancelled.");
            return Ok(());
        }
    }

    create_config(&path, prefilled)
}

/// Validate agent names given to `init --agents`.
fn init_agents(value: &str) -> Result<Vec<String>> {
    let names = parse_agents(value);
    if names.is_empty() {
        bail!("the --agents flag must list at least one agent");
    }
    names
        .iter()
        .map(|name| match Agent::parse(name) {
            Some(agent) => Ok(agent.id().to_string()),
            None => bail!(
                "unsupported agent \"{name}\" (supported: {})",
                supported_agents().join(", ")
            ),
        })
        .collect()
}

fn create_config(path: &Path, prefilled: PrefilledInit) -> Result<()> {
    let config = InitWizard::new(prefilled).collect()?;
    write_config(path, &config)?;
    println!("{} Created configuration file at {}", style("✓").green(), path.display());
    Ok(())
}

/// Make sure a config exists, offering to create one.
fn ensure_config(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }

    let prompt = format!("Configuration {} not found. Create one now?", path.display());
    if !confirm(&prompt, true)? {
        bail!(
            "configuration file {} is required (or pass --agents)",
            path.display()
        );
    }
    create_config(path, PrefilledInit::default())
}

fn parse_agents(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

fn run_sync(args: SyncArgs) -> Result<()> {
    let config_path = resolve_config_path(args.config)?;
    let agents_flag = args.agents.as_deref().map(parse_agents);

    let config = match &agents_flag {
        None => {
            ensure_config(&config_path)?;
            Some(load_config(&config_path)?)
        }
        Some(_) if config_path.exists() => Some(load_config(&config_path)?),
        Some(_) => None,
    };

    let targets = match &agents_flag {
        Some(names) if names.is_empty() => bail!("the --agents flag must list at least one agent"),
        Some(names) => targets_from_flag(names, config.as_ref()),
        None => config.as_ref().map(AppConfig::agent_targets).unwrap_or_default(),
    };
    let additional: Vec<AdditionalJsonTarget> = config
        .as_ref()
        .map(|c| c.additional_json().to_vec())
        .unwrap_or_default();

    if targets.is_empty() && additional.is_empty() {
        bail!("no target agents or additional destinations configured; pass --agents or edit the config");
    }

    let mcp_path = match (&args.mcp_config, &config) {
        (Some(path), _) => path.clone(),
        (None, Some(config)) => config.mcp_config_path(&config_path),
        (None, None) => default_mcp_config_path(&config_path),
    };
    tracing::debug!(
        config = %config_path.display(),
        mcp = %mcp_path.display(),
        targets = targets.len(),
        "resolved sync inputs"
    );
    let servers = load_servers(&mcp_path)
        .with_context(|| format!("Failed to load MCP configuration {}", mcp_path.display()))?;

    if args.debug {
        print_debug_commands(&servers);
        return Ok(());
    }

    let result = Syncer::new(targets).sync(&servers)?;

    print_preview(&result);
    let mut errors = print_failures(&result);
    let mirrors = prepare_mirrors(&additional, &result.servers, &mut errors);

    if args.dry_run {
        println!("Dry run complete. No changes were made.");
        return finish(&errors);
    }

    if !args.confirm && !confirm("Apply these changes?", false)? {
        println!("Changes cancelled.");
        return Ok(());
    }

    println!();
    println!("Applying changes...");
    for output in result.outputs() {
        let path = &output.descriptor.file_path;
        if !output.changed {
            println!("  Unchanged: {}", path.display());
            continue;
        }
        match write_destination(path, &output.content) {
            Ok(()) => println!("  {} Updated: {}", style("✓").green(), path.display()),
            Err(err) => errors.push(format!(
                "error writing config for {}: {err:#}",
                output.descriptor.name()
            )),
        }
    }
    for (target, content) in &mirrors {
        match write_destination(Path::new(&target.file_path), content) {
            Ok(()) => println!(
                "  {} Updated additional JSON: {} ({})",
                style("✓").green(),
                target.file_path,
                display_json_path(&target.json_path)
            ),
            Err(err) => errors.push(format!(
                "error writing additional JSON {}: {err:#}",
                target.file_path
            )),
        }
    }

    println!();
    println!("Configuration sync complete.");
    finish(&errors)
}

/// Agents named on the command line, with path overrides from the config.
fn targets_from_flag(names: &[String], config: Option<&AppConfig>) -> Vec<AgentTarget> {
    names
        .iter()
        .map(|name| {
            let target = AgentTarget::new(name.as_str());
            match config.and_then(|c| c.agent(name)).and_then(|a| a.path.clone()) {
                Some(path) => target.with_path(path),
                None => target,
            }
        })
        .collect()
}

fn print_debug_commands(servers: &ServerModel) {
    for (name, server) in servers {
        match server_command(server) {
            Some(command) => println!("{name}: {command}"),
            None => println!("{name}: <cannot render command>"),
        }
    }
}

fn print_preview(result: &SyncResult) {
    println!();
    println!("{}", style("=== Dry Run Results ===").bold());
    println!("The following configuration changes will be made:");
    println!();

    for (agent, outputs) in &result.agents {
        for output in outputs {
            println!("Agent: {}", style(agent).cyan());
            println!("  File: {}", output.descriptor.file_path.display());
            println!("  Format: {}", output.descriptor.format);
            let status = if output.changed {
                style("changed").yellow()
            } else {
                style("unchanged").dim()
            };
            println!("  Status: {status}");
            println!("  Content:");
            print!("{}", indent_content(&output.content));
            println!();
        }
    }
}

fn print_failures(result: &SyncResult) -> Vec<String> {
    if result.failures.is_empty() {
        return Vec::new();
    }

    println!("{}", style("Failed destinations:").red().bold());
    result
        .failures
        .iter()
        .map(|failure| {
            let location = failure
                .path
                .as_ref()
                .map(|p| format!(" ({})", p.display()))
                .unwrap_or_default();
            let message = format!("{}{location}: {}", failure.agent, failure.error);
            println!("  - {message}");
            message
        })
        .collect()
}

/// Indent content for previews, one line per output line.
fn indent_content(content: &str) -> String {
    content
        .trim_end_matches('\n')
        .lines()
        .map(|line| format!("    {line}\n"))
        .collect()
}

/// Render additional JSON targets, previewing each one.
fn prepare_mirrors<'a>(
    targets: &'a [AdditionalJsonTarget],
    servers: &ServerModel,
    errors: &mut Vec<String>,
) -> Vec<(&'a AdditionalJsonTarget, String)> {
    let mut prepared = Vec::new();
    for target in targets {
        match build_additional_json(target, servers, &FsReader) {
            Ok(content) => {
                println!("Additional JSON: {}", style(&target.file_path).cyan());
                println!("  JSON Path: {}", display_json_path(&target.json_path));
                println!("  Content:");
                print!("{}", indent_content(&content));
                println!();
                prepared.push((target, content));
            }
            Err(err) => {
                let message = format!("error preparing additional JSON {}: {err:#}", target.file_path);
                println!("  - {message}");
                errors.push(message);
            }
        }
    }
    prepared
}

fn finish(errors: &[String]) -> Result<()> {
    if errors.is_empty() {
        return Ok(());
    }
    eprintln!("{}", style("Encountered errors:").red().bold());
    for message in errors {
        eprintln!("  - {message}");
    }
    std::process::exit(1);
}
