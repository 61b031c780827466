//! Interactive flow for the init command.
//!
//! Builds an `agent-align.yml` from prompts. Uses dialoguer for terminal UI
//! prompts.

use std::io::{self, Write};

use anyhow::Result;
use console::style;
use dialoguer::{Confirm, Input, MultiSelect, theme::ColorfulTheme};

use align_core::agent::supported_agents;
use align_core::config::{AdditionalJsonTarget, AgentEntry, AppConfig};

/// Pre-filled values that skip prompts.
#[derive(Debug, Clone, Default)]
pub struct PrefilledInit {
    /// Agent names from `init --agents` - if Some, skip agent selection
    pub agents: Option<Vec<String>>,
}

/// Interactive flow for collecting a new configuration.
pub struct InitWizard<W: Write = io::Stdout> {
    prefilled: PrefilledInit,
    /// Output writer (for testing)
    writer: W,
    theme: ColorfulTheme,
}

impl InitWizard<io::Stdout> {
    pub fn new(prefilled: PrefilledInit) -> Self {
        Self {
            prefilled,
            writer: io::stdout(),
            theme: ColorfulTheme::default(),
        }
    }
}

impl<W: Write> InitWizard<W> {
    #[cfg(test)]
    pub fn with_writer(prefilled: PrefilledInit, writer: W) -> Self {
        Self {
            prefilled,
            writer,
            theme: ColorfulTheme::default(),
        }
    }

    /// Run the wizard.
    ///
    /// Flow:
    /// 1. Select target agents (at least one)
    /// 2. Optionally add JSON destinations outside the built-in agents
    /// 3. Show summary
    pub fn collect(&mut self) -> Result<AppConfig> {
        self.print_header()?;

        let agents = self.prompt_agents()?;
        let additional_json = self.prompt_additional_json()?;

        let mut config = AppConfig::default();
        config.mcp.targets.agents = agents.into_iter().map(AgentEntry::new).collect();
        config.mcp.targets.additional.json = additional_json;

        self.print_summary(&config)?;
        Ok(config)
    }

    fn print_header(&mut self) -> Result<()> {
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "{}",
            style("  agent-align Config Wizard").bold().cyan()
        )?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn prompt_agents(&mut self) -> Result<Vec<String>> {
        if let Some(agents) = &self.prefilled.agents {
            return Ok(agents.clone());
        }

        let mut options = supported_agents();
        options.sort_unstable();

        loop {
            let selections = MultiSelect::with_theme(&self.theme)
                .with_prompt("Target agents (space to toggle, enter to confirm)")
                .items(&options)
                .interact()?;

            if !selections.is_empty() {
                return Ok(selections.iter().map(|&i| options[i].to_string()).collect());
            }
            writeln!(
                self.writer,
                "{}",
                style("Please select at least one target agent.").yellow()
            )?;
        }
    }

    fn prompt_additional_json(&mut self) -> Result<Vec<AdditionalJsonTarget>> {
        let mut targets = Vec::new();
        while Confirm::with_theme(&self.theme)
            .with_prompt("Add an additional JSON destination?")
            .default(false)
            .interact()?
        {
            let file_path: String = Input::with_theme(&self.theme)
                .with_prompt("Destination file path")
                .validate_with(|input: &String| -> Result<(), &str> {
                    if input.trim().is_empty() {
                        Err("Please enter a file path.")
                    } else {
                        Ok(())
                    }
                })
                .interact_text()?;
            let json_path: String = Input::with_theme(&self.theme)
                .with_prompt("JSON path within that file (e.g. .mcpServers)")
                .allow_empty(true)
                .interact_text()?;

            targets.push(AdditionalJsonTarget {
                file_path: file_path.trim().to_string(),
                json_path: json_path.trim().to_string(),
            });
        }
        Ok(targets)
    }

    fn print_summary(&mut self, config: &AppConfig) -> Result<()> {
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", style("  Summary").bold())?;
        writeln!(self.writer, "  ───────────────────────────")?;

        let agents: Vec<&str> = config
            .mcp
            .targets
            .agents
            .iter()
            .map(|entry| entry.name.as_str())
            .collect();
        writeln!(self.writer, "  Agents:   {}", style(agents.join(", ")).green())?;

        for target in config.additional_json() {
            writeln!(
                self.writer,
                "  JSON:     {} ({})",
                style(&target.file_path).green(),
                align_core::mirror::display_json_path(&target.json_path)
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }
}

/// Ask a yes/no question.
pub fn confirm(prompt: &str, default: bool) -> Result<bool> {
    let answer = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(default)
        .interact()?;
    Ok(answer)
}
