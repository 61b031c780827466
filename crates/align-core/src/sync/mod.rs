//! Sync orchestration.
//!
//! The [`Syncer`] fans one canonical server model out to every configured
//! destination. Each destination gets its own copy of the model, so a
//! transform for one agent can never leak into another agent's output, and a
//! failure at one destination does not stop the others.

use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::agent::{AgentContext, AgentDescriptor, normalize_name};
use crate::error::{Result, SyncError};
use crate::merge::{DestinationReader, FsReader};
use crate::model::ServerModel;
use crate::render::renderer_for;
use crate::transform::transform_for;

/// A destination requested by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentTarget {
    /// Agent name (matched case-insensitively).
    pub name: String,
    /// Replaces the agent's default config path when set.
    pub path_override: Option<String>,
    /// Servers to leave out of this destination.
    pub disabled_servers: Vec<String>,
}

impl AgentTarget {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path_override = Some(path.into());
        self
    }

    pub fn with_disabled_servers<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.disabled_servers = names.into_iter().map(Into::into).collect();
        self
    }

    fn dedupe_key(&self) -> (String, String) {
        let path = self.path_override.as_deref().unwrap_or_default().trim();
        (normalize_name(&self.name), path.to_string())
    }
}

/// Rendered content for one destination.
#[derive(Debug, Clone)]
pub struct AgentOutput {
    pub descriptor: AgentDescriptor,
    /// Full file content to write, managed part merged into existing content.
    pub content: String,
    /// Whether `content` differs from what the destination holds now.
    pub changed: bool,
}

/// A destination that could not be rendered.
#[derive(Debug)]
pub struct DestinationFailure {
    pub agent: String,
    /// Resolved destination path, if resolution got that far.
    pub path: Option<PathBuf>,
    pub error: SyncError,
}

/// Outcome of a sync run.
#[derive(Debug)]
pub struct SyncResult {
    /// Outputs keyed by agent name; one agent may have several destinations.
    pub agents: BTreeMap<String, Vec<AgentOutput>>,
    pub failures: Vec<DestinationFailure>,
    /// The untransformed input model.
    pub servers: ServerModel,
}

impl SyncResult {
    /// Every output in agent-name order.
    pub fn outputs(&self) -> impl Iterator<Item = &AgentOutput> {
        self.agents.values().flatten()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Renders a server model for a fixed set of destinations.
#[derive(Debug)]
pub struct Syncer<R = FsReader> {
    targets: Vec<AgentTarget>,
    ctx: AgentContext,
    reader: R,
}

impl Syncer<FsReader> {
    /// Create a syncer reading destinations from disk under the user's home.
    pub fn new(targets: impl IntoIterator<Item = AgentTarget>) -> Self {
        Self::with_reader(targets, AgentContext::from_env(), FsReader)
    }
}

impl<R: DestinationReader> Syncer<R> {
    /// Create a syncer with an explicit path context and destination reader.
    ///
    /// Targets are de-duplicated by normalized name and trimmed path; the
    /// first occurrence wins. Targets with an empty name are skipped.
    pub fn with_reader(
        targets: impl IntoIterator<Item = AgentTarget>,
        ctx: AgentContext,
        reader: R,
    ) -> Self {
        let mut seen = HashSet::new();
        let targets = targets
            .into_iter()
            .filter(|target| !normalize_name(&target.name).is_empty())
            .filter(|target| seen.insert(target.dedupe_key()))
            .collect();
        Self {
            targets,
            ctx,
            reader,
        }
    }

    pub fn targets(&self) -> &[AgentTarget] {
        &self.targets
    }

    /// Render `servers` for every destination.
    ///
    /// Only an empty model fails the whole run; per-destination errors are
    /// collected in [`SyncResult::failures`].
    pub fn sync(&self, servers: &ServerModel) -> Result<SyncResult> {
        if servers.is_empty() {
            return Err(SyncError::EmptyInput);
        }

        let mut agents: BTreeMap<String, Vec<AgentOutput>> = BTreeMap::new();
        let mut failures = Vec::new();

        for target in &self.targets {
            let agent = normalize_name(&target.name);
            match self.sync_target(target, servers) {
                Ok(output) => {
                    debug!(
                        agent = %agent,
                        path = %output.descriptor.file_path.display(),
                        changed = output.changed,
                        "rendered destination"
                    );
                    agents.entry(agent).or_default().push(output);
                }
                Err((path, error)) => {
                    warn!(agent = %agent, error = %error, "destination failed");
                    failures.push(DestinationFailure {
                        agent,
                        path,
                        error,
                    });
                }
            }
        }

        info!(
            servers = servers.len(),
            destinations = agents.values().map(Vec::len).sum::<usize>(),
            failures = failures.len(),
            "sync complete"
        );

        Ok(SyncResult {
            agents,
            failures,
            servers: servers.clone(),
        })
    }

    fn sync_target(
        &self,
        target: &AgentTarget,
        servers: &ServerModel,
    ) -> std::result::Result<AgentOutput, (Option<PathBuf>, SyncError)> {
        let descriptor =
            match AgentDescriptor::resolve(&target.name, target.path_override.as_deref(), &self.ctx) {
                Ok(descriptor) => descriptor,
                Err(err) => return Err((None, err)),
            };
        let path = descriptor.file_path.clone();
        self.render_destination(descriptor, target, servers)
            .map_err(|err| (Some(path), err))
    }

    fn render_destination(
        &self,
        descriptor: AgentDescriptor,
        target: &AgentTarget,
        servers: &ServerModel,
    ) -> Result<AgentOutput> {
        let mut model = servers.clone().without(&target.disabled_servers);
        let transform = transform_for(descriptor.agent);
        debug!(agent = %descriptor.agent, transform = transform.name(), "applying transform");
        transform.apply(&mut model)?;

        let existing = self.reader.read_lenient(&descriptor.file_path);
        let content = renderer_for(&descriptor).render_merged(existing.as_deref(), &model)?;

        let changed = existing.as_deref() != Some(content.as_str());
        Ok(AgentOutput {
            descriptor,
            content,
            changed,
        })
    }
}
