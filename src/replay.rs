//! Mutation Replay
//!
//! Drives an in-memory namespace through a sequence of mutations and reports,
//! after each one, which vertices a renderer would need to redraw.

use crate::error::{ApiError, NamespaceError};
use crate::namespace::{MemoryNode, MemoryStore};
use crate::tree::{diff_snapshots, BuildConfig, Snapshot, SnapshotBuilder};
use crate::types::Identity;
use std::fmt;
use tracing::{info, instrument};

/// One change to the namespace
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Create a directory and missing parents
    Mkdir { path: String },
    /// Write a file, creating missing parents
    Write { path: String, content: String },
    /// Remove a file or directory
    Rm { path: String },
}

impl Mutation {
    /// Apply to `root`, returning the new root
    pub fn apply(&self, store: &MemoryStore, root: &MemoryNode) -> Result<MemoryNode, NamespaceError> {
        match self {
            Mutation::Mkdir { path } => store.mkdir(root, path),
            Mutation::Write { path, content } => store.write(root, path, content.as_bytes()),
            Mutation::Rm { path } => store.rm(root, path),
        }
    }
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mutation::Mkdir { path } => write!(f, "mkdir -p {}", path),
            Mutation::Write { path, .. } => write!(f, "echo '...' >> {}", path),
            Mutation::Rm { path } => write!(f, "rm {}", path),
        }
    }
}

/// Parse a replay script
///
/// One command per line: `mkdir <path>`, `write <path> [content...]` or
/// `rm <path>`. Blank lines and lines starting with `#` are skipped.
pub fn parse_script(source: &str) -> Result<Vec<Mutation>, ApiError> {
    let mut mutations = Vec::new();

    for (index, raw) in source.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let script_error = |message: String| ApiError::Script {
            line: index + 1,
            message,
        };

        let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let (path, content) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
        if path.is_empty() {
            return Err(script_error(format!("'{}' needs a path", command)));
        }
        let path = path.to_string();

        let mutation = match command {
            "mkdir" => Mutation::Mkdir { path },
            "write" => Mutation::Write {
                path,
                content: content.trim().to_string(),
            },
            "rm" => Mutation::Rm { path },
            other => return Err(script_error(format!("unknown command '{}'", other))),
        };
        if !matches!(mutation, Mutation::Write { .. }) && !content.trim().is_empty() {
            return Err(script_error(format!("unexpected arguments after '{}'", rest)));
        }
        mutations.push(mutation);
    }

    Ok(mutations)
}

/// Outcome of one replay step
#[derive(Debug, Clone)]
pub struct StepReport {
    /// Human-readable form of the command that produced this step
    pub command: String,
    /// Root identity after the step
    pub root: Identity,
    /// Vertices to redraw; `None` when the root did not change
    pub changes: Option<Snapshot<MemoryNode>>,
}

/// Replay state: a namespace, its current root and the last full snapshot
pub struct ReplaySession {
    store: MemoryStore,
    root: MemoryNode,
    previous: Option<Snapshot<MemoryNode>>,
    config: BuildConfig,
}

impl ReplaySession {
    /// Start from an empty root directory
    pub fn new(config: BuildConfig) -> Self {
        let store = MemoryStore::new();
        let root = store.empty_root();
        Self {
            store,
            root,
            previous: None,
            config,
        }
    }

    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    pub fn root(&self) -> &MemoryNode {
        &self.root
    }

    /// Last full snapshot taken
    pub fn previous(&self) -> Option<&Snapshot<MemoryNode>> {
        self.previous.as_ref()
    }

    /// Snapshot the current root without mutating
    ///
    /// The first snapshot is reported in full; later ones as a diff.
    pub async fn snapshot(&mut self, command: impl Into<String>) -> Result<StepReport, ApiError> {
        self.advance(self.root.clone(), command.into()).await
    }

    /// Apply one mutation and report what changed
    ///
    /// A failed mutation or snapshot build leaves the session untouched.
    #[instrument(skip(self), fields(command = %mutation))]
    pub async fn apply(&mut self, mutation: &Mutation) -> Result<StepReport, ApiError> {
        let root = mutation.apply(&self.store, &self.root)?;
        let report = self.advance(root, mutation.to_string()).await?;
        info!(root = %report.root, "Applied mutation");
        Ok(report)
    }

    /// Build and diff `root`, committing it only when both succeed
    async fn advance(&mut self, root: MemoryNode, command: String) -> Result<StepReport, ApiError> {
        let snapshot = SnapshotBuilder::new(&self.store)
            .with_config(self.config.clone())
            .build(root.clone())
            .await?;

        let changes = match &self.previous {
            Some(previous) => diff_snapshots(&snapshot, previous)?,
            None => Some(snapshot.clone()),
        };
        self.previous = Some(snapshot);

        let report = StepReport {
            command,
            root: root.identity().clone(),
            changes,
        };
        self.root = root;
        Ok(report)
    }

    /// Apply every mutation in order
    pub async fn run(&mut self, mutations: &[Mutation]) -> Result<Vec<StepReport>, ApiError> {
        let mut reports = Vec::with_capacity(mutations.len());
        for mutation in mutations {
            reports.push(self.apply(mutation).await?);
        }
        Ok(reports)
    }
}
