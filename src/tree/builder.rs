//! Snapshot builder: breadth-first materialization of a hierarchy

use crate::error::SnapshotError;
use crate::store::NodeSource;
use crate::tree::snapshot::{Level, Snapshot};
use crate::tree::vertex::{Vertex, VertexId, ROOT_NAME};
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, error, info, instrument, trace};

/// Snapshot build configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Maximum number of listings/lookups in flight at any time
    ///
    /// 1 keeps the traversal strictly sequential. Larger values overlap
    /// independent lookups; listing order is preserved either way.
    #[serde(default = "default_lookup_concurrency")]
    pub lookup_concurrency: usize,
}

fn default_lookup_concurrency() -> usize {
    1
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            lookup_concurrency: default_lookup_concurrency(),
        }
    }
}

impl BuildConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.lookup_concurrency == 0 {
            return Err("lookup_concurrency must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Builds snapshots by level-order traversal of a node source
pub struct SnapshotBuilder<'a, S: NodeSource> {
    source: &'a S,
    config: BuildConfig,
}

impl<'a, S: NodeSource> SnapshotBuilder<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            config: BuildConfig::default(),
        }
    }

    pub fn with_config(mut self, config: BuildConfig) -> Self {
        self.config = config;
        self
    }

    /// Materialize the full hierarchy under `root`
    ///
    /// Each pass expands every container of the newest level into one sibling
    /// group per container; the build ends on the first pass that yields no
    /// groups. Any listing or lookup failure aborts the whole build.
    #[instrument(skip_all, fields(root = %self.source.identity(&root)))]
    pub async fn build(&self, root: S::Node) -> Result<Snapshot<S::Node>, SnapshotError> {
        let start = Instant::now();
        info!("Starting snapshot build");

        let root_vertex = Vertex::new(
            ROOT_NAME,
            self.source.identity(&root),
            self.source.is_container(&root),
            None,
            root.clone(),
        );
        let mut snapshot = Snapshot::with_root(root_vertex, root);
        let mut frontier = vec![VertexId(0)];
        let concurrency = self.config.lookup_concurrency.max(1);

        loop {
            let resolved = match self.expand_level(&snapshot, &frontier, concurrency).await {
                Ok(resolved) => resolved,
                Err(e) => {
                    error!("Snapshot build failed: {}", e);
                    return Err(e);
                }
            };

            // Children arrive in frontier order, so each parent's run is contiguous
            let mut level: Level = Vec::new();
            let mut last_parent = None;
            for (parent, name, node) in resolved {
                let vertex = Vertex::new(
                    name,
                    self.source.identity(&node),
                    self.source.is_container(&node),
                    Some(parent),
                    node,
                );
                let id = snapshot.push_vertex(vertex);
                match level.last_mut() {
                    Some(group) if last_parent == Some(parent) => group.push(id),
                    _ => level.push(vec![id]),
                }
                last_parent = Some(parent);
            }

            if level.is_empty() {
                break;
            }

            debug!(
                level = snapshot.level_count(),
                groups = level.len(),
                vertices = level.iter().map(Vec::len).sum::<usize>(),
                "Expanded level"
            );
            frontier = level.iter().flatten().copied().collect();
            snapshot.push_level(level);
        }

        info!(
            vertex_count = snapshot.len(),
            level_count = snapshot.level_count(),
            duration_ms = start.elapsed().as_millis(),
            "Snapshot build completed"
        );

        Ok(snapshot)
    }

    /// List and resolve the children of every frontier container
    ///
    /// Listings run as one bounded stream, then every `(parent, name)` pair of
    /// the level runs as a second one, so at most `concurrency` source calls
    /// are in flight at any time. Results keep frontier and listing order.
    async fn expand_level(
        &self,
        snapshot: &Snapshot<S::Node>,
        frontier: &[VertexId],
        concurrency: usize,
    ) -> Result<Vec<(VertexId, String, S::Node)>, SnapshotError> {
        let containers: Vec<VertexId> = frontier
            .iter()
            .copied()
            .filter(|id| snapshot.arena()[id.index()].is_container)
            .collect();

        let listings: Vec<Vec<String>> = stream::iter(containers.iter().copied())
            .map(|id| self.list(snapshot, id))
            .buffered(concurrency)
            .try_collect()
            .await?;

        let pairs = containers
            .iter()
            .zip(listings)
            .flat_map(|(parent, names)| names.into_iter().map(move |name| (*parent, name)));

        stream::iter(pairs)
            .map(|(parent, name)| self.resolve(snapshot, parent, name))
            .buffered(concurrency)
            .try_collect()
            .await
    }

    async fn list(
        &self,
        snapshot: &Snapshot<S::Node>,
        id: VertexId,
    ) -> Result<Vec<String>, SnapshotError> {
        let node = &snapshot.arena()[id.index()].node;
        let names = self.source.list_entry_names(node).await.map_err(|source| {
            SnapshotError::LookupFailure {
                path: snapshot.path_of(id).join("/"),
                source,
            }
        })?;
        trace!(path = %snapshot.path_of(id).join("/"), entries = names.len(), "Listed directory");
        Ok(names)
    }

    async fn resolve(
        &self,
        snapshot: &Snapshot<S::Node>,
        parent: VertexId,
        name: String,
    ) -> Result<(VertexId, String, S::Node), SnapshotError> {
        let node = &snapshot.arena()[parent.index()].node;
        match self.source.lookup_child(node, &name).await {
            Ok(child) => Ok((parent, name, child)),
            Err(source) => {
                let mut path = snapshot.path_of(parent);
                path.push(name);
                Err(SnapshotError::LookupFailure {
                    path: path.join("/"),
                    source,
                })
            }
        }
    }
}

/// Build a snapshot of the hierarchy under `root` with default settings
pub async fn build_snapshot<S: NodeSource>(
    root: S::Node,
    source: &S,
) -> Result<Snapshot<S::Node>, SnapshotError> {
    SnapshotBuilder::new(source).build(root).await
}
