//! Diff engine: prune a snapshot down to the vertices that diverge from a
//! previous snapshot.
//!
//! Identities are content-derived, so equal identity implies an identical
//! subtree. Matching is by identity alone; a matched vertex is kept only when
//! its parent identity changed, and then only as a suppressed reference.

use crate::error::SnapshotError;
use crate::tree::snapshot::{Level, Snapshot};
use crate::tree::vertex::VertexId;
use crate::types::Identity;
use std::collections::HashMap;
use tracing::{debug, info};

/// How one current vertex relates to the previous snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Divergence {
    /// Identity absent from the previous snapshot
    Introduced,
    /// Identity present, but under a different parent
    Relocated,
    /// Identity present under the same parent
    Unchanged,
}

/// Identity -> parent identity over every vertex of a snapshot
///
/// Built in level order; the first vertex seen for an identity wins.
struct HistoryIndex<'a> {
    parents: HashMap<&'a Identity, Option<&'a Identity>>,
}

impl<'a> HistoryIndex<'a> {
    fn from_snapshot<N>(snapshot: &'a Snapshot<N>) -> Self {
        let mut parents = HashMap::with_capacity(snapshot.len());
        for (id, vertex) in snapshot.vertices() {
            parents
                .entry(&vertex.identity)
                .or_insert_with(|| snapshot.parent_identity(id));
        }
        Self { parents }
    }

    fn classify(&self, identity: &Identity, parent: Option<&Identity>) -> Divergence {
        match self.parents.get(identity) {
            None => Divergence::Introduced,
            Some(previous_parent) if *previous_parent != parent => Divergence::Relocated,
            Some(_) => Divergence::Unchanged,
        }
    }
}

/// Compute the divergent subset of `current` relative to `previous`
///
/// Returns `Ok(None)` when both snapshots are rooted at the same identity.
/// Otherwise returns a pruned snapshot that keeps the current root handle and
/// only the introduced and relocated vertices; relocated ones are marked
/// suppressed. Empty sibling groups and levels are dropped.
pub fn diff_snapshots<N: Clone>(
    current: &Snapshot<N>,
    previous: &Snapshot<N>,
) -> Result<Option<Snapshot<N>>, SnapshotError> {
    check_input("current", current)?;
    check_input("previous", previous)?;

    let current_root = root_identity(current)?;
    let previous_root = root_identity(previous)?;
    if current_root == previous_root {
        debug!(root = %current_root, "Roots share identity, nothing to diff");
        return Ok(None);
    }

    let history = HistoryIndex::from_snapshot(previous);
    let mut vertices = current.arena().to_vec();
    let mut levels: Vec<Level> = Vec::new();
    let (mut introduced, mut relocated) = (0usize, 0usize);

    for level in current.levels() {
        let mut kept_level: Level = Vec::new();
        for group in level {
            let mut kept: Vec<VertexId> = Vec::new();
            for &id in group {
                let vertex = &vertices[id.index()];
                match history.classify(&vertex.identity, current.parent_identity(id)) {
                    Divergence::Introduced => {
                        introduced += 1;
                        kept.push(id);
                    }
                    Divergence::Relocated => {
                        relocated += 1;
                        vertices[id.index()].suppressed = true;
                        kept.push(id);
                    }
                    Divergence::Unchanged => {}
                }
            }
            if !kept.is_empty() {
                kept_level.push(kept);
            }
        }
        if !kept_level.is_empty() {
            levels.push(kept_level);
        }
    }

    info!(
        current_root = %current_root,
        previous_root = %previous_root,
        introduced,
        relocated,
        dropped = current.len() - introduced - relocated,
        "Snapshot diff completed"
    );

    Ok(Some(Snapshot::pruned(current.root().clone(), vertices, levels)))
}

fn check_input<N>(role: &str, snapshot: &Snapshot<N>) -> Result<(), SnapshotError> {
    if snapshot.is_pruned() {
        return Err(SnapshotError::InconsistentSnapshot(format!(
            "{} snapshot is a diff result, not a full snapshot",
            role
        )));
    }
    snapshot.validate().map_err(|e| match e {
        SnapshotError::InconsistentSnapshot(msg) => {
            SnapshotError::InconsistentSnapshot(format!("{} snapshot: {}", role, msg))
        }
        other => other,
    })
}

fn root_identity<N>(snapshot: &Snapshot<N>) -> Result<&Identity, SnapshotError> {
    snapshot
        .root_vertex()
        .map(|v| &v.identity)
        .ok_or_else(|| SnapshotError::InconsistentSnapshot("snapshot has no root".to_string()))
}
