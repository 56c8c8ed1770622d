//! Leveled snapshot structure
//!
//! A snapshot owns its vertices in an arena; levels and sibling groups refer to
//! them by `VertexId`, and parent links are arena indices rather than owning
//! edges.

use crate::error::SnapshotError;
use crate::tree::vertex::{Vertex, VertexId};
use crate::types::Identity;
use serde::{Deserialize, Serialize};

/// Vertices sharing one parent within a level
pub type SiblingGroup = Vec<VertexId>;

/// All sibling groups at one depth
pub type Level = Vec<SiblingGroup>;

/// Parent-to-child edge between two vertices, keyed by identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub parent: Identity,
    pub child: Identity,
    /// Child is suppressed; draw the edge as a reference to an existing element
    pub reference: bool,
}

/// Point-in-time leveled view of a hierarchy
#[derive(Debug, Clone)]
pub struct Snapshot<N> {
    root: N,
    vertices: Vec<Vertex<N>>,
    levels: Vec<Level>,
    pruned: bool,
}

impl<N> Snapshot<N> {
    /// Start a snapshot holding only the synthetic root at level 0
    pub(crate) fn with_root(root_vertex: Vertex<N>, root: N) -> Self {
        Self {
            root,
            vertices: vec![root_vertex],
            levels: vec![vec![vec![VertexId(0)]]],
            pruned: false,
        }
    }

    /// Assemble a diff result that shares the current snapshot's arena
    pub(crate) fn pruned(root: N, vertices: Vec<Vertex<N>>, levels: Vec<Level>) -> Self {
        Self {
            root,
            vertices,
            levels,
            pruned: true,
        }
    }

    /// Assemble a snapshot from raw parts
    ///
    /// Only index bounds are checked here; structural invariants are checked by
    /// [`Snapshot::validate`], which the diff engine runs on both inputs.
    pub fn from_parts(
        root: N,
        vertices: Vec<Vertex<N>>,
        levels: Vec<Level>,
    ) -> Result<Self, SnapshotError> {
        let len = vertices.len();
        for vertex in &vertices {
            if let Some(parent) = vertex.parent {
                if parent.0 >= len {
                    return Err(SnapshotError::InconsistentSnapshot(format!(
                        "vertex '{}' points at missing parent {}",
                        vertex.name, parent.0
                    )));
                }
            }
        }
        if let Some(id) = levels.iter().flatten().flatten().find(|id| id.0 >= len) {
            return Err(SnapshotError::InconsistentSnapshot(format!(
                "level references missing vertex {}",
                id.0
            )));
        }

        Ok(Self {
            root,
            vertices,
            levels,
            pruned: false,
        })
    }

    pub(crate) fn push_vertex(&mut self, vertex: Vertex<N>) -> VertexId {
        self.vertices.push(vertex);
        VertexId(self.vertices.len() - 1)
    }

    pub(crate) fn push_level(&mut self, level: Level) {
        self.levels.push(level);
    }

    pub(crate) fn arena(&self) -> &[Vertex<N>] {
        &self.vertices
    }

    /// Handle of the node this snapshot was built from
    pub fn root(&self) -> &N {
        &self.root
    }

    /// The vertex at level 0, if the snapshot has one
    pub fn root_vertex(&self) -> Option<&Vertex<N>> {
        let id = self.levels.first()?.first()?.first()?;
        self.vertex(*id)
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Number of vertices reachable through the levels
    pub fn len(&self) -> usize {
        self.levels.iter().flatten().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether this snapshot is the output of a diff
    pub fn is_pruned(&self) -> bool {
        self.pruned
    }

    pub fn vertex(&self, id: VertexId) -> Option<&Vertex<N>> {
        self.vertices.get(id.0)
    }

    /// Vertices in level order, then sibling-group order, then listing order
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &Vertex<N>)> + '_ {
        self.levels
            .iter()
            .flatten()
            .flatten()
            .filter_map(move |id| self.vertex(*id).map(|v| (*id, v)))
    }

    /// First vertex in level order carrying the given identity
    pub fn find_by_identity(&self, identity: &Identity) -> Option<VertexId> {
        self.vertices()
            .find(|(_, v)| &v.identity == identity)
            .map(|(id, _)| id)
    }

    /// Identity of a vertex's parent
    pub fn parent_identity(&self, id: VertexId) -> Option<&Identity> {
        let parent = self.vertex(id)?.parent?;
        self.vertex(parent).map(|p| &p.identity)
    }

    /// Entry names from the root down to the vertex (root excluded)
    pub fn path_of(&self, id: VertexId) -> Vec<String> {
        let mut path = Vec::new();
        let mut current = self.vertex(id);
        let mut hops = 0;
        while let Some(vertex) = current {
            let Some(parent) = vertex.parent else { break };
            path.push(vertex.name.clone());
            current = self.vertex(parent);
            hops += 1;
            if hops > self.vertices.len() {
                break;
            }
        }
        path.reverse();
        path
    }

    /// Number of ancestor hops from the vertex to the root
    pub fn depth_of(&self, id: VertexId) -> usize {
        self.ancestor_hops(id).unwrap_or(usize::MAX)
    }

    fn ancestor_hops(&self, id: VertexId) -> Option<usize> {
        let mut hops = 0;
        let mut current = self.vertex(id)?;
        while let Some(parent) = current.parent {
            hops += 1;
            // More hops than vertices means the parent chain cycles
            if hops > self.vertices.len() {
                return None;
            }
            current = self.vertex(parent)?;
        }
        Some(hops)
    }

    /// Parent-to-child edges for every vertex that has a parent
    pub fn connections(&self) -> Vec<Connection> {
        self.vertices()
            .filter_map(|(id, vertex)| {
                self.parent_identity(id).map(|parent| Connection {
                    parent: parent.clone(),
                    child: vertex.identity.clone(),
                    reference: vertex.suppressed,
                })
            })
            .collect()
    }

    pub fn suppressed_count(&self) -> usize {
        self.vertices().filter(|(_, v)| v.suppressed).count()
    }

    /// Check the leveled-tree invariants
    ///
    /// Level 0 holds exactly one sibling group with exactly one parentless
    /// vertex, every other vertex sits one level below its parent, siblings
    /// share a parent, and no vertex appears twice.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        let inconsistent = |msg: String| Err(SnapshotError::InconsistentSnapshot(msg));

        let Some(first) = self.levels.first() else {
            return inconsistent("snapshot has no levels".to_string());
        };
        if first.len() != 1 || first[0].len() != 1 {
            return inconsistent(format!(
                "level 0 must hold exactly one root vertex, found {} group(s) with {} vertex(es)",
                first.len(),
                first.iter().map(Vec::len).sum::<usize>()
            ));
        }
        match self.vertex(first[0][0]) {
            Some(root) if root.parent.is_none() => {}
            Some(root) => {
                return inconsistent(format!("root vertex '{}' has a parent", root.name));
            }
            None => return inconsistent("root vertex is missing".to_string()),
        }

        let mut seen = vec![false; self.vertices.len()];
        for (depth, level) in self.levels.iter().enumerate() {
            for group in level {
                if group.is_empty() {
                    return inconsistent(format!("empty sibling group at level {}", depth));
                }
                let mut group_parent = None;
                for (position, id) in group.iter().enumerate() {
                    let Some(vertex) = self.vertex(*id) else {
                        return inconsistent(format!("level {} references missing vertex", depth));
                    };
                    if std::mem::replace(&mut seen[id.0], true) {
                        return inconsistent(format!("vertex '{}' appears twice", vertex.name));
                    }
                    if position == 0 {
                        group_parent = vertex.parent;
                    } else if vertex.parent != group_parent {
                        return inconsistent(format!(
                            "vertex '{}' does not share its sibling group's parent",
                            vertex.name
                        ));
                    }
                    match self.ancestor_hops(*id) {
                        Some(hops) if hops == depth => {}
                        Some(hops) => {
                            return inconsistent(format!(
                                "vertex '{}' is at level {} but {} hop(s) from the root",
                                vertex.name, depth, hops
                            ));
                        }
                        None => {
                            return inconsistent(format!(
                                "vertex '{}' has a broken or cyclic parent chain",
                                vertex.name
                            ));
                        }
                    }
                }
            }
        }

        Ok(())
    }
}
