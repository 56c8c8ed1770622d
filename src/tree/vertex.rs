//! Vertex types

use crate::types::Identity;
use serde::{Deserialize, Serialize};

/// Name given to the synthetic root vertex
pub const ROOT_NAME: &str = "root";

/// Index of a vertex inside its snapshot's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VertexId(pub(crate) usize);

impl VertexId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One node (file or directory) as seen by a particular snapshot
#[derive(Debug, Clone)]
pub struct Vertex<N> {
    /// Entry name at this position (not a full path)
    pub name: String,
    /// Content-derived identity of the wrapped node
    pub identity: Identity,
    pub is_container: bool,
    /// Enclosing vertex; `None` only for the synthetic root
    pub parent: Option<VertexId>,
    /// Present for reference only; must not be drawn as a new element
    pub suppressed: bool,
    /// Handle to the underlying node
    pub node: N,
}

impl<N> Vertex<N> {
    pub fn new(
        name: impl Into<String>,
        identity: Identity,
        is_container: bool,
        parent: Option<VertexId>,
        node: N,
    ) -> Self {
        Self {
            name: name.into(),
            identity,
            is_container,
            parent,
            suppressed: false,
            node,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}
