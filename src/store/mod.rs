//! Node Source
//!
//! The read-only directory capability the snapshot builder traverses. Storage,
//! link resolution and byte handling live behind this trait; the engine only
//! asks whether a node is a container, what it is called, and what it contains.

use crate::error::LookupError;
use crate::types::Identity;
use async_trait::async_trait;

/// Read-only access to a content-addressed hierarchy
///
/// Implementations are shared by reference across builds and must not be
/// mutated through this interface.
#[async_trait]
pub trait NodeSource: Send + Sync {
    /// Handle to one node (file or directory) in the hierarchy
    type Node: Clone + Send + Sync;

    /// Whether the node is a directory
    fn is_container(&self, node: &Self::Node) -> bool;

    /// Content-derived identity of the node
    fn identity(&self, node: &Self::Node) -> Identity;

    /// List entry names of a directory, in the source's listing order
    ///
    /// Only valid when `is_container` is true.
    async fn list_entry_names(&self, node: &Self::Node) -> Result<Vec<String>, LookupError>;

    /// Resolve a child of a directory by name
    async fn lookup_child(&self, node: &Self::Node, name: &str)
        -> Result<Self::Node, LookupError>;
}
