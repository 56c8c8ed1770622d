//! In-Memory Content-Addressed Namespace
//!
//! A small immutable hierarchy backed by a block map keyed by identity. Every
//! mutation rebuilds the directories along the touched path and returns a new
//! root; untouched subtrees keep their identities. Directories carry a
//! creation stamp that survives rebuilds, files are identified by content
//! alone. Implements [`NodeSource`] so snapshots can be built from it.

pub mod hasher;
pub mod path;

use crate::error::{LookupError, NamespaceError};
use crate::store::NodeSource;
use crate::types::{Hash, Identity};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

/// Stored representation of one node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    File { content_hash: Hash, size: u64 },
    /// Entries sorted by name; values are child identities
    Directory {
        entries: BTreeMap<String, Identity>,
        created: u64,
    },
}

impl Block {
    fn identity(&self) -> Identity {
        let hash = match self {
            Block::File { content_hash, size } => hasher::compute_file_id(content_hash, *size),
            Block::Directory { entries, created } => hasher::compute_directory_id(entries, *created),
        };
        Identity::from_hash(&hash)
    }

    fn is_dir(&self) -> bool {
        matches!(self, Block::Directory { .. })
    }
}

/// Handle to a node stored in a [`MemoryStore`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemoryNode {
    identity: Identity,
    is_dir: bool,
}

impl MemoryNode {
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn is_dir(&self) -> bool {
        self.is_dir
    }
}

/// Block map keyed by identity
#[derive(Debug, Default)]
pub struct MemoryStore {
    blocks: RwLock<HashMap<Identity, Block>>,
    next_created: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a block and return a handle to it
    pub fn put(&self, block: Block) -> MemoryNode {
        let identity = block.identity();
        let is_dir = block.is_dir();
        self.blocks.write().entry(identity.clone()).or_insert(block);
        MemoryNode { identity, is_dir }
    }

    pub fn get(&self, identity: &Identity) -> Option<Block> {
        self.blocks.read().get(identity).cloned()
    }

    /// Drop a block; returns whether it was present
    pub fn evict(&self, identity: &Identity) -> bool {
        self.blocks.write().remove(identity).is_some()
    }

    pub fn len(&self) -> usize {
        self.blocks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.read().is_empty()
    }

    /// Store a new empty directory and return it as a root
    pub fn empty_root(&self) -> MemoryNode {
        self.new_directory()
    }

    fn new_directory(&self) -> MemoryNode {
        self.put(Block::Directory {
            entries: BTreeMap::new(),
            created: self.next_created.fetch_add(1, Ordering::Relaxed),
        })
    }

    /// Resolve an identity into a handle
    pub fn node(&self, identity: &Identity) -> Result<MemoryNode, LookupError> {
        self.blocks
            .read()
            .get(identity)
            .map(|block| MemoryNode {
                identity: identity.clone(),
                is_dir: block.is_dir(),
            })
            .ok_or_else(|| LookupError::MissingBlock(identity.clone()))
    }

    fn directory_of(
        &self,
        node: &MemoryNode,
    ) -> Result<(BTreeMap<String, Identity>, u64), LookupError> {
        match self.get(&node.identity) {
            Some(Block::Directory { entries, created }) => Ok((entries, created)),
            Some(Block::File { .. }) => Err(LookupError::NotADirectory(node.identity.clone())),
            None => Err(LookupError::MissingBlock(node.identity.clone())),
        }
    }

    fn entries_of(&self, node: &MemoryNode) -> Result<BTreeMap<String, Identity>, LookupError> {
        self.directory_of(node).map(|(entries, _)| entries)
    }

    /// Create a directory and any missing parents (`mkdir -p`)
    ///
    /// An existing directory at the path leaves the root unchanged.
    pub fn mkdir(&self, root: &MemoryNode, path: &str) -> Result<MemoryNode, NamespaceError> {
        let segments = path::parse_path(path)?;
        if segments.is_empty() {
            return Ok(root.clone());
        }
        trace!(path, "mkdir");
        self.rebuild(root, &segments, true, &|store, entries, name| {
            match entries.get(name) {
                Some(existing) => {
                    if store.node(existing)?.is_dir {
                        Ok(())
                    } else {
                        Err(NamespaceError::NotADirectory(path.to_string()))
                    }
                }
                None => {
                    let dir = store.new_directory();
                    entries.insert(name.to_string(), dir.identity);
                    Ok(())
                }
            }
        })
    }

    /// Write a file, creating missing parent directories
    pub fn write(
        &self,
        root: &MemoryNode,
        path: &str,
        content: &[u8],
    ) -> Result<MemoryNode, NamespaceError> {
        let segments = path::parse_path(path)?;
        if segments.is_empty() {
            return Err(NamespaceError::IsADirectory(path.to_string()));
        }
        trace!(path, size = content.len(), "write");
        self.rebuild(root, &segments, true, &|store, entries, name| {
            if let Some(existing) = entries.get(name) {
                if store.node(existing)?.is_dir {
                    return Err(NamespaceError::IsADirectory(path.to_string()));
                }
            }
            let file = store.put(Block::File {
                content_hash: hasher::compute_content_hash(content),
                size: content.len() as u64,
            });
            entries.insert(name.to_string(), file.identity);
            Ok(())
        })
    }

    /// Remove a file or directory
    pub fn rm(&self, root: &MemoryNode, path: &str) -> Result<MemoryNode, NamespaceError> {
        let segments = path::parse_path(path)?;
        if segments.is_empty() {
            return Err(NamespaceError::RemoveRoot);
        }
        trace!(path, "rm");
        self.rebuild(root, &segments, false, &|_, entries, name| {
            entries
                .remove(name)
                .map(|_| ())
                .ok_or_else(|| NamespaceError::NotFound(path.to_string()))
        })
    }

    /// Entry names of the directory at `path`
    pub fn ls(&self, root: &MemoryNode, path: &str) -> Result<Vec<String>, NamespaceError> {
        let segments = path::parse_path(path)?;
        let mut node = root.clone();
        for segment in &segments {
            let entries = self.entries_of(&node)?;
            let child = entries
                .get(segment)
                .ok_or_else(|| NamespaceError::NotFound(path::display_path(&segments)))?;
            node = self.node(child)?;
        }
        if !node.is_dir {
            return Err(NamespaceError::NotADirectory(path::display_path(&segments)));
        }
        Ok(self.entries_of(&node)?.into_keys().collect())
    }

    /// Copy-on-write update along `segments`
    ///
    /// Descends to the parent of the last segment, lets `leaf` edit that
    /// directory's entries, then stores every directory on the way back up.
    fn rebuild(
        &self,
        dir: &MemoryNode,
        segments: &[String],
        create_missing: bool,
        leaf: &dyn Fn(&Self, &mut BTreeMap<String, Identity>, &str) -> Result<(), NamespaceError>,
    ) -> Result<MemoryNode, NamespaceError> {
        let (mut entries, created) = self.directory_of(dir)?;

        match segments {
            [] => return Err(NamespaceError::InvalidPath("empty path".to_string())),
            [name] => leaf(self, &mut entries, name)?,
            [head, rest @ ..] => {
                let child = match entries.get(head) {
                    Some(id) => self.node(id)?,
                    None if create_missing => self.new_directory(),
                    None => return Err(NamespaceError::NotFound(head.clone())),
                };
                if !child.is_dir {
                    return Err(NamespaceError::NotADirectory(head.clone()));
                }
                let updated = self.rebuild(&child, rest, create_missing, leaf)?;
                entries.insert(head.clone(), updated.identity);
            }
        }

        Ok(self.put(Block::Directory { entries, created }))
    }
}

#[async_trait]
impl NodeSource for MemoryStore {
    type Node = MemoryNode;

    fn is_container(&self, node: &MemoryNode) -> bool {
        node.is_dir
    }

    fn identity(&self, node: &MemoryNode) -> Identity {
        node.identity.clone()
    }

    async fn list_entry_names(&self, node: &MemoryNode) -> Result<Vec<String>, LookupError> {
        Ok(self.entries_of(node)?.into_keys().collect())
    }

    async fn lookup_child(&self, node: &MemoryNode, name: &str) -> Result<MemoryNode, LookupError> {
        let entries = self.entries_of(node)?;
        let child = entries
            .get(name)
            .ok_or_else(|| LookupError::NotFound(name.to_string()))?;
        self.node(child)
    }
}
