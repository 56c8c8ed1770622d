//! Hash computation for namespace blocks using BLAKE3

use crate::types::{Hash, Identity};
use blake3::Hasher;
use std::collections::BTreeMap;

/// Compute the identity hash of a file block
///
/// id = hash("file" || size || content_hash)
///
/// Files carry no path, so equal content yields equal identity wherever the
/// file lives.
pub fn compute_file_id(content_hash: &Hash, size: u64) -> Hash {
    let mut hasher = Hasher::new();

    // Hash type discriminator
    hasher.update(b"file");

    // Hash size (8 bytes, big-endian for determinism)
    hasher.update(&size.to_be_bytes());

    hasher.update(content_hash);

    *hasher.finalize().as_bytes()
}

/// Compute the identity hash of a directory block
///
/// id = hash("directory" || created || entry_count || (name_len || name || child_id)*)
///
/// `created` is the directory's creation stamp, so two directories created
/// separately never share an identity even when both are empty. Entries come
/// from a sorted map, so the hash does not depend on insertion order.
pub fn compute_directory_id(entries: &BTreeMap<String, Identity>, created: u64) -> Hash {
    let mut hasher = Hasher::new();

    // Hash type discriminator
    hasher.update(b"directory");

    hasher.update(&created.to_be_bytes());

    // Hash entry count (8 bytes, big-endian)
    hasher.update(&(entries.len() as u64).to_be_bytes());

    for (name, child) in entries {
        hasher.update(&(name.len() as u64).to_be_bytes());
        hasher.update(name.as_bytes());
        hasher.update(b":");
        hasher.update(child.as_str().as_bytes());
    }

    *hasher.finalize().as_bytes()
}

/// Compute content hash for file bytes
pub fn compute_content_hash(content: &[u8]) -> Hash {
    let mut hasher = Hasher::new();
    hasher.update(content);
    *hasher.finalize().as_bytes()
}
