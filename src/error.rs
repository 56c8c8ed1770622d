//! Error types for the snapshot and diff engine.

use crate::types::Identity;
use thiserror::Error;

/// Failures reported by a node source while listing or resolving entries
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Entry not found: {0}")]
    NotFound(String),

    #[error("Not a directory: {0}")]
    NotADirectory(Identity),

    #[error("Block missing from store: {0}")]
    MissingBlock(Identity),

    #[error("Node source error: {0}")]
    Source(String),
}

/// Snapshot build and diff errors
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Lookup failed at /{path}: {source}")]
    LookupFailure {
        path: String,
        #[source]
        source: LookupError,
    },

    #[error("Inconsistent snapshot: {0}")]
    InconsistentSnapshot(String),
}

/// Errors from the in-memory content-addressed namespace
#[derive(Debug, Error)]
pub enum NamespaceError {
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Path not found: {0}")]
    NotFound(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("Is a directory: {0}")]
    IsADirectory(String),

    #[error("Cannot remove the root directory")]
    RemoveRoot,

    #[error("Lookup error: {0}")]
    Lookup(#[from] LookupError),
}

/// Top-level errors surfaced to binaries and configuration callers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("Namespace error: {0}")]
    Namespace(#[from] NamespaceError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Script error at line {line}: {message}")]
    Script { line: usize, message: String },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
