//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::{ApiError, SnapshotError};

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::Snapshot(SnapshotError::LookupFailure { path, source }) => {
            format!("Snapshot aborted: could not resolve /{} ({})", path, source)
        }
        other => other.to_string(),
    }
}
