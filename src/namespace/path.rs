//! Path parsing and normalization for namespace operations

use crate::error::NamespaceError;
use unicode_normalization::UnicodeNormalization;

/// Split a `/`-separated path into NFC-normalized segments
///
/// A leading slash and one trailing slash are accepted. `/` alone yields no
/// segments (the root). Empty, `.` and `..` segments are rejected.
pub fn parse_path(path: &str) -> Result<Vec<String>, NamespaceError> {
    let trimmed = path.trim();
    let trimmed = trimmed.strip_prefix('/').unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);

    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    trimmed
        .split('/')
        .map(|segment| {
            let normalized: String = segment.nfc().collect();
            match normalized.as_str() {
                "" => Err(NamespaceError::InvalidPath(format!(
                    "empty segment in {:?}",
                    path
                ))),
                "." | ".." => Err(NamespaceError::InvalidPath(format!(
                    "relative segment {:?} in {:?}",
                    normalized, path
                ))),
                _ => Ok(normalized),
            }
        })
        .collect()
}

/// Render segments back into an absolute path string
pub fn display_path(segments: &[String]) -> String {
    format!("/{}", segments.join("/"))
}
