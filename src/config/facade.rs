//! ConfigLoader: the entry point callers use to obtain a SnapgraphConfig.

use super::merge::service::MergeService;
use super::SnapgraphConfig;
use config::ConfigError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Merge defaults, global and workspace files, and environment overrides.
    pub fn load(workspace_root: &Path) -> Result<SnapgraphConfig, ConfigError> {
        MergeService::load(workspace_root)
    }

    /// Merge defaults, one explicit file and environment overrides.
    pub fn load_from_file(path: &Path) -> Result<SnapgraphConfig, ConfigError> {
        MergeService::load_from_file(path)
    }
}
