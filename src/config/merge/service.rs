//! MergeService: layers sources over the defaults and deserializes a SnapgraphConfig.

use crate::config::sources::{environment, global_file, workspace_file};
use crate::config::SnapgraphConfig;
use config::{ConfigBuilder, ConfigError, File};
use config::builder::DefaultState;
use std::path::Path;
use tracing::debug;

use super::merge_policy;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Defaults, then global file, workspace files and environment (highest).
    pub fn load(workspace_root: &Path) -> Result<SnapgraphConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        Self::finish(environment::add_to_builder(builder)?)
    }

    /// Defaults, then `path` (required) and environment.
    pub fn load_from_file(path: &Path) -> Result<SnapgraphConfig, ConfigError> {
        debug!(config_path = %path.display(), "Loading explicit configuration file");
        let builder = merge_policy::builder_with_defaults()?.add_source(File::from(path));
        Self::finish(environment::add_to_builder(builder)?)
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<SnapgraphConfig, ConfigError> {
        let config: SnapgraphConfig = builder.build()?.try_deserialize()?;
        debug!(
            lookup_concurrency = config.build.lookup_concurrency,
            log_level = %config.logging.level,
            "Configuration merged"
        );
        Ok(config)
    }
}
