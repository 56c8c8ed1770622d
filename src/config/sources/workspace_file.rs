//! Workspace config files: config/config.toml, then config/{SNAPGRAPH_ENV}.toml

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment profile used when SNAPGRAPH_ENV is unset
const DEFAULT_PROFILE: &str = "development";

/// Existing workspace config files, lowest precedence first
pub fn workspace_config_paths(workspace_root: &Path) -> Vec<PathBuf> {
    let config_dir = workspace_root.join("config");
    let profile = std::env::var("SNAPGRAPH_ENV").unwrap_or_else(|_| DEFAULT_PROFILE.to_string());

    [
        config_dir.join("config.toml"),
        config_dir.join(format!("{}.toml", profile)),
    ]
    .into_iter()
    .filter(|path| path.is_file())
    .collect()
}

/// Layer every existing workspace config file onto the builder
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    workspace_root: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let paths = workspace_config_paths(workspace_root);
    if paths.is_empty() {
        debug!(
            workspace = %workspace_root.display(),
            "No workspace configuration files"
        );
    }

    Ok(paths.into_iter().fold(builder, |builder, path| {
        debug!(config_path = %path.display(), "Layering workspace configuration");
        builder.add_source(File::from(path))
    }))
}
