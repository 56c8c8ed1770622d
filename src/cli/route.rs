//! CLI route: single route table and run context. Dispatches to domain services and presentation.

use crate::config::{ConfigLoader, SnapgraphConfig};
use crate::error::ApiError;
use crate::replay::{parse_script, ReplaySession};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::cli::parse::Commands;
use crate::cli::presentation::{format_steps_json, format_steps_text};

/// Runtime context for CLI execution: workspace and loaded configuration.
pub struct RunContext {
    workspace_root: PathBuf,
    config: SnapgraphConfig,
}

impl RunContext {
    /// Create run context from workspace root and optional config path. Uses ConfigLoader only.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = match config_path {
            Some(ref cfg_path) => ConfigLoader::load_from_file(cfg_path)?,
            None => ConfigLoader::load(&workspace_root)?,
        };

        Ok(Self {
            workspace_root,
            config: config.validated()?,
        })
    }

    /// Create run context from an already loaded configuration
    pub fn with_config(workspace_root: PathBuf, config: SnapgraphConfig) -> Result<Self, ApiError> {
        Ok(Self {
            workspace_root,
            config: config.validated()?,
        })
    }

    pub fn config(&self) -> &SnapgraphConfig {
        &self.config
    }

    /// Execute a command and return its rendered output
    pub async fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Replay {
                script,
                format,
                lookup_concurrency,
            } => {
                self.replay(script, format, *lookup_concurrency).await
            }
            Commands::Config => self.config.to_toml_string(),
        }
    }

    async fn replay(
        &self,
        script: &Path,
        format: &str,
        lookup_concurrency: Option<usize>,
    ) -> Result<String, ApiError> {
        if format != "text" && format != "json" {
            return Err(ApiError::InvalidArgument(format!(
                "Invalid output format: {} (must be 'text' or 'json')",
                format
            )));
        }

        let mut build = self.config.build.clone();
        if let Some(concurrency) = lookup_concurrency {
            build.lookup_concurrency = concurrency;
        }
        build.validate().map_err(ApiError::InvalidArgument)?;

        let script_path = if script.is_absolute() {
            script.to_path_buf()
        } else {
            self.workspace_root.join(script)
        };
        let source = std::fs::read_to_string(&script_path)?;
        let mutations = parse_script(&source)?;
        info!(script = %script_path.display(), steps = mutations.len(), "Replaying script");

        let mut session = ReplaySession::new(build);
        let reports = session.run(&mutations).await?;

        if format == "json" {
            format_steps_json(&reports)
        } else {
            Ok(format_steps_text(&reports, std::io::stdout().is_terminal()))
        }
    }
}
