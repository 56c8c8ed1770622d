//! CLI parse: clap types for snapgraph. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// snapgraph CLI - snapshot and diff content-addressed hierarchies
#[derive(Parser)]
#[command(name = "snapgraph")]
#[command(about = "Snapshot and diff content-addressed hierarchies")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory (where config/ is looked up)
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay a mutation script and print what changed after each step
    Replay {
        /// Script file: one `mkdir`, `write` or `rm` command per line
        script: PathBuf,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
        /// Override build.lookup_concurrency
        #[arg(long)]
        lookup_concurrency: Option<usize>,
    },
    /// Print the effective configuration as TOML
    Config,
}
