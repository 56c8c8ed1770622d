//! Integration tests for Configuration System

use snapgraph::cli::RunContext;
use snapgraph::config::{ConfigLoader, SnapgraphConfig};
use snapgraph::error::ApiError;
use tempfile::TempDir;

fn write_workspace_config(temp_dir: &TempDir, name: &str, body: &str) {
    let config_dir = temp_dir.path().join("config");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join(name), body).unwrap();
}

#[test]
fn test_workspace_without_config_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config = ConfigLoader::load(temp_dir.path()).unwrap();
    assert_eq!(config.build, SnapgraphConfig::default().build);
}

#[test]
fn test_workspace_config_file_is_loaded() {
    let temp_dir = TempDir::new().unwrap();
    write_workspace_config(
        &temp_dir,
        "config.toml",
        r#"
[build]
lookup_concurrency = 3

[logging]
level = "warn"
"#,
    );

    let config = ConfigLoader::load(temp_dir.path()).unwrap();
    assert_eq!(config.build.lookup_concurrency, 3);
    assert_eq!(config.logging.level, "warn");
    assert_eq!(config.logging.format, "text");
}

#[test]
fn test_environment_file_overrides_base() {
    let temp_dir = TempDir::new().unwrap();
    write_workspace_config(
        &temp_dir,
        "config.toml",
        "[build]\nlookup_concurrency = 3\n",
    );
    write_workspace_config(
        &temp_dir,
        "development.toml",
        "[build]\nlookup_concurrency = 6\n",
    );

    let config = ConfigLoader::load(temp_dir.path()).unwrap();
    assert_eq!(config.build.lookup_concurrency, 6);
}

#[test]
fn test_run_context_rejects_invalid_config() {
    let temp_dir = TempDir::new().unwrap();
    write_workspace_config(
        &temp_dir,
        "config.toml",
        "[build]\nlookup_concurrency = 0\n",
    );

    match RunContext::new(temp_dir.path().to_path_buf(), None) {
        Err(ApiError::ConfigError(msg)) => assert!(msg.contains("lookup_concurrency")),
        other => panic!("expected config error, got {:?}", other.is_ok()),
    }
}

#[test]
fn test_run_context_with_explicit_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("custom.toml");
    std::fs::write(&config_file, "[logging]\noutput = \"stdout\"\n").unwrap();

    let context = RunContext::new(temp_dir.path().to_path_buf(), Some(config_file)).unwrap();
    assert_eq!(context.config().logging.output, "stdout");
    assert_eq!(context.config().build.lookup_concurrency, 1);
}

#[test]
fn test_malformed_config_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("broken.toml");
    std::fs::write(&config_file, "[build\nlookup_concurrency = ").unwrap();

    assert!(ConfigLoader::load_from_file(&config_file).is_err());
}
