//! Integration tests for mutation replay through the library and the CLI route

use snapgraph::cli::{Commands, RunContext};
use snapgraph::config::SnapgraphConfig;
use snapgraph::error::ApiError;
use snapgraph::replay::{parse_script, ReplaySession};
use snapgraph::tree::BuildConfig;
use std::path::PathBuf;
use tempfile::TempDir;

const SCRIPT: &str = r#"
# pictures first
mkdir /pictures/cats
write /pictures/cats/kitten.png soft fur
mkdir /pictures/cats
mkdir /videos/dogs
write /videos/dogs/puppy.mp4 tail wagging
rm /pictures/cats/kitten.png
"#;

#[tokio::test]
async fn test_replay_reports_each_step() {
    let mutations = parse_script(SCRIPT).unwrap();
    let mut session = ReplaySession::new(BuildConfig::default());
    let reports = session.run(&mutations).await.unwrap();

    assert_eq!(reports.len(), 6);
    assert_eq!(reports[0].command, "mkdir -p /pictures/cats");
    assert_eq!(reports[1].command, "echo '...' >> /pictures/cats/kitten.png");

    // First step is a full snapshot
    let first = reports[0].changes.as_ref().unwrap();
    assert!(!first.is_pruned());
    assert_eq!(first.len(), 3);

    // Kitten added: root, pictures, cats and the file itself
    let second = reports[1].changes.as_ref().unwrap();
    assert!(second.is_pruned());
    assert_eq!(second.len(), 4);

    // mkdir of an existing directory changes nothing
    assert!(reports[2].changes.is_none());
    assert_eq!(reports[2].root, reports[1].root);

    // Removing the kitten restores the cats directory it was written into
    let last = reports[5].changes.as_ref().unwrap();
    let cats = last.vertices().find(|(_, v)| v.name == "cats");
    assert!(cats.is_some());
    assert_eq!(session.root().identity(), &reports[5].root);
}

#[tokio::test]
async fn test_replay_stops_on_failed_mutation() {
    let mutations = parse_script("mkdir /a\nrm /missing\nmkdir /b\n").unwrap();
    let mut session = ReplaySession::new(BuildConfig::default());

    assert!(matches!(
        session.run(&mutations).await,
        Err(ApiError::Namespace(_))
    ));
    assert_eq!(session.store().ls(session.root(), "/").unwrap(), vec!["a"]);
}

#[tokio::test]
async fn test_cli_replay_text_output() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("steps.txt"), SCRIPT).unwrap();

    let context =
        RunContext::with_config(temp_dir.path().to_path_buf(), SnapgraphConfig::default())
            .unwrap();
    let output = context
        .execute(&Commands::Replay {
            script: PathBuf::from("steps.txt"),
            format: "text".to_string(),
            lookup_concurrency: None,
        })
        .await
        .unwrap();

    assert!(output.contains("[1] mkdir -p /pictures/cats"));
    assert!(output.contains("[3] mkdir -p /pictures/cats"));
    assert!(output.contains("No change to tree"));
    assert!(output.contains("[6] rm /pictures/cats/kitten.png"));
}

#[tokio::test]
async fn test_cli_replay_missing_script() {
    let temp_dir = TempDir::new().unwrap();
    let context =
        RunContext::with_config(temp_dir.path().to_path_buf(), SnapgraphConfig::default())
            .unwrap();

    let result = context
        .execute(&Commands::Replay {
            script: PathBuf::from("absent.txt"),
            format: "text".to_string(),
            lookup_concurrency: None,
        })
        .await;
    assert!(matches!(result, Err(ApiError::IoError(_))));
}

#[tokio::test]
async fn test_cli_replay_script_error_reports_line() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("bad.txt"), "mkdir /a\ntouch /b\n").unwrap();
    let context =
        RunContext::with_config(temp_dir.path().to_path_buf(), SnapgraphConfig::default())
            .unwrap();

    let result = context
        .execute(&Commands::Replay {
            script: PathBuf::from("bad.txt"),
            format: "json".to_string(),
            lookup_concurrency: None,
        })
        .await;
    match result {
        Err(ApiError::Script { line, .. }) => assert_eq!(line, 2),
        other => panic!("expected script error, got {:?}", other.is_ok()),
    }
}

#[tokio::test]
async fn test_cli_rejects_zero_concurrency() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("steps.txt"), "mkdir /a\n").unwrap();
    let context =
        RunContext::with_config(temp_dir.path().to_path_buf(), SnapgraphConfig::default())
            .unwrap();

    let result = context
        .execute(&Commands::Replay {
            script: PathBuf::from("steps.txt"),
            format: "text".to_string(),
            lookup_concurrency: Some(0),
        })
        .await;
    assert!(matches!(result, Err(ApiError::InvalidArgument(_))));
}
