//! Integration tests for lookup failures during snapshot builds

use super::test_utils::{snapshot, write_all};
use snapgraph::error::{LookupError, SnapshotError};
use snapgraph::namespace::MemoryStore;
use snapgraph::tree::{build_snapshot, BuildConfig, SnapshotBuilder};

/// A directory missing from the store aborts the whole build with its path
#[tokio::test]
async fn test_missing_directory_reports_path() {
    let store = MemoryStore::new();
    let root = write_all(
        &store,
        &store.empty_root(),
        &[("/pictures/cats/kitten.png", "meow"), ("/videos/clip.mp4", "x")],
    );
    let full = snapshot(&store, &root).await;
    let cats = full
        .vertices()
        .find(|(_, v)| v.name == "cats")
        .map(|(_, v)| v.identity.clone())
        .unwrap();
    assert!(store.evict(&cats));

    match build_snapshot(root, &store).await {
        Err(SnapshotError::LookupFailure { path, source }) => {
            assert_eq!(path, "pictures/cats");
            assert!(matches!(source, LookupError::MissingBlock(id) if id == cats));
        }
        other => panic!("expected lookup failure, got {:?}", other.map(|s| s.len())),
    }
}

/// A missing root cannot even be listed
#[tokio::test]
async fn test_missing_root_fails_listing() {
    let store = MemoryStore::new();
    let root = store.mkdir(&store.empty_root(), "/a").unwrap();
    store.evict(root.identity());

    let result = SnapshotBuilder::new(&store)
        .with_config(BuildConfig {
            lookup_concurrency: 4,
        })
        .build(root)
        .await;

    match result {
        Err(SnapshotError::LookupFailure { path, .. }) => assert_eq!(path, ""),
        other => panic!("expected lookup failure, got {:?}", other.map(|s| s.len())),
    }
}

#[tokio::test]
async fn test_lookup_failure_message_names_path() {
    let store = MemoryStore::new();
    let root = write_all(&store, &store.empty_root(), &[("/docs/readme.md", "hi")]);
    let full = snapshot(&store, &root).await;
    let readme = full
        .vertices()
        .find(|(_, v)| v.name == "readme.md")
        .map(|(_, v)| v.identity.clone())
        .unwrap();
    store.evict(&readme);

    let err = build_snapshot(root, &store).await.unwrap_err();
    assert!(err.to_string().starts_with("Lookup failed at /docs/readme.md"));
}
