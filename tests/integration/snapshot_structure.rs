//! Integration tests for snapshot structure correctness

use super::test_utils::{level_names, snapshot, write_all, ReversingStore};
use snapgraph::namespace::MemoryStore;
use snapgraph::tree::{BuildConfig, SnapshotBuilder, ROOT_NAME};

fn sample_tree(store: &MemoryStore) -> snapgraph::namespace::MemoryNode {
    let root = store.mkdir(&store.empty_root(), "/music").unwrap();
    write_all(
        store,
        &root,
        &[
            ("/pictures/cats/kitten.png", "meow"),
            ("/pictures/dogs/puppy.png", "woof"),
            ("/videos/clip.mp4", "frames"),
            ("/notes.txt", "todo"),
        ],
    )
}

/// Every vertex sits at the level equal to its number of ancestor hops
#[tokio::test]
async fn test_level_equals_ancestor_hops() {
    let store = MemoryStore::new();
    let root = sample_tree(&store);
    let snapshot = snapshot(&store, &root).await;

    for (depth, level) in snapshot.levels().iter().enumerate() {
        for id in level.iter().flatten() {
            assert_eq!(snapshot.depth_of(*id), depth);
            assert_eq!(snapshot.path_of(*id).len(), depth);
        }
    }
    assert!(snapshot.validate().is_ok());
}

/// Root is alone at level 0 and named after the synthetic root
#[tokio::test]
async fn test_root_alone_at_level_zero() {
    let store = MemoryStore::new();
    let root = sample_tree(&store);
    let snapshot = snapshot(&store, &root).await;

    assert_eq!(snapshot.levels()[0], vec![vec![snapshot.levels()[0][0][0]]]);
    let root_vertex = snapshot.root_vertex().unwrap();
    assert_eq!(root_vertex.name, ROOT_NAME);
    assert!(root_vertex.is_root());
    assert_eq!(&root_vertex.identity, root.identity());
}

/// One sibling group per non-empty directory, in listing order
#[tokio::test]
async fn test_sibling_groups_follow_listing_order() {
    let store = MemoryStore::new();
    let root = sample_tree(&store);
    let snapshot = snapshot(&store, &root).await;

    assert_eq!(
        level_names(&snapshot),
        vec![
            vec!["root"],
            vec!["music", "notes.txt", "pictures", "videos"],
            vec!["cats", "dogs", "clip.mp4"],
            vec!["kitten.png", "puppy.png"],
        ]
    );

    // "music" is empty and contributes no group; "pictures" and "videos" do
    assert_eq!(snapshot.levels()[2].len(), 2);
    for group in snapshot.levels().iter().flatten() {
        let parents: Vec<_> = group
            .iter()
            .map(|id| snapshot.vertex(*id).unwrap().parent)
            .collect();
        assert!(parents.windows(2).all(|w| w[0] == w[1]));
    }
}

#[tokio::test]
async fn test_paths_and_connections() {
    let store = MemoryStore::new();
    let root = sample_tree(&store);
    let snapshot = snapshot(&store, &root).await;

    let kitten = snapshot
        .vertices()
        .find(|(_, v)| v.name == "kitten.png")
        .map(|(id, _)| id)
        .unwrap();
    assert_eq!(snapshot.path_of(kitten), vec!["pictures", "cats", "kitten.png"]);

    let connections = snapshot.connections();
    assert_eq!(connections.len(), snapshot.len() - 1);
    assert!(connections.iter().all(|c| !c.reference));

    let kitten_identity = &snapshot.vertex(kitten).unwrap().identity;
    assert_eq!(snapshot.find_by_identity(kitten_identity), Some(kitten));
}

/// Concurrent lookups produce the same structure as sequential ones, even
/// when later entries resolve first
#[tokio::test]
async fn test_concurrent_build_matches_sequential() {
    let store = MemoryStore::new();
    let root = sample_tree(&store);
    let sequential = snapshot(&store, &root).await;

    let reversing = ReversingStore { inner: store };
    let concurrent = SnapshotBuilder::new(&reversing)
        .with_config(BuildConfig {
            lookup_concurrency: 8,
        })
        .build(root.clone())
        .await
        .unwrap();

    assert_eq!(level_names(&sequential), level_names(&concurrent));
    assert_eq!(sequential.connections(), concurrent.connections());
    assert_eq!(
        level_names(&concurrent)[1],
        vec!["music", "notes.txt", "pictures", "videos"]
    );
}

/// A file root yields a single-vertex snapshot
#[tokio::test]
async fn test_leaf_root() {
    let store = MemoryStore::new();
    let root = store.write(&store.empty_root(), "/a.txt", b"alone").unwrap();
    let full = snapshot(&store, &root).await;
    let (_, leaf) = full.vertices().find(|(_, v)| v.name == "a.txt").unwrap();

    let leaf_snapshot = snapshot(&store, &leaf.node).await;
    assert_eq!(leaf_snapshot.level_count(), 1);
    assert_eq!(leaf_snapshot.len(), 1);
    assert!(!leaf_snapshot.root_vertex().unwrap().is_container);
}
