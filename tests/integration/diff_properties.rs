//! Property-based tests for snapshot and diff invariants

use proptest::prelude::*;
use snapgraph::namespace::{MemoryNode, MemoryStore};
use snapgraph::tree::{build_snapshot, diff_snapshots, Snapshot};

/// Build a namespace from generated `(dir, file, content)` triples
fn populate(store: &MemoryStore, files: &[(u8, u8, u8)]) -> MemoryNode {
    files
        .iter()
        .fold(store.empty_root(), |root, (dir, file, content)| {
            let path = format!("/d{}/f{}.txt", dir, file);
            store.write(&root, &path, &[*content]).unwrap()
        })
}

fn build(store: &MemoryStore, root: &MemoryNode) -> Snapshot<MemoryNode> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    runtime.block_on(build_snapshot(root.clone(), store)).unwrap()
}

fn files() -> impl Strategy<Value = Vec<(u8, u8, u8)>> {
    prop::collection::vec((0u8..4, 0u8..6, any::<u8>()), 0..24)
}

/// Every vertex sits at the level matching its ancestor hops
#[test]
fn test_level_matches_depth_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&files(), |files| {
            let store = MemoryStore::new();
            let root = populate(&store, &files);
            let snapshot = build(&store, &root);

            prop_assert!(snapshot.validate().is_ok());
            for (depth, level) in snapshot.levels().iter().enumerate() {
                for id in level.iter().flatten() {
                    prop_assert_eq!(snapshot.depth_of(*id), depth);
                }
            }
            Ok(())
        })
        .unwrap();
}

/// A snapshot diffed against itself or a rebuild is empty
#[test]
fn test_self_diff_is_none_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&files(), |files| {
            let store = MemoryStore::new();
            let root = populate(&store, &files);
            let first = build(&store, &root);
            let second = build(&store, &root);

            prop_assert!(diff_snapshots(&first, &first).unwrap().is_none());
            prop_assert!(diff_snapshots(&second, &first).unwrap().is_none());
            Ok(())
        })
        .unwrap();
}

/// Diff output is a well-formed subset of the current snapshot
#[test]
fn test_diff_is_subset_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(files(), files()), |(before, after)| {
            let store = MemoryStore::new();
            let previous_root = populate(&store, &before);
            let current_root = after.iter().fold(previous_root.clone(), |root, (d, f, c)| {
                store
                    .write(&root, &format!("/d{}/f{}.txt", d, f), &[*c])
                    .unwrap()
            });
            let previous = build(&store, &previous_root);
            let current = build(&store, &current_root);

            let Some(diff) = diff_snapshots(&current, &previous).unwrap() else {
                prop_assert_eq!(current_root.identity(), previous_root.identity());
                return Ok(());
            };

            prop_assert!(diff.len() <= current.len());
            for (id, vertex) in diff.vertices() {
                // Kept vertices keep their position in the current snapshot
                prop_assert_eq!(current.path_of(id), diff.path_of(id));
                let in_previous = previous.find_by_identity(&vertex.identity);
                prop_assert_eq!(vertex.suppressed, in_previous.is_some());
            }
            for level in diff.levels() {
                prop_assert!(!level.is_empty());
                prop_assert!(level.iter().all(|group| !group.is_empty()));
            }
            Ok(())
        })
        .unwrap();
}
