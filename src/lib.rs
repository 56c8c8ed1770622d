//! snapgraph: Snapshots and Diffs of Content-Addressed Hierarchies
//!
//! Builds a level-by-level snapshot of an immutable, content-addressed tree
//! reachable from a root, and diffs two snapshots down to the vertices a
//! renderer has to redraw. Vertices that only moved are kept as suppressed
//! references. An in-memory copy-on-write namespace and a replay driver
//! exercise the engine end to end.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod namespace;
pub mod replay;
pub mod store;
pub mod tree;
pub mod types;
