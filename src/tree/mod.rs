//! Snapshot Tree
//!
//! Represents one point-in-time view of a content-addressed hierarchy as a
//! leveled tree of vertices, and computes the divergent subset between two
//! such views.

pub mod builder;
pub mod diff;
pub mod snapshot;
pub mod vertex;

pub use builder::{build_snapshot, BuildConfig, SnapshotBuilder};
pub use diff::diff_snapshots;
pub use snapshot::{Connection, Level, SiblingGroup, Snapshot};
pub use vertex::{Vertex, VertexId, ROOT_NAME};
