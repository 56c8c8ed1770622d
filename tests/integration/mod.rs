//! Integration tests for the snapgraph snapshot and diff engine

mod config_integration;
mod diff_properties;
mod lookup_failure;
mod replay_script;
mod snapshot_structure;
