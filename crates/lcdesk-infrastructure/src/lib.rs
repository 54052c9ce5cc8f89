//! Local persistence for LCDesk.
//!
//! Implements the `SnapshotStore` port with a single TOML state file
//! under the LCDesk home directory, written atomically.

pub mod paths;
pub mod toml_snapshot_store;

pub use toml_snapshot_store::TomlSnapshotStore;
