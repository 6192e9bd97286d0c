pub mod json;

pub use json::JsonSnapshotStore;

use anyhow::Result;

use crate::models::Snapshot;

/// Trait for snapshot persistence backends
pub trait SnapshotStore: Send + Sync {
    /// Replace the stored snapshot with `snapshot` in one step
    fn save(&self, snapshot: &Snapshot) -> Result<()>;

    /// Load the stored snapshot, if one has been written
    fn load(&self) -> Result<Option<Snapshot>>;
}
