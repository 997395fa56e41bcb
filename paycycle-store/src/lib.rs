//! paycycle-store: month snapshots of the bill list, stored as named CSV files.

pub mod error;
pub mod label;
pub mod snapshot;
pub mod store;

pub use error::StoreError;
pub use label::{SnapshotLabel, label_sort_key, latest_label};
pub use snapshot::{Snapshot, SnapshotMeta, read_snapshot, write_snapshot};
pub use store::{DirStore, SnapshotStore};
