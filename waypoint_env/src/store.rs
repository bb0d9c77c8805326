//! Dataset storage trait.

use crate::{DatasetId, FrameTable, StoreError};

/// Where datasets live.
///
/// Abstracts the dataset root so the preprocessing passes can run against
/// the filesystem in production and against memory in tests.
///
/// # Implementations
///
/// - **Filesystem**: `FsStore` - one directory per dataset, CSV tables inside
/// - **Memory**: `MemoryStore` - tables held in a map
pub trait DatasetStore {
    /// Returns true if the dataset exists (its directory, for `FsStore`).
    fn exists(&self, dataset: &DatasetId) -> bool;

    /// Reads table `file` of a dataset.
    fn read_table(&self, dataset: &DatasetId, file: &str) -> Result<FrameTable, StoreError>;

    /// Replaces table `file` of a dataset.
    ///
    /// Readers never observe a partially written table.
    fn write_table(&self, dataset: &DatasetId, file: &str, table: &FrameTable) -> Result<(), StoreError>;
}
