//! In-memory implementation of DatasetStore for tests.

use crate::{DatasetId, DatasetStore, FrameTable, StoreError};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

/// Datasets and their tables held in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    datasets: Mutex<BTreeSet<DatasetId>>,
    tables: Mutex<BTreeMap<(DatasetId, String), FrameTable>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a dataset with no tables.
    pub fn add_dataset(&self, dataset: &DatasetId) {
        self.lock_datasets().insert(dataset.clone());
    }

    /// Stores a table, registering its dataset.
    pub fn insert_table(&self, dataset: &DatasetId, file: &str, table: FrameTable) {
        self.add_dataset(dataset);
        self.lock_tables()
            .insert((dataset.clone(), file.to_string()), table);
    }

    /// Returns a copy of a stored table.
    pub fn table(&self, dataset: &DatasetId, file: &str) -> Option<FrameTable> {
        self.lock_tables()
            .get(&(dataset.clone(), file.to_string()))
            .cloned()
    }

    fn lock_datasets(&self) -> std::sync::MutexGuard<'_, BTreeSet<DatasetId>> {
        self.datasets.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_tables(&self) -> std::sync::MutexGuard<'_, BTreeMap<(DatasetId, String), FrameTable>> {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DatasetStore for MemoryStore {
    fn exists(&self, dataset: &DatasetId) -> bool {
        self.lock_datasets().contains(dataset)
    }

    fn read_table(&self, dataset: &DatasetId, file: &str) -> Result<FrameTable, StoreError> {
        self.table(dataset, file)
            .ok_or_else(|| StoreError::NotFound(format!("{}/{}", dataset, file)))
    }

    fn write_table(&self, dataset: &DatasetId, file: &str, table: &FrameTable) -> Result<(), StoreError> {
        if !self.exists(dataset) {
            return Err(StoreError::NotFound(dataset.to_string()));
        }
        self.insert_table(dataset, file, table.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        let dataset = DatasetId::from("drive");
        let table = FrameTable::new(vec!["index".into()]);

        assert!(!store.exists(&dataset));
        assert!(store.write_table(&dataset, "t.csv", &table).is_err());

        store.add_dataset(&dataset);
        store.write_table(&dataset, "t.csv", &table).unwrap();
        assert_eq!(store.read_table(&dataset, "t.csv").unwrap(), table);
        assert!(matches!(store.read_table(&dataset, "u.csv"), Err(StoreError::NotFound(_))));
    }
}
