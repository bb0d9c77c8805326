//! Filesystem implementation of DatasetStore.

use crate::{DatasetId, DatasetStore, FrameTable, StoreError};
use std::fs;
use std::path::{Path, PathBuf};

/// Datasets as directories below a root, tables as CSV files.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory of a dataset.
    pub fn dataset_dir(&self, dataset: &DatasetId) -> PathBuf {
        self.root.join(dataset.as_str())
    }

    /// Path of a table file.
    pub fn table_path(&self, dataset: &DatasetId, file: &str) -> PathBuf {
        self.dataset_dir(dataset).join(file)
    }
}

impl DatasetStore for FsStore {
    fn exists(&self, dataset: &DatasetId) -> bool {
        self.dataset_dir(dataset).is_dir()
    }

    fn read_table(&self, dataset: &DatasetId, file: &str) -> Result<FrameTable, StoreError> {
        let path = self.table_path(dataset, file);
        if !path.is_file() {
            return Err(StoreError::NotFound(path.display().to_string()));
        }

        let mut reader = csv::Reader::from_path(&path).map_err(|e| StoreError::csv(&path, e))?;
        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| StoreError::csv(&path, e))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut table = FrameTable::new(headers);
        for record in reader.records() {
            let record = record.map_err(|e| StoreError::csv(&path, e))?;
            table.push_row(record.iter().map(str::to_string).collect())?;
        }
        Ok(table)
    }

    fn write_table(&self, dataset: &DatasetId, file: &str, table: &FrameTable) -> Result<(), StoreError> {
        let path = self.table_path(dataset, file);
        let tmp = path.with_extension("csv.tmp");

        // Rename so the table is replaced in one step
        let result = write_csv(&tmp, table)
            .and_then(|()| fs::rename(&tmp, &path).map_err(|e| StoreError::io(&path, e)));
        if result.is_err() {
            let _ = fs::remove_file(&tmp);
        }
        result
    }
}

fn write_csv(path: &Path, table: &FrameTable) -> Result<(), StoreError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| StoreError::csv(path, e))?;
    writer
        .write_record(table.headers())
        .map_err(|e| StoreError::csv(path, e))?;
    for row in table.rows() {
        writer.write_record(row).map_err(|e| StoreError::csv(path, e))?;
    }
    writer.flush().map_err(|e| StoreError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("waypoint_env_{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_write_then_read() {
        let root = scratch("write_then_read");
        let store = FsStore::new(&root);
        let dataset = DatasetId::from("drive_a");
        fs::create_dir_all(store.dataset_dir(&dataset)).unwrap();

        let table = FrameTable::from_rows(
            vec!["index".into(), "position_x".into(), "note".into()],
            vec![
                vec!["0".into(), "1.25".into(), "a,b".into()],
                vec!["1".into(), "".into(), "".into()],
            ],
        )
        .unwrap();

        store.write_table(&dataset, "frames.csv", &table).unwrap();
        assert!(!store.table_path(&dataset, "frames.csv.tmp").exists());
        assert_eq!(store.read_table(&dataset, "frames.csv").unwrap(), table);

        fs::remove_dir_all(root).unwrap();
    }

    #[test]
    fn test_failed_write_leaves_no_temp_file() {
        let root = scratch("failed_write");
        let store = FsStore::new(&root);
        let dataset = DatasetId::from("drive_c");

        // A directory where the table should go makes the final rename fail
        fs::create_dir_all(store.table_path(&dataset, "frames.csv")).unwrap();
        let table = FrameTable::new(vec!["index".into()]);

        assert!(store.write_table(&dataset, "frames.csv", &table).is_err());
        assert!(!store.table_path(&dataset, "frames.csv.tmp").exists());

        fs::remove_dir_all(root).unwrap();
    }

    #[test]
    fn test_exists_and_missing_table() {
        let root = scratch("exists");
        let store = FsStore::new(&root);
        let dataset = DatasetId::from("drive_b");

        assert!(!store.exists(&dataset));
        fs::create_dir_all(store.dataset_dir(&dataset)).unwrap();
        assert!(store.exists(&dataset));
        assert!(matches!(
            store.read_table(&dataset, "frames.csv"),
            Err(StoreError::NotFound(_))
        ));

        fs::remove_dir_all(root).unwrap();
    }
}
