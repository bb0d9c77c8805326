//! Error types for the preprocessing driver.

use std::path::PathBuf;
use thiserror::Error;
use waypoint_core::{PatchError, TreeError};
use waypoint_env::StoreError;

/// Errors raised while configuring or running preprocessing.
#[derive(Debug, Error)]
pub enum PrepError {
    /// Platform description is unusable (fatal for the whole run)
    #[error("Transform tree: {0}")]
    Tree(#[from] TreeError),

    /// Manual patch list could not be loaded
    #[error("Patch list: {0}")]
    Patches(#[from] PatchError),

    /// Dataset table could not be read or written
    #[error("Store: {0}")]
    Store(#[from] StoreError),

    /// Dataset catalog is not valid JSON
    #[error("Malformed dataset catalog: {0}")]
    Catalog(#[source] serde_json::Error),

    /// Run configuration is not valid JSON
    #[error("Malformed config {path}: {source}")]
    Config {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// A configuration file could not be read
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Frame index cell is not an integer
    #[error("Row {row}: invalid frame index {value:?}")]
    Index { row: usize, value: String },

    /// Required per-frame value is missing
    #[error("Row {row}: missing {column}")]
    MissingValue { row: usize, column: String },
}

impl PrepError {
    /// Creates a file read error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
