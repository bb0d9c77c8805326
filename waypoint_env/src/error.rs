//! Error types for dataset storage.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing datasets.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem operation failed
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Table could not be read or written as CSV
    #[error("CSV error in {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },

    /// Dataset or table does not exist in the store
    #[error("Not found: {0}")]
    NotFound(String),

    /// A required column is absent from the table header
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// A cell could not be parsed into the expected type
    #[error("Row {row}, column {column}: cannot parse {value:?}")]
    Parse {
        row: usize,
        column: String,
        value: String,
    },

    /// A row does not match the header width
    #[error("Row {row} has {found} cells, expected {expected}")]
    RowWidth {
        row: usize,
        found: usize,
        expected: usize,
    },
}

impl StoreError {
    /// Creates an I/O error tagged with its path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a CSV error tagged with its path.
    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }

    /// Creates a cell parse error.
    pub fn parse(row: usize, column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Parse {
            row,
            column: column.into(),
            value: value.into(),
        }
    }
}
