//! Common types for dataset storage.

use crate::StoreError;
use serde::{Deserialize, Serialize};

/// Name of one recording session (its directory name under the dataset root).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DatasetId(pub String);

impl DatasetId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DatasetId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl std::fmt::Display for DatasetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A frame table: header plus rows of raw cells.
///
/// Cells stay as text so columns this crate knows nothing about pass
/// through untouched. Empty cells (and `nan`) stand for missing values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl FrameTable {
    /// Creates an empty table with the given header.
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Creates a table, checking every row against the header width.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, StoreError> {
        let mut table = Self::new(headers);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Appends a row.
    pub fn push_row(&mut self, row: Vec<String>) -> Result<(), StoreError> {
        if row.len() != self.headers.len() {
            return Err(StoreError::RowWidth {
                row: self.rows.len(),
                found: row.len(),
                expected: self.headers.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Position of a column.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Position of a column that must exist.
    pub fn require(&self, name: &str) -> Result<usize, StoreError> {
        self.column(name)
            .ok_or_else(|| StoreError::MissingColumn(name.to_string()))
    }

    /// Position of a column, appending it (all cells empty) if absent.
    pub fn ensure_column(&mut self, name: &str) -> usize {
        if let Some(col) = self.column(name) {
            return col;
        }
        self.headers.push(name.to_string());
        for row in &mut self.rows {
            row.push(String::new());
        }
        self.headers.len() - 1
    }

    pub fn cell(&self, row: usize, col: usize) -> &str {
        &self.rows[row][col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: impl Into<String>) {
        self.rows[row][col] = value.into();
    }

    /// Clears every cell of a column.
    pub fn clear_column(&mut self, col: usize) {
        for row in &mut self.rows {
            row[col].clear();
        }
    }

    /// Reads a numeric cell; empty or NaN cells are `None`.
    pub fn f64_cell(&self, row: usize, col: usize) -> Result<Option<f64>, StoreError> {
        let raw = self.cell(row, col).trim();
        if is_missing(raw) {
            return Ok(None);
        }
        match raw.parse::<f64>() {
            Ok(v) if v.is_nan() => Ok(None),
            Ok(v) => Ok(Some(v)),
            Err(_) => Err(StoreError::parse(row, self.headers[col].clone(), raw)),
        }
    }

    /// Reads a whole numeric column.
    pub fn f64_column(&self, name: &str) -> Result<Vec<Option<f64>>, StoreError> {
        let col = self.require(name)?;
        (0..self.rows.len()).map(|row| self.f64_cell(row, col)).collect()
    }

    /// Writes an optional number; `None` becomes an empty cell.
    pub fn set_f64(&mut self, row: usize, col: usize, value: Option<f64>) {
        let text = value.map(format_f64).unwrap_or_default();
        self.set(row, col, text);
    }

    /// Keeps only rows for which `keep(row)` holds.
    pub fn retain_rows<F>(&mut self, mut keep: F)
    where
        F: FnMut(&[String]) -> bool,
    {
        self.rows.retain(|row| keep(row));
    }
}

fn is_missing(raw: &str) -> bool {
    raw.is_empty() || raw.eq_ignore_ascii_case("nan")
}

/// Shortest text that parses back to the same value. Negative zero is
/// written as `0`.
pub fn format_f64(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else if value == 0.0 {
        "0".to_string()
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> FrameTable {
        FrameTable::from_rows(
            vec!["index".into(), "position_x".into()],
            vec![
                vec!["0".into(), "1.5".into()],
                vec!["1".into(), "".into()],
                vec!["2".into(), "NaN".into()],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_numeric_column_with_gaps() {
        assert_eq!(table().f64_column("position_x").unwrap(), vec![Some(1.5), None, None]);
    }

    #[test]
    fn test_missing_column() {
        assert!(matches!(table().f64_column("yaw"), Err(StoreError::MissingColumn(_))));
    }

    #[test]
    fn test_bad_cell() {
        let mut t = table();
        t.set(0, 1, "abc");
        let err = t.f64_column("position_x").unwrap_err();
        assert!(matches!(err, StoreError::Parse { row: 0, .. }));
    }

    #[test]
    fn test_row_width_checked() {
        let mut t = table();
        assert!(matches!(t.push_row(vec!["3".into()]), Err(StoreError::RowWidth { .. })));
    }

    #[test]
    fn test_ensure_column_appends_empty() {
        let mut t = table();
        let col = t.ensure_column("distance");
        assert_eq!(col, 2);
        assert_eq!(t.ensure_column("distance"), 2);
        assert!(t.rows().iter().all(|r| r[2].is_empty()));
    }

    #[test]
    fn test_set_f64_round_trip() {
        let mut t = table();
        t.set_f64(0, 1, Some(0.1 + 0.2));
        assert_eq!(t.f64_cell(0, 1).unwrap(), Some(0.1 + 0.2));
        t.set_f64(0, 1, None);
        assert_eq!(t.cell(0, 1), "");
    }

    #[test]
    fn test_format_f64() {
        assert_eq!(format_f64(-0.0), "0");
        assert_eq!(format_f64(0.0), "0");
        assert_eq!(format_f64(-2.5), "-2.5");
        assert_eq!(format_f64(f64::NAN), "");
    }

    #[test]
    fn test_retain_rows() {
        let mut t = table();
        t.retain_rows(|row| !row[1].is_empty());
        assert_eq!(t.len(), 2);
    }
}
