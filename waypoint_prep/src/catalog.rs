//! The fixed set of datasets processed when no single dataset is named.

use crate::PrepError;
use serde::{Deserialize, Serialize};
use waypoint_env::DatasetId;

const BUILTIN_CATALOG: &str = include_str!("../../config/datasets.json");

/// Ordered list of dataset names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetCatalog {
    pub datasets: Vec<String>,
}

impl DatasetCatalog {
    pub fn from_json(json: &str) -> Result<Self, PrepError> {
        serde_json::from_str(json).map_err(PrepError::Catalog)
    }

    /// The catalog shipped with the crate.
    pub fn builtin() -> Result<Self, PrepError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    pub fn ids(&self) -> Vec<DatasetId> {
        self.datasets.iter().map(|d| DatasetId::new(d.as_str())).collect()
    }
}

/// Which datasets a run creates waypoints for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// One named dataset
    Single(DatasetId),

    /// Every dataset in the catalog
    Catalog,
}

impl Selection {
    /// `Single` when a name is given, `Catalog` otherwise.
    pub fn from_name(name: Option<String>) -> Self {
        match name {
            Some(name) => Selection::Single(DatasetId::new(name)),
            None => Selection::Catalog,
        }
    }

    /// Datasets to process, in order.
    pub fn resolve(&self, catalog: &DatasetCatalog) -> Vec<DatasetId> {
        match self {
            Selection::Single(id) => vec![id.clone()],
            Selection::Catalog => catalog.ids(),
        }
    }
}

impl std::fmt::Display for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Selection::Single(id) => write!(f, "{}", id),
            Selection::Catalog => write!(f, "catalog"),
        }
    }
}
