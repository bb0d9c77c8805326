//! Run configuration.

use crate::catalog::DatasetCatalog;
use crate::PrepError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use waypoint_core::{PatchList, TransformTree, WaypointConfig, BODY_FRAME};

/// Configuration for a preprocessing run.
///
/// Every field has a default; a JSON config file only needs the fields it
/// changes. `None` paths fall back to the data shipped with the crates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Root directory holding one directory per dataset
    pub dataset_folder: PathBuf,

    /// Input table inside each dataset directory
    pub frames_file: String,

    /// Output table (input plus waypoint columns)
    pub extended_file: String,

    /// Platform description JSON
    pub platform: Option<PathBuf>,

    /// Manual turn-signal patch list JSON
    pub patches: Option<PathBuf>,

    /// Dataset catalog JSON
    pub catalog: Option<PathBuf>,

    /// Frame the vehicle pose refers to
    pub body_frame: String,

    /// Lookahead ranks and spacing
    pub waypoints: WaypointConfig,

    /// Run the manual patch pass after the waypoint pass
    pub apply_patches: bool,

    /// Rows between progress log lines
    pub progress_interval: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            dataset_folder: PathBuf::from("dataset-new-small/summer2021"),
            frames_file: "nvidia_frames.csv".to_string(),
            extended_file: "nvidia_frames_ext.csv".to_string(),
            platform: None,
            patches: None,
            catalog: None,
            body_frame: BODY_FRAME.to_string(),
            waypoints: WaypointConfig::default(),
            apply_patches: true,
            progress_interval: 1000,
        }
    }
}

impl RunConfig {
    /// Loads a config file; missing fields keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, PrepError> {
        let text = read(path)?;
        serde_json::from_str(&text).map_err(|source| PrepError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load_tree(&self) -> Result<TransformTree, PrepError> {
        match &self.platform {
            Some(path) => Ok(TransformTree::from_json(&read(path)?)?),
            None => Ok(TransformTree::default_platform()?),
        }
    }

    pub fn load_patches(&self) -> Result<PatchList, PrepError> {
        match &self.patches {
            Some(path) => Ok(PatchList::from_json(&read(path)?)?),
            None => Ok(PatchList::builtin()?),
        }
    }

    pub fn load_catalog(&self) -> Result<DatasetCatalog, PrepError> {
        match &self.catalog {
            Some(path) => DatasetCatalog::from_json(&read(path)?),
            None => DatasetCatalog::builtin(),
        }
    }
}

fn read(path: &Path) -> Result<String, PrepError> {
    fs::read_to_string(path).map_err(|e| PrepError::io(path, e))
}
