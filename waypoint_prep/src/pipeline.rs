//! The two preprocessing passes and their reports.
//!
//! 1. **Waypoints**: per selected dataset, read the frame table, drop rows
//!    without position, add distance and waypoint columns, write the
//!    extended table.
//! 2. **Manual fixes**: per dataset in the patch list that exists, overwrite
//!    turn-signal ranges in the extended table.
//!
//! Datasets are independent; a failing dataset is reported and the batch
//! moves on. Only the static configuration (platform, patches, catalog) is
//! fatal, and it is loaded before any dataset is touched.

use crate::binding::{bind_trajectory, write_distance, write_turn_signal, write_waypoints};
use crate::catalog::{DatasetCatalog, Selection};
use crate::config::RunConfig;
use crate::PrepError;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use waypoint_core::{CameraRig, PatchList, TransformTree, WaypointComputer, WaypointStats};
use waypoint_env::{DatasetId, DatasetStore};

/// Outcome of the waypoint pass for one dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetReport {
    pub dataset: String,
    pub passed: bool,

    /// Rows in the input table
    pub input_rows: usize,

    /// Rows dropped for missing position
    pub dropped_rows: usize,

    pub stats: WaypointStats,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

impl DatasetReport {
    fn failed(dataset: &DatasetId, reason: String) -> Self {
        Self {
            dataset: dataset.to_string(),
            passed: false,
            input_rows: 0,
            dropped_rows: 0,
            stats: WaypointStats::default(),
            failure_reason: Some(reason),
        }
    }
}

/// Outcome of the manual-fix pass for one dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchReport {
    pub dataset: String,
    pub passed: bool,

    /// Patches listed for the dataset
    pub patches: usize,

    /// Rows written (overlaps count once per patch)
    pub rows_written: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

/// Everything a run did.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub datasets: Vec<DatasetReport>,
    pub patched: Vec<PatchReport>,
}

impl RunSummary {
    /// Datasets that failed in either pass.
    pub fn failed_count(&self) -> usize {
        self.datasets.iter().filter(|r| !r.passed).count()
            + self.patched.iter().filter(|r| !r.passed).count()
    }

    pub fn passed(&self) -> bool {
        self.failed_count() == 0
    }
}

/// Runs the preprocessing passes against a dataset store.
pub struct Preprocessor<S> {
    store: S,
    config: RunConfig,
    computer: WaypointComputer,
    patches: PatchList,
    catalog: DatasetCatalog,
}

impl<S: DatasetStore> Preprocessor<S> {
    /// Loads platform, patches and catalog as configured.
    ///
    /// Fails if any of them cannot be loaded, or if a camera frame is
    /// missing from the platform.
    pub fn new(store: S, config: RunConfig) -> Result<Self, PrepError> {
        let tree = config.load_tree()?;
        let patches = config.load_patches()?;
        let catalog = config.load_catalog()?;
        Self::with_parts(store, config, &tree, patches, catalog)
    }

    /// Builds from already loaded parts.
    pub fn with_parts(
        store: S,
        config: RunConfig,
        tree: &TransformTree,
        patches: PatchList,
        catalog: DatasetCatalog,
    ) -> Result<Self, PrepError> {
        let rig = CameraRig::from_tree(tree, &config.body_frame)?;
        info!(
            "Platform {} (root {}) resolved: {} cameras relative to {}",
            tree.name(),
            tree.root(),
            waypoint_core::Camera::ALL.len(),
            config.body_frame
        );
        let computer = WaypointComputer::new(rig, config.waypoints);
        Ok(Self {
            store,
            config,
            computer,
            patches,
            catalog,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Waypoint pass for one dataset.
    pub fn create_waypoints(&self, dataset: &DatasetId) -> Result<DatasetReport, PrepError> {
        let mut table = self.store.read_table(dataset, &self.config.frames_file)?;
        let input_rows = table.len();

        let (trajectory, dropped_rows) = bind_trajectory(&mut table)?;
        info!(
            "Processing {}: {} rows ({} without position dropped)",
            dataset, input_rows, dropped_rows
        );

        let interval = self.config.progress_interval.max(1);
        let mut results = Vec::with_capacity(trajectory.len());
        for i in 0..trajectory.len() {
            results.push(self.computer.compute_frame(&trajectory, i));
            if (i + 1) % interval == 0 {
                debug!("  {}: {}/{} frames", dataset, i + 1, trajectory.len());
            }
        }

        write_distance(&mut table, &trajectory);
        write_waypoints(&mut table, &results, self.computer.config());
        self.store
            .write_table(dataset, &self.config.extended_file, &table)?;

        let stats = WaypointStats::collect(&results, self.computer.config());
        info!(
            "✓ {}: {}/{} frames with a first waypoint, {} complete",
            dataset, stats.with_first, stats.frames, stats.complete
        );

        Ok(DatasetReport {
            dataset: dataset.to_string(),
            passed: true,
            input_rows,
            dropped_rows,
            stats,
            failure_reason: None,
        })
    }

    /// Manual-fix pass for one dataset. `None` if the dataset has no patches.
    pub fn fix_dataset(&self, dataset: &DatasetId) -> Result<Option<PatchReport>, PrepError> {
        let patches = self.patches.for_dataset(dataset.as_str()).count();
        if patches == 0 {
            return Ok(None);
        }

        let mut table = self.store.read_table(dataset, &self.config.extended_file)?;
        let len = table.len();
        let rows_written = self.patches.apply_ranges(dataset.as_str(), len, |rows, label| {
            write_turn_signal(&mut table, rows, label)
        });
        self.store
            .write_table(dataset, &self.config.extended_file, &table)?;

        info!("Patched {}: {} ranges, {} rows", dataset, patches, rows_written);
        Ok(Some(PatchReport {
            dataset: dataset.to_string(),
            passed: true,
            patches,
            rows_written,
            failure_reason: None,
        }))
    }

    /// Manual-fix pass over every patched dataset that exists in the store.
    pub fn fix_frames(&self) -> Vec<PatchReport> {
        let mut reports = Vec::new();
        for name in self.patches.datasets() {
            let dataset = DatasetId::new(name);
            if !self.store.exists(&dataset) {
                debug!("Skipping fixes for {}: not present", dataset);
                continue;
            }
            match self.fix_dataset(&dataset) {
                Ok(Some(report)) => reports.push(report),
                Ok(None) => {}
                Err(e) => {
                    error!("✗ Fixing {} failed: {}", dataset, e);
                    reports.push(PatchReport {
                        dataset: dataset.to_string(),
                        passed: false,
                        patches: self.patches.for_dataset(name).count(),
                        rows_written: 0,
                        failure_reason: Some(e.to_string()),
                    });
                }
            }
        }
        reports
    }

    /// Waypoint pass over the selection, then (if enabled) the fix pass.
    pub fn run(&self, selection: &Selection) -> RunSummary {
        let datasets = selection.resolve(&self.catalog);
        info!("Creating waypoints for {} dataset(s) ({})", datasets.len(), selection);

        let mut summary = RunSummary::default();
        for dataset in &datasets {
            let report = match self.create_waypoints(dataset) {
                Ok(report) => report,
                Err(e) => {
                    error!("✗ {} failed: {}", dataset, e);
                    DatasetReport::failed(dataset, e.to_string())
                }
            };
            summary.datasets.push(report);
        }

        if self.config.apply_patches {
            summary.patched = self.fix_frames();
        } else {
            warn!("Manual turn-signal fixes disabled");
        }
        summary
    }
}
