//! Waypoint Prep - Batch Preprocessing of Driving Datasets
//!
//! Drives the two passes over a dataset root:
//! 1. **Waypoints**: extend each frame table with distance and lookahead
//!    waypoint columns (body frame plus one triple per camera)
//! 2. **Manual fixes**: overwrite turn-signal ranges from a hand-made list
//!
//! # Usage
//!
//! ```ignore
//! use waypoint_prep::{Preprocessor, RunConfig, Selection};
//! use waypoint_env::FsStore;
//!
//! let config = RunConfig::default();
//! let store = FsStore::new(&config.dataset_folder);
//! let prep = Preprocessor::new(store, config)?;
//! let summary = prep.run(&Selection::Catalog);
//! ```

pub mod binding;
pub mod catalog;
pub mod config;
pub mod error;
pub mod pipeline;

pub use catalog::{DatasetCatalog, Selection};
pub use config::RunConfig;
pub use error::PrepError;
pub use pipeline::{DatasetReport, PatchReport, Preprocessor, RunSummary};
