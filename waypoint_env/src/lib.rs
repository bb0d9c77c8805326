//! Waypoint Environment - Dataset Storage Abstraction
//!
//! Preprocessing reads and rewrites per-dataset frame tables. This crate
//! hides where those tables live behind [`DatasetStore`]:
//! - **Filesystem** (`FsStore`): `<root>/<dataset>/<file>.csv`
//! - **Memory** (`MemoryStore`): for tests
//!
//! Tables are kept as raw text ([`FrameTable`]) so unknown columns survive
//! a read-modify-write cycle unchanged.

mod error;
mod fs_impl;
mod memory;
mod store;
mod types;

pub use error::StoreError;
pub use fs_impl::FsStore;
pub use memory::MemoryStore;
pub use store::DatasetStore;
pub use types::{format_f64, DatasetId, FrameTable};
