//! Catalog comparison.
//!
//! # Architecture
//!
//! The diff is split into stages, each behind a trait where it varies:
//!
//! - [`ChangeComputer`](traits::ChangeComputer): one implementation per
//!   category of change, in the [`changes`] module
//! - [`CatalogDiffer`]: loads, normalizes and folds the change sets into a
//!   [`DiffReport`]
//! - [`FleetDiffer`]: runs many node diffs in parallel
//!
//! # Example
//!
//! ```no_run
//! use catalog_diff::diff::{CatalogDiffer, DiffOptions};
//! use catalog_diff::model::SchemaGeneration;
//!
//! let options = DiffOptions::builder().exclude_classes(true).build().unwrap();
//! let report = CatalogDiffer::new("old/web01.pson", "new/web01.pson")
//!     .with_schema(SchemaGeneration::Current)
//!     .with_options(options)
//!     .diff()
//!     .unwrap();
//! println!("{} differences", report.node_differences);
//! ```

pub mod changes;
mod engine;
pub mod fleet;
pub mod incremental;
mod options;
mod result;
pub mod stats;
pub mod text;
pub mod traits;

pub use engine::{compare, CatalogDiffer, LoadedCatalogs};
pub use fleet::{ExampleError, FleetDiffer, FleetReport, NodeScore, ProblemFile};
pub use incremental::{CacheStats, DiffCache, DiffCacheConfig, DiffCacheKey};
pub use options::{DiffOptions, DiffOptionsBuilder};
pub use result::DiffReport;
pub use stats::DiffStatistics;
pub use traits::{ChangeComputer, ParameterChanges, TitleChanges};
