//! **Semantic diffs of compiled configuration catalogs.**
//!
//! A compiled catalog is the full set of resources a configuration-management
//! server decided one node should have. `catalog-diff` loads two catalogs of
//! the same node (typically compiled from an old and a new code base),
//! normalizes them into a flat map of resources, and reports which resources
//! appeared, disappeared or changed parameters, together with a weighted
//! change score per node.
//!
//! ## Core Concepts & Modules
//!
//! - **[`parsers`]**: Reads `.yaml`, `.marshal`, `.pson` and `.json` catalog
//!   files into a [`RawCatalog`] of one [`SchemaGeneration`].
//! - **[`normalize`]**: Turns either schema generation into a
//!   [`NormalizedCatalog`] keyed by `Type[title]`.
//! - **[`diff`]**: The [`CatalogDiffer`] orchestrator, the identity and
//!   content comparers, statistics, the [`FleetDiffer`] for whole
//!   directories of nodes, and a result cache.
//! - **[`source`]**: Where compiled catalogs come from.
//! - **[`config`]**, **[`pipeline`]**, **[`cli`]**: The layers behind the
//!   `catalog-diff` binary.
//!
//! ## Diffing Two Catalogs
//!
//! ```no_run
//! use catalog_diff::{CatalogDiffer, DiffOptions, SchemaGeneration};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let options = DiffOptions::builder()
//!         .exclude_classes(true)
//!         .ignore_parameter("checksum")
//!         .build()?;
//!
//!     let report = CatalogDiffer::new("old/web01.yaml", "new/web01.yaml")
//!         .with_schema(SchemaGeneration::Current)
//!         .with_options(options)
//!         .diff()?;
//!
//!     println!(
//!         "{} added, {} removed, node changed {:.2}%",
//!         report.only_in_new.len(),
//!         report.only_in_old.len(),
//!         report.node_percentage
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Diffing a Fleet
//!
//! ```no_run
//! use catalog_diff::FleetDiffer;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let report = FleetDiffer::new("catalogs/old", "catalogs/new")
//!         .with_threads(20)
//!         .run()?;
//!
//!     for node in &report.most_changed {
//!         println!("{}: {:.2}%", node.node, node.node_percentage);
//!     }
//!     Ok(())
//! }
//! ```

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    // Resource counts are far below f64's exact integer range
    clippy::cast_precision_loss,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::struct_excessive_bools,
    // `old`/`new` pairs are clear in context
    clippy::similar_names
)]

pub mod cli;
pub mod config;
pub mod diff;
pub mod error;
pub mod model;
pub mod normalize;
pub mod parsers;
pub mod pipeline;
pub mod source;
pub mod utils;

// Re-export main types for convenience
pub use config::{AppConfig, AppConfigBuilder, ConfigError, Validatable};
pub use diff::{
    compare, CatalogDiffer, DiffCache, DiffOptions, DiffOptionsBuilder, DiffReport,
    DiffStatistics, FleetDiffer, FleetReport, LoadedCatalogs,
};
pub use error::{CatalogDiffError, ErrorContext, Result};
pub use model::{
    Catalog, CatalogResource, CatalogSide, FactSet, LegacyCatalog, NormalizedCatalog, RawCatalog,
    Resource, ResourceId, SchemaGeneration,
};
pub use normalize::normalize;
pub use parsers::{load_catalog, CatalogFormat, CatalogParser};
pub use source::{CatalogSource, DirectoryCatalogSource};
