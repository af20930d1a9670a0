//! Catalog data structures.
//!
//! Two raw layouts are read from disk: the current [`Catalog`] document and
//! the 0.24 [`LegacyCatalog`] tree. Both are normalized into a
//! [`NormalizedCatalog`] of [`Resource`]s keyed by [`ResourceId`] before any
//! comparison happens.
//!
//! ```ignore
//! let raw = parsers::load_catalog(&path, SchemaGeneration::Current, CatalogSide::Old)?;
//! let catalog = normalize::normalize(&raw, CatalogSide::Old, &options.ignore_parameters)?;
//! let motd = catalog.get(&ResourceId::new("File", "/etc/motd"));
//! ```

mod catalog;
mod facts;
mod legacy;
mod raw;
mod resource;

pub use catalog::*;
pub use facts::*;
pub use legacy::*;
pub use raw::*;
pub use resource::*;
