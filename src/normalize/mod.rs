//! Normalization of raw catalogs into the shared resource model.
//!
//! Each [`SchemaGeneration`](crate::model::SchemaGeneration) has one pure
//! conversion function. Both apply parameter redaction; class filtering is a
//! separate step on the finished [`NormalizedCatalog`].

mod current;
mod legacy;

pub use current::convert_current;
pub use legacy::convert_legacy;

use crate::error::Result;
use crate::model::{CatalogSide, NormalizedCatalog, RawCatalog};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Normalize a raw catalog of either generation.
pub fn normalize(
    raw: &RawCatalog,
    side: CatalogSide,
    ignore_parameters: &[String],
) -> Result<NormalizedCatalog> {
    let normalized = match raw {
        RawCatalog::Legacy(catalog) => convert_legacy(catalog, side, ignore_parameters)?,
        RawCatalog::Current(catalog) => convert_current(catalog, side, ignore_parameters)?,
    };
    tracing::debug!(
        %side,
        generation = %raw.generation(),
        resources = normalized.len(),
        "Normalized catalog"
    );
    Ok(normalized)
}

/// Copy parameters into a sorted map, dropping ignored names.
fn redact(parameters: &Map<String, Value>, ignore: &[String]) -> BTreeMap<String, Value> {
    parameters
        .iter()
        .filter(|(name, _)| !ignore.iter().any(|i| i == *name))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}
