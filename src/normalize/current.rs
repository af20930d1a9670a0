//! Current-schema catalog -> normalized resources.

use super::redact;
use crate::error::Result;
use crate::model::{Catalog, CatalogSide, NormalizedCatalog, Resource, ResourceId};

/// One resource per catalog entry, parameters verbatim apart from redaction.
pub fn convert_current(
    catalog: &Catalog,
    side: CatalogSide,
    ignore_parameters: &[String],
) -> Result<NormalizedCatalog> {
    let resources = catalog
        .resources()
        .iter()
        .map(|r| {
            Resource::new(ResourceId::new(r.resource_type.clone(), r.title.clone()), side)
                .with_parameters(redact(&r.parameters, ignore_parameters))
                .with_location(r.file.clone(), r.line)
        })
        .collect();
    NormalizedCatalog::from_resources(side, catalog.version().map(String::from), resources)
}
