//! 0.24 bucket tree -> normalized resources.

use super::redact;
use crate::error::Result;
use crate::model::{CatalogSide, LegacyCatalog, LegacyNode, NormalizedCatalog, Resource, ResourceId};

/// Flatten a legacy tree.
///
/// Containers are descended into and never emitted; every leaf becomes one
/// resource. Legacy type names are lowercase (`file`, `foo::bar`) and are
/// converted to reference case (`File`, `Foo::Bar`) so they line up with
/// current-schema catalogs.
pub fn convert_legacy(
    catalog: &LegacyCatalog,
    side: CatalogSide,
    ignore_parameters: &[String],
) -> Result<NormalizedCatalog> {
    let mut resources = Vec::new();
    collect_leaves(&catalog.children, side, ignore_parameters, &mut resources);
    NormalizedCatalog::from_resources(side, catalog.version.clone(), resources)
}

fn collect_leaves(
    nodes: &[LegacyNode],
    side: CatalogSide,
    ignore_parameters: &[String],
    out: &mut Vec<Resource>,
) {
    for node in nodes {
        match &node.children {
            Some(children) => collect_leaves(children, side, ignore_parameters, out),
            None => {
                let id = ResourceId::new(reference_case(&node.node_type), node.name.clone());
                let parameters = redact(&node.parameters, ignore_parameters);
                out.push(
                    Resource::new(id, side)
                        .with_parameters(parameters)
                        .with_location(node.file.clone(), node.line),
                );
            }
        }
    }
}

/// `foo::bar` -> `Foo::Bar`
fn reference_case(type_name: &str) -> String {
    type_name
        .split("::")
        .map(|segment| {
            let mut chars = segment.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join("::")
}
