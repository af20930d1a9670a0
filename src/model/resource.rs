//! Normalized resources shared by both schema generations.

use crate::error::{CatalogDiffError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

/// Which input of a diff a value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSide {
    Old,
    New,
}

impl fmt::Display for CatalogSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Old => write!(f, "old"),
            Self::New => write!(f, "new"),
        }
    }
}

/// Identity key of a resource: `(type, title)`.
///
/// Rendered as `Type[title]`, the reference syntax used in catalog edges.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceId {
    pub resource_type: String,
    pub title: String,
}

impl ResourceId {
    #[must_use]
    pub fn new(resource_type: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            title: title.into(),
        }
    }

    /// Whether this is a class container
    #[must_use]
    pub fn is_class(&self) -> bool {
        self.resource_type == "Class"
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.resource_type, self.title)
    }
}

/// A resource after normalization.
///
/// Parameters are kept verbatim but in a `BTreeMap`, so the declaration
/// order in the source document has no effect on comparison or output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: ResourceId,
    pub parameters: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u64>,
    pub side: CatalogSide,
}

impl Resource {
    #[must_use]
    pub fn new(id: ResourceId, side: CatalogSide) -> Self {
        Self {
            id,
            parameters: BTreeMap::new(),
            file: None,
            line: None,
            side,
        }
    }

    #[must_use]
    pub fn with_parameters(mut self, parameters: BTreeMap<String, Value>) -> Self {
        self.parameters = parameters;
        self
    }

    #[must_use]
    pub fn with_location(mut self, file: Option<String>, line: Option<u64>) -> Self {
        self.file = file;
        self.line = line;
        self
    }

    #[must_use]
    pub fn resource_type(&self) -> &str {
        &self.id.resource_type
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.id.title
    }
}

/// Normalized catalog: resources plus an identity index.
///
/// Construction rejects duplicate identities, so every `ResourceId` maps to
/// exactly one resource.
#[derive(Debug, Clone)]
pub struct NormalizedCatalog {
    side: CatalogSide,
    version: Option<String>,
    resources: Vec<Resource>,
    index: HashMap<ResourceId, usize>,
}

impl NormalizedCatalog {
    /// Build from resources, failing on the first duplicate identity.
    pub fn from_resources(
        side: CatalogSide,
        version: Option<String>,
        resources: Vec<Resource>,
    ) -> Result<Self> {
        let mut index = HashMap::with_capacity(resources.len());
        for (position, resource) in resources.iter().enumerate() {
            if index.insert(resource.id.clone(), position).is_some() {
                return Err(CatalogDiffError::duplicate_resource(
                    side,
                    resource.id.to_string(),
                ));
            }
        }
        Ok(Self {
            side,
            version,
            resources,
            index,
        })
    }

    #[must_use]
    pub const fn side(&self) -> CatalogSide {
        self.side
    }

    /// Declared catalog version, if the source had one
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    #[must_use]
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &ResourceId) -> Option<&Resource> {
        self.index.get(id).and_then(|&i| self.resources.get(i))
    }

    #[must_use]
    pub fn contains(&self, id: &ResourceId) -> bool {
        self.index.contains_key(id)
    }

    /// The set of identity keys
    #[must_use]
    pub fn ids(&self) -> BTreeSet<&ResourceId> {
        self.index.keys().collect()
    }

    /// Drop every `Class` resource.
    #[must_use]
    pub fn without_classes(self) -> Self {
        let resources: Vec<Resource> = self
            .resources
            .into_iter()
            .filter(|r| !r.id.is_class())
            .collect();
        let index = resources
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id.clone(), i))
            .collect();
        Self {
            side: self.side,
            version: self.version,
            resources,
            index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(t: &str, title: &str) -> Resource {
        Resource::new(ResourceId::new(t, title), CatalogSide::Old)
    }

    #[test]
    fn test_resource_id_display() {
        assert_eq!(ResourceId::new("File", "/etc/motd").to_string(), "File[/etc/motd]");
        assert_eq!(CatalogSide::New.to_string(), "new");
    }

    #[test]
    fn test_duplicate_identity_rejected() {
        let result = NormalizedCatalog::from_resources(
            CatalogSide::Old,
            None,
            vec![resource("File", "a"), resource("File", "a")],
        );
        match result {
            Err(CatalogDiffError::Normalization { side, resource }) => {
                assert_eq!(side, CatalogSide::Old);
                assert_eq!(resource, "File[a]");
            }
            other => panic!("Expected Normalization error, got {other:?}"),
        }
    }

    #[test]
    fn test_same_title_different_type_is_distinct() {
        let catalog = NormalizedCatalog::from_resources(
            CatalogSide::Old,
            Some("1".into()),
            vec![resource("File", "a"), resource("Package", "a")],
        )
        .unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.version(), Some("1"));
    }

    #[test]
    fn test_without_classes_rebuilds_index() {
        let catalog = NormalizedCatalog::from_resources(
            CatalogSide::Old,
            None,
            vec![
                resource("Class", "main"),
                resource("File", "a"),
                resource("Class", "ntp"),
                resource("Package", "ntp"),
            ],
        )
        .unwrap()
        .without_classes();

        assert_eq!(catalog.len(), 2);
        assert!(!catalog.contains(&ResourceId::new("Class", "main")));
        let pkg = catalog.get(&ResourceId::new("Package", "ntp")).unwrap();
        assert_eq!(pkg.title(), "ntp");
    }
}
