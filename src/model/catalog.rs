//! Current-schema catalog document.

use crate::error::{CatalogDiffError, Result};
use crate::utils::hash_json_value;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

/// A compiled catalog as returned by the compilation service.
///
/// Equality and hashing cover `tags`, `name`, `environment`, `resources`,
/// `edges` and `classes`. The compilation metadata (`version`, `code_id`,
/// `catalog_uuid`, `catalog_format`) changes on every compile and is ignored,
/// so two compiles of the same code compare equal.
///
/// Fields are private; a catalog is assembled once through the `with_*`
/// methods and is read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    tags: BTreeSet<String>,
    name: String,
    #[serde(default, deserialize_with = "opaque_token")]
    version: Option<String>,
    #[serde(default, deserialize_with = "opaque_token")]
    code_id: Option<String>,
    #[serde(default, deserialize_with = "opaque_token")]
    catalog_uuid: Option<String>,
    #[serde(default)]
    catalog_format: Option<u64>,
    #[serde(default, deserialize_with = "string_or_null")]
    environment: String,
    #[serde(default)]
    resources: Vec<CatalogResource>,
    #[serde(default)]
    edges: Vec<CatalogEdge>,
    #[serde(default)]
    classes: Vec<String>,
}

impl Catalog {
    /// Create an empty catalog for `name` in `environment`
    #[must_use]
    pub fn new(name: impl Into<String>, environment: impl Into<String>) -> Self {
        Self {
            tags: BTreeSet::new(),
            name: name.into(),
            version: None,
            code_id: None,
            catalog_uuid: None,
            catalog_format: None,
            environment: environment.into(),
            resources: Vec::new(),
            edges: Vec::new(),
            classes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    #[must_use]
    pub fn with_code_id(mut self, code_id: impl Into<String>) -> Self {
        self.code_id = Some(code_id.into());
        self
    }

    #[must_use]
    pub fn with_catalog_uuid(mut self, uuid: impl Into<String>) -> Self {
        self.catalog_uuid = Some(uuid.into());
        self
    }

    #[must_use]
    pub const fn with_catalog_format(mut self, format: u64) -> Self {
        self.catalog_format = Some(format);
        self
    }

    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_resources(mut self, resources: Vec<CatalogResource>) -> Self {
        self.resources = resources;
        self
    }

    #[must_use]
    pub fn with_edges(mut self, edges: Vec<CatalogEdge>) -> Self {
        self.edges = edges;
        self
    }

    #[must_use]
    pub fn with_classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.classes = classes.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub const fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    #[must_use]
    pub fn code_id(&self) -> Option<&str> {
        self.code_id.as_deref()
    }

    #[must_use]
    pub fn catalog_uuid(&self) -> Option<&str> {
        self.catalog_uuid.as_deref()
    }

    #[must_use]
    pub const fn catalog_format(&self) -> Option<u64> {
        self.catalog_format
    }

    #[must_use]
    pub fn environment(&self) -> &str {
        &self.environment
    }

    #[must_use]
    pub fn resources(&self) -> &[CatalogResource] {
        &self.resources
    }

    #[must_use]
    pub fn edges(&self) -> &[CatalogEdge] {
        &self.edges
    }

    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Serialize to the ten-field JSON document
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| {
            CatalogDiffError::malformed(PathBuf::from(&self.name), format!("serialize: {e}"))
        })
    }

    /// Write the catalog to `<dir>/<node>.json`, returning the written path.
    pub fn write_to(&self, dir: &Path, node: &str) -> Result<PathBuf> {
        let path = dir.join(format!("{node}.json"));
        let json = self.to_json_string()?;
        std::fs::write(&path, json).map_err(|e| CatalogDiffError::io(&path, e))?;
        tracing::debug!(path = %path.display(), "Wrote catalog");
        Ok(path)
    }
}

impl PartialEq for Catalog {
    fn eq(&self, other: &Self) -> bool {
        self.tags == other.tags
            && self.name == other.name
            && self.environment == other.environment
            && self.resources == other.resources
            && self.edges == other.edges
            && self.classes == other.classes
    }
}

impl Eq for Catalog {}

impl Hash for Catalog {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tags.hash(state);
        self.name.hash(state);
        self.environment.hash(state);
        self.resources.hash(state);
        self.edges.hash(state);
        self.classes.hash(state);
    }
}

/// One resource entry of a current-schema catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogResource {
    #[serde(rename = "type")]
    pub resource_type: String,
    #[serde(deserialize_with = "scalar_string")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u64>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub exported: bool,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub parameters: Map<String, Value>,
}

impl CatalogResource {
    /// Create a resource with no parameters
    #[must_use]
    pub fn new(resource_type: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            title: title.into(),
            tags: Vec::new(),
            file: None,
            line: None,
            exported: false,
            parameters: Map::new(),
        }
    }

    /// Add a parameter
    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>, value: Value) -> Self {
        self.parameters.insert(name.into(), value);
        self
    }

    /// Set the manifest location the resource was declared at
    #[must_use]
    pub fn with_location(mut self, file: impl Into<String>, line: u64) -> Self {
        self.file = Some(file.into());
        self.line = Some(line);
        self
    }
}

impl Hash for CatalogResource {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.resource_type.hash(state);
        self.title.hash(state);
        self.tags.hash(state);
        self.file.hash(state);
        self.line.hash(state);
        self.exported.hash(state);
        // Map iteration order depends on serde_json features; hash as one
        // object so keys are visited sorted.
        hash_json_value(&Value::Object(self.parameters.clone()), state);
    }
}

/// A containment or ordering edge between two resource references.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CatalogEdge {
    pub source: String,
    pub target: String,
}

impl CatalogEdge {
    #[must_use]
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

// ============================================================================
// Lenient field deserializers
// ============================================================================

/// Version-like fields are strings in newer compilers and integers in older
/// ones. Keep them as opaque text.
pub(crate) fn opaque_token<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

fn string_or_null<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opaque_token(deserializer)?.unwrap_or_default())
}

/// Titles are strings, but numeric titles occur in hand-written manifests.
pub(crate) fn scalar_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        v @ (Value::Number(_) | Value::Bool(_)) => Ok(v.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a scalar title, found {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(catalog: &Catalog) -> u64 {
        let mut hasher = DefaultHasher::new();
        catalog.hash(&mut hasher);
        hasher.finish()
    }

    fn sample() -> Catalog {
        Catalog::new("web01.example.com", "production")
            .with_tags(["settings", "class"])
            .with_resources(vec![
                CatalogResource::new("File", "/etc/motd")
                    .with_parameter("ensure", json!("file"))
                    .with_parameter("content", json!("hello\n")),
                CatalogResource::new("Class", "main"),
            ])
            .with_edges(vec![CatalogEdge::new("Class[main]", "File[/etc/motd]")])
            .with_classes(["settings"])
    }

    #[test]
    fn test_equality_ignores_compile_metadata() {
        let a = sample().with_version("1700000000").with_code_id("abc");
        let b = sample()
            .with_version("1700000999")
            .with_catalog_uuid("3f1e")
            .with_catalog_format(1);

        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_equality_covers_resources() {
        let a = sample();
        let b = sample().with_resources(vec![CatalogResource::new("File", "/etc/motd")]);
        assert_ne!(a, b);

        let c = sample().with_classes(["other"]);
        assert_ne!(a, c);
    }

    #[test]
    fn test_json_round_trip() {
        let original = sample().with_version("42").with_catalog_format(1);
        let json = original.to_json_string().unwrap();
        let parsed: Catalog = serde_json::from_str(&json).unwrap();

        assert_eq!(original, parsed);
        assert_eq!(parsed.version(), Some("42"));
        assert_eq!(parsed.catalog_format(), Some(1));
    }

    #[test]
    fn test_absent_metadata_serializes_as_null() {
        let json = sample().to_json_string().unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        let obj = value.as_object().unwrap();

        assert_eq!(obj.len(), 10);
        assert_eq!(obj["version"], Value::Null);
        assert_eq!(obj["code_id"], Value::Null);
        assert_eq!(obj["catalog_uuid"], Value::Null);
        assert_eq!(obj["catalog_format"], Value::Null);
    }

    #[test]
    fn test_numeric_version_is_opaque() {
        let catalog: Catalog = serde_json::from_value(json!({
            "name": "db01",
            "version": 1_700_000_000u64,
            "environment": null,
            "resources": [{"type": "Exec", "title": 42}],
        }))
        .unwrap();

        assert_eq!(catalog.version(), Some("1700000000"));
        assert_eq!(catalog.environment(), "");
        assert_eq!(catalog.resources()[0].title, "42");
    }

    #[test]
    fn test_parameter_order_does_not_affect_hash() {
        let a = Catalog::new("n", "e").with_resources(vec![CatalogResource::new("File", "a")
            .with_parameter("owner", json!("root"))
            .with_parameter("mode", json!("0644"))]);
        let b = Catalog::new("n", "e").with_resources(vec![CatalogResource::new("File", "a")
            .with_parameter("mode", json!("0644"))
            .with_parameter("owner", json!("root"))]);

        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_write_to_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = sample().write_to(dir.path(), "web01").unwrap();

        assert_eq!(path, dir.path().join("web01.json"));
        let parsed: Catalog =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed, sample());
    }
}
