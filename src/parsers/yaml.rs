//! YAML catalogs.
//!
//! Catalogs dumped by the compiler carry language object tags such as
//! `!ruby/object:Puppet::Resource::Catalog`. Tags are stripped before the
//! document is interpreted, so tagged and plain dumps load the same way.

use super::traits::{raw_from_json, CatalogParser, ParseError};
use super::CatalogFormat;
use crate::model::{RawCatalog, SchemaGeneration};
use serde_yaml::Value;

/// YAML catalog parser
#[derive(Debug, Default, Clone, Copy)]
pub struct YamlParser;

impl YamlParser {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl CatalogParser for YamlParser {
    fn parse_bytes(
        &self,
        content: &[u8],
        generation: SchemaGeneration,
    ) -> Result<RawCatalog, ParseError> {
        let document: Value = serde_yaml::from_slice(content)?;
        let plain = strip_tags(document);
        let json = serde_json::to_value(&plain)
            .map_err(|e| ParseError::InvalidStructure(e.to_string()))?;
        raw_from_json(json, generation)
    }

    fn format(&self) -> CatalogFormat {
        CatalogFormat::Yaml
    }
}

fn strip_tags(value: Value) -> Value {
    match value {
        Value::Tagged(tagged) => strip_tags(tagged.value),
        Value::Sequence(items) => Value::Sequence(items.into_iter().map(strip_tags).collect()),
        Value::Mapping(map) => Value::Mapping(
            map.into_iter()
                .map(|(k, v)| (strip_tags(k), strip_tags(v)))
                .collect(),
        ),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TAGGED: &str = r#"--- !ruby/object:Puppet::Resource::Catalog
name: web01.example.com
version: 1700000000
environment: production
tags: [settings]
resources:
  - !ruby/object:Puppet::Resource
    type: File
    title: /etc/motd
    parameters:
      ensure: file
      content: "hello\n"
edges: []
classes: [settings]
"#;

    #[test]
    fn test_tagged_current_catalog() {
        let raw = YamlParser::new()
            .parse_bytes(TAGGED.as_bytes(), SchemaGeneration::Current)
            .unwrap();
        let RawCatalog::Current(catalog) = raw else {
            panic!("expected current catalog");
        };
        assert_eq!(catalog.name(), "web01.example.com");
        assert_eq!(catalog.version(), Some("1700000000"));
        assert_eq!(catalog.resources()[0].parameters["ensure"], "file");
    }

    #[test]
    fn test_legacy_tree() {
        let doc = "version: '7'\nchildren:\n  - type: File\n    name: /tmp/x\n";
        let raw = YamlParser::new()
            .parse_bytes(doc.as_bytes(), SchemaGeneration::Legacy)
            .unwrap();
        assert_eq!(raw.generation(), SchemaGeneration::Legacy);
        assert_eq!(raw.version(), Some("7"));
    }

    #[test]
    fn test_syntax_error() {
        let result = YamlParser::new().parse_bytes(b"name: [unclosed", SchemaGeneration::Current);
        assert!(matches!(result, Err(ParseError::YamlError(_))));
    }

    #[test]
    fn test_scalar_document_rejected() {
        let result = YamlParser::new().parse_bytes(b"just a string", SchemaGeneration::Current);
        assert!(matches!(result, Err(ParseError::InvalidStructure(_))));
    }
}
