//! PSON catalogs.
//!
//! PSON is JSON that permits arbitrary bytes inside strings. Invalid UTF-8
//! sequences are replaced rather than rejected. Documents may arrive wrapped
//! in an indirector envelope (`{"document_type": "Catalog", "data": {...}}`).

use super::traits::{raw_from_json, CatalogParser, ParseError};
use super::CatalogFormat;
use crate::model::{RawCatalog, SchemaGeneration};
use serde_json::Value;

/// PSON catalog parser
#[derive(Debug, Default, Clone, Copy)]
pub struct PsonParser;

impl PsonParser {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl CatalogParser for PsonParser {
    fn parse_bytes(
        &self,
        content: &[u8],
        generation: SchemaGeneration,
    ) -> Result<RawCatalog, ParseError> {
        let text = String::from_utf8_lossy(content);
        let document: Value = serde_json::from_str(&text)?;
        raw_from_json(unwrap_envelope(document), generation)
    }

    fn format(&self) -> CatalogFormat {
        CatalogFormat::Pson
    }
}

fn unwrap_envelope(document: Value) -> Value {
    match document {
        Value::Object(mut map)
            if map.get("document_type").and_then(Value::as_str) == Some("Catalog")
                && map.contains_key("data") =>
        {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_unwrapped() {
        let doc = br#"{"document_type":"Catalog","metadata":{"api_version":1},
            "data":{"name":"web01","version":12,"resources":[{"type":"Package","title":"ntp"}]}}"#;
        let raw = PsonParser::new()
            .parse_bytes(doc, SchemaGeneration::Current)
            .unwrap();
        let RawCatalog::Current(catalog) = raw else {
            panic!("expected current catalog");
        };
        assert_eq!(catalog.name(), "web01");
        assert_eq!(catalog.version(), Some("12"));
        assert_eq!(catalog.resources().len(), 1);
    }

    #[test]
    fn test_invalid_utf8_tolerated() {
        let mut doc = br#"{"name":"web01","resources":[{"type":"File","title":"/tmp/"#.to_vec();
        doc.push(0xff);
        doc.extend_from_slice(br#""}]}"#);

        let raw = PsonParser::new()
            .parse_bytes(&doc, SchemaGeneration::Current)
            .unwrap();
        let RawCatalog::Current(catalog) = raw else {
            panic!("expected current catalog");
        };
        assert!(catalog.resources()[0].title.starts_with("/tmp/"));
    }

    #[test]
    fn test_missing_name_is_structural_error() {
        let result = PsonParser::new().parse_bytes(br#"{"resources":[]}"#, SchemaGeneration::Current);
        assert!(matches!(result, Err(ParseError::InvalidStructure(_))));
    }

    #[test]
    fn test_truncated_document() {
        let result = PsonParser::new().parse_bytes(br#"{"name":"#, SchemaGeneration::Current);
        assert!(matches!(result, Err(ParseError::JsonError(_))));
    }
}
