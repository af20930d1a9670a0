//! JSON catalogs, as written by [`crate::model::Catalog::write_to`].

use super::traits::{raw_from_json, CatalogParser, ParseError};
use super::CatalogFormat;
use crate::model::{RawCatalog, SchemaGeneration};
use serde_json::Value;

/// JSON catalog parser
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonParser;

impl JsonParser {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl CatalogParser for JsonParser {
    fn parse_bytes(
        &self,
        content: &[u8],
        generation: SchemaGeneration,
    ) -> Result<RawCatalog, ParseError> {
        let document: Value = serde_json::from_slice(content)?;
        raw_from_json(document, generation)
    }

    fn format(&self) -> CatalogFormat {
        CatalogFormat::Json
    }
}
