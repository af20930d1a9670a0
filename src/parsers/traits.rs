//! Parser trait definitions and error types.

use super::CatalogFormat;
use crate::model::{RawCatalog, SchemaGeneration};
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors that can occur while decoding catalog content.
///
/// These carry no path; [`super::load_catalog`] attaches it when converting
/// to [`crate::error::CatalogDiffError::MalformedCatalog`].
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("JSON parse error: {0}")]
    JsonError(String),

    #[error("YAML parse error: {0}")]
    YamlError(String),

    #[error("Marshal decode error: {0}")]
    MarshalError(String),

    #[error("Invalid catalog structure: {0}")]
    InvalidStructure(String),
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() {
            Self::InvalidStructure(err.to_string())
        } else {
            Self::JsonError(err.to_string())
        }
    }
}

impl From<serde_yaml::Error> for ParseError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::YamlError(err.to_string())
    }
}

impl From<bincode::Error> for ParseError {
    fn from(err: bincode::Error) -> Self {
        Self::MarshalError(err.to_string())
    }
}

/// Decoder for one on-disk catalog format.
pub trait CatalogParser: Send + Sync {
    /// Decode raw file bytes into a catalog of the given generation
    fn parse_bytes(
        &self,
        content: &[u8],
        generation: SchemaGeneration,
    ) -> Result<RawCatalog, ParseError>;

    /// The format this parser handles
    fn format(&self) -> CatalogFormat;
}

/// Interpret an already-decoded JSON object graph as a raw catalog.
pub(crate) fn raw_from_json(
    value: serde_json::Value,
    generation: SchemaGeneration,
) -> Result<RawCatalog, ParseError> {
    fn decode<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, ParseError> {
        serde_json::from_value(value).map_err(|e| ParseError::InvalidStructure(e.to_string()))
    }

    if !value.is_object() {
        return Err(ParseError::InvalidStructure(
            "catalog document must be a mapping".to_string(),
        ));
    }
    Ok(match generation {
        SchemaGeneration::Legacy => RawCatalog::Legacy(decode(value)?),
        SchemaGeneration::Current => RawCatalog::Current(decode(value)?),
    })
}
