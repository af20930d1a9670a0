//! Loader output before normalization.

use super::{Catalog, LegacyCatalog};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Layout of the raw catalog document.
///
/// Chosen by the caller, not sniffed from the file, and applied to both
/// inputs of a diff.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SchemaGeneration {
    /// 0.24 bucket tree
    #[serde(rename = "0.24", alias = "legacy")]
    #[value(name = "0.24", alias = "legacy")]
    Legacy,
    /// Flat resource list (0.25 onwards)
    #[default]
    Current,
}

impl fmt::Display for SchemaGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Legacy => write!(f, "0.24"),
            Self::Current => write!(f, "current"),
        }
    }
}

/// A deserialized catalog tagged with its schema generation
#[derive(Debug, Clone, PartialEq)]
pub enum RawCatalog {
    Legacy(LegacyCatalog),
    Current(Catalog),
}

impl RawCatalog {
    #[must_use]
    pub const fn generation(&self) -> SchemaGeneration {
        match self {
            Self::Legacy(_) => SchemaGeneration::Legacy,
            Self::Current(_) => SchemaGeneration::Current,
        }
    }

    /// Declared version string
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        match self {
            Self::Legacy(c) => c.version.as_deref(),
            Self::Current(c) => c.version(),
        }
    }
}
