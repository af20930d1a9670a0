//! Extension-based format dispatch.
//!
//! Formats are chosen strictly by file extension. Content is never sniffed:
//! a `.json` file holding YAML is malformed, not misdetected.

use super::traits::CatalogParser;
use super::{JsonParser, MarshalParser, PsonParser, YamlParser};
use crate::model::SchemaGeneration;
use std::fmt;
use std::path::Path;

/// On-disk catalog formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogFormat {
    /// `.yaml` / `.yml`
    Yaml,
    /// `.marshal`, a bincode-encoded value tree
    Marshal,
    /// `.pson`, JSON text that may contain invalid UTF-8
    Pson,
    /// `.json`
    Json,
}

impl CatalogFormat {
    /// All formats, in the order they are listed to users
    pub const ALL: [Self; 4] = [Self::Pson, Self::Yaml, Self::Marshal, Self::Json];

    /// Determine the format from a path's extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        Self::from_extension(ext)
    }

    /// Determine the format from a bare extension (no leading dot).
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "yaml" | "yml" => Some(Self::Yaml),
            "marshal" => Some(Self::Marshal),
            "pson" => Some(Self::Pson),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Yaml => "YAML",
            Self::Marshal => "marshal",
            Self::Pson => "PSON",
            Self::Json => "JSON",
        }
    }

    /// Whether this format can carry the given schema generation.
    ///
    /// JSON catalogs postdate the 0.24 layout.
    #[must_use]
    pub const fn supports(&self, generation: SchemaGeneration) -> bool {
        !matches!(
            (self, generation),
            (Self::Json, SchemaGeneration::Legacy)
        )
    }

    /// Parser for this format
    #[must_use]
    pub fn parser(&self) -> Box<dyn CatalogParser> {
        match self {
            Self::Yaml => Box::new(YamlParser::new()),
            Self::Marshal => Box::new(MarshalParser::new()),
            Self::Pson => Box::new(PsonParser::new()),
            Self::Json => Box::new(JsonParser::new()),
        }
    }

    /// Human-readable list of accepted extensions
    #[must_use]
    pub fn accepted_extensions() -> String {
        "pson, yaml, yml, marshal and json".to_string()
    }
}

impl fmt::Display for CatalogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_from_path() {
        assert_eq!(
            CatalogFormat::from_path(&PathBuf::from("/tmp/web01.yml")),
            Some(CatalogFormat::Yaml)
        );
        assert_eq!(
            CatalogFormat::from_path(&PathBuf::from("web01.example.com.pson")),
            Some(CatalogFormat::Pson)
        );
        assert_eq!(CatalogFormat::from_path(&PathBuf::from("catalog.txt")), None);
        assert_eq!(CatalogFormat::from_path(&PathBuf::from("catalog")), None);
        assert_eq!(CatalogFormat::from_path(&PathBuf::from("catalog.JSON")), None);
    }

    #[test]
    fn test_json_not_supported_for_legacy() {
        assert!(!CatalogFormat::Json.supports(SchemaGeneration::Legacy));
        assert!(CatalogFormat::Json.supports(SchemaGeneration::Current));
        assert!(CatalogFormat::Yaml.supports(SchemaGeneration::Legacy));
    }

    #[test]
    fn test_parser_format_matches() {
        for format in CatalogFormat::ALL {
            assert_eq!(format.parser().format(), format);
        }
    }
}
