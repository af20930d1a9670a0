//! Catalog format loaders.
//!
//! A catalog file is decoded according to its extension into a
//! [`RawCatalog`] whose layout is fixed by the caller-supplied
//! [`SchemaGeneration`]:
//!
//! | Extension        | Format                                         |
//! |------------------|------------------------------------------------|
//! | `.yaml`, `.yml`  | YAML object graph (language tags ignored)      |
//! | `.marshal`       | bincode-encoded [`MarshalValue`] tree          |
//! | `.pson`          | JSON text, lossy UTF-8, optional envelope      |
//! | `.json`          | JSON text (current generation only)            |
//!
//! ## Usage
//!
//! ```no_run
//! use catalog_diff::model::{CatalogSide, SchemaGeneration};
//! use catalog_diff::parsers::load_catalog;
//! use std::path::Path;
//!
//! let raw = load_catalog(
//!     Path::new("old/web01.pson"),
//!     SchemaGeneration::Current,
//!     CatalogSide::Old,
//! )
//! .unwrap();
//! println!("version {:?}", raw.version());
//! ```

mod detection;
mod json;
mod marshal;
mod pson;
mod traits;
mod yaml;

pub use detection::CatalogFormat;
pub use json::JsonParser;
pub use marshal::{encode_marshal, MarshalParser, MarshalValue};
pub use pson::PsonParser;
pub use traits::{CatalogParser, ParseError};
pub use yaml::YamlParser;

use crate::error::{CatalogDiffError, Result};
use crate::model::{CatalogSide, RawCatalog, SchemaGeneration};
use std::path::Path;

/// Maximum catalog file size (512 MB).
const MAX_CATALOG_FILE_SIZE: u64 = 512 * 1024 * 1024;

/// Load one side of a diff from disk.
///
/// Checks run in order: the path must exist (`FileNotFound`), the extension
/// must be known and valid for `generation` (`UnsupportedFormat`), and the
/// content must decode (`MalformedCatalog`). Nothing is read before the
/// first two checks pass.
pub fn load_catalog(
    path: &Path,
    generation: SchemaGeneration,
    side: CatalogSide,
) -> Result<RawCatalog> {
    if !path.exists() {
        return Err(CatalogDiffError::file_not_found(path, side));
    }

    let format = CatalogFormat::from_path(path).ok_or_else(|| {
        CatalogDiffError::unsupported_format(
            path,
            format!(
                "provide a catalog with an appropriate file extension, valid extensions are {}",
                CatalogFormat::accepted_extensions()
            ),
        )
    })?;

    if !format.supports(generation) {
        return Err(CatalogDiffError::unsupported_format(
            path,
            format!("{format} catalogs cannot hold the {generation} schema"),
        ));
    }

    let metadata = std::fs::metadata(path).map_err(|e| CatalogDiffError::io(path, e))?;
    if metadata.len() > MAX_CATALOG_FILE_SIZE {
        return Err(CatalogDiffError::malformed(
            path,
            format!(
                "catalog is {} MB, exceeding the {} MB limit",
                metadata.len() / (1024 * 1024),
                MAX_CATALOG_FILE_SIZE / (1024 * 1024),
            ),
        ));
    }

    let content = std::fs::read(path).map_err(|e| CatalogDiffError::io(path, e))?;
    tracing::debug!(
        path = %path.display(),
        %format,
        bytes = content.len(),
        "Decoding catalog"
    );
    parse_catalog_bytes(&content, format, generation)
        .map_err(|e| CatalogDiffError::malformed(path, e.to_string()))
}

/// Decode catalog content already in memory.
pub fn parse_catalog_bytes(
    content: &[u8],
    format: CatalogFormat,
    generation: SchemaGeneration,
) -> std::result::Result<RawCatalog, ParseError> {
    format.parser().parse_bytes(content, generation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_missing_file_checked_first() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.txt");
        match load_catalog(&path, SchemaGeneration::Current, CatalogSide::New) {
            Err(CatalogDiffError::FileNotFound { side, .. }) => assert_eq!(side, CatalogSide::New),
            other => panic!("Expected FileNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("web01.txt");
        fs::write(&path, "{}").unwrap();
        let result = load_catalog(&path, SchemaGeneration::Current, CatalogSide::Old);
        assert!(matches!(
            result,
            Err(CatalogDiffError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_json_rejected_for_legacy_without_parsing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("web01.json");
        fs::write(&path, "not even json").unwrap();
        let result = load_catalog(&path, SchemaGeneration::Legacy, CatalogSide::Old);
        assert!(matches!(
            result,
            Err(CatalogDiffError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_malformed_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("web01.pson");
        fs::write(&path, "{\"name\": ").unwrap();
        match load_catalog(&path, SchemaGeneration::Current, CatalogSide::Old) {
            Err(CatalogDiffError::MalformedCatalog { path: p, .. }) => assert_eq!(p, path),
            other => panic!("Expected MalformedCatalog, got {other:?}"),
        }
    }

    #[test]
    fn test_loads_yml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("web01.yml");
        fs::write(&path, "name: web01\nversion: abc\nresources: []\n").unwrap();
        let raw = load_catalog(&path, SchemaGeneration::Current, CatalogSide::Old).unwrap();
        assert_eq!(raw.version(), Some("abc"));
    }
}
