//! Where compiled catalogs come from.
//!
//! Compilation itself happens elsewhere. A [`CatalogSource`] hands back an
//! already-compiled [`Catalog`] for a node; the crate ships a source backed
//! by a directory of saved catalogs.

use crate::error::{CatalogDiffError, Result};
use crate::model::{Catalog, CatalogSide, FactSet, RawCatalog, SchemaGeneration};
use crate::parsers::load_catalog;
use std::path::{Path, PathBuf};

/// Provider of compiled catalogs.
pub trait CatalogSource: Send + Sync {
    /// Fetch the catalog of `node` compiled by `server` in `environment`.
    ///
    /// Implementations must not forward the `trusted` fact; use
    /// [`FactSet::without_trusted`].
    fn fetch(&self, server: &str, environment: &str, node: &str, facts: &FactSet)
        -> Result<Catalog>;
}

/// Reads `<dir>/<node>.json` files, as written by [`Catalog::write_to`].
///
/// Saved catalogs are already compiled, so facts are only logged and
/// never sent anywhere.
#[derive(Debug, Clone)]
pub struct DirectoryCatalogSource {
    dir: PathBuf,
}

impl DirectoryCatalogSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl CatalogSource for DirectoryCatalogSource {
    fn fetch(
        &self,
        server: &str,
        environment: &str,
        node: &str,
        facts: &FactSet,
    ) -> Result<Catalog> {
        tracing::debug!(
            server,
            environment,
            node,
            facts = facts.values.len(),
            "Fetching catalog from directory"
        );

        let path = self.dir.join(format!("{node}.json"));
        let catalog = match load_catalog(&path, SchemaGeneration::Current, CatalogSide::New)? {
            RawCatalog::Current(catalog) => catalog,
            RawCatalog::Legacy(_) => {
                return Err(CatalogDiffError::malformed(
                    &path,
                    "expected a current-schema catalog",
                ))
            }
        };

        if !catalog.environment().is_empty() && catalog.environment() != environment {
            tracing::warn!(
                node,
                requested = environment,
                found = catalog.environment(),
                "Catalog was compiled for a different environment"
            );
        }
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CatalogResource;
    use serde_json::Map;

    #[test]
    fn test_fetch_saved_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let saved = Catalog::new("web01", "production")
            .with_resources(vec![CatalogResource::new("Service", "sshd")]);
        saved.write_to(dir.path(), "web01").unwrap();

        let source = DirectoryCatalogSource::new(dir.path());
        let facts = FactSet::new("web01", Map::new());
        let fetched = source
            .fetch("puppet.example.com", "production", "web01", &facts)
            .unwrap();
        assert_eq!(fetched, saved);
    }

    #[test]
    fn test_fetch_ignores_facts() {
        let dir = tempfile::tempdir().unwrap();
        let saved = Catalog::new("app01", "staging");
        saved.write_to(dir.path(), "app01").unwrap();

        let mut values = Map::new();
        values.insert("trusted".into(), serde_json::json!({"certname": "app01"}));
        values.insert("os".into(), serde_json::json!("linux"));
        let facts = FactSet::new("app01", values);

        let source = DirectoryCatalogSource::new(dir.path());
        let fetched = source.fetch("puppet", "staging", "app01", &facts).unwrap();
        assert_eq!(fetched, saved);
        assert!(facts.values.contains_key("trusted"));
    }

    #[test]
    fn test_fetch_unknown_node() {
        let dir = tempfile::tempdir().unwrap();
        let source = DirectoryCatalogSource::new(dir.path());
        let facts = FactSet::new("db01", Map::new());
        let result = source.fetch("puppet", "production", "db01", &facts);
        assert!(matches!(result, Err(CatalogDiffError::FileNotFound { .. })));
    }
}
