//! Catalog diff orchestration.
//!
//! A diff runs as a fixed sequence of stages, each producing a new value:
//! [`LoadedCatalogs`] -> (class filter) -> [`TitleChanges`] ->
//! [`ParameterChanges`] -> [`DiffStatistics`] -> [`DiffReport`].

use super::changes::{ParameterChangeComputer, TitleChangeComputer};
use super::stats::DiffStatistics;
use super::traits::{ChangeComputer, ParameterChanges, TitleChanges};
use super::{DiffOptions, DiffReport};
use crate::error::Result;
use crate::model::{CatalogSide, NormalizedCatalog, SchemaGeneration};
use crate::normalize::normalize;
use crate::parsers::load_catalog;
use std::path::{Path, PathBuf};

/// Both sides of a diff after loading and normalization.
#[derive(Debug, Clone)]
pub struct LoadedCatalogs {
    pub old: NormalizedCatalog,
    pub new: NormalizedCatalog,
}

impl LoadedCatalogs {
    /// Drop `Class` resources from both sides
    #[must_use]
    pub fn without_classes(self) -> Self {
        Self {
            old: self.old.without_classes(),
            new: self.new.without_classes(),
        }
    }
}

/// Diffs the catalogs of one node.
///
/// Holds only the inputs; [`CatalogDiffer::diff`] shares no state between
/// calls and can run concurrently for different nodes.
#[derive(Debug, Clone)]
pub struct CatalogDiffer {
    from: PathBuf,
    to: PathBuf,
    schema: SchemaGeneration,
    options: DiffOptions,
}

impl CatalogDiffer {
    /// Diff `from` (old) against `to` (new)
    pub fn new(from: impl Into<PathBuf>, to: impl Into<PathBuf>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            schema: SchemaGeneration::default(),
            options: DiffOptions::default(),
        }
    }

    /// Set the schema generation of both inputs
    #[must_use]
    pub const fn with_schema(mut self, schema: SchemaGeneration) -> Self {
        self.schema = schema;
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: DiffOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn from_path(&self) -> &Path {
        &self.from
    }

    #[must_use]
    pub fn to_path(&self) -> &Path {
        &self.to
    }

    #[must_use]
    pub const fn options(&self) -> &DiffOptions {
        &self.options
    }

    /// Run the full diff.
    ///
    /// Any load or normalization failure aborts the diff; no partial report
    /// is produced.
    pub fn diff(&self) -> Result<DiffReport> {
        let loaded = self.load()?;
        Ok(compare(loaded, &self.options))
    }

    /// Load and normalize both sides.
    pub fn load(&self) -> Result<LoadedCatalogs> {
        tracing::debug!(
            from = %self.from.display(),
            to = %self.to.display(),
            schema = %self.schema,
            "Loading catalogs"
        );
        let old = self.load_side(&self.from, CatalogSide::Old)?;
        let new = self.load_side(&self.to, CatalogSide::New)?;
        tracing::debug!(
            old_resources = old.len(),
            new_resources = new.len(),
            "Catalogs loaded"
        );
        Ok(LoadedCatalogs { old, new })
    }

    fn load_side(&self, path: &Path, side: CatalogSide) -> Result<NormalizedCatalog> {
        let raw = load_catalog(path, self.schema, side)?;
        normalize(&raw, side, &self.options.ignore_parameters)
    }
}

/// Compare already-loaded catalogs.
#[must_use]
pub fn compare(loaded: LoadedCatalogs, options: &DiffOptions) -> DiffReport {
    let loaded = if options.exclude_classes {
        loaded.without_classes()
    } else {
        loaded
    };
    let LoadedCatalogs { old, new } = loaded;

    let titles: TitleChanges = TitleChangeComputer::new().compute(&old, &new);
    let parameters: ParameterChanges = ParameterChangeComputer::new()
        .exclude_classes(options.exclude_classes)
        .show_resource_diff(options.show_resource_diff)
        .content_diff(options.content_diff)
        .compute(&old, &new);

    let stats = DiffStatistics::compute(
        old.len(),
        new.len(),
        titles.additions(),
        titles.subtractions(),
        parameters.changes(),
    );
    tracing::debug!(
        only_in_old = titles.subtractions(),
        only_in_new = titles.additions(),
        changed = parameters.changes(),
        node_percentage = stats.node_percentage,
        "Comparison complete"
    );

    DiffReport::assemble(
        (
            old.version().map(String::from),
            new.version().map(String::from),
        ),
        titles,
        parameters,
        &stats,
    )
}
