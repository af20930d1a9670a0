//! Diff computation stage.
//!
//! Turns a validated [`AppConfig`] into a [`CatalogDiffer`] or
//! [`FleetDiffer`] run and reports progress unless quiet.

use super::PipelineError;
use crate::config::{AppConfig, Validatable};
use crate::diff::{CatalogDiffer, DiffCache, DiffReport, FleetDiffer, FleetReport};
use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

fn check_config(config: &AppConfig) -> Result<(), PipelineError> {
    let errors = config.validate();
    if errors.is_empty() {
        return Ok(());
    }
    let reason = errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    Err(PipelineError::InvalidConfig { reason })
}

/// Diff the catalogs of one node.
pub fn compute_diff(config: &AppConfig, old: &Path, new: &Path) -> Result<DiffReport> {
    check_config(config)?;
    let quiet = config.behavior.quiet;

    if !quiet {
        tracing::info!(
            "Comparing {} against {} (schema {})",
            old.display(),
            new.display(),
            config.loader.schema
        );
    }

    let report = CatalogDiffer::new(old, new)
        .with_schema(config.loader.schema)
        .with_options(config.diff.clone())
        .diff()
        .map_err(|e| PipelineError::DiffFailed {
            old: old.to_path_buf(),
            new: new.to_path_buf(),
            source: e.into(),
        })?;

    if !quiet {
        tracing::info!(
            "Diff complete: {} added, {} removed, {} changed, node percentage {:.2}",
            report.only_in_new.len(),
            report.only_in_old.len(),
            report.changed_resources(),
            report.node_percentage
        );
    }

    Ok(report)
}

/// Diff every node found in two catalog directories.
pub fn compute_fleet(config: &AppConfig, old_dir: &Path, new_dir: &Path) -> Result<FleetReport> {
    check_config(config)?;
    let quiet = config.behavior.quiet;

    let cache = Arc::new(DiffCache::new());
    let report = FleetDiffer::new(old_dir, new_dir)
        .with_schema(config.loader.schema)
        .with_options(config.diff.clone())
        .with_threads(config.fleet.threads)
        .with_changed_depth(config.fleet.changed_depth)
        .with_cache(Arc::clone(&cache))
        .run()
        .map_err(|e| PipelineError::DiffFailed {
            old: old_dir.to_path_buf(),
            new: new_dir.to_path_buf(),
            source: e.into(),
        })?;

    let stats = cache.stats();
    tracing::debug!(
        lookups = stats.lookups,
        hits = stats.hits,
        "Fleet cache usage"
    );
    if !quiet {
        tracing::info!(
            "Fleet diff complete: {} nodes, {} compared, {} failed ({:.2}%)",
            report.total_nodes,
            report.compiled_nodes_total,
            report.failed_nodes_total,
            report.total_percentage
        );
    }

    Ok(report)
}
