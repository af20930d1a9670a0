//! Node-by-node diff of two catalog directories.
//!
//! Catalog files are paired by file stem (the node name). Each pair is
//! diffed on a bounded rayon pool. A failing node is recorded and the rest
//! of the batch continues.

use super::incremental::{DiffCache, DiffCacheKey};
use super::{CatalogDiffer, DiffOptions, DiffReport};
use crate::error::{CatalogDiffError, ErrorContext, Result};
use crate::model::{CatalogSide, SchemaGeneration};
use crate::parsers::CatalogFormat;
use crate::utils::content_hash;
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

/// Default worker count
pub const DEFAULT_THREADS: usize = 10;
/// Default length of the ranked lists in a [`FleetReport`]
pub const DEFAULT_CHANGED_DEPTH: usize = 10;

/// Runs [`CatalogDiffer`] over every node found in two directories.
pub struct FleetDiffer {
    old_dir: PathBuf,
    new_dir: PathBuf,
    schema: SchemaGeneration,
    options: DiffOptions,
    threads: usize,
    changed_depth: usize,
    cache: Option<Arc<DiffCache>>,
}

impl FleetDiffer {
    pub fn new(old_dir: impl Into<PathBuf>, new_dir: impl Into<PathBuf>) -> Self {
        Self {
            old_dir: old_dir.into(),
            new_dir: new_dir.into(),
            schema: SchemaGeneration::default(),
            options: DiffOptions::default(),
            threads: DEFAULT_THREADS,
            changed_depth: DEFAULT_CHANGED_DEPTH,
            cache: None,
        }
    }

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
    pub const fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    #[must_use]
    pub const fn with_changed_depth(mut self, depth: usize) -> Self {
        self.changed_depth = depth;
        self
    }

    /// Share a report cache across runs
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<DiffCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Diff every node and summarize.
    ///
    /// Fails only when a directory cannot be listed or the worker pool
    /// cannot be built; per-node errors land in the report.
    pub fn run(&self) -> Result<FleetReport> {
        if self.threads == 0 {
            return Err(CatalogDiffError::config("fleet thread count must be at least 1"));
        }
        let old_nodes = discover(&self.old_dir, CatalogSide::Old)?;
        let new_nodes = discover(&self.new_dir, CatalogSide::New)?;
        let names: BTreeSet<&String> = old_nodes.keys().chain(new_nodes.keys()).collect();

        tracing::info!(
            nodes = names.len(),
            threads = self.threads,
            "Diffing catalogs of {} nodes",
            names.len()
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .build()
            .map_err(|e| CatalogDiffError::config(format!("cannot start worker pool: {e}")))?;

        let outcomes: Vec<(String, std::result::Result<Arc<DiffReport>, String>)> =
            pool.install(|| {
                names
                    .par_iter()
                    .map(|name| {
                        let outcome = match (old_nodes.get(*name), new_nodes.get(*name)) {
                            (Some(old), Some(new)) => self.diff_node(name, old, new),
                            (Some(_), None) => Err(format!(
                                "{name}: missing counterpart in {}",
                                self.new_dir.display()
                            )),
                            (None, _) => Err(format!(
                                "{name}: missing counterpart in {}",
                                self.old_dir.display()
                            )),
                        };
                        ((*name).clone(), outcome)
                    })
                    .collect()
            });

        let mut reports = BTreeMap::new();
        let mut failed_nodes = BTreeMap::new();
        for (name, outcome) in outcomes {
            match outcome {
                Ok(report) => {
                    reports.insert(name, report);
                }
                Err(error) => {
                    tracing::warn!(node = %name, "Skipping node: {error}");
                    failed_nodes.insert(name, error);
                }
            }
        }

        Ok(FleetReport::summarize(reports, failed_nodes, self.changed_depth))
    }

    fn diff_node(
        &self,
        name: &str,
        old: &Path,
        new: &Path,
    ) -> std::result::Result<Arc<DiffReport>, String> {
        let differ = CatalogDiffer::new(old, new)
            .with_schema(self.schema)
            .with_options(self.options.clone());

        let result = match &self.cache {
            Some(cache) => match DiffCacheKey::from_files(old, new, self.schema, &self.options) {
                Ok(key) => cache.get_or_compute(key, || differ.diff()),
                Err(_) => differ.diff().map(Arc::new),
            },
            None => differ.diff().map(Arc::new),
        };
        result.with_context(|| format!("node {name}")).map_err(|e| {
            tracing::debug!(node = %name, stage = e.stage(), "Node failed");
            e.to_string()
        })
    }
}

/// Map node name -> catalog file for every recognized file in `dir`.
fn discover(dir: &Path, side: CatalogSide) -> Result<BTreeMap<String, PathBuf>> {
    if !dir.is_dir() {
        return Err(CatalogDiffError::file_not_found(dir, side));
    }
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(|e| CatalogDiffError::io(dir, e))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && CatalogFormat::from_path(path).is_some())
        .collect();
    files.sort();

    let mut nodes: BTreeMap<String, PathBuf> = BTreeMap::new();
    for path in files {
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if let Some(existing) = nodes.get(stem) {
            tracing::warn!(
                kept = %existing.display(),
                ignored = %path.display(),
                "Two catalogs for the same node"
            );
            continue;
        }
        nodes.insert(stem.to_string(), path);
    }
    Ok(nodes)
}

// ============================================================================
// Fleet report
// ============================================================================

/// One node's change score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeScore {
    pub node: String,
    pub node_percentage: f64,
    pub node_differences: usize,
}

/// Failures sharing one manifest or template path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemFile {
    pub file: String,
    pub nodes: usize,
}

/// Representative error for one problem file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleError {
    pub error: String,
    pub node: String,
}

/// Summary of a fleet diff.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetReport {
    pub generated_at: DateTime<Utc>,
    pub total_nodes: usize,
    pub compiled_nodes: Vec<String>,
    pub compiled_nodes_total: usize,
    pub failed_nodes: BTreeMap<String, String>,
    pub failed_nodes_total: usize,
    /// Failed nodes as a percentage of all nodes
    pub total_percentage: f64,
    pub most_changed: Vec<NodeScore>,
    pub failed_to_compile_files: Vec<ProblemFile>,
    pub example_compile_errors: Vec<ExampleError>,
    pub nodes: BTreeMap<String, Arc<DiffReport>>,
}

impl FleetReport {
    fn summarize(
        reports: BTreeMap<String, Arc<DiffReport>>,
        failed_nodes: BTreeMap<String, String>,
        depth: usize,
    ) -> Self {
        let total_nodes = reports.len() + failed_nodes.len();
        let compiled_nodes: Vec<String> = reports.keys().cloned().collect();

        let mut most_changed: Vec<NodeScore> = reports
            .iter()
            .map(|(node, report)| NodeScore {
                node: node.clone(),
                node_percentage: report.node_percentage,
                node_differences: report.node_differences,
            })
            .collect();
        most_changed.sort_by(|a, b| {
            b.node_percentage
                .total_cmp(&a.node_percentage)
                .then_with(|| a.node.cmp(&b.node))
        });
        most_changed.truncate(depth);

        let groups = group_failures(&failed_nodes);
        let mut ranked: Vec<(&String, &Vec<String>)> = groups.iter().collect();
        ranked.sort_by(|a, b| b.1.len().cmp(&a.1.len()).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(depth);

        let failed_to_compile_files = ranked
            .iter()
            .map(|(file, nodes)| ProblemFile {
                file: (*file).clone(),
                nodes: nodes.len(),
            })
            .collect();
        let example_compile_errors = ranked
            .iter()
            .filter_map(|(_, nodes)| {
                let node = nodes.first()?;
                failed_nodes.get(node).map(|error| ExampleError {
                    error: error.clone(),
                    node: node.clone(),
                })
            })
            .collect();

        Self {
            generated_at: Utc::now(),
            total_nodes,
            compiled_nodes_total: compiled_nodes.len(),
            compiled_nodes,
            failed_nodes_total: failed_nodes.len(),
            total_percentage: super::stats::percentage(failed_nodes.len(), total_nodes),
            failed_nodes,
            most_changed,
            failed_to_compile_files,
            example_compile_errors,
            nodes: reports,
        }
    }

    /// Whether any successfully diffed node changed
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.nodes.values().any(|r| r.has_changes())
    }
}

/// Manifest or template path mentioned in a compile error
static FAILURE_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\S*(/\S*\.pp|\.erb))").expect("static regex"));

/// Group failed nodes by the `.pp` / `.erb` path their error mentions.
///
/// Errors without a path are grouped by a hash of the message with the node
/// name removed, so the same failure on different nodes lands together.
fn group_failures(failed_nodes: &BTreeMap<String, String>) -> BTreeMap<String, Vec<String>> {
    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for (node, error) in failed_nodes {
        let path = FAILURE_PATH
            .captures(error)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string());
        let key = path.unwrap_or_else(|| {
            let anonymous = error.replace(node.as_str(), "");
            format!("No-path-in-error-{:016x}", content_hash(anonymous.as_bytes()))
        });
        groups.entry(key).or_default().push(node.clone());
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Catalog, CatalogResource};
    use serde_json::json;

    fn catalog(mode: &str, extra: bool) -> Catalog {
        let mut resources =
            vec![CatalogResource::new("File", "/etc/motd").with_parameter("mode", json!(mode))];
        if extra {
            resources.push(CatalogResource::new("Package", "ntp"));
        }
        Catalog::new("node", "production").with_resources(resources)
    }

    #[test]
    fn test_group_failures_by_path() {
        let mut failed = BTreeMap::new();
        failed.insert(
            "a".to_string(),
            "Evaluation Error at /etc/puppet/modules/ntp/manifests/init.pp:12 on node a".to_string(),
        );
        failed.insert(
            "b".to_string(),
            "Evaluation Error at /etc/puppet/modules/ntp/manifests/init.pp:12 on node b".to_string(),
        );
        failed.insert("c".to_string(), "Timeout talking to c".to_string());
        failed.insert("d".to_string(), "Timeout talking to d".to_string());
        failed.insert("e".to_string(), "Something else".to_string());

        let groups = group_failures(&failed);
        assert_eq!(groups.len(), 3);
        assert_eq!(
            groups["/etc/puppet/modules/ntp/manifests/init.pp"],
            vec!["a", "b"]
        );
        let timeouts: Vec<_> = groups
            .iter()
            .filter(|(k, _)| k.starts_with("No-path-in-error-"))
            .map(|(_, v)| v.len())
            .collect();
        assert!(timeouts.contains(&2));
        assert!(timeouts.contains(&1));
    }

    #[test]
    fn test_template_path_grouping() {
        let mut failed = BTreeMap::new();
        failed.insert(
            "web01".to_string(),
            "Failed to parse template ntp/ntp.conf.erb: undefined".to_string(),
        );
        let groups = group_failures(&failed);
        assert!(groups.contains_key("ntp/ntp.conf.erb"), "{groups:?}");
    }

    #[test]
    fn test_fleet_run() {
        let old_dir = tempfile::tempdir().unwrap();
        let new_dir = tempfile::tempdir().unwrap();

        catalog("0644", false).write_to(old_dir.path(), "same").unwrap();
        catalog("0644", false).write_to(new_dir.path(), "same").unwrap();
        catalog("0644", false).write_to(old_dir.path(), "changed").unwrap();
        catalog("0600", true).write_to(new_dir.path(), "changed").unwrap();
        catalog("0644", false).write_to(old_dir.path(), "orphan").unwrap();
        std::fs::write(new_dir.path().join("broken.json"), "{").unwrap();
        std::fs::write(old_dir.path().join("broken.json"), "{").unwrap();
        std::fs::write(old_dir.path().join("notes.txt"), "ignored").unwrap();

        let cache = Arc::new(DiffCache::new());
        let report = FleetDiffer::new(old_dir.path(), new_dir.path())
            .with_threads(2)
            .with_cache(Arc::clone(&cache))
            .run()
            .unwrap();

        assert_eq!(report.total_nodes, 4);
        assert_eq!(report.compiled_nodes, vec!["changed", "same"]);
        assert_eq!(report.failed_nodes_total, 2);
        assert!(report.failed_nodes["orphan"].contains("missing counterpart"));
        let broken = &report.failed_nodes["broken"];
        assert!(broken.contains("node broken: "), "{broken}");
        assert!(broken.starts_with("Malformed catalog"), "{broken}");
        assert!((report.total_percentage - 50.0).abs() < 1e-9);
        assert_eq!(report.most_changed[0].node, "changed");
        assert_eq!(report.most_changed[1].node_percentage, 0.0);
        assert_eq!(report.failed_to_compile_files.len(), 2);
        assert_eq!(report.example_compile_errors.len(), 2);
        assert!(report.has_changes());
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_changed_depth_truncates() {
        let mut reports = BTreeMap::new();
        for (i, name) in ["a", "b", "c"].into_iter().enumerate() {
            let report = DiffReport::assemble(
                (None, None),
                Default::default(),
                Default::default(),
                &crate::diff::stats::DiffStatistics::compute(4, 4, 0, 0, i),
            );
            reports.insert(name.to_string(), Arc::new(report));
        }
        let summary = FleetReport::summarize(reports, BTreeMap::new(), 2);
        assert_eq!(summary.most_changed.len(), 2);
        assert_eq!(summary.most_changed[0].node, "c");
        assert_eq!(summary.total_percentage, 0.0);
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let result = FleetDiffer::new(dir.path().join("nope"), dir.path()).run();
        assert!(matches!(
            result,
            Err(CatalogDiffError::FileNotFound {
                side: CatalogSide::Old,
                ..
            })
        ));
    }
}
