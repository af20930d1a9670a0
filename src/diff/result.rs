//! Diff report produced for one node.

use super::stats::{format_percentage, DiffStatistics};
use super::traits::{ParameterChanges, ParameterValues, TitleChanges};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Result of comparing two catalogs of the same node.
///
/// Serializes to a JSON object with exactly these eighteen keys, in this
/// order. The `catalog_percentage_*` fields are two-decimal strings while
/// `node_percentage` stays numeric, which lets consumers sort nodes by it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffReport {
    pub old_version: Option<String>,
    pub new_version: Option<String>,
    pub total_resources_in_old: usize,
    pub total_resources_in_new: usize,
    pub only_in_old: Vec<String>,
    pub only_in_new: Vec<String>,
    pub differences_in_old: IndexMap<String, ParameterValues>,
    pub differences_in_new: IndexMap<String, ParameterValues>,
    pub differences_as_diff: IndexMap<String, String>,
    pub params_in_old: IndexMap<String, Vec<String>>,
    pub params_in_new: IndexMap<String, Vec<String>>,
    pub content_differences: IndexMap<String, BTreeMap<String, String>>,
    pub catalog_percentage_added: String,
    pub catalog_percentage_removed: String,
    pub catalog_percentage_changed: String,
    pub added_and_removed_resources: String,
    pub node_percentage: f64,
    pub node_differences: usize,
}

impl DiffReport {
    /// Assemble the report from the stage outputs.
    #[must_use]
    pub fn assemble(
        versions: (Option<String>, Option<String>),
        titles: TitleChanges,
        parameters: ParameterChanges,
        stats: &DiffStatistics,
    ) -> Self {
        let (old_version, new_version) = versions;
        Self {
            old_version,
            new_version,
            total_resources_in_old: stats.total_in_old,
            total_resources_in_new: stats.total_in_new,
            only_in_old: titles.only_in_old,
            only_in_new: titles.only_in_new,
            differences_in_old: parameters.differences_in_old,
            differences_in_new: parameters.differences_in_new,
            differences_as_diff: parameters.differences_as_diff,
            params_in_old: parameters.params_in_old,
            params_in_new: parameters.params_in_new,
            content_differences: parameters.content_differences,
            catalog_percentage_added: format_percentage(stats.additions_percentage),
            catalog_percentage_removed: format_percentage(stats.subtractions_percentage),
            catalog_percentage_changed: format_percentage(stats.changes_percentage),
            added_and_removed_resources: stats.added_and_removed(),
            node_percentage: stats.node_percentage,
            node_differences: stats.node_differences,
        }
    }

    /// Check if the catalogs differ at all
    #[must_use]
    pub const fn has_changes(&self) -> bool {
        self.node_differences > 0
    }

    /// Number of resources whose parameters changed
    #[must_use]
    pub fn changed_resources(&self) -> usize {
        self.params_in_new.len()
    }

    /// Serialize as JSON
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}
