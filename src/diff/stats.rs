//! Per-node change statistics.
//!
//! Every ratio has a zero-denominator guard, so empty catalogs produce
//! `0.0` instead of `NaN` or infinity.

use serde::{Deserialize, Serialize};

/// Aggregate counts and percentages for one node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiffStatistics {
    pub total_in_old: usize,
    pub total_in_new: usize,
    pub additions: usize,
    pub subtractions: usize,
    pub changes: usize,
    pub additions_percentage: f64,
    pub subtractions_percentage: f64,
    pub changes_percentage: f64,
    pub node_percentage: f64,
    pub node_differences: usize,
}

impl DiffStatistics {
    /// Fold resource counts into percentages.
    ///
    /// Additions are measured against the new catalog, subtractions and
    /// changes against the old one. `node_percentage` averages the non-zero
    /// percentages, except that a catalog made entirely of additions scores
    /// 100 regardless of the others.
    #[must_use]
    pub fn compute(
        total_in_old: usize,
        total_in_new: usize,
        additions: usize,
        subtractions: usize,
        changes: usize,
    ) -> Self {
        let changes_percentage = percentage(changes, total_in_old);
        let additions_percentage = percentage(additions, total_in_new);
        let subtractions_percentage = percentage(subtractions, total_in_old);

        let parts = [
            changes_percentage,
            additions_percentage,
            subtractions_percentage,
        ];
        let divide_by = parts.iter().filter(|p| **p != 0.0).count();

        #[allow(clippy::float_cmp)]
        let node_percentage = if divide_by == 0 {
            0.0
        } else if additions_percentage == 100.0 {
            100.0
        } else {
            parts.iter().sum::<f64>() / divide_by as f64
        };

        Self {
            total_in_old,
            total_in_new,
            additions,
            subtractions,
            changes,
            additions_percentage,
            subtractions_percentage,
            changes_percentage,
            node_percentage,
            node_differences: additions + subtractions + changes,
        }
    }

    /// `"+A / -S"`, with a bare `0` for an empty side.
    #[must_use]
    pub fn added_and_removed(&self) -> String {
        let added = if self.additions == 0 {
            "0".to_string()
        } else {
            format!("+{}", self.additions)
        };
        let removed = if self.subtractions == 0 {
            "0".to_string()
        } else {
            format!("-{}", self.subtractions)
        };
        format!("{added} / {removed}")
    }
}

/// `100 * part / whole`, or 0 when `whole` is 0.
#[must_use]
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        100.0 * (part as f64 / whole as f64)
    }
}

/// Two-decimal rendering used in reports
#[must_use]
pub fn format_percentage(value: f64) -> String {
    format!("{value:.2}")
}
