//! Fleet command handler.
//!
//! Implements the `fleet` subcommand: a node-by-node diff of two catalog
//! directories.

use crate::config::AppConfig;
use crate::diff::FleetReport;
use crate::pipeline::{compute_fleet, exit_codes, output_report};
use anyhow::Result;
use std::path::Path;

/// Run the fleet command, returning the desired exit code.
#[allow(clippy::needless_pass_by_value)]
pub fn run_fleet(config: AppConfig, old_dir: &Path, new_dir: &Path) -> Result<i32> {
    let report = compute_fleet(&config, old_dir, new_dir)?;

    if !config.behavior.quiet {
        for score in &report.most_changed {
            tracing::info!(
                "{}: {:.2}% ({} differences)",
                score.node,
                score.node_percentage,
                score.node_differences
            );
        }
    }

    output_report(&config, &report)?;
    Ok(determine_exit_code(&config, &report))
}

fn determine_exit_code(config: &AppConfig, report: &FleetReport) -> i32 {
    if config.behavior.fail_on_change && report.has_changes() {
        return exit_codes::CHANGES_DETECTED;
    }
    exit_codes::SUCCESS
}
