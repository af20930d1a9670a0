//! Diff command handler.
//!
//! Implements the `diff` subcommand for comparing the catalogs of one node.

use crate::config::AppConfig;
use crate::diff::DiffReport;
use crate::pipeline::{compute_diff, exit_codes, output_report};
use anyhow::Result;
use std::path::Path;

/// Run the diff command, returning the desired exit code.
///
/// The caller is responsible for calling `std::process::exit()` with the
/// returned code when it is non-zero.
#[allow(clippy::needless_pass_by_value)]
pub fn run_diff(config: AppConfig, old: &Path, new: &Path) -> Result<i32> {
    let report = compute_diff(&config, old, new)?;
    output_report(&config, &report)?;
    Ok(determine_exit_code(&config, &report))
}

/// Determine the appropriate exit code based on the report and config flags.
const fn determine_exit_code(config: &AppConfig, report: &DiffReport) -> i32 {
    if config.behavior.fail_on_change && report.has_changes() {
        return exit_codes::CHANGES_DETECTED;
    }
    exit_codes::SUCCESS
}
