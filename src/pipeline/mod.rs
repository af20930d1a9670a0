//! Pipeline orchestration for catalog diffs.
//!
//! Shared load → compare → report logic used by the CLI command handlers.

mod diff_stage;
mod output;
mod report_stage;

pub use diff_stage::{compute_diff, compute_fleet};
pub use output::{write_output, OutputTarget};
pub use report_stage::{output_report, render_report};

use std::path::PathBuf;

/// Structured pipeline error types for better diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Configuration could not be validated
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// Failed to load or compare catalogs
    #[error("Diff failed for {old} -> {new}: {source}")]
    DiffFailed {
        old: PathBuf,
        new: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    /// Report serialization or output failed
    #[error("Report failed: {source}")]
    ReportFailed {
        #[source]
        source: anyhow::Error,
    },
}

/// Exit codes for CI/CD integration
pub mod exit_codes {
    /// Success - no changes detected (or --fail-on-change not set)
    pub const SUCCESS: i32 = 0;
    /// Changes were detected
    pub const CHANGES_DETECTED: i32 = 1;
    /// An error occurred
    pub const ERROR: i32 = 3;
}
