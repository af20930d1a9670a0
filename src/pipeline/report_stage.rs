//! Report output stage.
//!
//! Serializes a node or fleet report as JSON and writes it to the
//! configured destination.

use super::{write_output, OutputTarget, PipelineError};
use crate::config::AppConfig;
use anyhow::Result;
use serde::Serialize;

/// Serialize a report as JSON.
pub fn render_report<T: Serialize>(report: &T, pretty: bool) -> Result<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(report)
    } else {
        serde_json::to_string(report)
    };
    rendered.map_err(|e| PipelineError::ReportFailed { source: e.into() }.into())
}

/// Output a report to the configured destination.
pub fn output_report<T: Serialize>(config: &AppConfig, report: &T) -> Result<()> {
    let content = render_report(report, config.output.pretty)?;
    let target = OutputTarget::from_option(config.output.file.clone());
    write_output(&content, &target, config.behavior.quiet)
        .map_err(|source| PipelineError::ReportFailed { source }.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::{DiffReport, DiffStatistics, ParameterChanges, TitleChanges};

    fn report() -> DiffReport {
        DiffReport::assemble(
            (Some("1".into()), Some("2".into())),
            TitleChanges {
                only_in_old: vec![],
                only_in_new: vec!["Package[nginx]".into()],
            },
            ParameterChanges::default(),
            &DiffStatistics::compute(1, 2, 1, 0, 0),
        )
    }

    #[test]
    fn test_render_compact_and_pretty() {
        let compact = render_report(&report(), false).unwrap();
        assert!(!compact.contains('\n'));
        let pretty = render_report(&report(), true).unwrap();
        assert!(pretty.contains("\n  \"old_version\": \"1\""));
    }

    #[test]
    fn test_output_report_to_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("report.json");
        let config = AppConfig::builder()
            .output_file(Some(path.clone()))
            .quiet(true)
            .build();

        output_report(&config, &report()).unwrap();

        let written: DiffReport =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(written, report());
    }
}
