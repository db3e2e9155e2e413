//! Report command handler

use tierloc::{measure_file, render_report, render_report_json, MeasurementReport};

use crate::commands::{ReportArgs, ReportFormat};
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::ConsoleReporter;

/// Execute the report command
pub fn execute_report(config: &CliConfig, args: &ReportArgs) -> CliResult<()> {
    let reporter = ConsoleReporter::new(config.color.should_color(), config.verbosity.is_quiet());
    tracing::debug!(manifest = %args.manifest.display(), format = ?config.format, "measuring");
    let report = measure_file(&args.manifest)?;

    match config.format {
        ReportFormat::Text => reporter.print_report(&render(&report, config.format)?)?,
        ReportFormat::Json => reporter.print_raw(&render(&report, config.format)?)?,
    }

    if !report.unmatched_call_sites.is_empty() {
        reporter.warning(&format!(
            "{} call site(s) matched no lower-tier action",
            report.unmatched_call_sites.len()
        ));
    }
    Ok(())
}

/// Render a report in the requested format
pub fn render(report: &MeasurementReport, format: ReportFormat) -> CliResult<String> {
    Ok(match format {
        ReportFormat::Text => render_report(report),
        ReportFormat::Json => render_report_json(report)?,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::handlers::tests::project;

    #[test]
    fn test_render_text() {
        let dir = project();
        let report = measure_file(&dir.path().join("tierloc.yaml")).unwrap();
        let text = render(&report, ReportFormat::Text).unwrap();
        // ping: (1 + 2) + (1 + 2) + 1 = 7; sweep: 2 + 7 = 9
        assert!(text.contains("pingAction: 7\n"));
        assert!(text.contains("sweepAction: 9\n"));
        assert!(text.contains("### Sweep ###\nLines with abstraction: 2\n"));
        assert!(text.contains("Lines without abstraction: 11\n"));
        assert!(text.contains("Saved lines: 9\n"));
    }

    #[test]
    fn test_render_json() {
        let dir = project();
        let report = measure_file(&dir.path().join("tierloc.yaml")).unwrap();
        let json = render(&report, ReportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["strategies"][0]["saved_lines"], 9);
        assert_eq!(value["strategies"][0]["hypothetical_total"], 11);
    }

    #[test]
    fn test_execute_report_missing_manifest() {
        let dir = project();
        let args = ReportArgs {
            manifest: dir.path().join("missing.yaml"),
            format: ReportFormat::Text,
        };
        assert!(execute_report(&CliConfig::new(), &args).is_err());
    }
}
