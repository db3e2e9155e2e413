//! Check command handler

use tierloc::{Manifest, SourceRegistry};

use crate::commands::CheckArgs;
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::ConsoleReporter;

/// One resolved registry entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRow {
    /// Registry key
    pub key: String,
    /// Number of units concatenated under the key
    pub units: usize,
    /// Semantic lines after filtering
    pub semantic_lines: usize,
}

/// Execute the check command
pub fn execute_check(config: &CliConfig, args: &CheckArgs) -> CliResult<()> {
    let reporter = ConsoleReporter::new(config.color.should_color(), config.verbosity.is_quiet());
    let (manifest, registry) = super::load(&args.manifest)?;
    let rows = check_rows(&manifest, &registry)?;
    reporter.print_raw(render_check(&rows).trim_end())?;
    reporter.success(&format!("{} units resolved", rows.len()));
    Ok(())
}

/// Semantic line counts for every registry entry, in resolution order
pub fn check_rows(manifest: &Manifest, registry: &SourceRegistry) -> CliResult<Vec<CheckRow>> {
    registry
        .entries()
        .map(|entry| {
            Ok(CheckRow {
                key: entry.key.clone(),
                units: entry.units.len(),
                semantic_lines: registry
                    .semantic_lines(&entry.key, &manifest.markers)?
                    .len(),
            })
        })
        .collect()
}

/// Render rows as an aligned two-column listing
#[must_use]
pub fn render_check(rows: &[CheckRow]) -> String {
    let width = rows.iter().map(|r| r.key.len()).max().unwrap_or(0);
    let mut output = String::new();
    for row in rows {
        output.push_str(&format!("{:<width$}  {}", row.key, row.semantic_lines));
        if row.units > 1 {
            output.push_str(&format!(" ({} units)", row.units));
        }
        output.push('\n');
    }
    output
}
