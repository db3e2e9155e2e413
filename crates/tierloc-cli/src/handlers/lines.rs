//! Lines command handler

use tierloc::{filter::SemanticLines, Markers, SourceRegistry};

use crate::commands::LinesArgs;
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::ConsoleReporter;

/// Execute the lines command
pub fn execute_lines(config: &CliConfig, args: &LinesArgs) -> CliResult<()> {
    let reporter = ConsoleReporter::new(config.color.should_color(), config.verbosity.is_quiet());
    let (manifest, registry) = super::load(&args.manifest)?;
    for line in unit_lines(&registry, &args.unit, &manifest.markers)? {
        reporter.print_raw(&line)?;
    }
    Ok(())
}

/// Semantic lines of one registry key
pub fn unit_lines(
    registry: &SourceRegistry,
    key: &str,
    markers: &Markers,
) -> CliResult<SemanticLines> {
    if registry.get(key).is_none() {
        return Err(CliError::invalid_argument(format!(
            "unknown unit '{key}' (run `tierloc check` to list units)"
        )));
    }
    Ok(registry.semantic_lines(key, markers)?)
}
