//! Command handlers
//!
//! Each module holds the execution logic for one subcommand plus the pure
//! helpers it renders with.

pub mod check;
pub mod lines;
pub mod report;

use std::path::Path;
use tierloc::{manifest_dir, Manifest, SourceRegistry};

use crate::error::CliResult;

pub use check::{check_rows, execute_check, render_check, CheckRow};
pub use lines::{execute_lines, unit_lines};
pub use report::{execute_report, render};

/// Load a manifest and resolve every unit it declares
pub fn load(manifest_path: &Path) -> CliResult<(Manifest, SourceRegistry)> {
    let manifest = Manifest::from_file(manifest_path)?;
    let base_dir = manifest_dir(manifest_path);
    tracing::debug!(
        manifest = %manifest_path.display(),
        base_dir = %base_dir.display(),
        "loading manifest"
    );
    let registry = SourceRegistry::resolve(&manifest, base_dir)?;
    Ok((manifest, registry))
}
