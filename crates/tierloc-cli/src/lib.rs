//! Tierloc CLI library
//!
//! Command-line interface for the tierloc line-accounting engine.
//!
//! ## Usage
//!
//! ```bash
//! tierloc report                          # Text report from ./tierloc.yaml
//! tierloc report -m demo.yaml -f json     # JSON report
//! tierloc check                           # List resolved units
//! tierloc lines composite:scanAction      # Semantic lines of one unit
//! ```

#![warn(missing_docs)]

mod commands;
mod config;
mod error;
pub mod handlers;
pub mod logging;
mod output;

pub use commands::{
    CheckArgs, Cli, ColorArg, Commands, LinesArgs, ReportArgs, ReportFormat, DEFAULT_MANIFEST,
};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{stylize_report, ConsoleReporter};
