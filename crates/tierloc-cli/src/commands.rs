//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Default manifest location, relative to the working directory
pub const DEFAULT_MANIFEST: &str = "tierloc.yaml";

/// Tierloc: measure the lines a layered action abstraction saves
#[derive(Parser, Debug)]
#[command(name = "tierloc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Measure every tier and print the savings report
    Report(ReportArgs),

    /// Resolve every declared unit and list its semantic line count
    Check(CheckArgs),

    /// Print the semantic lines of one registry unit
    Lines(LinesArgs),
}

/// Arguments for the report command
#[derive(Parser, Debug)]
pub struct ReportArgs {
    /// Manifest declaring the measured units
    #[arg(short, long, default_value = DEFAULT_MANIFEST)]
    pub manifest: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: ReportFormat,
}

/// Arguments for the check command
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Manifest declaring the measured units
    #[arg(short, long, default_value = DEFAULT_MANIFEST)]
    pub manifest: PathBuf,
}

/// Arguments for the lines command
#[derive(Parser, Debug)]
pub struct LinesArgs {
    /// Registry key, e.g. `composite:scanAction`
    pub unit: String,

    /// Manifest declaring the measured units
    #[arg(short, long, default_value = DEFAULT_MANIFEST)]
    pub manifest: PathBuf,
}

/// Report output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Console text
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Color argument
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorArg {
    /// Auto-detect
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}
