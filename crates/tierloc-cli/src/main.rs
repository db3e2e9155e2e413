//! Tierloc CLI: measure the lines a layered action abstraction saves

use clap::Parser;
use std::process::ExitCode;
use tierloc_cli::{handlers, logging, Cli, CliConfig, CliResult, Commands};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let config = CliConfig::from_cli(&cli);
    logging::init_tracing(config.verbosity, config.color.should_color());

    match cli.command {
        Commands::Report(args) => {
            let config = config.with_format(args.format);
            handlers::execute_report(&config, &args)
        }
        Commands::Check(args) => handlers::execute_check(&config, &args),
        Commands::Lines(args) => handlers::execute_lines(&config, &args),
    }
}
