//! Podar CLI
//!
//! Inspect and validate pruning configurations.
//!
//! # Usage
//!
//! ```bash
//! # Validate config
//! podar validate pruner.yaml
//!
//! # Show the parsed configuration
//! podar validate pruner.yaml --detailed
//!
//! # Print every scheduled mask update for a 16x3x3x3 weight
//! podar schedule pruner.yaml --elements 432
//!
//! # Same, as JSON, with debug logging
//! podar -v schedule pruner.yaml --elements 432 --format json
//! ```

use clap::Parser;
use podar::cli::{init_tracing, run_command, Cli, LogLevel};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(LogLevel::from_flags(cli.verbose, cli.quiet));

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
