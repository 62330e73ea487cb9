//! h2kit CLI - Hydrogen drumkit builder
//!
//! Command-line entry point: parses flags, sets up logging and prints the
//! final status line.

use std::process::ExitCode;

use clap::Parser;
use env_logger::Env;
use log::debug;

use h2kit::cli::commands::{build_kit, status_line};
use h2kit::cli::Cli;
use h2kit::KitError;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logger
    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    debug!("h2kit v{}", env!("CARGO_PKG_VERSION"));

    match build_kit(&cli) {
        Ok(outcome) => {
            println!();
            println!("{}", status_line(&outcome));
            ExitCode::SUCCESS
        }
        Err(err) => {
            println!();
            println!("Error: {:#}", err);
            if let Some(kit_err) = err.downcast_ref::<KitError>() {
                println!("Hint: {}", kit_err.recovery_hint());
            }
            ExitCode::FAILURE
        }
    }
}
