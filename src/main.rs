//! dynconf: layered, hot-reloading configuration
//!
//! Entry point for the dynconf command-line tool.

use std::path::Path;
use std::process::ExitCode;

use dynconf::config::{Cli, Command, ValidatedConfig, write_default_config};

mod app;
mod run;

use app::{config_hint, exit_code, print_hint, run_hint, setup_tracing};

/// Main entry point.
///
/// Excluded from coverage as it's the thin wrapper around testable components.
#[cfg(not(tarpaulin_include))]
fn main() -> ExitCode {
    let cli = Cli::parse_args();

    if let Command::Init { output } = &cli.command {
        return write_template(output);
    }

    let config = match ValidatedConfig::load(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            print_hint(config_hint(&e));
            return exit_code::CONFIG_ERROR;
        }
    };

    setup_tracing(config.verbose);
    tracing::debug!("{config}");

    run_command(config, cli.command)
}

/// Writes the commented template for `dynconf init`.
fn write_template(output: &Path) -> ExitCode {
    if output.exists() {
        eprintln!("Refusing to overwrite existing file: {}", output.display());
        return exit_code::CONFIG_ERROR;
    }

    match write_default_config(output) {
        Ok(()) => {
            println!("Configuration template written to: {}", output.display());
            exit_code::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            exit_code::CONFIG_ERROR
        }
    }
}

/// Runs `command` on a fresh multi-threaded runtime.
///
/// Excluded from coverage - requires async runtime.
#[cfg(not(tarpaulin_include))]
fn run_command(config: ValidatedConfig, command: Command) -> ExitCode {
    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to start the async runtime: {e}");
            return exit_code::runtime_error();
        }
    };

    match runtime.block_on(run::execute(config, command)) {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            print_hint(run_hint(&e));
            exit_code::runtime_error()
        }
    }
}
