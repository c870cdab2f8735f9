use std::process::ExitCode;

use clap::Parser;
use tally_cli::config::AppConfig;
use tally_cli::error::AppError;
use tally_cli::{init_tracing, run, Command};
use tracing::error;

/// Quote, invoice and credit memo totals.
#[derive(Debug, Parser)]
#[command(name = "tally", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let result = AppConfig::from_env()
        .map_err(AppError::from)
        .and_then(|config| run(&cli.command, &config));

    match result {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(code = err.code().as_str(), "{}", err);
            eprintln!("error[{}]: {}", err.code().as_str(), err.user_message());
            ExitCode::from(err.exit_code() as u8)
        }
    }
}
