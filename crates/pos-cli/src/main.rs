mod commands;
mod config;
mod environment;
mod error;
mod interaction;
mod logging;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};

use crate::commands::Commands;
use crate::config::{AppConfig, DATABASE_ENV};
use crate::environment::Environment;
use crate::error::{CliError, Result};
use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "pos")]
#[command(bin_name = "pos")]
#[command(about = "Point-of-sale till and back office", long_about = None)]
struct Cli {
    /// Configuration file (default: pos.toml in the current directory, if present)
    #[arg(long, short = 'c', global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log more detail to stderr (-v info, -vv debug)
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Plain)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli) {
        print_error(&e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run(cli: Cli) -> Result<()> {
    let current_dir = std::env::current_dir().map_err(CliError::CurrentDir)?;
    let config = AppConfig::load(cli.config.as_deref(), &current_dir)?
        .with_database_override(std::env::var(DATABASE_ENV).ok());
    let env = Environment::open(config, cli.format)?;
    cli.command.execute(&env)
}

fn print_error(error: &CliError) {
    eprintln!("error: {error}");

    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        eprintln!("caused by: {cause}");
        source = std::error::Error::source(cause);
    }
}
