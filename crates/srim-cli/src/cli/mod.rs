mod commands;
mod helpers;

use clap::Parser;
use srim_core::domain::SrimError;
use tracing_subscriber::EnvFilter;

const PROGRAM_NAME: &str = "srim-rs";

pub fn run_from_env() -> i32 {
    let args: Vec<String> = std::env::args().skip(1).collect();

    match run(args) {
        Ok(code) => code,
        Err(error) => {
            let diagnostic = error.as_srim_error();
            eprintln!("{}", diagnostic.diagnostic_line());
            eprintln!("{}", diagnostic.fatal_exit_line());
            diagnostic.exit_code()
        }
    }
}

pub fn run<I, S>(args: I) -> Result<i32, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let full_args = std::iter::once(PROGRAM_NAME.to_string())
        .chain(args.into_iter().map(Into::into))
        .collect::<Vec<_>>();
    parse_and_dispatch(full_args)
}

fn parse_and_dispatch(args: Vec<String>) -> Result<i32, CliError> {
    match Cli::try_parse_from(&args) {
        Ok(cli) => {
            init_tracing(cli.verbose);
            dispatch_parsed(cli.command)
        }
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                print!("{}", err);
                Ok(0)
            }
            _ => Err(CliError::Usage(err.to_string())),
        },
    }
}

/// Logs go to stderr; stdout carries only the JSON result.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[derive(Parser)]
#[command(name = PROGRAM_NAME, version, about = "Readers for SRIM/TRIM simulation outputs")]
struct Cli {
    /// Emit debug logs on stderr
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Summarize every depth-profile output in a run directory
    Results(commands::ResultsArgs),
    /// Parse one depth-profile output file
    Tabular(commands::TabularArgs),
    /// Read the transmitted/backscattered/sputtered particle table
    Transmit(commands::TransmitArgs),
    /// Inspect the collision log or decode one ion from it
    Collision(commands::CollisionArgs),
    /// List byte offsets of a marker in a file
    Index(commands::IndexArgs),
}

fn dispatch_parsed(command: CliCommand) -> Result<i32, CliError> {
    match command {
        CliCommand::Results(args) => commands::run_results_command(args),
        CliCommand::Tabular(args) => commands::run_tabular_command(args),
        CliCommand::Transmit(args) => commands::run_transmit_command(args),
        CliCommand::Collision(args) => commands::run_collision_command(args),
        CliCommand::Index(args) => commands::run_index_command(args),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Compute(SrimError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CliError {
    fn as_srim_error(&self) -> SrimError {
        match self {
            Self::Usage(message) => SrimError::input_validation("INPUT.CLI_USAGE", message.clone()),
            Self::Compute(error) => error.clone(),
            Self::Internal(error) => {
                SrimError::io_system("IO.JSON_STDOUT", format!("{error:#}"))
            }
        }
    }
}
