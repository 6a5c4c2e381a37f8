//! Planet Wars referee CLI - run matches between bot processes.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod cli;

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Log filter used when `RUST_LOG` is unset or invalid.
const DEFAULT_LOG_FILTER: &str = "warn";

/// Planet Wars - a referee for two-player bot matches
#[derive(Parser, Debug)]
#[command(name = "planetwars")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play a whole match and print the result
    Run {
        #[command(flatten)]
        settings: cli::MatchArgs,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Also write the effective config to this file
        #[arg(long)]
        save_config: Option<std::path::PathBuf>,

        /// Suppress the event log
        #[arg(short, long)]
        quiet: bool,
    },

    /// Drive a match interactively from stdin
    Play {
        #[command(flatten)]
        settings: cli::MatchArgs,
    },

    /// Check that a map file loads
    Validate {
        /// Map file to validate
        #[arg(required = true)]
        map: std::path::PathBuf,
    },

    /// Write the effective config to a JSON file
    Config {
        #[command(flatten)]
        settings: cli::MatchArgs,

        /// Where to write the config
        #[arg(required = true)]
        output: std::path::PathBuf,
    },
}

fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let result = match args.command {
        Commands::Run {
            settings,
            format,
            save_config,
            quiet,
        } => cli::run::execute(settings, format, save_config, quiet),

        Commands::Play { settings } => cli::play::execute(settings),

        Commands::Validate { map } => cli::validate::execute(map),

        Commands::Config { settings, output } => cli::config::execute(settings, output),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
