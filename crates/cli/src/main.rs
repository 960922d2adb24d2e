//! envcfg - run a command with variables loaded from a dotenv file.
//!
//! Responsibilities:
//! - Parse command-line arguments.
//! - Load (or overload) the dotenv file into this process's environment.
//! - Run the child command, which inherits that environment.
//!
//! Does NOT handle:
//! - Dotenv parsing or typed access (see the `envcfg` library crate).
//!
//! Invariants:
//! - The environment is fully loaded before the child is spawned; nothing
//!   else runs concurrently with the load.
//! - Logs go to stderr so the child's stdout stays clean.

mod args;
mod dispatch;
mod error;

use anyhow::{Context, Result};
use args::Cli;
use clap::Parser;
use envcfg::Env;
use error::ExitCodeExt;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("envcfg: {:#}", e);
            std::process::exit(e.exit_code().as_i32());
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).without_time())
        .init();
}

fn run(cli: &Cli) -> Result<i32> {
    if let Some(ref file) = cli.file {
        let mut env = Env::process();
        let summary = if cli.overload {
            env.overload(file)
        } else {
            env.load(file)
        }
        .context("Failed to load environment")?;

        tracing::debug!(
            file = %file.display(),
            applied = summary.applied,
            preserved = summary.preserved,
            "Environment ready"
        );
    }

    let code = dispatch::run_command(&cli.command)?;
    Ok(code)
}
