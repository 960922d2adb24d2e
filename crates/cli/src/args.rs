//! CLI argument definitions and parsing.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//! - Read `ENVCFG_FILE` / `ENVCFG_OVERLOAD` as fallbacks for the flags.
//!
//! Non-responsibilities:
//! - Does not load files or run commands (see `main` and `dispatch`).

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "envcfg")]
#[command(
    about = "Load a dotenv file and run a command with the resulting environment",
    long_about = None
)]
#[command(version)]
#[command(
    after_help = "Examples:\n  envcfg -f .env\n  envcfg -f .env 'echo \"DB: $DATABASE_URL\"'\n  envcfg -f .env -o ./server --port 8080\n\nA single COMMAND argument is run with `sh -c`; several are executed directly.\n"
)]
pub struct Cli {
    /// Dotenv file to load before running the command
    #[arg(short, long, env = "ENVCFG_FILE", value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Overwrite variables that are already set in the environment
    #[arg(
        short,
        long,
        env = "ENVCFG_OVERLOAD",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    pub overload: bool,

    /// Log what is loaded and run to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to run (defaults to `env`)
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}
