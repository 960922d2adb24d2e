//! Child process launch.
//!
//! Responsibilities:
//! - Turn the trailing COMMAND arguments into a `std::process::Command`.
//! - Run it with inherited stdio and environment and report its exit status.
//!
//! Does NOT handle:
//! - Loading the dotenv file (see `main`).
//!
//! Invariants:
//! - No arguments runs `env`; one argument runs through `sh -c`; more are
//!   executed directly as program + arguments.
//! - The child's exit code is passed through unchanged; death by signal maps
//!   to `128 + signal` on Unix.

use std::process::{Command, ExitStatus};
use thiserror::Error;

/// Program run when no COMMAND is given.
pub const DEFAULT_PROGRAM: &str = "env";

/// Shell used for single-string commands.
pub const SHELL: &str = "sh";

/// Errors from launching the child process.
#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("failed to run '{program}'")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Build the command for the given trailing arguments.
pub fn build_command(args: &[String]) -> Command {
    match args {
        [] => Command::new(DEFAULT_PROGRAM),
        [script] => {
            let mut cmd = Command::new(SHELL);
            cmd.arg("-c").arg(script);
            cmd
        }
        [program, rest @ ..] => {
            let mut cmd = Command::new(program);
            cmd.args(rest);
            cmd
        }
    }
}

/// Run the command and return the exit code the launcher should exit with.
pub fn run_command(args: &[String]) -> Result<i32, LaunchError> {
    let mut cmd = build_command(args);
    let program = cmd.get_program().to_string_lossy().into_owned();
    tracing::debug!(program = %program, args = ?args, "Running command");

    let status = cmd
        .status()
        .map_err(|source| LaunchError::Spawn { program, source })?;

    let code = exit_code_of(status);
    tracing::debug!(code, "Command finished");
    Ok(code)
}

fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}
