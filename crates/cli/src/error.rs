//! CLI exit codes for scripting and automation.
//!
//! Responsibilities:
//! - Define the exit codes the launcher itself produces.
//! - Map launcher errors (dotenv load, spawn failures) to those codes.
//!
//! Does NOT handle:
//! - Error message formatting (handled by anyhow Display).
//! - The child's own exit code, which is passed through unchanged.
//!
//! Invariants:
//! - 126 and 127 follow the shell convention for "cannot execute" and
//!   "command not found".

use std::io::ErrorKind;

use crate::dispatch::LaunchError;

/// Exit codes produced by `envcfg` when the child never ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// General error - dotenv file unreadable or any other launcher failure.
    GeneralError = 1,

    /// The command exists but could not be executed (permission denied).
    CannotExecute = 126,

    /// The command was not found.
    CommandNotFound = 127,
}

impl ExitCode {
    /// Convert the exit code to an i32 for use with std::process::exit().
    pub const fn as_i32(self) -> i32 {
        self as u8 as i32
    }
}

impl From<&LaunchError> for ExitCode {
    fn from(err: &LaunchError) -> Self {
        match err {
            LaunchError::Spawn { source, .. } => match source.kind() {
                ErrorKind::NotFound => ExitCode::CommandNotFound,
                ErrorKind::PermissionDenied => ExitCode::CannotExecute,
                _ => ExitCode::GeneralError,
            },
        }
    }
}

/// Extension trait for anyhow::Error to extract exit codes.
pub trait ExitCodeExt {
    /// Returns ExitCode::GeneralError unless a LaunchError is in the chain.
    fn exit_code(&self) -> ExitCode;
}

impl ExitCodeExt for anyhow::Error {
    fn exit_code(&self) -> ExitCode {
        for cause in self.chain() {
            if let Some(launch_err) = cause.downcast_ref::<LaunchError>() {
                return ExitCode::from(launch_err);
            }
        }

        ExitCode::GeneralError
    }
}
