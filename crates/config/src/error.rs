//! Error types for dotenv loading and typed lookups.
//!
//! Responsibilities:
//! - Define the error variants returned by `Env::load`, `Env::overload` and the
//!   `require_*` family.
//!
//! Invariants:
//! - Errors name the key (or path) but NEVER include the raw value, so a
//!   malformed secret cannot leak into logs via an error message.
//! - `Missing` and `Invalid` both render with the `missing required` prefix.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or reading configuration.
#[derive(Error, Debug)]
pub enum EnvError {
    /// The dotenv file could not be read (missing, permission denied, not UTF-8).
    #[error("failed to read dotenv file at {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A required key is unset or empty.
    #[error("missing required {kind} from {key}")]
    Missing { key: String, kind: &'static str },

    /// A required key is set but does not parse as the requested type.
    ///
    /// SAFETY: `reason` is produced by the parser and never echoes the value.
    #[error("missing required {kind} from {key}: invalid value ({reason})")]
    Invalid {
        key: String,
        kind: &'static str,
        reason: String,
    },
}

impl EnvError {
    /// The key this error refers to, if it is a lookup error.
    pub fn key(&self) -> Option<&str> {
        match self {
            EnvError::Missing { key, .. } | EnvError::Invalid { key, .. } => Some(key),
            EnvError::Io { .. } => None,
        }
    }

    /// Returns true if the key was absent rather than malformed.
    pub fn is_missing(&self) -> bool {
        matches!(self, EnvError::Missing { .. })
    }
}
