//! Shared test utilities for envcfg launcher integration tests.
//!
//! Invariants / Assumptions:
//! - Commands are hermetic: `ENVCFG_*` and `RUST_LOG` from the host are cleared.

#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use tempfile::TempDir;

/// Returns a hermetic `envcfg` command for integration testing.
pub fn envcfg_cmd() -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("envcfg");
    cmd.env_remove("ENVCFG_FILE")
        .env_remove("ENVCFG_OVERLOAD")
        .env_remove("RUST_LOG");
    cmd
}

/// Write a dotenv file named `.env` into a fresh temp directory.
pub fn write_env_file(contents: &str) -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(".env");
    fs::write(&path, contents).unwrap();
    (dir, path)
}
