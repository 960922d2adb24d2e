//! Shared fixtures for envcfg integration tests.
//!
//! Invariants / Assumptions:
//! - Every fixture key starts with `F_` and is owned by the tests.
//! - Tests touching the process environment are `#[serial]` and hold a
//!   `FixtureGuard`, which clears all fixture keys on creation and drop.

#![allow(dead_code)]

use std::io::Write;
use std::time::Duration;

use envcfg::ToEnvString;
use tempfile::NamedTempFile;

/// Keys cleared by `FixtureGuard`, including the ones only some tests use.
pub const FIXTURE_KEYS: &[&str] = &[
    "F_STRING",
    "F_INT",
    "F_INT32",
    "F_INT64",
    "F_UINT",
    "F_UINT64",
    "F_FLOAT32",
    "F_FLOAT64",
    "F_BOOL",
    "F_DURATION",
    "F_BLANK",
    "F_WHITESPACE",
];

/// One value of every supported type.
pub fn fixtures() -> Vec<(&'static str, Box<dyn ToEnvString>)> {
    vec![
        ("F_STRING", Box::new("string")),
        ("F_INT", Box::new(1isize)),
        ("F_INT32", Box::new(1i32)),
        ("F_INT64", Box::new(1i64)),
        ("F_UINT", Box::new(1usize)),
        ("F_UINT64", Box::new(1u64)),
        ("F_FLOAT32", Box::new(1f32)),
        ("F_FLOAT64", Box::new(1f64)),
        ("F_BOOL", Box::new(true)),
        ("F_DURATION", Box::new(Duration::from_secs(3600))),
    ]
}

/// Write every fixture straight into the process environment.
pub fn set_fixtures() {
    for (key, value) in fixtures() {
        // SAFETY: callers are `#[serial]`, so no other thread touches the environment.
        unsafe {
            std::env::set_var(key, value.to_env_string());
        }
    }
}

pub fn unset_fixtures() {
    for key in FIXTURE_KEYS {
        // SAFETY: see `set_fixtures`.
        unsafe {
            std::env::remove_var(key);
        }
    }
}

/// RAII guard that starts and ends a test with no fixture keys set.
pub struct FixtureGuard;

impl FixtureGuard {
    pub fn new() -> Self {
        unset_fixtures();
        Self
    }
}

impl Drop for FixtureGuard {
    fn drop(&mut self) {
        unset_fixtures();
    }
}

/// Write `contents` to a temporary dotenv file.
pub fn dotenv_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp dotenv file");
    file.write_all(contents.as_bytes())
        .expect("Failed to write temp dotenv file");
    file
}
