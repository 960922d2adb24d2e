//! Backing stores for [`Env`](crate::Env).
//!
//! Responsibilities:
//! - Define the `EnvSource` trait, the seam between typed access and storage.
//! - Provide `ProcessEnv`, the adapter over the OS process environment.
//! - Provide `MemoryEnv`, an isolated in-memory store.
//!
//! Invariants:
//! - `get` returns the raw stored value; empty-vs-absent folding is done by `Env`.
//! - Stores never trim or otherwise rewrite values.

use std::collections::HashMap;

/// A mutable key → string mapping that `Env` reads and writes.
pub trait EnvSource {
    /// Raw value for `key`, or `None` if the key is absent.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str);

    /// Remove `key` if present.
    fn remove(&mut self, key: &str);
}

impl<S: EnvSource + ?Sized> EnvSource for &mut S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) {
        (**self).remove(key)
    }
}

/// The environment of the current process.
///
/// Reads use `std::env::var`; values that are not valid UTF-8 read as absent.
///
/// # Thread safety
///
/// Writing the process environment is only sound while no other thread reads
/// or writes it. Load configuration during startup, before spawning workers.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    /// # Panics
    ///
    /// Panics like `std::env::set_var` if `key` is empty or contains `=` or
    /// NUL, or if `value` contains NUL.
    fn set(&mut self, key: &str, value: &str) {
        // SAFETY: callers configure the environment from a single thread
        // before any concurrent access, as documented on `ProcessEnv`.
        unsafe {
            std::env::set_var(key, value);
        }
    }

    fn remove(&mut self, key: &str) {
        // SAFETY: see `set`.
        unsafe {
            std::env::remove_var(key);
        }
    }
}

/// An in-memory store, isolated from the process environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryEnv {
    vars: HashMap<String, String>,
}

impl MemoryEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Iterate over all stored pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl EnvSource for MemoryEnv {
    fn get(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.vars.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.vars.remove(key);
    }
}

impl From<HashMap<String, String>> for MemoryEnv {
    fn from(vars: HashMap<String, String>) -> Self {
        Self { vars }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MemoryEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
