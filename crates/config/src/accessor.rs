//! Typed access to an environment store.
//!
//! Responsibilities:
//! - Load dotenv files into an `EnvSource` (`load` preserves, `overload` overwrites).
//! - Provide `get` / `require` / `get_or_set` for strings and each typed family.
//!
//! Does NOT handle:
//! - Line parsing (see `dotenv.rs`).
//! - Storage (see `source.rs`).
//!
//! Invariants:
//! - Loading never removes keys.
//! - Empty values are treated exactly like absent ones.
//! - Only `set`, `set_map`, `unset`, the loaders and `get_or_set*` write to the store;
//!   `get_or_set*` writes only when the key is unset.
//! - The whole file is read before any key is written.

use std::path::Path;

use crate::dotenv;
use crate::error::EnvError;
use crate::source::{EnvSource, ProcessEnv};
use crate::value::{EnvValue, ToEnvString};

/// Whether loading may replace values that are already set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadMode {
    Preserve,
    Overwrite,
}

/// Counts from a single load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Pairs written to the store.
    pub applied: usize,
    /// Pairs skipped because the key was already set (normal load only).
    pub preserved: usize,
    /// Pairs that cannot be stored (empty key, NUL byte).
    pub rejected: usize,
}

/// Typed configuration accessor over an environment store.
///
/// `Env::process()` works on the real process environment; `Env::new` accepts
/// any [`EnvSource`], e.g. a [`MemoryEnv`](crate::MemoryEnv) in tests.
#[derive(Debug, Clone)]
pub struct Env<S = ProcessEnv> {
    source: S,
    panic_on_require: bool,
}

impl Env<ProcessEnv> {
    /// Accessor over the current process environment.
    pub fn process() -> Self {
        Self::new(ProcessEnv)
    }
}

impl Default for Env<ProcessEnv> {
    fn default() -> Self {
        Self::process()
    }
}

impl<S: EnvSource> Env<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            panic_on_require: false,
        }
    }

    /// Panic instead of returning an error when a `require*` call fails.
    ///
    /// Useful for fail-fast startup code. Defaults to `false`.
    pub fn with_panic_on_require(mut self, enabled: bool) -> Self {
        self.panic_on_require = enabled;
        self
    }

    pub fn panic_on_require(&self) -> bool {
        self.panic_on_require
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }

    /// Load a dotenv file, keeping any value that is already set.
    ///
    /// # Errors
    ///
    /// Returns `EnvError::Io` if the file cannot be read. Nothing is written in
    /// that case.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<LoadSummary, EnvError> {
        self.load_file(path.as_ref(), LoadMode::Preserve)
    }

    /// Load a dotenv file, overwriting values that are already set.
    ///
    /// # Errors
    ///
    /// Returns `EnvError::Io` if the file cannot be read.
    pub fn overload(&mut self, path: impl AsRef<Path>) -> Result<LoadSummary, EnvError> {
        self.load_file(path.as_ref(), LoadMode::Overwrite)
    }

    /// Apply dotenv text that was already read, keeping existing values.
    pub fn load_str(&mut self, contents: &str) -> LoadSummary {
        self.apply(contents, LoadMode::Preserve)
    }

    /// Apply dotenv text that was already read, overwriting existing values.
    pub fn overload_str(&mut self, contents: &str) -> LoadSummary {
        self.apply(contents, LoadMode::Overwrite)
    }

    fn load_file(&mut self, path: &Path, mode: LoadMode) -> Result<LoadSummary, EnvError> {
        let contents = std::fs::read_to_string(path).map_err(|source| EnvError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let summary = self.apply(&contents, mode);
        let overwrite = mode == LoadMode::Overwrite;
        tracing::debug!(
            path = %path.display(),
            overwrite,
            applied = summary.applied,
            preserved = summary.preserved,
            rejected = summary.rejected,
            "Loaded dotenv file"
        );
        Ok(summary)
    }

    fn apply(&mut self, contents: &str, mode: LoadMode) -> LoadSummary {
        let mut summary = LoadSummary::default();

        for entry in dotenv::parse(contents) {
            if entry.key.is_empty() || entry.key.contains('\0') || entry.value.contains('\0') {
                // Never log the value; the line number is enough to find it.
                tracing::warn!(line = entry.line, "Skipping dotenv line with an unusable key or value");
                summary.rejected += 1;
                continue;
            }

            if mode == LoadMode::Preserve && self.is_set(&entry.key) {
                tracing::trace!(key = %entry.key, "Keeping existing value");
                summary.preserved += 1;
                continue;
            }

            self.source.set(&entry.key, &entry.value);
            tracing::trace!(key = %entry.key, line = entry.line, "Applied dotenv value");
            summary.applied += 1;
        }

        summary
    }

    /// Store the string form of `value` under `key`.
    ///
    /// # Panics
    ///
    /// With [`ProcessEnv`], panics if `key` is empty or contains `=` or NUL.
    pub fn set<V: ToEnvString>(&mut self, key: &str, value: V) {
        self.source.set(key, &value.to_env_string());
    }

    /// `set` every entry of `entries`.
    pub fn set_map<I, K, V>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: ToEnvString,
    {
        for (key, value) in entries {
            self.set(key.as_ref(), value);
        }
    }

    pub fn unset(&mut self, key: &str) {
        self.source.remove(key);
    }

    /// True if `key` holds a non-empty value.
    pub fn is_set(&self, key: &str) -> bool {
        self.raw(key).is_some()
    }

    /// The value of `key`, or `None` if it is unset or empty.
    pub fn get(&self, key: &str) -> Option<String> {
        self.raw(key)
    }

    /// Alias for [`Env::get`].
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get(key)
    }

    /// The value of `key`, or an error naming the key if it is unset or empty.
    ///
    /// # Panics
    ///
    /// If `panic_on_require` is enabled, panics instead of returning the error.
    pub fn require(&self, key: &str) -> Result<String, EnvError> {
        self.require_as(key)
    }

    /// Alias for [`Env::require`].
    pub fn require_string(&self, key: &str) -> Result<String, EnvError> {
        self.require(key)
    }

    /// The value of `key`; if unset, stores the string form of `default` and
    /// returns it.
    pub fn get_or_set<V: ToEnvString>(&mut self, key: &str, default: V) -> String {
        if let Some(value) = self.raw(key) {
            return value;
        }
        let value = default.to_env_string();
        self.source.set(key, &value);
        value
    }

    /// Alias for [`Env::get_or_set`] restricted to string defaults.
    pub fn get_or_set_string(&mut self, key: &str, default: &str) -> String {
        self.get_or_set(key, default)
    }

    /// Parse `key` as `T`, telling absent (`Ok(None)`) apart from malformed (`Err`).
    pub fn lookup<T: EnvValue>(&self, key: &str) -> Result<Option<T>, EnvError> {
        let Some(raw) = self.raw(key) else {
            return Ok(None);
        };
        T::parse_env(&raw)
            .map(Some)
            .map_err(|reason| EnvError::Invalid {
                key: key.to_string(),
                kind: T::KIND,
                reason,
            })
    }

    /// Parse `key` as `T`; `None` if unset or malformed.
    pub fn get_as<T: EnvValue>(&self, key: &str) -> Option<T> {
        self.lookup(key).ok().flatten()
    }

    /// Parse `key` as `T`, failing if it is unset or malformed.
    ///
    /// # Panics
    ///
    /// If `panic_on_require` is enabled, panics instead of returning the error.
    pub fn require_as<T: EnvValue>(&self, key: &str) -> Result<T, EnvError> {
        let result = match self.lookup::<T>(key) {
            Ok(Some(value)) => Ok(value),
            Ok(None) => Err(EnvError::Missing {
                key: key.to_string(),
                kind: T::KIND,
            }),
            Err(err) => Err(err),
        };
        result.map_err(|err| self.escalate(err))
    }

    /// If `key` is set, its parsed value (`None` when malformed). Otherwise
    /// stores `default` and returns it.
    pub fn get_or_set_as<T: EnvValue + ToEnvString>(&mut self, key: &str, default: T) -> Option<T> {
        if self.is_set(key) {
            return self.get_as(key);
        }
        self.set(key, &default);
        Some(default)
    }

    fn raw(&self, key: &str) -> Option<String> {
        self.source.get(key).filter(|value| !value.is_empty())
    }

    fn escalate(&self, err: EnvError) -> EnvError {
        if self.panic_on_require {
            panic!("{err}");
        }
        err
    }
}

macro_rules! typed_accessors {
    ($($ty:ty => $get:ident, $get_or_set:ident, $require:ident;)*) => {
        impl<S: EnvSource> Env<S> {
            $(
                #[doc = concat!("Parse `key` as `", stringify!($ty), "`; `None` if unset or malformed.")]
                pub fn $get(&self, key: &str) -> Option<$ty> {
                    self.get_as(key)
                }

                #[doc = concat!("Parse `key` as `", stringify!($ty), "`, storing `default` if it is unset.")]
                pub fn $get_or_set(&mut self, key: &str, default: $ty) -> Option<$ty> {
                    self.get_or_set_as(key, default)
                }

                #[doc = concat!("Parse `key` as `", stringify!($ty), "`, failing if it is unset or malformed.")]
                pub fn $require(&self, key: &str) -> Result<$ty, EnvError> {
                    self.require_as(key)
                }
            )*
        }
    };
}

// `isize` carries the 16-bit ceiling and `usize` the 32-bit one; see `value.rs`.
typed_accessors! {
    isize => get_int, get_or_set_int, require_int;
    i32 => get_int32, get_or_set_int32, require_int32;
    i64 => get_int64, get_or_set_int64, require_int64;
    usize => get_uint, get_or_set_uint, require_uint;
    u64 => get_uint64, get_or_set_uint64, require_uint64;
    f32 => get_float32, get_or_set_float32, require_float32;
    f64 => get_float64, get_or_set_float64, require_float64;
    bool => get_bool, get_or_set_bool, require_bool;
    std::time::Duration => get_duration, get_or_set_duration, require_duration;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemoryEnv;
    use std::io::Write;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    fn env() -> Env<MemoryEnv> {
        Env::new(MemoryEnv::new())
    }

    fn dotenv_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_set_then_get_returns_string_form() {
        let mut env = env();
        env.set("F_STRING", "string");
        env.set("F_INT", 1);
        env.set("F_FLOAT32", 1.0f32);
        env.set("F_BOOL", true);
        env.set("F_DURATION", Duration::from_secs(3600));

        assert_eq!(env.get("F_STRING").as_deref(), Some("string"));
        assert_eq!(env.get("F_INT").as_deref(), Some("1"));
        assert_eq!(env.get("F_FLOAT32").as_deref(), Some("1"));
        assert_eq!(env.get("F_BOOL").as_deref(), Some("true"));
        assert_eq!(env.get_string("F_DURATION").as_deref(), Some("1h0m0s"));
    }

    #[test]
    fn test_set_map_applies_every_entry() {
        let mut env = env();
        let fixtures: Vec<(&str, Box<dyn ToEnvString>)> = vec![
            ("F_STRING", Box::new("string")),
            ("F_INT64", Box::new(1i64)),
            ("F_UINT64", Box::new(1u64)),
        ];
        env.set_map(fixtures);

        assert_eq!(env.get("F_STRING").as_deref(), Some("string"));
        assert_eq!(env.get("F_INT64").as_deref(), Some("1"));
        assert_eq!(env.get("F_UINT64").as_deref(), Some("1"));
    }

    #[test]
    fn test_empty_value_counts_as_unset() {
        let mut env = env();
        assert!(!env.is_set("F_BLANK"));
        assert_eq!(env.get("F_BLANK"), None);

        env.set("F_BLANK", "");
        assert!(!env.is_set("F_BLANK"));
        assert_eq!(env.get("F_BLANK"), None);

        env.set("F_BLANK", " ");
        assert!(env.is_set("F_BLANK"));
    }

    #[test]
    fn test_unset_removes_key() {
        let mut env = env();
        env.set("KEY", "v");
        env.unset("KEY");
        assert!(!env.is_set("KEY"));
    }

    #[test]
    fn test_require_missing_then_present() {
        let mut env = env();
        let err = env.require("F_STRING").unwrap_err();
        assert_eq!(err.to_string(), "missing required string from F_STRING");

        env.set("F_STRING", "string");
        assert_eq!(env.require("F_STRING").unwrap(), "string");
        assert_eq!(env.require_string("F_STRING").unwrap(), "string");
    }

    #[test]
    fn test_get_or_set_writes_default_once() {
        let mut env = env();
        assert_eq!(env.get_or_set("F_STRING", "default"), "default");
        assert_eq!(env.get("F_STRING").as_deref(), Some("default"));

        assert_eq!(env.get_or_set("F_STRING", "other"), "default");
        assert_eq!(env.source().len(), 1);

        env.set("F_STRING", "string");
        assert_eq!(env.get_or_set_string("F_STRING", "default"), "string");
    }

    #[test]
    fn test_typed_getters_absent_present_and_malformed() {
        let mut env = env();
        assert_eq!(env.get_int("F_INT"), None);
        assert_eq!(env.get_bool("F_BOOL"), None);

        env.set("F_INT", 1);
        env.set("F_INT32", 1);
        env.set("F_INT64", 1);
        env.set("F_UINT", 1);
        env.set("F_UINT64", 1);
        env.set("F_FLOAT32", 1.0f32);
        env.set("F_FLOAT64", 1.0f64);
        env.set("F_BOOL", true);
        env.set("F_DURATION", "1h");

        assert_eq!(env.get_int("F_INT"), Some(1));
        assert_eq!(env.get_int32("F_INT32"), Some(1));
        assert_eq!(env.get_int64("F_INT64"), Some(1));
        assert_eq!(env.get_uint("F_UINT"), Some(1));
        assert_eq!(env.get_uint64("F_UINT64"), Some(1));
        assert_eq!(env.get_float32("F_FLOAT32"), Some(1.0));
        assert_eq!(env.get_float64("F_FLOAT64"), Some(1.0));
        assert_eq!(env.get_bool("F_BOOL"), Some(true));
        assert_eq!(env.get_duration("F_DURATION"), Some(Duration::from_secs(3600)));

        env.set("F_INT", "nine");
        assert_eq!(env.get_int("F_INT"), None);
    }

    #[test]
    fn test_get_int_keeps_16_bit_ceiling() {
        // Documented quirk: the plain int family stops at the i16 range.
        let mut env = env();
        env.set("PORT", 40000);
        assert_eq!(env.get_int("PORT"), None);
        assert_eq!(env.get_int32("PORT"), Some(40000));
        assert!(matches!(
            env.require_int("PORT"),
            Err(EnvError::Invalid { kind: "int", .. })
        ));
    }

    #[test]
    fn test_float_overflow_reads_as_absent() {
        let mut env = env();
        env.set("F32", "1e39");
        env.set("F64", "1e309");
        assert_eq!(env.get_float32("F32"), None);
        assert_eq!(env.get_float64("F64"), None);
        assert_eq!(env.get_float64("F32"), Some(1e39));
        assert!(matches!(
            env.require_float32("F32"),
            Err(EnvError::Invalid { kind: "float32", .. })
        ));
    }

    #[test]
    fn test_get_or_set_typed() {
        let mut env = env();
        assert_eq!(env.get_or_set_int("F_INT", 2), Some(2));
        assert_eq!(env.get("F_INT").as_deref(), Some("2"));
        assert_eq!(env.get_or_set_int("F_INT", 3), Some(2));

        assert_eq!(env.get_or_set_bool("F_BOOL", false), Some(false));
        assert_eq!(env.get("F_BOOL").as_deref(), Some("false"));

        let day = Duration::from_secs(24 * 3600);
        assert_eq!(env.get_or_set_duration("F_DURATION", day), Some(day));
        assert_eq!(env.get("F_DURATION").as_deref(), Some("24h0m0s"));

        env.set("F_FLOAT64", "not-a-float");
        assert_eq!(env.get_or_set_float64("F_FLOAT64", 2.0), None);
        assert_eq!(env.get("F_FLOAT64").as_deref(), Some("not-a-float"));
    }

    #[test]
    fn test_require_typed_distinguishes_missing_and_invalid() {
        let mut env = env();
        let err = env.require_uint64("F_UINT64").unwrap_err();
        assert!(err.is_missing());
        assert_eq!(err.to_string(), "missing required uint64 from F_UINT64");

        env.set("F_UINT64", "-1");
        let err = env.require_uint64("F_UINT64").unwrap_err();
        assert!(!err.is_missing());
        assert!(err.to_string().starts_with("missing required uint64 from F_UINT64"));

        env.set("F_UINT64", 7u64);
        assert_eq!(env.require_uint64("F_UINT64").unwrap(), 7);
    }

    #[test]
    fn test_lookup_tri_state() {
        let mut env = env();
        assert!(matches!(env.lookup::<bool>("F_BOOL"), Ok(None)));
        env.set("F_BOOL", "maybe");
        assert!(matches!(env.lookup::<bool>("F_BOOL"), Err(EnvError::Invalid { .. })));
        env.set("F_BOOL", "T");
        assert!(matches!(env.lookup::<bool>("F_BOOL"), Ok(Some(true))));
    }

    #[test]
    #[should_panic(expected = "missing required string from DATABASE_URL")]
    fn test_panic_on_require_escalates_missing() {
        let env = Env::new(MemoryEnv::new()).with_panic_on_require(true);
        let _ = env.require("DATABASE_URL");
    }

    #[test]
    #[should_panic(expected = "missing required duration from TIMEOUT")]
    fn test_panic_on_require_escalates_invalid() {
        let mut env = Env::new(MemoryEnv::new()).with_panic_on_require(true);
        env.set("TIMEOUT", "soon");
        let _ = env.require_duration("TIMEOUT");
    }

    #[test]
    fn test_panic_on_require_does_not_affect_getters() {
        let env = Env::new(MemoryEnv::new()).with_panic_on_require(true);
        assert!(env.panic_on_require());
        assert_eq!(env.get_int("MISSING"), None);
        assert!(!env.is_set("MISSING"));
    }

    #[test]
    fn test_load_strips_quotes_and_comments() {
        let file = dotenv_file("KEY=\"value\"# comment\nHASH=\"#not-a-comment\"\n");
        let mut env = env();
        let summary = env.load(file.path()).unwrap();

        assert_eq!(summary.applied, 2);
        assert_eq!(env.get("KEY").as_deref(), Some("value"));
        assert_eq!(env.get("HASH").as_deref(), Some("#not-a-comment"));
    }

    #[test]
    fn test_load_preserves_and_overload_overwrites() {
        let file = dotenv_file("F_STRING=new\n");

        let mut env = env();
        env.set("F_STRING", "old");
        let summary = env.load(file.path()).unwrap();
        assert_eq!(summary.preserved, 1);
        assert_eq!(env.get("F_STRING").as_deref(), Some("old"));

        env.overload(file.path()).unwrap();
        assert_eq!(env.get("F_STRING").as_deref(), Some("new"));
    }

    #[test]
    fn test_load_fills_empty_values() {
        let mut env = env();
        env.set("F_STRING", "");
        env.load_str("F_STRING=filled");
        assert_eq!(env.get("F_STRING").as_deref(), Some("filled"));
    }

    #[test]
    fn test_load_typed_round_trip() {
        let file = dotenv_file("F_FLOAT32=9.1\nF_BOOL=false\nF_INT=9\n");
        let mut env = env();
        env.load(file.path()).unwrap();

        assert_eq!(env.require_float32("F_FLOAT32").unwrap(), 9.1);
        assert!(!env.require_bool("F_BOOL").unwrap());
        assert_eq!(env.require_int("F_INT").unwrap(), 9);
    }

    #[test]
    fn test_load_missing_file_is_io_error_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut env = env();

        let err = env.load(dir.path().join("missing.env")).unwrap_err();
        assert!(matches!(err, EnvError::Io { .. }));
        assert!(env.source().is_empty());

        let err = env.overload(dir.path().join("missing.env")).unwrap_err();
        assert!(matches!(err, EnvError::Io { .. }));
    }

    #[test]
    fn test_load_rejects_unusable_keys() {
        let mut env = env();
        let summary = env.load_str("=orphan\nGOOD=1\n");
        assert_eq!(
            summary,
            LoadSummary {
                applied: 1,
                preserved: 0,
                rejected: 1
            }
        );
        assert_eq!(env.into_source().len(), 1);
    }
}
