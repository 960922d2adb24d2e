//! Dotenv loading and typed configuration access.
//!
//! This crate loads `KEY=value` files into an environment store and reads
//! values back as strings, integers, floats, booleans or durations with
//! `get`, `require` and `get_or_set` semantics.
//!
//! ```
//! use envcfg::{Env, MemoryEnv};
//!
//! let mut env = Env::new(MemoryEnv::new());
//! env.load_str("DATABASE_URL=\"postgres://localhost/app\" # primary\nPORT=3000\n");
//!
//! assert_eq!(env.require("DATABASE_URL").unwrap(), "postgres://localhost/app");
//! assert_eq!(env.get_int("PORT"), Some(3000));
//! assert_eq!(env.get_or_set_bool("DEBUG", false), Some(false));
//! assert_eq!(env.get("DEBUG").as_deref(), Some("false"));
//! ```
//!
//! `Env::process()` binds the same API to the process environment. Mutating it
//! is not synchronized: finish configuration before spawning threads.

mod accessor;
pub mod dotenv;
pub mod duration;
mod error;
mod source;
mod value;

pub use accessor::{Env, LoadSummary};
pub use duration::DurationError;
pub use error::EnvError;
pub use source::{EnvSource, MemoryEnv, ProcessEnv};
pub use value::{EnvValue, ToEnvString};
