//! Conversions between typed values and their environment string form.
//!
//! `ToEnvString` is the default stringification used by `Env::set` and the
//! `get_or_set_*` family. `EnvValue` parses a raw string back into a type and
//! carries the type name used in `missing required <kind>` errors.

use std::time::Duration;

use crate::duration;

/// Render a value the way it is stored in an environment.
///
/// Numbers and booleans use their natural textual form (`1.0f32` becomes `1`),
/// durations use compound notation (`1h0m0s`).
pub trait ToEnvString {
    fn to_env_string(&self) -> String;
}

macro_rules! display_to_env_string {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ToEnvString for $ty {
                fn to_env_string(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

display_to_env_string!(
    str, String, char, bool, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize,
    f32, f64,
);

impl ToEnvString for Duration {
    fn to_env_string(&self) -> String {
        duration::format(*self)
    }
}

impl<T: ToEnvString + ?Sized> ToEnvString for &T {
    fn to_env_string(&self) -> String {
        (**self).to_env_string()
    }
}

impl<T: ToEnvString + ?Sized> ToEnvString for Box<T> {
    fn to_env_string(&self) -> String {
        (**self).to_env_string()
    }
}

/// A type that can be parsed out of an environment string.
pub trait EnvValue: Sized {
    /// Type name used in error messages (`missing required <KIND> from KEY`).
    const KIND: &'static str;

    /// Parse a raw, non-empty value. The error is a reason, never the value.
    fn parse_env(raw: &str) -> Result<Self, String>;
}

impl EnvValue for String {
    const KIND: &'static str = "string";

    fn parse_env(raw: &str) -> Result<Self, String> {
        Ok(raw.to_string())
    }
}

/// The plain `int` family only accepts the 16-bit range even though it returns
/// an `isize`. Wider values need `int32`/`int64`.
impl EnvValue for isize {
    const KIND: &'static str = "int";

    fn parse_env(raw: &str) -> Result<Self, String> {
        raw.parse::<i16>()
            .map(isize::from)
            .map_err(|e| e.to_string())
    }
}

/// The plain `uint` family accepts the 32-bit unsigned range.
impl EnvValue for usize {
    const KIND: &'static str = "uint";

    fn parse_env(raw: &str) -> Result<Self, String> {
        let value = raw.parse::<u32>().map_err(|e| e.to_string())?;
        usize::try_from(value).map_err(|e| e.to_string())
    }
}

macro_rules! from_str_env_value {
    ($($ty:ty => $kind:literal),* $(,)?) => {
        $(
            impl EnvValue for $ty {
                const KIND: &'static str = $kind;

                fn parse_env(raw: &str) -> Result<Self, String> {
                    raw.parse::<$ty>().map_err(|e| e.to_string())
                }
            }
        )*
    };
}

from_str_env_value!(
    i32 => "int32",
    i64 => "int64",
    u64 => "uint64",
);

/// True when `raw` spells infinity outright rather than overflowing to it.
fn is_infinity_literal(raw: &str) -> bool {
    let digits = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    digits.eq_ignore_ascii_case("inf") || digits.eq_ignore_ascii_case("infinity")
}

macro_rules! float_env_value {
    ($($ty:ty => $kind:literal),* $(,)?) => {
        $(
            /// Finite literals that overflow the type are out of range, not infinity.
            impl EnvValue for $ty {
                const KIND: &'static str = $kind;

                fn parse_env(raw: &str) -> Result<Self, String> {
                    let value = raw.parse::<$ty>().map_err(|e| e.to_string())?;
                    if value.is_infinite() && !is_infinity_literal(raw) {
                        return Err(format!("value out of range for {}", $kind));
                    }
                    Ok(value)
                }
            }
        )*
    };
}

float_env_value!(
    f32 => "float32",
    f64 => "float64",
);

impl EnvValue for bool {
    const KIND: &'static str = "bool";

    fn parse_env(raw: &str) -> Result<Self, String> {
        match raw {
            "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
            "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
            _ => Err("expected a boolean literal such as true, false, 1 or 0".to_string()),
        }
    }
}

impl EnvValue for Duration {
    const KIND: &'static str = "duration";

    fn parse_env(raw: &str) -> Result<Self, String> {
        duration::parse(raw).map_err(|e| e.to_string())
    }
}
