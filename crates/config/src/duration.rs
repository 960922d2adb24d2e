//! Compound duration literals such as `1h1m1s`, `1.5s` or `300ms`.
//!
//! `parse` accepts a sequence of `<number>[.<fraction>]<unit>` groups with the
//! units `ns`, `us` (`µs`, `μs`), `ms`, `s`, `m` and `h`. `format` renders a
//! `Duration` in the same notation, so `parse(&format(d)) == Ok(d)`.

use std::time::Duration;
use thiserror::Error;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Longest fraction we keep; extra digits are below nanosecond precision.
const MAX_FRACTION_DIGITS: usize = 20;

/// Errors from [`parse`]. Messages never echo the input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DurationError {
    #[error("empty duration")]
    Empty,
    #[error("invalid duration syntax")]
    Syntax,
    #[error("missing unit in duration")]
    MissingUnit,
    #[error("unknown unit in duration")]
    UnknownUnit,
    #[error("negative durations are not supported")]
    Negative,
    #[error("duration out of range")]
    Overflow,
}

/// Parse a compound duration literal.
///
/// A leading `+` is allowed. A leading `-` is only accepted for a zero
/// duration, since `Duration` cannot be negative. The bare literal `0` needs
/// no unit.
pub fn parse(input: &str) -> Result<Duration, DurationError> {
    let (negative, mut rest) = match input.as_bytes().first() {
        Some(b'+') => (false, &input[1..]),
        Some(b'-') => (true, &input[1..]),
        _ => (false, input),
    };

    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(DurationError::Empty);
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let (int_digits, tail) = split_digits(rest);
        rest = tail;

        let mut frac_digits = "";
        if let Some(tail) = rest.strip_prefix('.') {
            (frac_digits, rest) = split_digits(tail);
        }
        if int_digits.is_empty() && frac_digits.is_empty() {
            return Err(DurationError::Syntax);
        }

        let unit_len = rest
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(rest.len());
        let (unit, tail) = rest.split_at(unit_len);
        rest = tail;

        let scale = unit_nanos(unit)?;
        let whole = if int_digits.is_empty() {
            0
        } else {
            int_digits
                .parse::<u128>()
                .map_err(|_| DurationError::Overflow)?
        };

        let mut group = whole
            .checked_mul(scale)
            .ok_or(DurationError::Overflow)?;
        if !frac_digits.is_empty() {
            let kept = &frac_digits[..frac_digits.len().min(MAX_FRACTION_DIGITS)];
            let numerator: u128 = kept.parse().map_err(|_| DurationError::Syntax)?;
            group = group
                .checked_add(numerator * scale / 10u128.pow(kept.len() as u32))
                .ok_or(DurationError::Overflow)?;
        }

        total = total.checked_add(group).ok_or(DurationError::Overflow)?;
    }

    if negative && total != 0 {
        return Err(DurationError::Negative);
    }

    let secs = u64::try_from(total / NANOS_PER_SEC).map_err(|_| DurationError::Overflow)?;
    Ok(Duration::new(secs, (total % NANOS_PER_SEC) as u32))
}

/// Render a duration as a compound literal (`1h0m0s`, `1.5s`, `250ms`, `0s`).
pub fn format(duration: Duration) -> String {
    let nanos = duration.as_nanos();
    if nanos == 0 {
        return "0s".to_string();
    }
    if nanos < 1_000 {
        return format!("{nanos}ns");
    }
    if nanos < 1_000_000 {
        return format!("{}µs", decimal(nanos, 1_000));
    }
    if nanos < NANOS_PER_SEC {
        return format!("{}ms", decimal(nanos, 1_000_000));
    }

    let secs = duration.as_secs();
    let (hours, minutes, seconds) = (secs / 3600, secs / 60 % 60, secs % 60);

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{hours}h{minutes}m"));
    } else if minutes > 0 {
        out.push_str(&format!("{minutes}m"));
    }
    let sub = u128::from(seconds) * NANOS_PER_SEC + u128::from(duration.subsec_nanos());
    out.push_str(&decimal(sub, NANOS_PER_SEC));
    out.push('s');
    out
}

fn split_digits(s: &str) -> (&str, &str) {
    let len = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s.split_at(len)
}

fn unit_nanos(unit: &str) -> Result<u128, DurationError> {
    match unit {
        "" => Err(DurationError::MissingUnit),
        "ns" => Ok(1),
        "us" | "µs" | "μs" => Ok(1_000),
        "ms" => Ok(1_000_000),
        "s" => Ok(NANOS_PER_SEC),
        "m" => Ok(60 * NANOS_PER_SEC),
        "h" => Ok(3600 * NANOS_PER_SEC),
        _ => Err(DurationError::UnknownUnit),
    }
}

/// `value / unit` as a decimal string with trailing zeros trimmed.
fn decimal(value: u128, unit: u128) -> String {
    let whole = value / unit;
    let frac = value % unit;
    if frac == 0 {
        return whole.to_string();
    }
    let width = unit.ilog10() as usize;
    let digits = format!("{frac:0width$}");
    format!("{whole}.{}", digits.trim_end_matches('0'))
}
