//! Dotenv line parser.
//!
//! Responsibilities:
//! - Turn a single raw line into an optional `(key, value)` pair.
//! - Strip trailing comments without breaking `#` inside quoted values.
//! - Remove one pair of surrounding quotes from values.
//!
//! Does NOT handle:
//! - Reading files or writing to an environment store (see `accessor.rs`).
//! - Interpolation, multi-line values or `export` prefixes.
//!
//! Invariants:
//! - Parsing is total: every input line yields `Some` pair or `None`, never an error.
//! - Escaped quotes (`\"`, `\'`) at the value boundary are preserved verbatim.

const QUOTES: &[char] = &['"', '\''];

/// A key/value pair parsed from a dotenv document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// 1-based line number in the source document.
    pub line: usize,
    pub key: String,
    pub value: String,
}

/// Parse every line of a dotenv document, in order.
///
/// Blank and comment-only lines are dropped; all other lines yield an entry.
pub fn parse(contents: &str) -> Vec<Entry> {
    contents
        .lines()
        .enumerate()
        .filter_map(|(idx, raw)| {
            parse_line(raw).map(|(key, value)| Entry {
                line: idx + 1,
                key,
                value,
            })
        })
        .collect()
}

/// Parse a single dotenv line.
///
/// Returns `None` for blank lines and comments. A line without `=` yields the
/// key with an empty value; everything after the first `=` is the value.
pub fn parse_line(raw: &str) -> Option<(String, String)> {
    let line = strip_comments(raw).trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let (key, value) = line.split_once('=').unwrap_or((line, ""));
    Some((key.trim().to_string(), remove_quotes(value).to_string()))
}

/// Remove a trailing comment from a raw line.
///
/// When the line contains two or more quote characters, everything after the
/// last quote is dropped. Otherwise the line is cut at the first `#` that is
/// not at position 0.
pub fn strip_comments(line: &str) -> &str {
    match (line.find(QUOTES), line.rfind(QUOTES)) {
        (Some(first), Some(last)) if last > first => &line[..=last],
        _ => match line.find('#') {
            Some(pound) if pound > 0 => &line[..pound],
            _ => line,
        },
    }
}

/// Strip one leading quote and one unescaped trailing quote from a value.
pub fn remove_quotes(value: &str) -> &str {
    let mut value = value.trim();

    if let Some(rest) = value.strip_prefix(QUOTES) {
        value = rest;
    }

    let escaped = value.ends_with("\\\"") || value.ends_with("\\'");
    if !escaped {
        if let Some(rest) = value.strip_suffix(QUOTES) {
            value = rest;
        }
    }

    value
}
