//! SQL identifier handling
//!
//! Column names come from file headers and end up inside generated SQL.
//! They are checked against an allow-list before being double-quoted.
//! Header rejections are input errors; table name rejections are store
//! errors since the table name comes from configuration.

use std::sync::LazyLock;

use regex::Regex;

use crate::{Error, Result};

/// Longest accepted column name, in characters
const MAX_COLUMN_CHARS: usize = 64;

static COLUMN_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\p{L}\p{N}_][\p{L}\p{N}_ .,'’()$%#&/+:-]*$").expect("static regex")
});

static COLUMN_CHAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}\p{N}_ .,'’()$%#&/+:-]$").expect("static regex"));

static TABLE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,63}$").expect("static regex"));

/// Why a header cannot be used as a column name, if it cannot
fn column_problem(name: &str) -> Option<String> {
    if name.is_empty() {
        return Some("header is empty".to_string());
    }
    if name.chars().count() > MAX_COLUMN_CHARS {
        return Some(format!("longer than {MAX_COLUMN_CHARS} characters"));
    }
    if name.trim() != name {
        return Some("leading or trailing whitespace".to_string());
    }
    if COLUMN_NAME.is_match(name) {
        return None;
    }
    let mut buf = [0u8; 4];
    match name
        .chars()
        .find(|c| !COLUMN_CHAR.is_match(c.encode_utf8(&mut buf)))
    {
        Some(c) => Some(format!("character '{c}' is not allowed")),
        None => Some("must start with a letter, digit or underscore".to_string()),
    }
}

/// Check a column name taken from an uploaded header
pub fn validate_column(name: &str) -> Result<&str> {
    match column_problem(name) {
        None => Ok(name),
        Some(reason) => Err(Error::InvalidColumnName {
            name: name.to_string(),
            reason,
        }),
    }
}

/// Check a table name; stricter than columns since it is also passed to the appender unquoted
pub fn validate_table(name: &str) -> Result<&str> {
    if TABLE_NAME.is_match(name) {
        Ok(name)
    } else {
        Err(Error::InvalidIdentifier(name.to_string()))
    }
}

/// Double-quote an identifier, escaping embedded quotes
pub fn quote(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Validate then quote a column name
pub fn quoted_column(name: &str) -> Result<String> {
    validate_column(name).map(quote)
}

/// Validate then quote a table name
pub fn quoted_table(name: &str) -> Result<String> {
    validate_table(name).map(quote)
}
