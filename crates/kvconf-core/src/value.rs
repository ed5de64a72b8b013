//! Typed parsing of raw configuration strings.
//!
//! Values travel as strings; these helpers turn them into numbers and
//! booleans. Two boolean readings exist: the lenient one treats anything
//! other than `"true"` as false, the strict one only accepts `true`/`false`.

use crate::error::{ConfigError, Result};

/// Parses a base-10 integer, ignoring surrounding whitespace.
///
/// # Example
///
/// ```
/// use kvconf_core::value::parse_number;
///
/// assert_eq!(parse_number("config/carrier-service/port", "3005").unwrap(), 3005);
/// assert!(parse_number("config/carrier-service/port", "abc").is_err());
/// ```
pub fn parse_number(key: &str, raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ConfigError::invalid_number(key, raw))
}

/// Parses a number, falling back to `default` on malformed input.
pub fn parse_number_or(key: &str, raw: &str, default: Option<i64>) -> Result<i64> {
    match (parse_number(key, raw), default) {
        (Ok(n), _) => Ok(n),
        (Err(_), Some(d)) => Ok(d),
        (Err(e), None) => Err(e),
    }
}

/// Lenient boolean: true iff the lowercased value equals `"true"`.
///
/// Every other string, typos included, reads as false.
pub fn parse_bool_lenient(raw: &str) -> bool {
    raw.to_lowercase() == "true"
}

/// Strict boolean: accepts only `true`/`false`, case-insensitive.
pub fn parse_bool_strict(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ConfigError::invalid_boolean(key, raw)),
    }
}

/// Strict boolean with a fallback for malformed input.
pub fn parse_bool_strict_or(key: &str, raw: &str, default: Option<bool>) -> Result<bool> {
    match (parse_bool_strict(key, raw), default) {
        (Ok(b), _) => Ok(b),
        (Err(_), Some(d)) => Ok(d),
        (Err(e), None) => Err(e),
    }
}
