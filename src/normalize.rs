//! Pure conversions from raw attribute text into typed values with fixed defaults.
//!
//! Decoded attributes arrive as optional text. Numeric strings (IS/DS) may carry
//! several values separated by a backslash, in which case only the first one counts.

/// Sentinel some writers store instead of leaving a string attribute empty.
const NULL_SENTINEL: &str = "None";

fn clean(raw: &str) -> &str {
    raw.trim_matches(|c: char| c.is_whitespace() || c == '\0')
}

fn first_value(raw: &str) -> &str {
    clean(raw.split('\\').next().unwrap_or_default())
}

/// String attribute: missing, empty or sentinel values collapse to `""`.
pub fn text(raw: Option<&str>) -> String {
    match raw.map(clean) {
        Some(s) if !s.is_empty() && s != NULL_SENTINEL => s.to_string(),
        _ => String::new(),
    }
}

/// First value of a multi-valued float attribute, if it parses to a finite number.
pub fn first_float(raw: Option<&str>) -> Option<f64> {
    raw.map(first_value)
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

pub fn float(raw: Option<&str>, default: f64) -> f64 {
    first_float(raw).unwrap_or(default)
}

pub fn int(raw: Option<&str>, default: i64) -> i64 {
    raw.map(first_value)
        .and_then(|s| s.strip_prefix('+').unwrap_or(s).parse::<i64>().ok())
        .unwrap_or(default)
}
