//! Field coercion for catalog columns.
//!
//! Every conversion returns `Option<T>`: `None` is stored as SQL NULL. Nothing
//! here returns an error, a value that does not convert is simply absent.
//! Emptiness is checked on the raw cell, before trimming.

/// Trimmed text, or `None` for an empty/absent cell.
pub fn text(raw: Option<&str>) -> Option<String> {
    non_empty(raw).map(|v| v.trim().to_string())
}

/// Integer column: parse as a real number, then truncate toward zero.
///
/// Non-finite values and values outside the `i64` range yield `None`.
pub fn integer(raw: Option<&str>) -> Option<i64> {
    let value = parse_real(non_empty(raw)?)?;
    if !value.is_finite() {
        return None;
    }
    let truncated = value.trunc();
    if truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
        return None;
    }
    Some(truncated as i64)
}

/// Real column.
pub fn real(raw: Option<&str>) -> Option<f64> {
    parse_real(non_empty(raw)?).filter(|v| !v.is_nan())
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.filter(|v| !v.is_empty())
}

fn parse_real(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok()
}
