//! Lenient parsing of loosely typed request values.

/// Leading integer of `raw`, the way browsers' `parseInt` reads it.
///
/// Leading whitespace and one sign are skipped. A `0x`/`0X` prefix switches to
/// hexadecimal; otherwise decimal digits are read. Anything after the digits
/// is ignored. `None` when there are no digits or the value overflows `i64`.
///
/// ```rust
/// use axum_helpers::params::parse_lenient_int;
///
/// assert_eq!(parse_lenient_int(" 12abc"), Some(12));
/// assert_eq!(parse_lenient_int("0x1f"), Some(31));
/// assert_eq!(parse_lenient_int("abc"), None);
/// ```
pub fn parse_lenient_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let (radix, digits) = match rest.get(..2) {
        Some("0x" | "0X") => (16, &rest[2..]),
        _ => (10, rest),
    };

    let end = digits
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let magnitude = i64::from_str_radix(&digits[..end], radix).ok()?;
    Some(if negative { -magnitude } else { magnitude })
}
