//! Permissive parsing of numeric request parameters.
//!
//! Request parameters arrive as untyped strings. Dimensions and quality are
//! read with leading-integer semantics: surrounding whitespace is skipped, an
//! optional sign is accepted, and parsing stops at the first non-digit. A
//! value with no leading digits is "absent", never an error. Dimensions also
//! accept a `0x` hexadecimal prefix; quality is always decimal.

/// Parse the leading integer of `input`.
///
/// - `"300"` → `Some(300)`
/// - `" 42px"` → `Some(42)`
/// - `"-5"` → `Some(-5)`
/// - `"12.9"` → `Some(12)`
/// - `""`, `"abc"`, `"+"` → `None`
/// - values outside `i64` → `None`
pub fn parse_leading_int(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (sign_len, digits) = match trimmed.as_bytes().first() {
        Some(b'+') | Some(b'-') => (1, &trimmed[1..]),
        _ => (0, trimmed),
    };
    let digit_len = digits.bytes().take_while(u8::is_ascii_digit).count();
    if digit_len == 0 {
        return None;
    }
    trimmed[..sign_len + digit_len].parse().ok()
}

/// Parse a dimension, treating anything unparseable as 0 ("unspecified").
///
/// `"0x10"` is 16. Values outside `i64` are unparseable.
pub fn parse_dimension(input: Option<&str>) -> i64 {
    input
        .and_then(|s| parse_leading_hex(s).or_else(|| parse_leading_int(s)))
        .unwrap_or(0)
}

/// Leading `0x`/`0X` hexadecimal integer, with an optional sign.
fn parse_leading_hex(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let hex = unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))?;
    let digit_len = hex.bytes().take_while(u8::is_ascii_hexdigit).count();
    if digit_len == 0 {
        return None;
    }
    let value = i64::from_str_radix(&hex[..digit_len], 16).ok()?;
    Some(if negative { -value } else { value })
}
