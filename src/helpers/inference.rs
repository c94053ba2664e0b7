use crate::frame::Value;

/// Converts one raw field into a typed [`Value`].
///
/// Empty input stays `Text("")`. A single pair of surrounding double quotes is
/// stripped before parsing. Integers that do not fit `i64` fall through to the
/// float parser.
pub fn infer_value(raw: &str) -> Value {
    if raw.is_empty() {
        return Value::Text(String::new());
    }

    let text = if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        &raw[1..raw.len() - 1]
    } else {
        raw
    };

    if let Some(v) = parse_integer(text) {
        Value::Int(v)
    } else if let Ok(v) = fast_float::parse::<f64, _>(text) {
        Value::Float(v)
    } else {
        Value::Text(text.to_string())
    }
}

/// Optional sign followed by ASCII digits only
fn parse_integer(text: &str) -> Option<i64> {
    let bytes = text.as_bytes();
    let (negative, digits) = match bytes.split_first() {
        Some((b'-', rest)) => (true, rest),
        Some((b'+', rest)) => (false, rest),
        _ => (false, bytes),
    };

    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }

    // atoi_simd caps input at the widest i64, so drop zero padding first
    let first_nonzero = digits.iter().position(|&b| b != b'0');
    let digits = first_nonzero.map_or(&digits[digits.len() - 1..], |i| &digits[i..]);

    let magnitude = atoi_simd::parse::<u64>(digits).ok()? as i128;
    i64::try_from(if negative { -magnitude } else { magnitude }).ok()
}
