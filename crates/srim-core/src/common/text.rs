//! Line-level primitives shared by every output reader.

use super::constants::COLUMN_SEPARATOR_CHAR;

/// Decodes bytes as Latin-1; every byte maps to the code point of equal value.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|byte| char::from(*byte)).collect()
}

/// Parses a numeric token, accepting Fortran `D` exponents.
pub fn parse_numeric_token(token: &str) -> Option<f64> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    let normalized = token.replace(['D', 'd'], "E");
    normalized
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Parses every whitespace token of `line`, or `None` if any token is not numeric.
pub fn parse_numeric_row(line: &str) -> Option<Vec<f64>> {
    line.split_whitespace().map(parse_numeric_token).collect()
}

/// True for a line made only of `=` (surrounding whitespace ignored).
pub fn is_equals_rule(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && trimmed.bytes().all(|byte| byte == b'=')
}

/// True for a line made only of `-` (surrounding whitespace ignored).
pub fn is_dash_rule(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && trimmed.bytes().all(|byte| byte == b'-')
}

/// Splits a collision-log line on the column separator and drops the leading
/// and trailing segments. Lines without separators yield no segments.
pub fn separator_segments(line: &str) -> Vec<&str> {
    let segments: Vec<&str> = line.split(COLUMN_SEPARATOR_CHAR).collect();
    if segments.len() < 2 {
        return Vec::new();
    }
    segments[1..segments.len() - 1].to_vec()
}

/// Extracts every decimal number embedded in free text, in order.
///
/// Accepts an optional sign, digits, an optional fraction and an optional
/// exponent; a number must start with a digit after its sign.
pub fn scan_numbers(text: &str) -> Vec<f64> {
    let bytes = text.as_bytes();
    let mut values = Vec::new();
    let mut index = 0;

    while index < bytes.len() {
        let start = index;
        let mut cursor = index;
        if matches!(bytes[cursor], b'+' | b'-') {
            cursor += 1;
        }
        if cursor >= bytes.len() || !bytes[cursor].is_ascii_digit() {
            index += 1;
            continue;
        }

        while cursor < bytes.len() && bytes[cursor].is_ascii_digit() {
            cursor += 1;
        }
        if cursor < bytes.len() && bytes[cursor] == b'.' {
            cursor += 1;
            while cursor < bytes.len() && bytes[cursor].is_ascii_digit() {
                cursor += 1;
            }
        }
        if cursor < bytes.len() && matches!(bytes[cursor], b'e' | b'E') {
            let mut exponent = cursor + 1;
            if exponent < bytes.len() && matches!(bytes[exponent], b'+' | b'-') {
                exponent += 1;
            }
            if exponent < bytes.len() && bytes[exponent].is_ascii_digit() {
                while exponent < bytes.len() && bytes[exponent].is_ascii_digit() {
                    exponent += 1;
                }
                cursor = exponent;
            }
        }

        if let Ok(value) = text[start..cursor].parse::<f64>() {
            values.push(value);
        }
        index = cursor;
    }

    values
}

/// First signed integer embedded in `text`.
pub fn first_integer(text: &str) -> Option<i64> {
    let bytes = text.as_bytes();
    let digit_start = bytes.iter().position(u8::is_ascii_digit)?;
    let start = if digit_start > 0 && matches!(bytes[digit_start - 1], b'+' | b'-') {
        digit_start - 1
    } else {
        digit_start
    };
    let end = bytes[digit_start..]
        .iter()
        .position(|byte| !byte.is_ascii_digit())
        .map_or(bytes.len(), |offset| digit_start + offset);
    text[start..end].parse::<i64>().ok()
}

/// First chemical symbol (`[A-Z][a-z]?`) embedded in `text`.
pub fn first_element_symbol(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let start = bytes.iter().position(u8::is_ascii_uppercase)?;
    let end = if bytes.get(start + 1).is_some_and(u8::is_ascii_lowercase) {
        start + 2
    } else {
        start + 1
    };
    Some(&text[start..end])
}

pub fn is_element_symbol(token: &str) -> bool {
    let bytes = token.as_bytes();
    match bytes {
        [first] => first.is_ascii_uppercase(),
        [first, second] => first.is_ascii_uppercase() && second.is_ascii_lowercase(),
        _ => false,
    }
}
