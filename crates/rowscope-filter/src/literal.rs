//! Classification and quoting of raw condition values.

use crate::ast::Operand;
use uuid::Uuid;

/// Classify a raw value given the column's declared type, if known.
///
/// Numbers pass through unquoted. A UUID is only binary-encoded when the
/// column type mentions "binary"; against any other column it stays a string.
pub fn classify(raw: &str, column_type: Option<&str>) -> Operand {
    if is_numeric(raw) {
        return Operand::Number(raw.to_string());
    }

    if column_type.is_some_and(is_binary_type) {
        if let Some(uuid) = parse_uuid(raw) {
            return Operand::Binary(uuid);
        }
    }

    Operand::Text(raw.to_string())
}

/// Matches `-?\d+(\.\d+)?`.
pub fn is_numeric(raw: &str) -> bool {
    let digits = raw.strip_prefix('-').unwrap_or(raw);
    let (int, frac) = match digits.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (digits, None),
    };

    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    all_digits(int) && frac.map_or(true, all_digits)
}

/// Parse a hyphenated `8-4-4-4-12` UUID. Braced, URN and simple forms are
/// not accepted.
pub fn parse_uuid(raw: &str) -> Option<Uuid> {
    if raw.len() != 36 {
        return None;
    }
    Uuid::parse_str(raw).ok()
}

/// Whether a declared column type stores raw bytes.
pub fn is_binary_type(column_type: &str) -> bool {
    column_type.to_ascii_lowercase().contains("binary")
}

/// Quote a string literal, doubling embedded single quotes.
pub fn quote_string(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
