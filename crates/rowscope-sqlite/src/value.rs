//! SQLite cell conversion.

use rusqlite::types::ValueRef;
use serde_json::Value;

/// Convert a SQLite cell into JSON.
///
/// BLOBs become lowercase hex strings; non-finite reals become `null`.
pub fn cell_to_json(cell: ValueRef<'_>) -> Value {
    match cell {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::String(hex::encode(bytes)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cell_to_json() {
        assert_eq!(cell_to_json(ValueRef::Null), Value::Null);
        assert_eq!(cell_to_json(ValueRef::Integer(-4)), json!(-4));
        assert_eq!(cell_to_json(ValueRef::Real(1.5)), json!(1.5));
        assert_eq!(cell_to_json(ValueRef::Real(f64::NAN)), Value::Null);
        assert_eq!(cell_to_json(ValueRef::Text(b"hello")), json!("hello"));
        assert_eq!(
            cell_to_json(ValueRef::Blob(&[0x55, 0x0e, 0x84, 0x00])),
            json!("550e8400")
        );
    }
}
