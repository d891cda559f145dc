//! Column metadata consulted while classifying literals.

use serde::{Deserialize, Serialize};

/// A column name and its declared type, as reported by the data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: String,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, column_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_type: column_type.into(),
        }
    }
}

/// Look up a column's declared type by name (case-insensitive).
pub fn column_type<'a>(columns: &'a [ColumnDescriptor], name: &str) -> Option<&'a str> {
    columns
        .iter()
        .find(|c| c.name == name)
        .or_else(|| columns.iter().find(|c| c.name.eq_ignore_ascii_case(name)))
        .map(|c| c.column_type.as_str())
}
