//! Natural-language rendering of a predicate for UI feedback.
//!
//! Rendered from the same AST as the SQL, mirroring its grouping with plain
//! `AND` / `OR` and no parentheses.

use crate::ast::{Condition, Operand, Predicate};

fn operand_preview(operand: &Operand) -> String {
    match operand {
        Operand::Number(n) => n.clone(),
        Operand::Text(s) => format!("\"{}\"", s),
        Operand::Binary(uuid) => uuid.hyphenated().to_string(),
        Operand::RelativeDate(date) => date.describe(),
    }
}

/// Preview of one condition, e.g. `age greater than 18`.
pub fn condition_preview(condition: &Condition) -> String {
    format!(
        "{} {} {}",
        condition.column.value,
        condition.op.value.phrase(),
        operand_preview(&condition.operand.value)
    )
}

/// Preview of a whole predicate, prefixed with `WHERE`.
pub fn predicate_preview(predicate: &Predicate) -> String {
    let groups: Vec<String> = predicate
        .groups
        .iter()
        .map(|g| {
            g.conditions
                .iter()
                .map(condition_preview)
                .collect::<Vec<_>>()
                .join(" AND ")
        })
        .collect();

    format!("WHERE {}", groups.join(" OR "))
}
