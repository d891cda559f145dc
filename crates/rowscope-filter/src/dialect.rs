//! SQL serialization of filter predicates.
//!
//! Dialects differ only in how relative dates and binary literals are
//! written; comparison syntax, LIKE patterns and string quoting are shared.

use crate::ast::{Condition, Conjunction, Operand, Predicate};
use crate::date::{DateUnit, RelativeDate};
use crate::literal::quote_string;

/// A backend-specific SQL flavour.
pub trait SqlDialect: Send + Sync {
    /// Dialect name, for logging.
    fn name(&self) -> &'static str;

    /// Expression for a relative date, evaluated by the database.
    fn relative_date(&self, date: &RelativeDate) -> String;

    /// Literal for raw bytes given as lowercase hex digits.
    fn binary_literal(&self, hex: &str) -> String;

    /// String literal with embedded quotes escaped.
    fn string_literal(&self, value: &str) -> String {
        quote_string(value)
    }
}

/// MySQL / MariaDB.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySql;

impl SqlDialect for MySql {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn relative_date(&self, date: &RelativeDate) -> String {
        match date {
            RelativeDate::Now => "NOW()".to_string(),
            RelativeDate::Today => "CURDATE()".to_string(),
            RelativeDate::Yesterday => "DATE_SUB(CURDATE(), INTERVAL 1 DAY)".to_string(),
            RelativeDate::Ago { amount, unit } => {
                let keyword = match unit {
                    DateUnit::Hour => "HOUR",
                    DateUnit::Day => "DAY",
                    DateUnit::Week => "WEEK",
                    DateUnit::Month => "MONTH",
                    DateUnit::Year => "YEAR",
                };
                format!("DATE_SUB(NOW(), INTERVAL {} {})", amount, keyword)
            }
        }
    }

    fn binary_literal(&self, hex: &str) -> String {
        format!("UNHEX('{}')", hex)
    }
}

/// SQLite.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sqlite;

impl SqlDialect for Sqlite {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn relative_date(&self, date: &RelativeDate) -> String {
        match date {
            RelativeDate::Now => "datetime('now')".to_string(),
            RelativeDate::Today => "date('now')".to_string(),
            RelativeDate::Yesterday => "date('now', '-1 day')".to_string(),
            RelativeDate::Ago { amount, unit } => {
                // SQLite has no week modifier.
                let (amount, modifier) = match unit {
                    DateUnit::Hour => (u64::from(*amount), "hours"),
                    DateUnit::Day => (u64::from(*amount), "days"),
                    DateUnit::Week => (u64::from(*amount) * 7, "days"),
                    DateUnit::Month => (u64::from(*amount), "months"),
                    DateUnit::Year => (u64::from(*amount), "years"),
                };
                format!("datetime('now', '-{} {}')", amount, modifier)
            }
        }
    }

    fn binary_literal(&self, hex: &str) -> String {
        format!("X'{}'", hex)
    }
}

/// Serialize an operand.
pub fn operand_sql(operand: &Operand, dialect: &dyn SqlDialect) -> String {
    match operand {
        Operand::Number(n) => n.clone(),
        Operand::Text(s) => dialect.string_literal(s),
        Operand::Binary(uuid) => dialect.binary_literal(&uuid.simple().to_string()),
        Operand::RelativeDate(date) => dialect.relative_date(date),
    }
}

/// Serialize one condition, e.g. `age > 18` or `name LIKE '%al%'`.
pub fn condition_sql(condition: &Condition, dialect: &dyn SqlDialect) -> String {
    let op = condition.op.value;
    // LIKE operators always carry a text operand
    let value = match &condition.operand.value {
        Operand::Text(text) => match op.pattern(text) {
            Some(pattern) => dialect.string_literal(&pattern),
            None => dialect.string_literal(text),
        },
        operand => operand_sql(operand, dialect),
    };
    format!("{} {} {}", condition.column.value, op.sql(), value)
}

/// Serialize an AND-group. Multi-condition groups are parenthesized.
pub fn conjunction_sql(group: &Conjunction, dialect: &dyn SqlDialect) -> String {
    let parts: Vec<String> = group
        .conditions
        .iter()
        .map(|c| condition_sql(c, dialect))
        .collect();

    if parts.len() > 1 {
        format!("({})", parts.join(" AND "))
    } else {
        parts.join("")
    }
}

/// Serialize a whole predicate into a WHERE clause body (without `WHERE`).
pub fn predicate_sql(predicate: &Predicate, dialect: &dyn SqlDialect) -> String {
    predicate
        .groups
        .iter()
        .map(|g| conjunction_sql(g, dialect))
        .collect::<Vec<_>>()
        .join(" OR ")
}
