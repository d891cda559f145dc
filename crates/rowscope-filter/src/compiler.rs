//! Compiles filter expressions into a WHERE clause and a preview.

use crate::ast::{Condition, Predicate};
use crate::dialect::{condition_sql, predicate_sql, MySql, SqlDialect};
use crate::error::FilterError;
use crate::parser;
use crate::preview::{condition_preview, predicate_preview};
use crate::schema::ColumnDescriptor;

/// Result of compiling a single condition.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCondition {
    pub condition: Condition,
    pub where_clause: String,
    pub preview: String,
}

/// Result of compiling a full filter expression.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledPredicate {
    /// WHERE clause body, without the `WHERE` keyword.
    pub where_clause: String,
    /// Natural-language rendering, prefixed with `WHERE`.
    pub preview: String,
}

/// Filter compiler bound to a dialect and the target table's columns.
pub struct Compiler<'a> {
    dialect: &'a dyn SqlDialect,
    columns: &'a [ColumnDescriptor],
}

impl<'a> Compiler<'a> {
    /// Create a compiler for a dialect, with no column type hints.
    pub fn new(dialect: &'a dyn SqlDialect) -> Self {
        Self {
            dialect,
            columns: &[],
        }
    }

    /// Supply column types, used to decide on binary UUID literals.
    pub fn with_columns(mut self, columns: &'a [ColumnDescriptor]) -> Self {
        self.columns = columns;
        self
    }

    /// Parse a filter into its AST without serializing it.
    pub fn parse(&self, source: &str) -> Result<Predicate, FilterError> {
        parser::parse(source, self.columns)
    }

    /// Compile a full filter expression. The first invalid condition aborts
    /// the compile and its error is returned as-is.
    pub fn compile(&self, source: &str) -> Result<CompiledPredicate, FilterError> {
        let predicate = self.parse(source)?;
        Ok(self.serialize(&predicate))
    }

    /// Compile a single `column<op>value` condition.
    pub fn compile_condition(&self, source: &str) -> Result<ParsedCondition, FilterError> {
        let condition = parser::parse_condition(source, self.columns)?;
        let where_clause = condition_sql(&condition, self.dialect);
        let preview = format!("WHERE {}", condition_preview(&condition));
        Ok(ParsedCondition {
            condition,
            where_clause,
            preview,
        })
    }

    /// Serialize an already-parsed predicate.
    pub fn serialize(&self, predicate: &Predicate) -> CompiledPredicate {
        let compiled = CompiledPredicate {
            where_clause: predicate_sql(predicate, self.dialect),
            preview: predicate_preview(predicate),
        };
        tracing::trace!(
            dialect = self.dialect.name(),
            conditions = predicate.condition_count(),
            where_clause = %compiled.where_clause,
            "compiled filter"
        );
        compiled
    }
}

impl Default for Compiler<'static> {
    fn default() -> Self {
        Compiler::new(&MySql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Sqlite;
    use crate::error::FilterErrorKind;
    use pretty_assertions::assert_eq;

    const UUID: &str = "550e8400-e29b-41d4-a716-446655440000";

    fn compile(source: &str) -> Result<CompiledPredicate, FilterError> {
        Compiler::default().compile(source)
    }

    fn where_clause(source: &str) -> String {
        compile(source).unwrap().where_clause
    }

    #[test]
    fn test_and_group_is_parenthesized() {
        assert_eq!(where_clause("a=1&b=2"), "(a = 1 AND b = 2)");
    }

    #[test]
    fn test_or_groups_are_bare() {
        assert_eq!(where_clause("a=1|b=2"), "a = 1 OR b = 2");
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        assert_eq!(
            where_clause("a=1&b=2|c=3&d=4"),
            "(a = 1 AND b = 2) OR (c = 3 AND d = 4)"
        );
        assert_eq!(where_clause("a=1|b=2&c=3"), "a = 1 OR (b = 2 AND c = 3)");
    }

    #[test]
    fn test_single_condition() {
        assert_eq!(where_clause("age>18"), "age > 18");
        assert_eq!(where_clause("age>=18"), "age >= 18");
        assert_eq!(where_clause("age<=18"), "age <= 18");
        assert_eq!(where_clause("age<18"), "age < 18");
        assert_eq!(where_clause("status!=active"), "status != 'active'");
        assert_eq!(where_clause("price=-2.5"), "price = -2.5");
    }

    #[test]
    fn test_pattern_operators() {
        assert_eq!(where_clause("name*ali"), "name LIKE '%ali%'");
        assert_eq!(where_clause("name^Al"), "name LIKE 'Al%'");
        assert_eq!(where_clause("email$.org"), "email LIKE '%.org'");
        assert_eq!(where_clause("zip^90"), "zip LIKE '90%'");
    }

    #[test]
    fn test_relative_date() {
        assert_eq!(
            where_clause("created_at>@7d"),
            "created_at > DATE_SUB(NOW(), INTERVAL 7 DAY)"
        );
        assert_eq!(where_clause("created_at>=@today"), "created_at >= CURDATE()");
    }

    #[test]
    fn test_relative_date_expression_is_stable() {
        // The expression defers to the database clock, so compiling twice
        // yields identical text.
        assert_eq!(where_clause("t>@3h"), where_clause("t>@3h"));
    }

    #[test]
    fn test_relative_date_sqlite() {
        let compiled = Compiler::new(&Sqlite).compile("created_at>@7d").unwrap();
        assert_eq!(compiled.where_clause, "created_at > datetime('now', '-7 days')");
    }

    #[test]
    fn test_uuid_against_binary_column() {
        let columns = vec![ColumnDescriptor::new("user_id", "binary(16)")];
        let compiled = Compiler::default()
            .with_columns(&columns)
            .compile(&format!("user_id={}", UUID))
            .unwrap();
        assert_eq!(
            compiled.where_clause,
            "user_id = UNHEX('550e8400e29b41d4a716446655440000')"
        );

        let compiled = Compiler::new(&Sqlite)
            .with_columns(&columns)
            .compile(&format!("user_id={}", UUID))
            .unwrap();
        assert_eq!(
            compiled.where_clause,
            "user_id = X'550e8400e29b41d4a716446655440000'"
        );
    }

    #[test]
    fn test_uuid_against_text_column() {
        let columns = vec![ColumnDescriptor::new("user_id", "char(36)")];
        let compiled = Compiler::default()
            .with_columns(&columns)
            .compile(&format!("user_id={}", UUID))
            .unwrap();
        assert_eq!(compiled.where_clause, format!("user_id = '{}'", UUID));
    }

    #[test]
    fn test_quote_escaping() {
        assert_eq!(where_clause("name=O'Brien"), "name = 'O''Brien'");
        assert_eq!(where_clause("name*O'B"), "name LIKE '%O''B%'");
    }

    #[test]
    fn test_preview() {
        let compiled = compile("age>18").unwrap();
        assert_eq!(compiled.preview, "WHERE age greater than 18");

        let compiled = compile("a=1&b*x|created_at>@7d").unwrap();
        assert_eq!(
            compiled.preview,
            "WHERE a equals 1 AND b contains \"x\" OR created_at greater than 7 days ago"
        );
    }

    #[test]
    fn test_compile_condition() {
        let parsed = Compiler::default().compile_condition("?age>=21").unwrap();
        assert_eq!(parsed.where_clause, "age >= 21");
        assert_eq!(parsed.preview, "WHERE age greater than or equal to 21");
    }

    #[test]
    fn test_invalid_condition_aborts_compile() {
        let err = compile("a=1&b=2|nonsense").unwrap_err();
        assert_eq!(err.kind, FilterErrorKind::InvalidSyntax);
        assert!(err.message.contains("nonsense"));

        let err = compile("a=1&created_at^@today").unwrap_err();
        assert_eq!(err.kind, FilterErrorKind::UnsupportedOperatorForDateHelper);
    }

    #[test]
    fn test_stray_combinators() {
        assert_eq!(where_clause("a=1&&b=2"), "(a = 1 AND b = 2)");
        assert_eq!(where_clause("a=1&|b=2"), "a = 1 OR b = 2");
        assert_eq!(where_clause("|a=1|"), "a = 1");
        assert_eq!(
            compile("|&|").unwrap_err().kind,
            FilterErrorKind::NoValidConditions
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(compile("").unwrap_err().kind, FilterErrorKind::EmptyInput);
        assert_eq!(compile("?").unwrap_err().kind, FilterErrorKind::EmptyInput);
    }
}
