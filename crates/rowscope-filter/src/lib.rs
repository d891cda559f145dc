//! rowscope filter expressions
//!
//! This crate compiles the compact, operator-based filter strings typed into
//! the table browser into a SQL WHERE clause plus a human-readable preview.
//!
//! # Filter Syntax
//!
//! ```text
//! age>18                      comparison: = != > >= < <=
//! name*ali                    contains
//! name^Al                     starts with
//! email$.org                  ends with
//! created_at>@7d              relative dates: @now @today @yesterday @{n}h|d|w|m|y
//! status=active&age>18        AND
//! role=admin|role=owner       OR (AND binds tighter)
//! ```
//!
//! # Usage
//!
//! ```rust
//! use rowscope_filter::{compile, ColumnDescriptor, Compiler, Sqlite};
//!
//! let compiled = compile("a=1&b=2|c=3").unwrap();
//! assert_eq!(compiled.where_clause, "(a = 1 AND b = 2) OR c = 3");
//!
//! let columns = vec![ColumnDescriptor::new("id", "BINARY(16)")];
//! let compiled = Compiler::new(&Sqlite)
//!     .with_columns(&columns)
//!     .compile("id=550e8400-e29b-41d4-a716-446655440000")
//!     .unwrap();
//! assert_eq!(compiled.where_clause, "id = X'550e8400e29b41d4a716446655440000'");
//! ```

pub mod ast;
pub mod compiler;
pub mod date;
pub mod dialect;
pub mod error;
pub mod lexer;
pub mod literal;
pub mod parser;
pub mod preview;
pub mod schema;
pub mod span;

// Re-export main types
pub use ast::{Condition, Conjunction, FilterOp, Operand, Predicate};
pub use compiler::{CompiledPredicate, Compiler, ParsedCondition};
pub use date::{DateUnit, RelativeDate};
pub use dialect::{MySql, SqlDialect, Sqlite};
pub use error::{FilterError, FilterErrorKind};
pub use schema::ColumnDescriptor;
pub use span::{Span, Spanned};

/// Compile a filter expression with the MySQL dialect and no column hints.
///
/// # Example
///
/// ```rust
/// use rowscope_filter::compile;
///
/// let compiled = compile("age>18").unwrap();
/// assert_eq!(compiled.where_clause, "age > 18");
/// assert_eq!(compiled.preview, "WHERE age greater than 18");
/// ```
pub fn compile(source: &str) -> Result<CompiledPredicate, FilterError> {
    Compiler::default().compile(source)
}

/// Compile a filter expression for a dialect and a table's columns.
pub fn compile_for(
    source: &str,
    columns: &[ColumnDescriptor],
    dialect: &dyn SqlDialect,
) -> Result<CompiledPredicate, FilterError> {
    Compiler::new(dialect).with_columns(columns).compile(source)
}

/// Parse a filter expression into its AST.
pub fn parse(source: &str, columns: &[ColumnDescriptor]) -> Result<Predicate, FilterError> {
    parser::parse(source, columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_defaults_to_mysql() {
        let compiled = compile("seen<@yesterday").unwrap();
        assert_eq!(
            compiled.where_clause,
            "seen < DATE_SUB(CURDATE(), INTERVAL 1 DAY)"
        );
    }

    #[test]
    fn test_compile_for_sqlite() {
        let columns = vec![ColumnDescriptor::new("created_at", "TEXT")];
        let compiled = compile_for("created_at>=@today", &columns, &Sqlite).unwrap();
        assert_eq!(compiled.where_clause, "created_at >= date('now')");
    }

    #[test]
    fn test_error_with_source_context() {
        let source = "status=active&oops";
        let err = compile(source).unwrap_err();
        let formatted = err.format_with_source(source);
        assert!(formatted.contains("column 15"));
        assert!(formatted.contains("INVALID_SYNTAX"));
    }
}
