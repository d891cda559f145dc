//! Abstract syntax tree for compiled filter expressions.
//!
//! A filter is an OR of AND-groups of single-column conditions. The tree is
//! independent of any SQL dialect; see [`crate::dialect`] for serialization.

use crate::date::RelativeDate;
use crate::span::{Span, Spanned};
use uuid::Uuid;

/// A complete filter: one or more groups joined with OR.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    /// Non-empty groups, in source order.
    pub groups: Vec<Conjunction>,
    /// Span covering all groups.
    pub span: Span,
}

impl Predicate {
    /// Total number of conditions across all groups.
    pub fn condition_count(&self) -> usize {
        self.groups.iter().map(|g| g.conditions.len()).sum()
    }

    /// Iterate over every condition in source order.
    pub fn conditions(&self) -> impl Iterator<Item = &Condition> {
        self.groups.iter().flat_map(|g| g.conditions.iter())
    }
}

/// Conditions joined with AND.
#[derive(Debug, Clone, PartialEq)]
pub struct Conjunction {
    /// Non-empty list of conditions.
    pub conditions: Vec<Condition>,
    /// Span covering all conditions.
    pub span: Span,
}

/// A single `column<op>value` condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    /// The column being filtered.
    pub column: Spanned<String>,
    /// The operator.
    pub op: Spanned<FilterOp>,
    /// The classified value.
    pub operand: Spanned<Operand>,
    /// Span of the whole condition.
    pub span: Span,
}

/// Filter operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterOp {
    /// Equal (`=`).
    Eq,
    /// Not equal (`!=`).
    Ne,
    /// Greater than (`>`).
    Gt,
    /// Greater than or equal (`>=`).
    Ge,
    /// Less than (`<`).
    Lt,
    /// Less than or equal (`<=`).
    Le,
    /// Substring match (`*`).
    Contains,
    /// Prefix match (`^`).
    StartsWith,
    /// Suffix match (`$`).
    EndsWith,
}

impl FilterOp {
    /// The operator as typed by the user.
    pub fn symbol(self) -> &'static str {
        match self {
            FilterOp::Eq => "=",
            FilterOp::Ne => "!=",
            FilterOp::Gt => ">",
            FilterOp::Ge => ">=",
            FilterOp::Lt => "<",
            FilterOp::Le => "<=",
            FilterOp::Contains => "*",
            FilterOp::StartsWith => "^",
            FilterOp::EndsWith => "$",
        }
    }

    /// The SQL comparison operator.
    pub fn sql(self) -> &'static str {
        match self {
            FilterOp::Eq => "=",
            FilterOp::Ne => "!=",
            FilterOp::Gt => ">",
            FilterOp::Ge => ">=",
            FilterOp::Lt => "<",
            FilterOp::Le => "<=",
            FilterOp::Contains | FilterOp::StartsWith | FilterOp::EndsWith => "LIKE",
        }
    }

    /// Natural-language phrase used in previews.
    pub fn phrase(self) -> &'static str {
        match self {
            FilterOp::Eq => "equals",
            FilterOp::Ne => "not equals",
            FilterOp::Gt => "greater than",
            FilterOp::Ge => "greater than or equal to",
            FilterOp::Lt => "less than",
            FilterOp::Le => "less than or equal to",
            FilterOp::Contains => "contains",
            FilterOp::StartsWith => "starts with",
            FilterOp::EndsWith => "ends with",
        }
    }

    /// Whether this operator compiles to a LIKE pattern.
    pub fn is_pattern(self) -> bool {
        matches!(
            self,
            FilterOp::Contains | FilterOp::StartsWith | FilterOp::EndsWith
        )
    }

    /// Wrap a value in the wildcards this operator needs.
    ///
    /// Returns `None` for plain comparisons.
    pub fn pattern(self, value: &str) -> Option<String> {
        match self {
            FilterOp::Contains => Some(format!("%{}%", value)),
            FilterOp::StartsWith => Some(format!("{}%", value)),
            FilterOp::EndsWith => Some(format!("%{}", value)),
            _ => None,
        }
    }
}

/// A classified condition value.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Numeric literal, emitted unquoted exactly as typed.
    Number(String),
    /// String literal (unescaped; quoting happens at serialization).
    Text(String),
    /// UUID compared against a binary column.
    Binary(Uuid),
    /// Relative date evaluated by the data source.
    RelativeDate(RelativeDate),
}
