//! Error types for filter compilation.

use crate::span::{offset_to_column, Span};
use thiserror::Error;

/// Kinds of filter compile errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterErrorKind {
    /// Nothing left to parse after trimming and stripping the `?` sentinel.
    EmptyInput,
    /// The condition is not of the form `column<op>value`.
    InvalidSyntax,
    /// A relative date token was combined with `*`, `^` or `$`.
    UnsupportedOperatorForDateHelper,
    /// Every group was empty after skipping blank conditions.
    NoValidConditions,
}

impl FilterErrorKind {
    /// Stable code for API consumers.
    pub fn code(self) -> &'static str {
        match self {
            FilterErrorKind::EmptyInput => "EMPTY_INPUT",
            FilterErrorKind::InvalidSyntax => "INVALID_SYNTAX",
            FilterErrorKind::UnsupportedOperatorForDateHelper => {
                "UNSUPPORTED_OPERATOR_FOR_DATE_HELPER"
            }
            FilterErrorKind::NoValidConditions => "NO_VALID_CONDITIONS",
        }
    }
}

/// Error produced while parsing or compiling a filter expression.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct FilterError {
    /// Error kind for programmatic handling.
    pub kind: FilterErrorKind,
    /// The error message.
    pub message: String,
    /// Span in the filter string where the error occurred.
    pub span: Span,
    /// Optional hint for fixing the error.
    pub hint: Option<String>,
}

impl FilterError {
    /// Create a new filter error.
    pub fn new(kind: FilterErrorKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            message: message.into(),
            span,
            hint: None,
        }
    }

    /// Add a hint to the error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Create an empty input error.
    pub fn empty_input(span: Span) -> Self {
        Self::new(FilterErrorKind::EmptyInput, "filter is empty", span)
    }

    /// Create an invalid syntax error.
    pub fn invalid_syntax(condition: &str, span: Span) -> Self {
        Self::new(
            FilterErrorKind::InvalidSyntax,
            format!("invalid filter condition '{}'", condition),
            span,
        )
        .with_hint("use: column=value or column>value")
    }

    /// Create an unsupported date helper operator error.
    pub fn unsupported_date_operator(op: &str, span: Span) -> Self {
        Self::new(
            FilterErrorKind::UnsupportedOperatorForDateHelper,
            format!("operator '{}' cannot be used with a date helper", op),
            span,
        )
        .with_hint("date helpers support =, !=, >, <, >= and <=")
    }

    /// Create a no valid conditions error.
    pub fn no_valid_conditions(span: Span) -> Self {
        Self::new(
            FilterErrorKind::NoValidConditions,
            "filter contains no valid conditions",
            span,
        )
    }

    /// Format the error with the filter string and a caret under the span.
    pub fn format_with_source(&self, source: &str) -> String {
        let col = offset_to_column(source, self.span.start);
        let mut result = format!("error[{}]: {}\n", self.kind.code(), self.message);
        result.push_str(&format!("  --> column {}\n", col));
        result.push_str(&format!("   |\n   | {}\n   | ", source));

        for _ in 1..col {
            result.push(' ');
        }
        result.push('^');

        let width = source
            .get(self.span.start..self.span.end.min(source.len()))
            .map(|s| s.chars().count())
            .unwrap_or(0);
        for _ in 1..width {
            result.push('~');
        }
        result.push('\n');

        if let Some(hint) = &self.hint {
            result.push_str(&format!("   = hint: {}\n", hint));
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_formatting() {
        let source = "age>18&name";
        let err = FilterError::invalid_syntax("name", Span::new(7, 11));

        let formatted = err.format_with_source(source);
        assert!(formatted.contains("error[INVALID_SYNTAX]"));
        assert!(formatted.contains("column 8"));
        assert!(formatted.contains("       ^~~~"));
        assert!(formatted.contains("hint: use: column=value or column>value"));
    }

    #[test]
    fn test_kind_codes() {
        assert_eq!(FilterErrorKind::EmptyInput.code(), "EMPTY_INPUT");
        assert_eq!(
            FilterErrorKind::UnsupportedOperatorForDateHelper.code(),
            "UNSUPPORTED_OPERATOR_FOR_DATE_HELPER"
        );
    }
}
