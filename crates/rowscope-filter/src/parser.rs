//! Recursive descent parser for filter expressions.
//!
//! Grammar:
//!
//! ```text
//! Expr      := OrGroup ("|" OrGroup)*
//! OrGroup   := Condition ("&" Condition)*
//! Condition := column operator value
//! ```
//!
//! AND binds tighter than OR by construction. Blank conditions (e.g. from
//! `a=1&&b=2`) are skipped and groups left with no conditions are dropped.

use crate::ast::*;
use crate::date;
use crate::error::FilterError;
use crate::lexer::{lex_operator, Lexer, Token};
use crate::literal;
use crate::schema::{column_type, ColumnDescriptor};
use crate::span::{Span, Spanned};

/// A condition split into its three raw parts, before classification.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionToken<'a> {
    pub column: Spanned<&'a str>,
    pub op: Spanned<FilterOp>,
    pub raw_value: Spanned<&'a str>,
    pub span: Span,
}

/// Parser for filter expressions.
pub struct Parser<'source> {
    lexer: Lexer<'source>,
    columns: &'source [ColumnDescriptor],
    /// Offset of the lexed text within the original filter string.
    base: usize,
}

impl<'source> Parser<'source> {
    /// Create a new parser. `columns` supplies type hints for literals.
    pub fn new(source: &'source str, columns: &'source [ColumnDescriptor]) -> Self {
        Self::with_offset(source, 0, columns)
    }

    fn with_offset(source: &'source str, base: usize, columns: &'source [ColumnDescriptor]) -> Self {
        Self {
            lexer: Lexer::new(source),
            columns,
            base,
        }
    }

    /// Parse a complete expression.
    pub fn parse_expr(&mut self) -> Result<Predicate, FilterError> {
        let mut groups = Vec::new();

        loop {
            if let Some(group) = self.parse_or_group()? {
                groups.push(group);
            }

            match self.lexer.next_token() {
                Some(tok) if tok.token == Token::Or => continue,
                _ => break,
            }
        }

        let full = Span::new(self.base, self.base + self.lexer.source().len());
        let span = match (groups.first(), groups.last()) {
            (Some(first), Some(last)) => first.span.merge(last.span),
            _ => return Err(FilterError::no_valid_conditions(full)),
        };

        Ok(Predicate { groups, span })
    }

    /// Parse one OR-group. Returns `None` if every condition in it was blank.
    fn parse_or_group(&mut self) -> Result<Option<Conjunction>, FilterError> {
        let mut conditions = Vec::new();

        loop {
            if let Some(tok) = self.lexer.peek().copied() {
                if tok.token == Token::Text {
                    self.lexer.next_token();
                    let text = self.lexer.slice(tok.span);
                    let start = self.base + tok.span.start;
                    if !strip_sentinel(text, start).0.is_empty() {
                        conditions.push(parse_condition_at(text, start, self.columns)?);
                    }
                }
            }

            match self.lexer.peek() {
                Some(tok) if tok.token == Token::And => {
                    self.lexer.next_token();
                }
                _ => break,
            }
        }

        let span = match (conditions.first(), conditions.last()) {
            (Some(first), Some(last)) => first.span.merge(last.span),
            _ => return Ok(None),
        };

        Ok(Some(Conjunction { conditions, span }))
    }
}

/// Trim whitespace and a leading `?` sentinel.
///
/// Returns the remaining text and its byte offset in the filter string.
pub(crate) fn strip_sentinel(text: &str, start: usize) -> (&str, usize) {
    let trimmed = text.trim_start();
    let mut offset = start + (text.len() - trimmed.len());

    let trimmed = match trimmed.strip_prefix('?') {
        Some(rest) => {
            let rest_trimmed = rest.trim_start();
            offset += 1 + (rest.len() - rest_trimmed.len());
            rest_trimmed
        }
        None => trimmed,
    };

    (trimmed.trim_end(), offset)
}

/// Split a condition into column, operator and raw value.
///
/// The column is the first run of word characters; the longest operator
/// token follows; the trimmed remainder is the value.
pub fn tokenize_condition(text: &str, start: usize) -> Result<ConditionToken<'_>, FilterError> {
    let (body, start) = strip_sentinel(text, start);
    if body.is_empty() {
        return Err(FilterError::empty_input(Span::new(start, start)));
    }
    let span = Span::new(start, start + body.len());

    let column_len = body
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(body.len());
    if column_len == 0 {
        return Err(FilterError::invalid_syntax(body, span));
    }
    let column = &body[..column_len];

    let after_column = &body[column_len..];
    let rest = after_column.trim_start();
    let op_start = start + column_len + (after_column.len() - rest.len());
    let (op, op_len) =
        lex_operator(rest).ok_or_else(|| FilterError::invalid_syntax(body, span))?;

    let after_op = &rest[op_len..];
    let raw_value = after_op.trim();
    if raw_value.is_empty() {
        return Err(FilterError::invalid_syntax(body, span));
    }
    let value_start = op_start + op_len + (after_op.len() - after_op.trim_start().len());

    Ok(ConditionToken {
        column: Spanned::new(column, Span::new(start, start + column_len)),
        op: Spanned::new(op, Span::new(op_start, op_start + op_len)),
        raw_value: Spanned::new(raw_value, Span::new(value_start, value_start + raw_value.len())),
        span,
    })
}

/// Parse and classify a single condition starting at `start` in the filter.
pub(crate) fn parse_condition_at(
    text: &str,
    start: usize,
    columns: &[ColumnDescriptor],
) -> Result<Condition, FilterError> {
    let token = tokenize_condition(text, start)?;
    let op = token.op.value;
    let raw = token.raw_value.value;

    let operand = if let Some(relative) = date::resolve(raw) {
        if op.is_pattern() {
            return Err(FilterError::unsupported_date_operator(op.symbol(), token.op.span));
        }
        Operand::RelativeDate(relative)
    } else if op.is_pattern() {
        Operand::Text(raw.to_string())
    } else {
        literal::classify(raw, column_type(columns, token.column.value))
    };

    Ok(Condition {
        column: token.column.map(str::to_string),
        op: token.op,
        operand: Spanned::new(operand, token.raw_value.span),
        span: token.span,
    })
}

/// Parse a single `column<op>value` condition.
pub fn parse_condition(source: &str, columns: &[ColumnDescriptor]) -> Result<Condition, FilterError> {
    parse_condition_at(source, 0, columns)
}

/// Parse a full filter expression into a predicate.
pub fn parse(source: &str, columns: &[ColumnDescriptor]) -> Result<Predicate, FilterError> {
    let (body, start) = strip_sentinel(source, 0);
    if body.is_empty() {
        return Err(FilterError::empty_input(Span::new(0, source.len())));
    }

    let mut parser = Parser::with_offset(body, start, columns);
    parser.parse_expr()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::{DateUnit, RelativeDate};
    use crate::error::FilterErrorKind;
    use pretty_assertions::assert_eq;

    fn no_columns() -> Vec<ColumnDescriptor> {
        Vec::new()
    }

    #[test]
    fn test_tokenize_condition() {
        let token = tokenize_condition("age>=18", 0).unwrap();
        assert_eq!(token.column.value, "age");
        assert_eq!(token.op.value, FilterOp::Ge);
        assert_eq!(token.raw_value.value, "18");
        assert_eq!(token.raw_value.span, Span::new(5, 7));
    }

    #[test]
    fn test_tokenize_trims_and_strips_sentinel() {
        let token = tokenize_condition("  ?name = John Smith ", 0).unwrap();
        assert_eq!(token.column.value, "name");
        assert_eq!(token.column.span, Span::new(3, 7));
        assert_eq!(token.op.value, FilterOp::Eq);
        assert_eq!(token.raw_value.value, "John Smith");
        assert_eq!(token.span, Span::new(3, 20));
    }

    #[test]
    fn test_empty_input() {
        let err = tokenize_condition("   ", 0).unwrap_err();
        assert_eq!(err.kind, FilterErrorKind::EmptyInput);
        let err = tokenize_condition("?", 0).unwrap_err();
        assert_eq!(err.kind, FilterErrorKind::EmptyInput);
    }

    #[test]
    fn test_invalid_syntax() {
        for input in ["name", "=5", "name John", "age>", "na-me=1", "!x=1"] {
            let err = tokenize_condition(input, 0).unwrap_err();
            assert_eq!(err.kind, FilterErrorKind::InvalidSyntax, "input: {}", input);
            assert_eq!(err.hint.as_deref(), Some("use: column=value or column>value"));
        }
    }

    #[test]
    fn test_value_may_contain_operators() {
        let token = tokenize_condition("expr==1", 0).unwrap();
        assert_eq!(token.op.value, FilterOp::Eq);
        assert_eq!(token.raw_value.value, "=1");
    }

    #[test]
    fn test_parse_condition_date_helper() {
        let cond = parse_condition("created_at>@7d", &no_columns()).unwrap();
        assert_eq!(
            cond.operand.value,
            Operand::RelativeDate(RelativeDate::Ago {
                amount: 7,
                unit: DateUnit::Day
            })
        );
    }

    #[test]
    fn test_date_helper_rejects_pattern_operators() {
        for input in ["created_at*@today", "created_at^@7d", "created_at$@now"] {
            let err = parse_condition(input, &no_columns()).unwrap_err();
            assert_eq!(err.kind, FilterErrorKind::UnsupportedOperatorForDateHelper);
            assert_eq!(err.span, Span::new(10, 11));
        }
    }

    #[test]
    fn test_unrecognized_at_token_is_text() {
        let cond = parse_condition("handle=@alice", &no_columns()).unwrap();
        assert_eq!(cond.operand.value, Operand::Text("@alice".to_string()));

        // not a date helper, so pattern operators are fine
        let cond = parse_condition("handle*@ali", &no_columns()).unwrap();
        assert_eq!(cond.operand.value, Operand::Text("@ali".to_string()));
    }

    #[test]
    fn test_pattern_operand_is_always_text() {
        let cond = parse_condition("zip^90", &no_columns()).unwrap();
        assert_eq!(cond.operand.value, Operand::Text("90".to_string()));
    }

    #[test]
    fn test_parse_precedence_shape() {
        let pred = parse("a=1&b=2|c=3&d=4", &no_columns()).unwrap();
        assert_eq!(pred.groups.len(), 2);
        assert_eq!(pred.groups[0].conditions.len(), 2);
        assert_eq!(pred.groups[1].conditions.len(), 2);
        assert_eq!(pred.condition_count(), 4);
    }

    #[test]
    fn test_blank_conditions_skipped() {
        let pred = parse("a=1&&b=2", &no_columns()).unwrap();
        assert_eq!(pred.groups.len(), 1);
        assert_eq!(pred.groups[0].conditions.len(), 2);

        let pred = parse("a=1|&|b=2", &no_columns()).unwrap();
        assert_eq!(pred.groups.len(), 2);
    }

    #[test]
    fn test_no_valid_conditions() {
        let err = parse("&|&", &no_columns()).unwrap_err();
        assert_eq!(err.kind, FilterErrorKind::NoValidConditions);
    }

    #[test]
    fn test_blank_expression_is_empty_input() {
        let err = parse("  ? ", &no_columns()).unwrap_err();
        assert_eq!(err.kind, FilterErrorKind::EmptyInput);
    }

    #[test]
    fn test_first_error_wins() {
        let err = parse("a=1&bogus|c*@7d", &no_columns()).unwrap_err();
        assert_eq!(err.kind, FilterErrorKind::InvalidSyntax);
        assert_eq!(err.span, Span::new(4, 9));

        let err = parse("a=1|c*@7d&bogus", &no_columns()).unwrap_err();
        assert_eq!(err.kind, FilterErrorKind::UnsupportedOperatorForDateHelper);
    }

    #[test]
    fn test_condition_spans_are_absolute() {
        let pred = parse("?a=1 | bb>2", &no_columns()).unwrap();
        let second = &pred.groups[1].conditions[0];
        assert_eq!(second.column.value, "bb");
        assert_eq!(second.column.span, Span::new(7, 9));
        assert_eq!(pred.span, Span::new(1, 11));
    }
}
