//! Lexer for filter expressions using logos.
//!
//! Filter strings are split into combinators (`&`, `|`) and the raw text of
//! each condition between them. A second token set recognizes the operator
//! that follows the column name inside a condition.

use crate::ast::FilterOp;
use crate::span::Span;
use logos::Logos;

/// Top-level tokens of a filter expression.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// AND combinator.
    #[token("&")]
    And,
    /// OR combinator.
    #[token("|")]
    Or,
    /// Raw condition text between combinators.
    #[regex(r"[^&|]+")]
    Text,
}

/// Condition operators. Logos always picks the longest match, so `>=` wins
/// over `>` without any lookahead on our side.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpToken {
    #[token("=")]
    Eq,
    #[token("!=")]
    Ne,
    #[token(">")]
    Gt,
    #[token(">=")]
    Ge,
    #[token("<")]
    Lt,
    #[token("<=")]
    Le,
    #[token("*")]
    Contains,
    #[token("^")]
    StartsWith,
    #[token("$")]
    EndsWith,
}

impl From<OpToken> for FilterOp {
    fn from(token: OpToken) -> Self {
        match token {
            OpToken::Eq => FilterOp::Eq,
            OpToken::Ne => FilterOp::Ne,
            OpToken::Gt => FilterOp::Gt,
            OpToken::Ge => FilterOp::Ge,
            OpToken::Lt => FilterOp::Lt,
            OpToken::Le => FilterOp::Le,
            OpToken::Contains => FilterOp::Contains,
            OpToken::StartsWith => FilterOp::StartsWith,
            OpToken::EndsWith => FilterOp::EndsWith,
        }
    }
}

/// Match the longest operator at the start of `input`.
///
/// Returns the operator and its length in bytes.
pub fn lex_operator(input: &str) -> Option<(FilterOp, usize)> {
    let mut lex = OpToken::lexer(input);
    match lex.next() {
        Some(Ok(token)) => Some((token.into(), lex.span().end)),
        _ => None,
    }
}

/// A token with its span in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

/// Lexer that produces spanned tokens.
pub struct Lexer<'source> {
    inner: logos::Lexer<'source, Token>,
    peeked: Option<Option<SpannedToken>>,
}

impl<'source> Lexer<'source> {
    /// Create a new lexer for the given source.
    pub fn new(source: &'source str) -> Self {
        Self {
            inner: Token::lexer(source),
            peeked: None,
        }
    }

    /// Peek at the next token without consuming it.
    pub fn peek(&mut self) -> Option<&SpannedToken> {
        if self.peeked.is_none() {
            self.peeked = Some(self.next_inner());
        }
        self.peeked.as_ref().and_then(|o| o.as_ref())
    }

    /// Get the next token.
    pub fn next_token(&mut self) -> Option<SpannedToken> {
        if let Some(peeked) = self.peeked.take() {
            peeked
        } else {
            self.next_inner()
        }
    }

    fn next_inner(&mut self) -> Option<SpannedToken> {
        loop {
            match self.inner.next() {
                Some(Ok(token)) => {
                    return Some(SpannedToken {
                        token,
                        span: self.inner.span().into(),
                    });
                }
                // Every byte is covered by one of the three tokens.
                Some(Err(())) => continue,
                None => return None,
            }
        }
    }

    /// Get the source string.
    pub fn source(&self) -> &'source str {
        self.inner.source()
    }

    /// Slice of the source covered by a span.
    pub fn slice(&self, span: Span) -> &'source str {
        &self.inner.source()[span.start..span.end]
    }
}

impl Iterator for Lexer<'_> {
    type Item = SpannedToken;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

/// Tokenize a filter string into a vector of spanned tokens.
pub fn tokenize(source: &str) -> Vec<SpannedToken> {
    Lexer::new(source).collect()
}
