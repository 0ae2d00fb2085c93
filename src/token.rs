//! Tokens and the token stream produced by the lexer (spec §3, §4.1).
use crate::names::TokenKind;
use crate::span::Span;
use std::fmt::{Display, Formatter};

/// A token is only a kind and a span; its text is looked up from the
/// source on demand via [`Token::text`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        self.span.slice(source)
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.kind, self.span)
    }
}

/// An immutable, ordered token sequence indexed by position. Reading past
/// the end yields "no token" rather than an error — callers use
/// [`TokenStream::get`].
#[derive(Debug, Clone, Copy)]
pub struct TokenStream<'t> {
    tokens: &'t [Token],
}

impl<'t> TokenStream<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        Self { tokens }
    }

    pub fn get(&self, index: usize) -> Option<&'t Token> {
        self.tokens.get(index)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn as_slice(&self) -> &'t [Token] {
        self.tokens
    }
}
