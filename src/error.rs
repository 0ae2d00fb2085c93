//! Error types, mirroring the teacher's `ImplementationError` /
//! `ProductionError` / `ParseError` trio (`src/error.rs`), adapted to this
//! crate's simpler, non-recoverable combinator semantics: there is no
//! `Validation`-vs-`Unparsed` split here, because spec'd combinators never
//! distinguish "fatal" from "backtrackable" failures beyond what
//! `optional`/`zeroOrMore`/`oneOrMore`/`choice` already suppress.
use crate::position::Code;
use crate::span::Span;
use std::fmt::{self, Display, Formatter, Write};

/// Raised while constructing a [`crate::Grammar`]: a missing root rule, a
/// reference to an undeclared rule, or a pattern that fails to compile.
/// Thrown at construction time; a grammar is only ever returned once fully
/// valid.
#[derive(Debug, Clone)]
pub struct GrammarError {
    pub what: String,
    pub message: String,
}

impl GrammarError {
    pub fn new(what: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            what: what.into(),
            message: message.into(),
        }
    }
}

impl Display for GrammarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "GrammarError: {} - {}", self.what, self.message)
    }
}

impl std::error::Error for GrammarError {}

/// Raised by a failing combinator. Carries the location at which the rule
/// could not proceed, so that `choice` can compare alternatives by
/// `span.start` ("furthest error wins").
#[derive(Debug, Clone)]
pub struct RuleError {
    pub message: String,
    pub span: Span,
}

impl RuleError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }

    pub fn expected_token(kind: &str, span: Span) -> Self {
        Self::new(format!("Expected token: {kind}"), span)
    }

    pub fn expected_end_of_input(span: Span) -> Self {
        Self::new("Expected end of input", span)
    }

    pub fn no_choices_available(span: Span) -> Self {
        Self::new("No choices available", span)
    }
}

impl Display for RuleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.message, self.span)
    }
}

impl std::error::Error for RuleError {}

/// The final, user-facing failure: a message, the location it occurred at,
/// and the source text needed to render a caret-annotated snippet (spec
/// §4.5).
#[derive(Debug, Clone)]
pub struct ParseError {
    pub message: String,
    pub source: String,
    pub span: Span,
}

impl ParseError {
    pub fn new(message: impl Into<String>, source: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            source: source.into(),
            span,
        }
    }

    pub fn from_rule_error(source: &str, err: RuleError) -> Self {
        Self::new(err.message, source, err.span)
    }

    pub fn lexical(source: &str, span: Span) -> Self {
        Self::new("Unrecognized token", source, span)
    }

    /// Render the human-readable, caret-annotated snippet described in
    /// spec §4.5:
    /// ```text
    /// <message> at [<line>:<column>]
    /// <n> | <source line containing the span>
    ///     | <leading-space><caret run of length = span width, minimum 1>
    /// ```
    /// A span that crosses line boundaries gets one caret row per covered
    /// line, each capped to that line's own width.
    pub fn rendered_snippet(&self) -> String {
        let code = Code::new(&self.source);
        let start_pos = code.position_at(self.span.start);
        let end_pos = code.position_at(self.span.end.max(self.span.start));

        let mut out = String::new();
        writeln!(out, "{} at {}", self.message, start_pos).unwrap();

        let first_line = start_pos.line - 1;
        let last_line = end_pos.line - 1;
        let gutter_width = format!("{}", last_line + 1).len();

        for line_index in first_line..=last_line {
            let line_no = line_index + 1;
            let text = code.line_text(line_index);
            writeln!(out, "{:>width$} | {}", line_no, text, width = gutter_width).unwrap();

            let line_len = text.chars().count();
            let caret_start = if line_index == first_line {
                start_pos.column - 1
            } else {
                0
            };
            let caret_end = if line_index == last_line {
                end_pos.column - 1
            } else {
                line_len
            };
            let caret_len = caret_end.saturating_sub(caret_start).max(1);

            writeln!(
                out,
                "{:>width$} | {}{}",
                "",
                " ".repeat(caret_start),
                "^".repeat(caret_len),
                width = gutter_width
            )
            .unwrap();
        }
        out
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rendered_snippet())
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_line_snippet_has_aligned_caret() {
        let err = ParseError::new("Expected token: B", "ab", Span::new(1, 2));
        let snippet = err.rendered_snippet();
        let lines: Vec<&str> = snippet.lines().collect();
        assert_eq!(lines[0], "Expected token: B at [1:2]");
        assert_eq!(lines[1], "1 | ab");
        assert_eq!(lines[2], "1 |  ^");
    }

    #[test]
    fn multi_line_span_gets_a_caret_row_per_line() {
        let err = ParseError::new("bad span", "ab\ncd\nef", Span::new(1, 5));
        let snippet = err.rendered_snippet();
        let lines: Vec<&str> = snippet.lines().collect();
        assert_eq!(lines[1], "1 | ab");
        assert_eq!(lines[2], "1 |  ^");
        assert_eq!(lines[3], "2 | cd");
        assert_eq!(lines[4], "2 | ^^");
    }

    #[test]
    fn zero_width_span_has_minimum_one_caret() {
        let err = ParseError::new("Expected end of input", "ab", Span::point(2));
        let snippet = err.rendered_snippet();
        let lines: Vec<&str> = snippet.lines().collect();
        assert_eq!(lines[2], "1 |   ^");
    }
}
