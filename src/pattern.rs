//! Token patterns: the lexical building block a [`crate::grammar::Grammar`]
//! declares one of per token kind (spec §4.1). Mirrors the teacher's
//! `lexeme::Pattern` (`regex::bytes::Regex`, anchored match at a byte
//! offset, debug-asserted to start exactly at the probed position) and
//! `lexeme::Constants` (a fixed literal), collapsed into a single type since
//! this engine has no state-machine tokenizer modes to keep them apart for.
use crate::error::GrammarError;
use crate::names::TokenKind;
use crate::span::Span;
use regex::bytes::Regex;

#[derive(Clone)]
enum Matcher {
    Literal(String),
    Regex(Regex),
}

/// A single token rule: a kind plus the pattern that recognizes it. Patterns
/// are tried in declaration order during tokenization (spec §4.1 "first
/// declared, first tried"); a pattern that can match the empty string is
/// rejected at construction, mirroring the teacher's `Pattern::new` check,
/// since a zero-length match would never advance the lexer.
#[derive(Clone)]
pub struct Pattern {
    pub kind: TokenKind,
    matcher: Matcher,
}

impl Pattern {
    /// A pattern matching the literal string `text` exactly.
    pub fn literal(kind: impl Into<TokenKind>, text: impl Into<String>) -> Result<Self, GrammarError> {
        let text = text.into();
        if text.is_empty() {
            return Err(GrammarError::new(
                "Pattern",
                "a literal token pattern must not be empty",
            ));
        }
        Ok(Self {
            kind: kind.into(),
            matcher: Matcher::Literal(text),
        })
    }

    /// A pattern matching `regex` at the current position. `regex` is
    /// wrapped in a non-capturing group and anchored with `^` if it is not
    /// already, so callers may write plain fragments like `[0-9]+`.
    pub fn regex(kind: impl Into<TokenKind>, regex: &str) -> Result<Self, GrammarError> {
        let anchored = if regex.starts_with('^') {
            regex.to_string()
        } else {
            format!("^(?:{regex})")
        };
        let compiled = Regex::new(&anchored)
            .map_err(|err| GrammarError::new("Pattern", format!("invalid regex '{regex}': {err}")))?;
        if compiled.is_match(b"") {
            return Err(GrammarError::new(
                "Pattern",
                format!("regex '{regex}' must not match the empty string"),
            ));
        }
        Ok(Self {
            kind: kind.into(),
            matcher: Matcher::Regex(compiled),
        })
    }

    /// Try to match at `pointer`. Returns the span consumed, or `None` if
    /// this pattern does not apply here.
    pub fn try_match(&self, source: &str, pointer: usize) -> Option<Span> {
        match &self.matcher {
            Matcher::Literal(text) => {
                if source[pointer..].starts_with(text.as_str()) {
                    Some(Span::new(pointer, pointer + text.len()))
                } else {
                    None
                }
            }
            Matcher::Regex(regexp) => {
                let haystack = source[pointer..].as_bytes();
                let m = regexp.find(haystack)?;
                debug_assert_eq!(m.start(), 0, "anchored regex must match at the probed position");
                if m.end() == 0 {
                    return None;
                }
                Some(Span::new(pointer, pointer + m.end()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_pattern_matches_only_its_exact_text() {
        let pattern = Pattern::literal("Comma", ",").unwrap();
        assert_eq!(pattern.try_match(",x", 0), Some(Span::new(0, 1)));
        assert_eq!(pattern.try_match("x,", 0), None);
    }

    #[test]
    fn regex_pattern_is_anchored_at_the_probed_offset() {
        let pattern = Pattern::regex("Number", "[0-9]+").unwrap();
        assert_eq!(pattern.try_match("a123", 1), Some(Span::new(1, 4)));
        assert_eq!(pattern.try_match("a123", 0), None);
    }

    #[test]
    fn rejects_a_pattern_that_can_match_empty() {
        assert!(Pattern::regex("Blank", "[0-9]*").is_err());
    }
}
