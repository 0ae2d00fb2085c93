//! The tokenization phase (spec §4.1, §4.4 step 1). Mirrors the teacher's
//! `Tokenizer::tokenize` loop (`src/tokenization.rs`): scan left to right,
//! at each position try every declared lexeme in order and take the first
//! match. This engine's declaration order is the *entire* disambiguation
//! rule — no longest-match-wins, no lexeme priority beyond list position —
//! since spec §4.1 specifies exactly that and nothing more.
use crate::error::ParseError;
use crate::pattern::Pattern;
use crate::span::Span;
use crate::token::Token;

#[derive(Clone)]
pub struct Lexer {
    patterns: Vec<Pattern>,
}

impl Lexer {
    pub fn new(patterns: Vec<Pattern>) -> Self {
        Self { patterns }
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    /// Tokenize `source` in full. Fails with a [`ParseError`] pointing at
    /// the first byte no declared pattern can consume.
    pub fn tokenize(&self, source: &str) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();
        let mut pointer = 0;
        while pointer < source.len() {
            match self.next_token(source, pointer) {
                Some((kind, span)) => {
                    tokens.push(Token::new(kind, span));
                    pointer = span.end;
                }
                None => {
                    return Err(ParseError::lexical(source, Span::new(pointer, pointer + 1)));
                }
            }
        }
        Ok(tokens)
    }

    fn next_token(&self, source: &str, pointer: usize) -> Option<(crate::names::TokenKind, Span)> {
        self.patterns
            .iter()
            .find_map(|pattern| pattern.try_match(source, pointer).map(|span| (pattern.kind.clone(), span)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declaration_order_decides_ties() {
        let lexer = Lexer::new(vec![
            Pattern::literal("If", "if").unwrap(),
            Pattern::regex("Ident", "[a-z]+").unwrap(),
        ]);
        let tokens = lexer.tokenize("if iffy").unwrap();
        assert_eq!(tokens[0].kind.as_str(), "If");
        // "iffy" still greedily matches Ident in full, "If" can't match "iffy"
        // since the literal only matches the exact text "if".
        assert_eq!(tokens[1].kind.as_str(), "Ident");
        assert_eq!(tokens[1].text("if iffy"), "iffy");
    }

    #[test]
    fn reports_lexical_error_at_first_unrecognized_byte() {
        let lexer = Lexer::new(vec![Pattern::regex("Ident", "[a-z]+").unwrap()]);
        let err = lexer.tokenize("ab1").unwrap_err();
        assert_eq!(err.span, Span::new(2, 3));
    }

    #[test]
    fn empty_source_tokenizes_to_no_tokens() {
        let lexer = Lexer::new(vec![Pattern::regex("Ident", "[a-z]+").unwrap()]);
        assert!(lexer.tokenize("").unwrap().is_empty());
    }
}
