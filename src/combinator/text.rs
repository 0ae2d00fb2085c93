use crate::rule::{EvalState, Rule, RuleResult, Success};
use crate::value::Value;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// `text(r)`: `r`'s consumed tokens' source text, as a single concatenated
/// string spanning from the first consumed token's start to the last's
/// end. Spec §4.2. Fails exactly when `r` fails.
pub struct Text {
    inner: Rc<dyn Rule>,
}

impl Text {
    pub fn new(inner: Rc<dyn Rule>) -> Self {
        Self { inner }
    }
}

pub fn text(inner: Rc<dyn Rule>) -> Rc<dyn Rule> {
    Rc::new(Text::new(inner))
}

impl Display for Text {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "text({})", self.inner)
    }
}

impl Rule for Text {
    fn eval(&self, state: EvalState<'_>) -> RuleResult {
        let success = self.inner.eval(state)?;
        let joined = success
            .consumed
            .iter()
            .map(|t| t.span)
            .reduce(|a, b| a.join(&b))
            .map(|span| span.slice(state.source).to_string())
            .unwrap_or_default();
        Ok(Success::new(
            success.next_index,
            Value::Text(joined),
            success.consumed,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combinator::{sequence, token};
    use crate::names::TokenKind;
    use crate::span::Span;
    use crate::token::{Token, TokenStream};

    #[test]
    fn joins_source_text_of_every_consumed_token() {
        let tokens = vec![
            Token::new(TokenKind::from("A"), Span::new(0, 1)),
            Token::new(TokenKind::from("B"), Span::new(1, 3)),
        ];
        let state = EvalState::new(TokenStream::new(&tokens), "a23");
        let rule = text(sequence(vec![token("A"), token("B")]));
        let success = rule.eval(state).unwrap();
        assert_eq!(success.value.as_text(), Some("a23"));
    }

    #[test]
    fn empty_consumed_set_yields_empty_text() {
        let tokens: Vec<Token> = vec![];
        let state = EvalState::new(TokenStream::new(&tokens), "");
        let rule = text(crate::combinator::empty());
        let success = rule.eval(state).unwrap();
        assert_eq!(success.value.as_text(), Some(""));
    }
}
