use crate::rule::{EvalState, Rule, RuleResult, Success};
use crate::value::Value;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// `sequence(r1...rn)`: all must succeed in order; value is the tuple
/// `(v1,...,vn)`. Fails with the first inner failure, propagated verbatim
/// — sequence-level commits are implicit: once the first element succeeds,
/// a later element's failure is fatal for this sequence rather than
/// backtracked (spec §9 "Tree-shaped errors vs. backtracking").
pub struct Sequence {
    parts: Vec<Rc<dyn Rule>>,
}

impl Sequence {
    pub fn new(parts: Vec<Rc<dyn Rule>>) -> Self {
        Self { parts }
    }
}

pub fn sequence(parts: Vec<Rc<dyn Rule>>) -> Rc<dyn Rule> {
    Rc::new(Sequence::new(parts))
}

impl Display for Sequence {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let rendered: Vec<String> = self.parts.iter().map(|p| format!("{p}")).collect();
        write!(f, "({})", rendered.join(" "))
    }
}

impl Rule for Sequence {
    fn eval(&self, state: EvalState<'_>) -> RuleResult {
        let mut index = state.current_index;
        let mut values = Vec::with_capacity(self.parts.len());
        let mut consumed = Vec::new();
        for part in &self.parts {
            let success = part.eval(state.at(index))?;
            index = success.next_index;
            values.push(success.value);
            consumed.extend(success.consumed);
        }
        Ok(Success::new(index, Value::Tuple(values), consumed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combinator::token;
    use crate::names::TokenKind;
    use crate::span::Span;
    use crate::token::{Token, TokenStream};

    #[test]
    fn threads_index_through_each_part() {
        let tokens = vec![
            Token::new(TokenKind::from("A"), Span::new(0, 1)),
            Token::new(TokenKind::from("B"), Span::new(1, 2)),
        ];
        let state = EvalState::new(TokenStream::new(&tokens), "ab");
        let rule = sequence(vec![token("A"), token("B")]);
        let success = rule.eval(state).unwrap();
        assert_eq!(success.next_index, 2);
        assert_eq!(success.consumed.len(), 2);
        assert!(matches!(success.value, crate::value::Value::Tuple(v) if v.len() == 2));
    }

    #[test]
    fn leaves_index_unchanged_on_failure() {
        let tokens = vec![Token::new(TokenKind::from("A"), Span::new(0, 1))];
        let state = EvalState::new(TokenStream::new(&tokens), "a");
        let rule = sequence(vec![token("A"), token("B")]);
        let err = rule.eval(state).unwrap_err();
        assert_eq!(err.span, Span::point(1));
    }
}
