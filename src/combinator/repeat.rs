use crate::rule::{EvalState, Rule, RuleResult, Success};
use crate::token::Token;
use crate::value::Value;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// Shared loop body for `zeroOrMore`/`oneOrMore`: match `inner` repeatedly
/// until it fails. A zero-length match (inner succeeds without advancing
/// the cursor) is recorded once and then stops the loop, rather than
/// repeating forever.
fn repeat(inner: &Rc<dyn Rule>, state: EvalState<'_>) -> (usize, Vec<Value>, Vec<Token>) {
    let mut index = state.current_index;
    let mut values = Vec::new();
    let mut consumed = Vec::new();
    loop {
        let start = index;
        match inner.eval(state.at(index)) {
            Ok(success) => {
                index = success.next_index;
                values.push(success.value);
                consumed.extend(success.consumed);
                if index == start {
                    break;
                }
            }
            Err(_) => break,
        }
    }
    (index, values, consumed)
}

/// `zeroOrMore(r)`: zero or more matches of `r`, never fails. Spec §4.2.
pub struct ZeroOrMore {
    inner: Rc<dyn Rule>,
}

impl ZeroOrMore {
    pub fn new(inner: &Rc<dyn Rule>) -> Self {
        Self {
            inner: inner.clone(),
        }
    }
}

pub fn zero_or_more(inner: &Rc<dyn Rule>) -> Rc<dyn Rule> {
    Rc::new(ZeroOrMore::new(inner))
}

impl Display for ZeroOrMore {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}*", self.inner)
    }
}

impl Rule for ZeroOrMore {
    fn eval(&self, state: EvalState<'_>) -> RuleResult {
        let (index, values, consumed) = repeat(&self.inner, state);
        Ok(Success::new(index, Value::List(values), consumed))
    }
}

/// `oneOrMore(r)`: one or more matches of `r`; fails with `r`'s own error
/// if the first match fails. Spec §4.2.
pub struct OneOrMore {
    inner: Rc<dyn Rule>,
}

impl OneOrMore {
    pub fn new(inner: &Rc<dyn Rule>) -> Self {
        Self {
            inner: inner.clone(),
        }
    }
}

pub fn one_or_more(inner: &Rc<dyn Rule>) -> Rc<dyn Rule> {
    Rc::new(OneOrMore::new(inner))
}

impl Display for OneOrMore {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}+", self.inner)
    }
}

impl Rule for OneOrMore {
    fn eval(&self, state: EvalState<'_>) -> RuleResult {
        let first = self.inner.eval(state)?;
        if first.next_index == state.current_index {
            return Ok(Success::new(
                first.next_index,
                Value::List(vec![first.value]),
                first.consumed,
            ));
        }

        let (index, mut rest, mut rest_consumed) = repeat(&self.inner, state.at(first.next_index));
        let mut values = vec![first.value];
        values.append(&mut rest);
        let mut consumed = first.consumed;
        consumed.append(&mut rest_consumed);
        Ok(Success::new(index, Value::List(values), consumed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combinator::token;
    use crate::names::TokenKind;
    use crate::span::Span;
    use crate::token::TokenStream;

    fn tokens_of(kind: &str, count: usize) -> Vec<Token> {
        (0..count)
            .map(|i| Token::new(TokenKind::from(kind), Span::new(i, i + 1)))
            .collect()
    }

    #[test]
    fn zero_or_more_succeeds_on_no_matches() {
        let tokens: Vec<Token> = vec![];
        let state = EvalState::new(TokenStream::new(&tokens), "");
        let rule = zero_or_more(&token("A"));
        let success = rule.eval(state).unwrap();
        assert_eq!(success.next_index, 0);
        assert!(matches!(success.value, Value::List(v) if v.is_empty()));
    }

    #[test]
    fn zero_or_more_stops_at_first_mismatch() {
        let tokens = tokens_of("A", 3);
        let state = EvalState::new(TokenStream::new(&tokens), "aaa");
        let rule = zero_or_more(&token("A"));
        let success = rule.eval(state).unwrap();
        assert_eq!(success.next_index, 3);
    }

    #[test]
    fn one_or_more_fails_with_inner_error_on_zero_matches() {
        let tokens = tokens_of("B", 1);
        let state = EvalState::new(TokenStream::new(&tokens), "b");
        let rule = one_or_more(&token("A"));
        let err = rule.eval(state).unwrap_err();
        assert_eq!(err.message, "Expected token: A");
    }

    #[test]
    fn one_or_more_collects_every_match() {
        let tokens = tokens_of("A", 2);
        let state = EvalState::new(TokenStream::new(&tokens), "aa");
        let rule = one_or_more(&token("A"));
        let success = rule.eval(state).unwrap();
        assert_eq!(success.next_index, 2);
        assert!(matches!(success.value, Value::List(v) if v.len() == 2));
    }
}
