use crate::error::RuleError;
use crate::names::TokenKind;
use crate::rule::{EvalState, Rule, RuleResult, Success};
use crate::value::Value;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// `token(K)`: succeeds iff the current token exists and has kind `K`.
/// Advances by one. Spec §4.2.
pub struct TokenRule {
    kind: TokenKind,
}

impl TokenRule {
    pub fn new(kind: impl Into<TokenKind>) -> Self {
        Self { kind: kind.into() }
    }
}

pub fn token(kind: impl Into<TokenKind>) -> Rc<dyn Rule> {
    Rc::new(TokenRule::new(kind))
}

impl Display for TokenRule {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl Rule for TokenRule {
    fn eval(&self, state: EvalState<'_>) -> RuleResult {
        match state.current_token() {
            Some(t) if t.kind == self.kind => Ok(Success::new(
                state.current_index + 1,
                Value::Token(t.clone()),
                vec![t.clone()],
            )),
            _ => Err(RuleError::expected_token(&self.kind, state.current_span())),
        }
    }
}
