use crate::error::RuleError;
use crate::rule::{EvalState, Rule, RuleResult, Success};
use crate::value::Value;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// `eof`: succeeds iff there is no token at the current position. Spec
/// §4.2. This is a terminal check, not the driver-level end-of-input test
/// (spec §4.4 point 5) — a grammar can use `eof` mid-rule to assert an
/// inner production consumed everything available to it.
pub struct Eof;

pub fn eof() -> Rc<dyn Rule> {
    Rc::new(Eof)
}

impl Display for Eof {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "<eof>")
    }
}

impl Rule for Eof {
    fn eval(&self, state: EvalState<'_>) -> RuleResult {
        match state.current_token() {
            None => Ok(Success::new(state.current_index, Value::Unit, Vec::new())),
            Some(t) => Err(RuleError::expected_end_of_input(t.span)),
        }
    }
}
