use crate::rule::{EvalState, Rule, RuleResult, Success};
use crate::value::Value;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// `empty`: always succeeds with `nil`, never advances. Spec §4.2.
pub struct Empty;

pub fn empty() -> Rc<dyn Rule> {
    Rc::new(Empty)
}

impl Display for Empty {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"\"")
    }
}

impl Rule for Empty {
    fn eval(&self, state: EvalState<'_>) -> RuleResult {
        Ok(Success::new(state.current_index, Value::Unit, Vec::new()))
    }
}
