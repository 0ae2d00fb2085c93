use crate::rule::{EvalState, Rule, RuleResult, Success};
use crate::value::Value;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// `optional(r)`: always succeeds; `r`'s value on success, else `nil` with
/// no advance. Swallows `r`'s error. Spec §4.2.
pub struct Optional {
    inner: Rc<dyn Rule>,
}

impl Optional {
    pub fn new(inner: &Rc<dyn Rule>) -> Self {
        Self {
            inner: inner.clone(),
        }
    }
}

pub fn optional(inner: &Rc<dyn Rule>) -> Rc<dyn Rule> {
    Rc::new(Optional::new(inner))
}

impl Display for Optional {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}?", self.inner)
    }
}

impl Rule for Optional {
    fn eval(&self, state: EvalState<'_>) -> RuleResult {
        match self.inner.eval(state) {
            Ok(success) => Ok(success),
            Err(_) => Ok(Success::new(state.current_index, Value::Unit, Vec::new())),
        }
    }
}
