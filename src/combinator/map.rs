use crate::rule::{EvalState, Rule, RuleResult, Success};
use crate::value::Value;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// `map(r, f)`: `r`'s value passed through a pure transform `f`; never
/// changes whether `r` succeeds or fails, nor its span or consumed tokens.
/// Spec §4.2. Used by the DSL lowering pass to flatten singleton
/// `Choice`/`Sequence` productions down to their sole child (SPEC_FULL §2).
pub struct Map {
    inner: Rc<dyn Rule>,
    transform: Rc<dyn Fn(Value) -> Value>,
    label: String,
}

impl Map {
    pub fn new(inner: Rc<dyn Rule>, transform: impl Fn(Value) -> Value + 'static) -> Self {
        let label = format!("map({inner})");
        Self {
            inner,
            transform: Rc::new(transform),
            label,
        }
    }
}

pub fn map(inner: Rc<dyn Rule>, transform: impl Fn(Value) -> Value + 'static) -> Rc<dyn Rule> {
    Rc::new(Map::new(inner, transform))
}

impl Display for Map {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label)
    }
}

impl Rule for Map {
    fn eval(&self, state: EvalState<'_>) -> RuleResult {
        let success = self.inner.eval(state)?;
        Ok(Success::new(
            success.next_index,
            (self.transform)(success.value),
            success.consumed,
        ))
    }
}
