use crate::error::RuleError;
use crate::rule::{EvalState, Rule, RuleResult};
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// `choice(r1...rn)`: the first alternative to succeed wins; remaining
/// alternatives are not tried. If every alternative fails, the returned
/// error is the one whose failure span has the greatest `start` — usually
/// the alternative the input was most committed to — ties broken to the
/// earliest-declared alternative (spec §4.2, §8, §9). A `choice` with zero
/// alternatives is a grammar-authoring bug (spec §7).
pub struct Choice {
    alternatives: Vec<Rc<dyn Rule>>,
}

impl Choice {
    pub fn new(alternatives: Vec<Rc<dyn Rule>>) -> Self {
        Self { alternatives }
    }
}

pub fn choice(alternatives: Vec<Rc<dyn Rule>>) -> Rc<dyn Rule> {
    Rc::new(Choice::new(alternatives))
}

impl Display for Choice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let rendered: Vec<String> = self.alternatives.iter().map(|a| format!("{a}")).collect();
        write!(f, "({})", rendered.join(" | "))
    }
}

impl Rule for Choice {
    fn eval(&self, state: EvalState<'_>) -> RuleResult {
        if self.alternatives.is_empty() {
            return Err(RuleError::no_choices_available(state.current_span()));
        }

        let mut furthest: Option<RuleError> = None;
        for alt in &self.alternatives {
            match alt.eval(state) {
                Ok(success) => return Ok(success),
                Err(err) => {
                    let replace = match &furthest {
                        None => true,
                        Some(current) => err.span.start > current.span.start,
                    };
                    if replace {
                        furthest = Some(err);
                    }
                }
            }
        }
        Err(furthest.expect("non-empty alternatives always produce an error"))
    }
}
