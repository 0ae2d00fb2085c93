use crate::error::RuleError;
use crate::rule::{EvalState, Rule, RuleResult, Success};
use crate::value::Value;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// `list(element, separator, minLen)`: a `separator`-delimited run of
/// `element`s. After the first `element`, each further repetition is
/// `separator` followed by `element`, evaluated as a single atomic unit: if
/// the `separator` matches but the following `element` does not, the whole
/// pair is rejected and neither is consumed, so a trailing separator is
/// left for the caller rather than silently swallowed. The whole
/// combinator fails if fewer than `minLen` elements were collected.
/// `zeroOrMore`/`oneOrMore` are this combinator's separator-less, `minLen`
/// 0/1 special cases (spec §4.2); `list` stays a combinator of its own
/// because the grammar DSL's `List` production needs the separator form
/// directly.
pub struct List {
    element: Rc<dyn Rule>,
    separator: Option<Rc<dyn Rule>>,
    min_len: usize,
}

impl List {
    pub fn new(element: &Rc<dyn Rule>, separator: Option<&Rc<dyn Rule>>, min_len: usize) -> Self {
        Self {
            element: element.clone(),
            separator: separator.cloned(),
            min_len,
        }
    }
}

pub fn list(element: &Rc<dyn Rule>, separator: Option<&Rc<dyn Rule>>, min_len: usize) -> Rc<dyn Rule> {
    Rc::new(List::new(element, separator, min_len))
}

impl Display for List {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.separator {
            Some(separator) => write!(f, "list({}, {}, min={})", self.element, separator, self.min_len),
            None => write!(f, "list({}, min={})", self.element, self.min_len),
        }
    }
}

impl Rule for List {
    fn eval(&self, state: EvalState<'_>) -> RuleResult {
        let mut index = state.current_index;
        let mut values = Vec::new();
        let mut consumed = Vec::new();
        let mut last_err: Option<RuleError> = None;

        match self.element.eval(state.at(index)) {
            Ok(success) => {
                index = success.next_index;
                values.push(success.value);
                consumed.extend(success.consumed);

                loop {
                    let pair_start = index;
                    let pair = match &self.separator {
                        Some(separator) => separator
                            .eval(state.at(index))
                            .and_then(|sep| self.element.eval(state.at(sep.next_index)).map(|elem| (sep, elem))),
                        None => self
                            .element
                            .eval(state.at(index))
                            .map(|elem| (Success::new(index, Value::Unit, Vec::new()), elem)),
                    };

                    match pair {
                        Ok((sep, elem)) => {
                            index = elem.next_index;
                            consumed.extend(sep.consumed);
                            consumed.extend(elem.consumed);
                            values.push(elem.value);
                            if index == pair_start {
                                break;
                            }
                        }
                        Err(_) => break,
                    }
                }
            }
            Err(err) => last_err = Some(err),
        }

        if values.len() < self.min_len {
            return Err(last_err.unwrap_or_else(|| {
                RuleError::new("Expected list element", state.at(index).current_span())
            }));
        }
        Ok(Success::new(index, Value::List(values), consumed))
    }
}
