use crate::rule::{EvalState, Rule, RuleResult, Success};
use crate::value::Value;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// A single field descriptor inside a `structure(...)` (spec §4.2
/// "struct"): a rule paired with an optional field name. An anonymous
/// field (`name: None`) still has to parse and still contributes its
/// consumed tokens, but its value is omitted from the resulting
/// `Value::Struct` — used for fixed punctuation a grammar must match but
/// has no use recording, e.g. the parentheses around a parenthesized
/// expression.
pub struct Field {
    name: Option<String>,
    rule: Rc<dyn Rule>,
}

pub fn field(name: Option<&str>, rule: Rc<dyn Rule>) -> Field {
    Field {
        name: name.map(str::to_string),
        rule,
    }
}

/// `structure(fields)`: every field's rule must succeed in order; the
/// value is a `Value::Struct` of the named fields, in declaration order.
pub struct Struct {
    fields: Vec<Field>,
}

impl Struct {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }
}

pub fn structure(fields: Vec<Field>) -> Rc<dyn Rule> {
    Rc::new(Struct::new(fields))
}

impl Display for Struct {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let rendered: Vec<String> = self
            .fields
            .iter()
            .map(|field| match &field.name {
                Some(name) => format!("{name}: {}", field.rule),
                None => format!("{}", field.rule),
            })
            .collect();
        write!(f, "{{{}}}", rendered.join(", "))
    }
}

impl Rule for Struct {
    fn eval(&self, state: EvalState<'_>) -> RuleResult {
        let mut index = state.current_index;
        let mut properties = Vec::new();
        let mut consumed = Vec::new();
        for field in &self.fields {
            let success = field.rule.eval(state.at(index))?;
            index = success.next_index;
            consumed.extend(success.consumed);
            if let Some(name) = &field.name {
                properties.push((name.clone(), success.value));
            }
        }
        Ok(Success::new(index, Value::Struct(properties), consumed))
    }
}
