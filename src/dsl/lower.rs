//! Lowering: walking the DSL's own parse tree (produced by
//! [`super::bootstrap::dsl_grammar`]) into a real [`Grammar`] (spec §4.6
//! "lowering table"). Because the bootstrap grammar is built from the very
//! same `Value`/`AstNode` model every other grammar produces, this is a
//! plain Rust tree-walk — no bespoke parser-generated Rust AST type is
//! needed, matching the DSL's own design intent that a from-scratch code
//! generator would be "an easy afternoon of work given the core exists".
use super::bootstrap::dsl_grammar;
use crate::combinator::{choice, field, list as list_combinator, one_or_more, optional, sequence, structure, text, token, zero_or_more};
use crate::error::GrammarError;
use crate::grammar::{Grammar, GrammarBuilder};
use crate::names::TokenKind;
use crate::pattern::Pattern;
use crate::rule::Rule;
use crate::value::{AstNode, Value};
use std::collections::HashMap;
use std::rc::Rc;

/// Parse `source` as a grammar-description document and lower it into a
/// runnable [`Grammar`]. The single public entry point of the DSL frontend.
pub fn compile(source: &str) -> Result<Grammar, GrammarError> {
    let parser = dsl_grammar()?;
    let parsed = parser
        .parse(source)
        .map_err(|err| GrammarError::new("Grammar", err.rendered_snippet()))?;
    let program = parsed
        .into_node()
        .ok_or_else(|| GrammarError::new("Grammar", "the DSL parse did not produce a Program node"))?;
    lower_program(&program)
}

struct Lowering {
    builder: GrammarBuilder,
    refs: HashMap<String, Rc<dyn Rule>>,
    inline_tokens: HashMap<String, TokenKind>,
    inline_counter: usize,
}

fn lower_program(program: &AstNode) -> Result<Grammar, GrammarError> {
    let rule_nodes = rule_list(program)?;
    if rule_nodes.is_empty() {
        return Err(GrammarError::new("Grammar", "a grammar document must declare at least one rule"));
    }

    let mut state = Lowering {
        builder: GrammarBuilder::new(),
        refs: HashMap::new(),
        inline_tokens: HashMap::new(),
        inline_counter: 0,
    };

    for rule_node in &rule_nodes {
        let name = rule_name(rule_node)?;
        if state.refs.contains_key(&name) {
            return Err(GrammarError::new("Grammar", format!("rule '{name}' is declared twice")));
        }
        let handle = state.builder.rule_ref(&name);
        state.refs.insert(name, handle);
    }

    for rule_node in &rule_nodes {
        let name = rule_name(rule_node)?;
        match rule_node.node_type.as_str() {
            "TerminalRule" => lower_terminal_rule(&mut state, &name, rule_node)?,
            "NonTerminalRule" => lower_non_terminal_rule(&mut state, &name, rule_node)?,
            other => return Err(GrammarError::new("Grammar", format!("unknown rule kind '{other}'"))),
        }
    }

    let root_name = rule_name(&rule_nodes[0])?;
    state.builder.root(&root_name).build()
}

fn rule_list(program: &AstNode) -> Result<Vec<Rc<AstNode>>, GrammarError> {
    match program.properties.field("rules") {
        Some(Value::List(items)) => Ok(items.iter().cloned().filter_map(Value::into_node).collect()),
        Some(Value::Node(n)) => Ok(vec![n.clone()]),
        _ => Ok(Vec::new()),
    }
}

fn rule_name(rule_node: &AstNode) -> Result<String, GrammarError> {
    rule_node
        .properties
        .field("name")
        .and_then(Value::as_text)
        .map(str::to_string)
        .ok_or_else(|| GrammarError::new("Grammar", "rule is missing a name"))
}

fn lower_terminal_rule(state: &mut Lowering, name: &str, rule_node: &AstNode) -> Result<(), GrammarError> {
    let terminal = rule_node
        .properties
        .field("terminal")
        .and_then(Value::as_node)
        .ok_or_else(|| GrammarError::new("Grammar", format!("rule '{name}' is missing its terminal")))?;

    let pattern = match terminal.node_type.as_str() {
        "StringLiteral" => Pattern::literal(name, terminal.properties.as_text().unwrap_or_default())?,
        "RegExp" => Pattern::regex(name, terminal.properties.as_text().unwrap_or_default())?,
        other => return Err(GrammarError::new("Grammar", format!("terminal rule '{name}' has an unsupported body '{other}'"))),
    };
    state.builder = std::mem::replace(&mut state.builder, GrammarBuilder::new()).token(pattern)?;
    state.builder.define(name, token(name))
}

fn lower_non_terminal_rule(state: &mut Lowering, name: &str, rule_node: &AstNode) -> Result<(), GrammarError> {
    let expr = rule_node
        .properties
        .field("expression")
        .ok_or_else(|| GrammarError::new("Grammar", format!("rule '{name}' is missing its expression")))?;
    let lowered = lower_expr(state, expr)?;
    state.builder.define(name, lowered)
}

/// Synthesize (or reuse) a token kind for a literal/regex that appears
/// directly inside an expression rather than through a `TerminalRule`
/// declaration — e.g. `"+"` written straight into a sequence. Two
/// occurrences of the identical literal text share one token kind, so a
/// grammar can write the same punctuation in several rules without the
/// lexer trying to recognize it twice.
fn intern_inline_token(state: &mut Lowering, is_regex: bool, raw: &str) -> Result<TokenKind, GrammarError> {
    let cache_key = format!("{}:{}", if is_regex { "re" } else { "lit" }, raw);
    if let Some(kind) = state.inline_tokens.get(&cache_key) {
        return Ok(kind.clone());
    }
    state.inline_counter += 1;
    let kind = TokenKind::from(format!("__Lit{}", state.inline_counter));
    let pattern = if is_regex {
        Pattern::regex(kind.clone(), raw)?
    } else {
        Pattern::literal(kind.clone(), raw)?
    };
    state.builder = std::mem::replace(&mut state.builder, GrammarBuilder::new()).token(pattern)?;
    state.inline_tokens.insert(cache_key, kind.clone());
    Ok(kind)
}

fn lower_expr(state: &mut Lowering, value: &Value) -> Result<Rc<dyn Rule>, GrammarError> {
    match value {
        Value::Node(n) => lower_node(state, n),
        other => Err(GrammarError::new("Grammar", format!("expected an expression, found {other:?}"))),
    }
}

fn lower_node(state: &mut Lowering, n: &AstNode) -> Result<Rc<dyn Rule>, GrammarError> {
    match n.node_type.as_str() {
        "StringLiteral" => {
            let kind = intern_inline_token(state, false, n.properties.as_text().unwrap_or_default())?;
            Ok(token(kind))
        }
        "RegExp" => {
            let kind = intern_inline_token(state, true, n.properties.as_text().unwrap_or_default())?;
            Ok(token(kind))
        }
        "Empty" => Ok(crate::combinator::empty()),
        "Reference" => {
            let name = n.properties.as_text().unwrap_or_default();
            state
                .refs
                .get(name)
                .cloned()
                .ok_or_else(|| GrammarError::new("Grammar", format!("reference to undeclared rule '{name}'")))
        }
        "Struct" => {
            let fields = match n.properties.field("fields") {
                Some(Value::List(items)) => items.clone(),
                Some(single @ Value::Struct(_)) => vec![single.clone()],
                _ => Vec::new(),
            };
            let mut lowered_fields = Vec::with_capacity(fields.len());
            for field_value in &fields {
                let field_name = field_value.field("name").and_then(Value::as_text).unwrap_or_default();
                let field_expr = field_value
                    .field("expression")
                    .ok_or_else(|| GrammarError::new("Grammar", "struct field is missing its expression"))?;
                let rule = lower_expr(state, field_expr)?;
                let name_opt = if field_name == "_" { None } else { Some(field_name) };
                lowered_fields.push(field(name_opt, rule));
            }
            Ok(structure(lowered_fields))
        }
        "List" => {
            let element = n
                .properties
                .field("element")
                .ok_or_else(|| GrammarError::new("Grammar", "list is missing its element expression"))?;
            let element_rule = lower_expr(state, element)?;
            let separator_rule = match n.properties.field("separator") {
                Some(Value::Unit) | None => None,
                Some(sep) => Some(lower_expr(state, sep)?),
            };
            let min_len: usize = match n.properties.field("min_len") {
                Some(Value::Text(digits)) => digits.parse().unwrap_or(0),
                _ => 0,
            };
            Ok(list_combinator(&element_rule, separator_rule.as_ref(), min_len))
        }
        "Read" => {
            let inner = n
                .properties
                .field("expression")
                .ok_or_else(|| GrammarError::new("Grammar", "read(...) is missing its expression"))?;
            let inner_rule = lower_expr(state, inner)?;
            Ok(text(inner_rule))
        }
        "Choice" => {
            let branches = list_of(n)?;
            let mut alternatives = Vec::with_capacity(branches.len());
            for branch in &branches {
                alternatives.push(lower_expr(state, branch)?);
            }
            Ok(choice(alternatives))
        }
        "Sequence" => {
            let elements = list_of(n)?;
            let mut parts = Vec::with_capacity(elements.len());
            for element in &elements {
                parts.push(lower_postfix(state, element)?);
            }
            Ok(sequence(parts))
        }
        other => {
            // A single postfix-wrapped atomic reached directly (e.g. a
            // rule body that is just `Digit*`), rather than through a
            // `Sequence`/`Choice` wrapper.
            if n.properties.field("base").is_some() {
                lower_postfix(state, &Value::Node(Rc::new(n.clone())))
            } else {
                Err(GrammarError::new("Grammar", format!("unsupported expression node '{other}'")))
            }
        }
    }
}

fn list_of(n: &AstNode) -> Result<Vec<Value>, GrammarError> {
    match &n.properties {
        Value::List(items) => Ok(items.clone()),
        other => Ok(vec![other.clone()]),
    }
}

/// A `Sequence`/`Choice` element may itself be the `{base, suffix}` shape
/// the bootstrap grammar's `postfix` production builds (spec §4.6
/// `?`/`*`/`+` suffixes), or — when it was flattened because it was the
/// sole element — the bare base expression directly.
fn lower_postfix(state: &mut Lowering, value: &Value) -> Result<Rc<dyn Rule>, GrammarError> {
    let (base, suffix) = match value {
        Value::Struct(_) => (
            value.field("base").cloned().unwrap_or(Value::Unit),
            value.field("suffix").cloned().unwrap_or(Value::Unit),
        ),
        other => (other.clone(), Value::Unit),
    };
    let base_rule = lower_expr(state, &base)?;
    match suffix.as_token().map(|t| t.kind.as_str()) {
        Some("Question") => Ok(optional(&base_rule)),
        Some("Star") => Ok(zero_or_more(&base_rule)),
        Some("Plus") => Ok(one_or_more(&base_rule)),
        _ => Ok(base_rule),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_a_two_rule_grammar_and_parses_with_it() {
        let grammar = compile("Digit ::= /[0-9]/;\nDigits ::= Digit+;\n").unwrap();
        let value = grammar.parse("123").unwrap();
        assert_eq!(value.as_node().unwrap().node_type.as_str(), "Digits");
    }

    #[test]
    fn inline_string_literals_share_one_synthesized_token() {
        let grammar = compile(
            "Digit ::= /[0-9]/;\nPair ::= { a: Digit, _: \",\", b: Digit };\n",
        )
        .unwrap();
        let value = grammar.parse("1,2").unwrap();
        assert!(value.as_node().is_some());
    }

    #[test]
    fn undeclared_reference_is_a_grammar_error() {
        let err = compile("Root ::= Ghost;\n").unwrap_err();
        assert!(err.message.contains("Ghost"));
    }
}
