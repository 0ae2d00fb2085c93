//! The grammar-description DSL's own grammar (spec §4.6), hand-assembled
//! from the combinator primitives in [`crate::combinator`] exactly the way
//! any other grammar built with this engine would be — this parser is not
//! special-cased machinery, it is simply the first (and only built-in)
//! grammar written directly in Rust instead of in the DSL it recognizes.
//!
//! Production names here are deliberately lowercase (alias rules) even
//! where they build an AST node, because [`crate::grammar::GrammarBuilder`]
//! auto-wraps any uppercase-named rule in `node(name, ...)` (spec §4.3) —
//! a convenience aimed at end users writing grammars *through* the DSL, not
//! at this file, which builds `node(...)` calls explicitly wherever the DSL
//! itself needs one so that the wrapping isn't applied twice.
use super::tokens;
use crate::combinator::{choice, field, map, node, one_or_more, optional, sequence, structure, text, token, zero_or_more};
use crate::error::GrammarError;
use crate::grammar::{Grammar, GrammarBuilder};
use crate::names::NodeType;
use crate::pattern::Pattern;
use crate::rule::{EvalState, Rule, RuleResult, Success};
use crate::value::{AstNode, Value};
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// Collect `item (separator item)*` into a plain `Value::List`, in order.
/// `separator`'s own value is discarded; only `item`'s values survive.
fn collect_list(item: &Rc<dyn Rule>, separator: &Rc<dyn Rule>) -> Rc<dyn Rule> {
    let pair = map(sequence(vec![separator.clone(), item.clone()]), |v| match v {
        Value::Tuple(mut parts) => parts.remove(1),
        other => other,
    });
    let rest = zero_or_more(&pair);
    map(sequence(vec![item.clone(), rest]), |v| match v {
        Value::Tuple(parts) => {
            let mut all = vec![parts[0].clone()];
            if let Value::List(tail) = &parts[1] {
                all.extend(tail.iter().cloned());
            }
            Value::List(all)
        }
        other => other,
    })
}

/// Wraps a `collect_list` result the way `Choice`/`Sequence` do (spec
/// §4.6, SPEC_FULL §2): fold a singleton list back down to its sole
/// element, or wrap a longer list in an `AstNode` of `node_type` carrying
/// the real consumed-token trail (spec §3.6 "tokens is that rule's
/// consumedTokens") rather than an empty one — `map`'s transform only sees
/// the inner `Value`, not its `Success.consumed`, so this needs its own
/// `Rule` impl instead of a `map` closure.
struct Repeated {
    collected: Rc<dyn Rule>,
    node_type: NodeType,
}

impl Display for Repeated {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "repeated({}, {})", self.node_type, self.collected)
    }
}

impl Rule for Repeated {
    fn eval(&self, state: EvalState<'_>) -> RuleResult {
        let success = self.collected.eval(state)?;
        let value = match success.value {
            Value::List(elems) if elems.len() == 1 => elems.into_iter().next().unwrap(),
            Value::List(elems) => Value::Node(Rc::new(AstNode::new(
                self.node_type.clone(),
                Value::List(elems),
                success.consumed.clone(),
            ))),
            other => other,
        };
        Ok(Success::new(success.next_index, value, success.consumed))
    }
}

/// Collect `item (separator item)*` the way [`collect_list`] does, then
/// apply the [`Repeated`] flatten/wrap step.
fn repeated(item: &Rc<dyn Rule>, separator: &Rc<dyn Rule>, node_type: &'static str) -> Rc<dyn Rule> {
    Rc::new(Repeated {
        collected: collect_list(item, separator),
        node_type: NodeType::from(node_type),
    })
}

fn unquote(raw: &str) -> String {
    let inner = &raw[1..raw.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(match escaped {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    other => other,
                });
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn unslash(raw: &str) -> String {
    raw[1..raw.len() - 1].to_string()
}

/// Build the DSL's own parser. Returned fresh each call since
/// `Rc<dyn Rule>` graphs are cheap to construct and this is only ever
/// invoked once per [`super::compile`] call.
pub fn dsl_grammar() -> Result<Grammar, GrammarError> {
    let mut builder = GrammarBuilder::new()
        .token(Pattern::regex(tokens::WS, r"[ \t\r\n]+")?)?
        .token(Pattern::literal(tokens::READ_KW, "read")?)?
        .token(Pattern::literal(tokens::ASSIGN, "::=")?)?
        .token(Pattern::literal(tokens::SEMICOLON, ";")?)?
        .token(Pattern::literal(tokens::BAR, "|")?)?
        .token(Pattern::literal(tokens::L_PAREN, "(")?)?
        .token(Pattern::literal(tokens::R_PAREN, ")")?)?
        .token(Pattern::literal(tokens::L_BRACE, "{")?)?
        .token(Pattern::literal(tokens::R_BRACE, "}")?)?
        .token(Pattern::literal(tokens::L_BRACKET, "[")?)?
        .token(Pattern::literal(tokens::R_BRACKET, "]")?)?
        .token(Pattern::literal(tokens::PERCENT, "%")?)?
        .token(Pattern::literal(tokens::COLON, ":")?)?
        .token(Pattern::literal(tokens::COMMA, ",")?)?
        .token(Pattern::literal(tokens::QUESTION, "?")?)?
        .token(Pattern::literal(tokens::STAR, "*")?)?
        .token(Pattern::literal(tokens::PLUS, "+")?)?
        .token(Pattern::literal(tokens::EMPTY_LIT, "\"\"")?)?
        .token(Pattern::regex(tokens::STRING_LIT, r#""(\\.|[^"\\])*""#)?)?
        .token(Pattern::regex(tokens::REGEX_LIT, r"/(\\.|[^/\\])*/")?)?
        .token(Pattern::regex(tokens::DIGITS, "[0-9]+")?)?
        .token(Pattern::regex(tokens::IDENT, "[A-Za-z_][A-Za-z0-9_]*")?)?;

    let ws = token(tokens::WS);
    let ws_opt = optional(&ws);

    // Forward references for the mutually recursive expression grammar:
    // expression -> choice -> sequence -> postfix -> atomic -> expression
    // (through parenthesized sub-expressions, struct fields, list elements,
    // and read(...)).
    let expression_ref = builder.rule_ref("expression");
    let atomic_ref = builder.rule_ref("atomic");

    let string_literal = node(
        "StringLiteral",
        map(text(token(tokens::STRING_LIT)), |v| {
            Value::Text(unquote(v.as_text().unwrap_or_default()))
        }),
    );
    let regexp_literal = node(
        "RegExp",
        map(text(token(tokens::REGEX_LIT)), |v| {
            Value::Text(unslash(v.as_text().unwrap_or_default()))
        }),
    );
    let empty_literal = node("Empty", map(token(tokens::EMPTY_LIT), |_| Value::Unit));
    let reference = node(
        "Reference",
        map(text(token(tokens::IDENT)), |v| Value::Text(v.as_text().unwrap_or_default().to_string())),
    );

    let struct_field = structure(vec![
        field(Some("name"), text(token(tokens::IDENT))),
        field(None, ws_opt.clone()),
        field(None, token(tokens::COLON)),
        field(None, ws_opt.clone()),
        field(Some("expression"), expression_ref.clone()),
    ]);
    let struct_field_sep = sequence(vec![ws_opt.clone(), token(tokens::COMMA), ws_opt.clone()]);
    let struct_fields = collect_list(&struct_field, &struct_field_sep);
    let struct_expr = node(
        "Struct",
        structure(vec![
            field(None, token(tokens::L_BRACE)),
            field(None, ws_opt.clone()),
            field(Some("fields"), struct_fields),
            field(None, ws_opt.clone()),
            field(None, token(tokens::R_BRACE)),
        ]),
    );

    let list_separator_clause = optional(&map(
        sequence(vec![ws_opt.clone(), token(tokens::PERCENT), ws_opt.clone(), expression_ref.clone()]),
        |v| match v {
            Value::Tuple(parts) => parts[3].clone(),
            other => other,
        },
    ));
    let list_min_len_clause = optional(&map(
        sequence(vec![ws_opt.clone(), token(tokens::COMMA), ws_opt.clone(), text(token(tokens::DIGITS))]),
        |v| match v {
            Value::Tuple(parts) => parts[3].clone(),
            other => other,
        },
    ));
    let list_expr = node(
        "List",
        structure(vec![
            field(None, token(tokens::L_BRACKET)),
            field(None, ws_opt.clone()),
            field(Some("element"), expression_ref.clone()),
            field(Some("separator"), list_separator_clause),
            field(Some("min_len"), list_min_len_clause),
            field(None, ws_opt.clone()),
            field(None, token(tokens::R_BRACKET)),
        ]),
    );

    let read_expr = node(
        "Read",
        structure(vec![
            field(None, token(tokens::READ_KW)),
            field(None, ws_opt.clone()),
            field(None, token(tokens::L_PAREN)),
            field(None, ws_opt.clone()),
            field(Some("expression"), expression_ref.clone()),
            field(None, ws_opt.clone()),
            field(None, token(tokens::R_PAREN)),
        ]),
    );

    let parenthesized = map(
        structure(vec![
            field(None, token(tokens::L_PAREN)),
            field(None, ws_opt.clone()),
            field(Some("expression"), expression_ref.clone()),
            field(None, ws_opt.clone()),
            field(None, token(tokens::R_PAREN)),
        ]),
        |v| v.field("expression").cloned().unwrap_or(Value::Unit),
    );

    builder.define(
        "atomic",
        choice(vec![
            string_literal,
            regexp_literal,
            empty_literal,
            struct_expr,
            list_expr,
            read_expr,
            reference,
            parenthesized,
        ]),
    )?;

    let suffix = optional(&choice(vec![token(tokens::QUESTION), token(tokens::STAR), token(tokens::PLUS)]));
    let postfix = map(sequence(vec![atomic_ref.clone(), suffix]), |v| match v {
        Value::Tuple(parts) => Value::Struct(vec![
            ("base".to_string(), parts[0].clone()),
            ("suffix".to_string(), parts[1].clone()),
        ]),
        other => other,
    });

    let sequence_expr = repeated(&postfix, &ws, "Sequence");
    let choice_sep = sequence(vec![ws_opt.clone(), token(tokens::BAR), ws_opt.clone()]);
    let choice_expr = repeated(&sequence_expr, &choice_sep, "Choice");

    builder.define("expression", choice_expr)?;

    let terminal = choice(vec![
        node(
            "StringLiteral",
            map(text(token(tokens::STRING_LIT)), |v| Value::Text(unquote(v.as_text().unwrap_or_default()))),
        ),
        node(
            "RegExp",
            map(text(token(tokens::REGEX_LIT)), |v| Value::Text(unslash(v.as_text().unwrap_or_default()))),
        ),
    ]);

    builder.define(
        "TerminalRule",
        structure(vec![
            field(Some("name"), text(token(tokens::IDENT))),
            field(None, ws_opt.clone()),
            field(None, token(tokens::ASSIGN)),
            field(None, ws_opt.clone()),
            field(Some("terminal"), terminal),
            field(None, ws_opt.clone()),
            field(None, token(tokens::SEMICOLON)),
        ]),
    )?;
    let terminal_rule = builder.rule_ref("TerminalRule");

    builder.define(
        "NonTerminalRule",
        structure(vec![
            field(Some("name"), text(token(tokens::IDENT))),
            field(None, ws_opt.clone()),
            field(None, token(tokens::ASSIGN)),
            field(None, ws_opt.clone()),
            field(Some("expression"), expression_ref.clone()),
            field(None, ws_opt.clone()),
            field(None, token(tokens::SEMICOLON)),
        ]),
    )?;
    let non_terminal_rule = builder.rule_ref("NonTerminalRule");

    let rule = choice(vec![terminal_rule, non_terminal_rule]);
    let rule_sep = one_or_more(&ws);
    let program_rules = collect_list(&rule, &rule_sep);

    builder.define(
        "Program",
        structure(vec![
            field(None, ws_opt.clone()),
            field(Some("rules"), program_rules),
            field(None, ws_opt.clone()),
        ]),
    )?;

    builder.root("Program").build()
}
