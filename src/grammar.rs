//! Grammar assembly: turning a set of token patterns and named rules into a
//! runnable two-phase parser (spec §4.3, §4.4). The central problem this
//! module solves is *mutual recursion*: a rule's definition often needs to
//! refer to a rule not yet built (`Expr` referring to `Atom` referring back
//! to `Expr`). The teacher solves the equivalent problem with
//! `Concat::init("name")` (an empty placeholder with a name, usable as an
//! `Rc<dyn IProduction>` immediately) followed later by `set_symbols(...)`
//! (a one-time fill-in, panicking/erroring on reuse). [`RuleRef`] plays the
//! same role here: a `Rc<dyn Rule>` handle backed by a
//! `once_cell::unsync::OnceCell` that is resolved once, after every rule
//! factory in the grammar has run, and dereferenced only when the parser
//! actually evaluates it — never during construction.
use crate::combinator::node;
use crate::error::{GrammarError, ParseError};
use crate::lexer::Lexer;
use crate::names::{is_node_name, NodeType, TokenKind};
use crate::pattern::Pattern;
use crate::rule::{EvalState, Rule, RuleResult};
use crate::span::Span;
use crate::token::{Token, TokenStream};
use crate::value::{AstNode, Value};
use once_cell::unsync::OnceCell;
use std::collections::{HashMap, HashSet};
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// A named forward reference to a rule that may not be defined yet.
/// Dereferencing before the grammar is fully built is a bug in the grammar
/// assembly code (not a parse-time condition), so it panics rather than
/// returning a `RuleError` — exactly as `Concat`'s undefined-symbols case is
/// a construction-time bug in the teacher, never something a parse result
/// needs to represent.
pub struct RuleRef {
    name: String,
    cell: Rc<OnceCell<Rc<dyn Rule>>>,
}

impl Display for RuleRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl Rule for RuleRef {
    fn eval(&self, state: EvalState<'_>) -> RuleResult {
        let inner = self
            .cell
            .get()
            .unwrap_or_else(|| panic!("rule '{}' referenced but never defined", self.name));
        inner.eval(state)
    }
}

/// Assembles a [`Grammar`] from token patterns and named rules. Rule names
/// beginning with an uppercase letter are automatically wrapped in
/// `node(name, rule)` when defined (spec §4.3); anything else is an alias
/// rule, used for decomposition only.
pub struct GrammarBuilder {
    patterns: Vec<Pattern>,
    declared_tokens: HashSet<String>,
    cells: HashMap<String, Rc<OnceCell<Rc<dyn Rule>>>>,
    defined: HashSet<String>,
    root: Option<String>,
}

impl GrammarBuilder {
    pub fn new() -> Self {
        Self {
            patterns: Vec::new(),
            declared_tokens: HashSet::new(),
            cells: HashMap::new(),
            defined: HashSet::new(),
            root: None,
        }
    }

    /// Start from an already-built grammar: every token pattern and rule it
    /// carries is retained, new patterns are tried only after the base
    /// grammar's own (so the base grammar's lexical priorities win ties),
    /// and existing rules may be redefined by name before `build()`. This
    /// is how the DSL bootstrap grammar grafts its `Program` root onto the
    /// hand-assembled expression grammar beneath it (spec §4.6, SPEC_FULL
    /// §4 "extend exercised").
    pub fn from_grammar(base: &Grammar) -> Self {
        let mut cells = HashMap::new();
        let mut defined = HashSet::new();
        for (name, rule) in &base.rules {
            let cell = Rc::new(OnceCell::new());
            let _ = cell.set(rule.clone());
            cells.insert(name.clone(), cell);
            defined.insert(name.clone());
        }
        Self {
            patterns: base.lexer.patterns().to_vec(),
            declared_tokens: base
                .lexer
                .patterns()
                .iter()
                .map(|p| p.kind.as_str().to_string())
                .collect(),
            cells,
            defined,
            root: Some(base.root_name.clone()),
        }
    }

    pub fn token(mut self, pattern: Pattern) -> Result<Self, GrammarError> {
        if !self.declared_tokens.insert(pattern.kind.as_str().to_string()) {
            return Err(GrammarError::new(
                "Grammar",
                format!("token kind '{}' is already declared", pattern.kind),
            ));
        }
        self.patterns.push(pattern);
        Ok(self)
    }

    /// A forward-reference handle to rule `name`, usable before `define` is
    /// called for it.
    pub fn rule_ref(&mut self, name: &str) -> Rc<dyn Rule> {
        let cell = self
            .cells
            .entry(name.to_string())
            .or_insert_with(|| Rc::new(OnceCell::new()))
            .clone();
        Rc::new(RuleRef {
            name: name.to_string(),
            cell,
        })
    }

    pub fn define(&mut self, name: &str, rule: Rc<dyn Rule>) -> Result<(), GrammarError> {
        if !self.defined.insert(name.to_string()) {
            return Err(GrammarError::new(
                "Grammar",
                format!("rule '{name}' is already defined"),
            ));
        }
        let wrapped = if is_node_name(name) {
            node(name, rule)
        } else {
            rule
        };
        let cell = self
            .cells
            .entry(name.to_string())
            .or_insert_with(|| Rc::new(OnceCell::new()))
            .clone();
        cell.set(wrapped)
            .map_err(|_| GrammarError::new("Grammar", format!("rule '{name}' is already defined")))
    }

    pub fn root(mut self, name: &str) -> Self {
        self.root = Some(name.to_string());
        self
    }

    pub fn build(self) -> Result<Grammar, GrammarError> {
        let mut undefined: Vec<&str> = self
            .cells
            .keys()
            .filter(|name| !self.defined.contains(*name))
            .map(|s| s.as_str())
            .collect();
        undefined.sort_unstable();
        if let Some(name) = undefined.first() {
            return Err(GrammarError::new(
                "Grammar",
                format!("rule '{name}' is referenced but never defined"),
            ));
        }

        let root_name = self
            .root
            .ok_or_else(|| GrammarError::new("Grammar", "no root rule declared"))?;
        let root = self
            .cells
            .get(&root_name)
            .and_then(|cell| cell.get())
            .cloned()
            .ok_or_else(|| GrammarError::new("Grammar", format!("root rule '{root_name}' is undefined")))?;

        let rules = self
            .cells
            .into_iter()
            .map(|(name, cell)| {
                let rule = cell.get().cloned().expect("checked above");
                (name, rule)
            })
            .collect();

        Ok(Grammar {
            lexer: Lexer::new(self.patterns),
            rules,
            root_name,
            root,
        })
    }
}

impl Default for GrammarBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A fully assembled grammar: a lexer and a named rule graph with a
/// designated root. Built only through [`GrammarBuilder::build`], so a
/// `Grammar` value is always internally consistent — every reference
/// resolved, a root present (spec §7 "A grammar is only ever returned once
/// fully valid").
pub struct Grammar {
    lexer: Lexer,
    rules: HashMap<String, Rc<dyn Rule>>,
    root_name: String,
    root: Rc<dyn Rule>,
}

impl Grammar {
    pub fn builder() -> GrammarBuilder {
        GrammarBuilder::new()
    }

    /// Run only the lexical phase, exposed standalone for tooling and
    /// tests (spec §4.4, SPEC_FULL §4 "standalone tokenize").
    pub fn tokenize(&self, source: &str) -> Result<Vec<crate::token::Token>, ParseError> {
        self.lexer.tokenize(source)
    }

    /// Tokenize then evaluate the root rule over the full token stream.
    /// Parsing fails unless the root rule consumes every token (spec §4.4
    /// step 5); a leftover token is reported the same way a mid-parse
    /// failure would be.
    pub fn parse(&self, source: &str) -> Result<Value, ParseError> {
        let tokens = self.tokenize(source)?;
        let stream = TokenStream::new(&tokens);
        let state = EvalState::new(stream, source);
        let success = self
            .root
            .eval(state)
            .map_err(|err| ParseError::from_rule_error(source, err))?;

        if success.next_index != tokens.len() {
            let span = stream
                .get(success.next_index)
                .map(|t| t.span)
                .unwrap_or_else(|| Span::point(source.len()));
            return Err(ParseError::new("Expected end of input", source, span));
        }
        Ok(success.value)
    }

    pub fn rule(&self, name: &str) -> Option<&Rc<dyn Rule>> {
        self.rules.get(name)
    }

    pub fn root_name(&self) -> &str {
        &self.root_name
    }

    /// One [`TokenFactory`] per declared token kind, keyed by name (spec
    /// §4.6, §6 "`Grammar.tokens` ... factory maps keyed by declared
    /// name"). Meant for test code to build expected `Token` values
    /// without hand-naming a `TokenKind` at every call site.
    pub fn tokens(&self) -> HashMap<String, TokenFactory> {
        self.lexer
            .patterns()
            .iter()
            .map(|pattern| {
                (
                    pattern.kind.as_str().to_string(),
                    TokenFactory {
                        kind: pattern.kind.clone(),
                    },
                )
            })
            .collect()
    }

    /// One [`NodeFactory`] per declared node-type rule (an uppercase-named
    /// rule; spec §4.3), keyed by name (spec §4.6, §6 "`Grammar.nodes` ...
    /// factory maps keyed by declared name").
    pub fn nodes(&self) -> HashMap<String, NodeFactory> {
        self.rules
            .keys()
            .filter(|name| is_node_name(name))
            .map(|name| {
                (
                    name.clone(),
                    NodeFactory {
                        node_type: NodeType::from(name.as_str()),
                    },
                )
            })
            .collect()
    }
}

/// `tokens.<K>(span) -> Token` (spec §6): builds a `Token` of a fixed,
/// declared kind at a caller-supplied span.
pub struct TokenFactory {
    kind: TokenKind,
}

impl TokenFactory {
    pub fn make(&self, span: Span) -> Token {
        Token::new(self.kind.clone(), span)
    }
}

/// `nodes.<T>(properties, tokenSpans?) -> AstNode` (spec §6): builds an
/// `AstNode` of a fixed, declared type. `tokens` defaults to empty when
/// omitted, matching the spec's `tokenSpans ?? nil`.
pub struct NodeFactory {
    node_type: NodeType,
}

impl NodeFactory {
    pub fn make(&self, properties: Value, tokens: Option<Vec<Token>>) -> AstNode {
        AstNode::new(self.node_type.clone(), properties, tokens.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combinator::{choice, sequence, token};

    fn digit_letter_grammar() -> Grammar {
        let mut builder = GrammarBuilder::new()
            .token(Pattern::regex("Digit", "[0-9]").unwrap())
            .unwrap()
            .token(Pattern::regex("Letter", "[a-z]").unwrap())
            .unwrap();
        builder.define("Root", token("Digit")).unwrap();
        builder.root("Root").build().unwrap()
    }

    #[test]
    fn node_named_rule_is_auto_wrapped() {
        let grammar = digit_letter_grammar();
        let value = grammar.parse("1").unwrap();
        let ast = value.as_node().unwrap();
        assert_eq!(ast.node_type.as_str(), "Root");
    }

    #[test]
    fn mutually_recursive_rules_resolve_through_rule_ref() {
        let mut builder = GrammarBuilder::new()
            .token(Pattern::literal("LParen", "(").unwrap())
            .unwrap()
            .token(Pattern::literal("RParen", ")").unwrap())
            .unwrap()
            .token(Pattern::regex("Digit", "[0-9]").unwrap())
            .unwrap();

        let atom_ref = builder.rule_ref("atom");
        builder
            .define(
                "Expr",
                choice(vec![
                    token("Digit"),
                    sequence(vec![token("LParen"), atom_ref, token("RParen")]),
                ]),
            )
            .unwrap();
        let expr_ref = builder.rule_ref("Expr");
        builder.define("atom", expr_ref).unwrap();

        let grammar = builder.root("Expr").build().unwrap();
        let value = grammar.parse("(1)").unwrap();
        assert!(value.as_node().is_some());
    }

    #[test]
    fn fails_to_build_with_dangling_reference() {
        let mut builder = GrammarBuilder::new();
        let dangling = builder.rule_ref("Ghost");
        builder.define("Root", dangling).unwrap();
        let err = builder.root("Root").build().unwrap_err();
        assert!(err.message.contains("Ghost"));
    }

    #[test]
    fn parse_fails_when_root_does_not_consume_every_token() {
        let grammar = digit_letter_grammar();
        let err = grammar.parse("1a").unwrap_err();
        assert_eq!(err.message, "Expected end of input");
    }

    #[test]
    fn extend_carries_forward_existing_tokens_and_rules() {
        let base = digit_letter_grammar();
        let mut builder = GrammarBuilder::from_grammar(&base);
        let root_ref = builder.rule_ref("Root");
        builder.define("Wrapped", root_ref).unwrap();
        let extended = builder.root("Wrapped").build().unwrap();
        let value = extended.parse("7").unwrap();
        let ast = value.as_node().unwrap();
        assert_eq!(ast.node_type.as_str(), "Wrapped");
    }

    #[test]
    fn tokens_factory_builds_tokens_of_a_declared_kind() {
        let grammar = digit_letter_grammar();
        let factories = grammar.tokens();
        let digit = factories.get("Digit").unwrap().make(Span::new(2, 3));
        assert_eq!(digit.kind.as_str(), "Digit");
        assert_eq!(digit.span, Span::new(2, 3));
        assert!(factories.contains_key("Letter"));
    }

    #[test]
    fn nodes_factory_builds_nodes_of_a_declared_node_type() {
        let grammar = digit_letter_grammar();
        let factories = grammar.nodes();
        let node = factories.get("Root").unwrap().make(Value::Unit, None);
        assert_eq!(node.node_type.as_str(), "Root");
        assert!(node.tokens.is_empty());
    }
}
