//! The dynamic AST value model (spec §3).
//!
//! Unlike the teacher's `ASTNode<TNode>` — a homogeneous tree over one
//! statically-declared `TNode` enum, because `lang_pt` grammars are
//! assembled once in Rust at compile time — this engine's grammars are
//! assembled at *run time* from a DSL document whose node/token names are
//! arbitrary strings. `Value` is the structurally-typed carrier every
//! combinator produces: a record (from `struct`), a positional tuple (from
//! `sequence`), a list (from `list`/`zeroOrMore`/`oneOrMore`), recovered
//! token/text, or a nested AST node (from `node`). The `node` wrapper does
//! not care which shape its inner rule produced (spec §9 "Polymorphism over
//! value types").
use crate::names::NodeType;
use crate::span::Span;
use crate::token::Token;
use ptree::TreeItem;
use std::borrow::Cow;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

#[derive(Debug, Clone)]
pub enum Value {
    /// The value of `empty`, and of fields dropped by an anonymous
    /// `field`.
    Unit,
    Token(Token),
    /// The result of `text(r)`: the concatenated source text of `r`'s
    /// consumed tokens.
    Text(String),
    /// The result of `zeroOrMore`/`oneOrMore`/`list`.
    List(Vec<Value>),
    /// The result of `sequence`.
    Tuple(Vec<Value>),
    /// The result of `struct`, omitting anonymous fields. Field order is
    /// declaration order.
    Struct(Vec<(String, Value)>),
    Node(Rc<AstNode>),
}

impl Value {
    pub fn as_token(&self) -> Option<&Token> {
        match self {
            Value::Token(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_tuple(&self) -> Option<&[Value]> {
        match self {
            Value::Tuple(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&[(String, Value)]> {
        match self {
            Value::Struct(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&Rc<AstNode>> {
        match self {
            Value::Node(n) => Some(n),
            _ => None,
        }
    }

    pub fn into_node(self) -> Option<Rc<AstNode>> {
        match self {
            Value::Node(n) => Some(n),
            _ => None,
        }
    }

    /// Look up a named field of a `Struct` value.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.as_struct()?
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, v)| v)
    }
}

/// `{type, properties, tokens}` (spec §3): the result of a `node(T, r)`
/// combinator. `properties` is whatever `r` produced; `tokens` is `r`'s
/// consumed-token trail, recorded for tooling (highlighting, `text`
/// extraction) and never consulted for parsing decisions.
#[derive(Clone)]
pub struct AstNode {
    pub node_type: NodeType,
    pub properties: Value,
    pub tokens: Vec<Token>,
}

impl AstNode {
    pub fn new(node_type: NodeType, properties: Value, tokens: Vec<Token>) -> Self {
        Self {
            node_type,
            properties,
            tokens,
        }
    }

    /// The span covering every token this node consumed, or a zero-width
    /// span at 0 if it consumed none.
    pub fn span(&self) -> Span {
        self.tokens
            .iter()
            .map(|t| t.span)
            .reduce(|a, b| a.join(&b))
            .unwrap_or(Span::point(0))
    }

    /// Nested `AstNode`s reachable directly through this node's
    /// `properties` (not recursing into grandchildren), in encounter
    /// order.
    pub fn child_nodes(&self) -> Vec<Rc<AstNode>> {
        let mut out = Vec::new();
        collect_nodes(&self.properties, &mut out);
        out
    }

    /// Depth-first search for the first descendant (including `self`)
    /// whose node type matches `node_type`.
    pub fn find_tree_with_type(&self, node_type: &str) -> Option<&AstNode> {
        self.find_tree(&|n| n.node_type.as_str() == node_type)
    }

    pub fn find_tree<F: Fn(&AstNode) -> bool>(&self, predicate: &F) -> Option<&AstNode> {
        if predicate(self) {
            return Some(self);
        }
        self.borrowed_child_nodes()
            .into_iter()
            .find_map(|child| child.find_tree(predicate))
    }

    /// All descendants (including `self`) matching `predicate`, in
    /// document order.
    pub fn list_tree<F: Fn(&AstNode) -> bool>(&self, predicate: &F) -> Vec<&AstNode> {
        let mut out = Vec::new();
        self.walk(&mut out, predicate);
        out
    }

    pub fn contains_type(&self, node_type: &str) -> bool {
        self.find_tree_with_type(node_type).is_some()
    }

    pub fn get_child(&self, node_type: &str) -> Option<Rc<AstNode>> {
        self.child_nodes()
            .into_iter()
            .find(|child| child.node_type.as_str() == node_type)
    }

    fn walk<'a, F: Fn(&AstNode) -> bool>(&'a self, out: &mut Vec<&'a AstNode>, predicate: &F) {
        if predicate(self) {
            out.push(self);
        }
        for child in self.borrowed_child_nodes() {
            child.walk(out, predicate);
        }
    }

    /// Like [`AstNode::child_nodes`] but borrows instead of cloning the
    /// `Rc`, for recursive tree-walking without churning refcounts.
    fn borrowed_child_nodes(&self) -> Vec<&AstNode> {
        fn collect_refs<'a>(v: &'a Value, out: &mut Vec<&'a AstNode>) {
            match v {
                Value::Node(n) => out.push(n.as_ref()),
                Value::List(items) | Value::Tuple(items) => {
                    for item in items {
                        collect_refs(item, out);
                    }
                }
                Value::Struct(fields) => {
                    for (_, v) in fields {
                        collect_refs(v, out);
                    }
                }
                _ => {}
            }
        }
        let mut out = Vec::new();
        collect_refs(&self.properties, &mut out);
        out
    }

    pub fn print(&self) -> std::io::Result<()> {
        ptree::print_tree(self)
    }
}

fn collect_nodes(v: &Value, out: &mut Vec<Rc<AstNode>>) {
    match v {
        Value::Node(n) => out.push(n.clone()),
        Value::List(items) | Value::Tuple(items) => {
            for item in items {
                collect_nodes(item, out);
            }
        }
        Value::Struct(fields) => {
            for (_, v) in fields {
                collect_nodes(v, out);
            }
        }
        _ => {}
    }
}

impl Debug for AstNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let span = self.span();
        f.debug_struct("AstNode")
            .field("type", &self.node_type)
            .field("span", &span)
            .field("properties", &self.properties)
            .finish()
    }
}

impl TreeItem for AstNode {
    type Child = AstNode;

    fn write_self<W: std::io::Write>(&self, f: &mut W, _: &ptree::Style) -> std::io::Result<()> {
        let span = self.span();
        write!(f, "{} # {}-{}", self.node_type, span.start, span.end)
    }

    fn children(&self) -> Cow<[Self::Child]> {
        let owned: Vec<AstNode> = self.child_nodes().iter().map(|rc| (**rc).clone()).collect();
        Cow::Owned(owned)
    }
}
