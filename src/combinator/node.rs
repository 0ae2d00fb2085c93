use crate::names::NodeType;
use crate::rule::{EvalState, Rule, RuleResult, Success};
use crate::value::{AstNode, Value};
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// `node(T, r)`: wraps `r`'s value as the `properties` of a new
/// `AstNode` of type `T`, carrying `r`'s consumed tokens along for span
/// computation and tooling. Spec §4.2, §4.3 (auto-applied to every
/// uppercase-leading rule name by the grammar assembler, but also usable
/// directly from the DSL lowering table).
pub struct Node {
    node_type: NodeType,
    inner: Rc<dyn Rule>,
}

impl Node {
    pub fn new(node_type: impl Into<NodeType>, inner: Rc<dyn Rule>) -> Self {
        Self {
            node_type: node_type.into(),
            inner,
        }
    }
}

pub fn node(node_type: impl Into<NodeType>, inner: Rc<dyn Rule>) -> Rc<dyn Rule> {
    Rc::new(Node::new(node_type, inner))
}

impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.node_type, self.inner)
    }
}

impl Rule for Node {
    fn eval(&self, state: EvalState<'_>) -> RuleResult {
        let success = self.inner.eval(state)?;
        let ast_node = Rc::new(AstNode::new(
            self.node_type.clone(),
            success.value,
            success.consumed.clone(),
        ));
        Ok(Success::new(
            success.next_index,
            Value::Node(ast_node),
            success.consumed,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combinator::token;
    use crate::names::TokenKind;
    use crate::span::Span;
    use crate::token::{Token, TokenStream};

    #[test]
    fn wraps_inner_value_as_an_ast_node() {
        let tokens = vec![Token::new(TokenKind::from("A"), Span::new(0, 1))];
        let state = EvalState::new(TokenStream::new(&tokens), "a");
        let rule = node("Leaf", token("A"));
        let success = rule.eval(state).unwrap();
        let ast = success.value.as_node().unwrap();
        assert_eq!(ast.node_type.as_str(), "Leaf");
        assert_eq!(ast.span(), Span::new(0, 1));
    }

    #[test]
    fn propagates_inner_failure_without_wrapping() {
        let tokens = vec![Token::new(TokenKind::from("B"), Span::new(0, 1))];
        let state = EvalState::new(TokenStream::new(&tokens), "b");
        let rule = node("Leaf", token("A"));
        let err = rule.eval(state).unwrap_err();
        assert_eq!(err.message, "Expected token: A");
    }
}
