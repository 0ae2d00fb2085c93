//! A parser-combinator engine and a self-hosted grammar description
//! language built on top of it.
//!
//! # Overview
//!
//! Parsers for small and medium languages — configuration formats, query
//! languages, embedded DSLs — are often either handwritten recursive
//! descent (flexible, but every grammar change touches Rust code) or
//! generated from a grammar file by an external tool (declarative, but
//! opaque when something goes wrong). This crate takes a middle path: a
//! small set of combinator primitives ([`combinator::token`],
//! [`combinator::choice`], [`combinator::sequence`], and friends) that
//! assemble into `Rc<dyn Rule>` graphs directly in Rust, plus a text-based
//! [`dsl`] that compiles grammar declarations down to the very same
//! combinator graphs at run time. A grammar can be built either way, or a
//! mix of both — the DSL exists because writing the combinator graph by
//! hand for a large grammar is repetitive, not because the combinators
//! themselves are insufficient.
//!
//! # Design
//!
//! Parsing happens in two phases (see [`grammar::Grammar::parse`]): a
//! greedy, declaration-order tokenizer ([`lexer::Lexer`]) turns the source
//! text into a flat [`token::Token`] stream, then a recursive-descent
//! evaluation of the root [`rule::Rule`] walks that stream to produce a
//! dynamically-shaped [`value::Value`] tree. Every intermediate failure
//! carries the [`span::Span`] it occurred at; [`combinator::choice`]
//! reports the failure with the *furthest* span among its alternatives,
//! and a failed [`grammar::Grammar::parse`] renders a caret-annotated
//! snippet ([`error::ParseError::rendered_snippet`]) pointing at it.
//!
//! # Example
//!
//! ```
//! use combigram::dsl;
//!
//! let grammar = dsl::compile(
//!     r#"
//!     Digit ::= /[0-9]/;
//!     Digits ::= Digit+;
//!     "#,
//! )
//! .unwrap();
//!
//! let ast = grammar.parse("42").unwrap();
//! assert_eq!(ast.as_node().unwrap().node_type.as_str(), "Digits");
//! ```
//!
//! # License
//! Provided under the MIT OR Apache-2.0 license.

#[cfg(test)]
mod __tests__;
pub mod combinator;
pub mod dsl;
mod error;
mod grammar;
mod lexer;
mod names;
mod pattern;
mod position;
mod rule;
mod span;
mod token;
mod value;

pub use error::{GrammarError, ParseError, RuleError};
pub use grammar::{Grammar, GrammarBuilder, NodeFactory, TokenFactory};
pub use names::{NodeType, TokenKind};
pub use pattern::Pattern;
pub use position::{Code, Position};
pub use rule::{EvalState, Rule, RuleResult, Success};
pub use span::Span;
pub use token::{Token, TokenStream};
pub use value::{AstNode, Value};
