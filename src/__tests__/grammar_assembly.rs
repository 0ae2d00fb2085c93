//! Grammar-assembly-level scenarios built directly on the combinator API,
//! as opposed to `dsl_compile.rs` which exercises the same engine through
//! the text DSL.
use crate::combinator::{choice, list, one_or_more, sequence, token};
use crate::{Grammar, GrammarBuilder, Pattern};

fn lisp_like_grammar() -> Grammar {
    let mut builder = GrammarBuilder::new()
        .token(Pattern::literal("LParen", "(").unwrap())
        .unwrap()
        .token(Pattern::literal("RParen", ")").unwrap())
        .unwrap()
        .token(Pattern::regex("Ws", r"[ \t\n]+").unwrap())
        .unwrap()
        .token(Pattern::regex("Symbol", "[A-Za-z+\\-*/][A-Za-z0-9+\\-*/]*").unwrap())
        .unwrap();

    let form_ref = builder.rule_ref("Form");
    builder
        .define(
            "List",
            sequence(vec![
                token("LParen"),
                list(&form_ref, Some(&one_or_more(&token("Ws"))), 0),
                token("RParen"),
            ]),
        )
        .unwrap();
    let list_ref = builder.rule_ref("List");

    builder
        .define("Form", choice(vec![list_ref, token("Symbol")]))
        .unwrap();

    builder.root("Form").build().unwrap()
}

#[test]
fn lisp_like_grammar_parses_nested_lists() {
    let grammar = lisp_like_grammar();
    let value = grammar.parse("(+ 1 (* 2 3))").unwrap();
    let ast = value.as_node().unwrap();
    assert_eq!(ast.node_type.as_str(), "Form");
    assert!(ast.contains_type("List"));
}

#[test]
fn lisp_like_grammar_rejects_unbalanced_parens() {
    let grammar = lisp_like_grammar();
    assert!(grammar.parse("(+ 1 2").is_err());
}

#[test]
fn token_declaration_order_decides_keyword_vs_identifier_ties() {
    // "let" matches both a keyword literal and a generic identifier regex;
    // whichever pattern is declared first at the same offset wins (spec
    // "declaration order" tie-break), regardless of which is more specific.
    let mut builder = GrammarBuilder::new()
        .token(Pattern::literal("Let", "let").unwrap())
        .unwrap()
        .token(Pattern::regex("Ident", "[a-z]+").unwrap())
        .unwrap();
    builder.define("Root", token("Let")).unwrap();
    let grammar = builder.root("Root").build().unwrap();

    let tokens = grammar.tokenize("let").unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind.as_str(), "Let");
}

#[test]
fn furthest_error_is_reported_across_nested_choices() {
    let mut builder = GrammarBuilder::new()
        .token(Pattern::literal("A", "a").unwrap())
        .unwrap()
        .token(Pattern::literal("B", "b").unwrap())
        .unwrap()
        .token(Pattern::literal("C", "c").unwrap())
        .unwrap();

    // Root |= "a" "b" "c"  |  "a" "b"
    // Feeding "ab" + garbage should blame the longer alternative's failure
    // point, not the shorter alternative that "succeeds" on a prefix.
    builder
        .define(
            "Root",
            choice(vec![
                sequence(vec![token("A"), token("B"), token("C")]),
                sequence(vec![token("A"), token("B")]),
            ]),
        )
        .unwrap();
    let grammar = builder.root("Root").build().unwrap();

    // The second alternative matches "ab" fully, leaving a trailing "a"
    // token unconsumed, which `Grammar::parse` itself then reports.
    let err = grammar.parse("aba").unwrap_err();
    assert_eq!(err.message, "Expected end of input");
}
