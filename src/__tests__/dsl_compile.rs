//! End-to-end scenarios through the text DSL frontend (`dsl::compile`).
use crate::dsl::compile;

#[test]
fn bootstraps_a_small_arithmetic_grammar_with_left_to_right_sequencing() {
    let grammar = compile(
        r#"
        Digit ::= /[0-9]/;
        Plus  ::= "+";
        Sum   ::= Digit Plus Digit;
        "#,
    )
    .unwrap();

    let value = grammar.parse("1+2").unwrap();
    let ast = value.as_node().unwrap();
    assert_eq!(ast.node_type.as_str(), "Sum");
}

#[test]
fn list_with_separator_and_min_len_rejects_too_few_elements() {
    let grammar = compile(
        r#"
        Digit ::= /[0-9]/;
        Comma ::= ",";
        Pair  ::= [Digit % Comma, 2];
        "#,
    )
    .unwrap();

    assert!(grammar.parse("1,2").is_ok());
    assert!(grammar.parse("1").is_err());
}

#[test]
fn read_recovers_the_raw_matched_text_of_a_repetition() {
    let grammar = compile(
        r#"
        Digit  ::= /[0-9]/;
        Digits ::= read(Digit+);
        "#,
    )
    .unwrap();

    let value = grammar.parse("4200").unwrap();
    let ast = value.as_node().unwrap();
    assert_eq!(ast.properties.as_text(), Some("4200"));
}

#[test]
fn anonymous_struct_fields_are_dropped_but_named_ones_survive() {
    let grammar = compile(
        r#"
        Digit ::= /[0-9]/;
        Pair  ::= { a: Digit, _: ",", b: Digit };
        "#,
    )
    .unwrap();

    let value = grammar.parse("3,4").unwrap();
    let ast = value.as_node().unwrap();
    assert!(ast.properties.field("a").is_some());
    assert!(ast.properties.field("b").is_some());
}

#[test]
fn optional_star_plus_suffixes_compose_on_atomics() {
    let grammar = compile(
        r#"
        Digit  ::= /[0-9]/;
        Sign   ::= "-";
        Number ::= Sign? Digit+;
        "#,
    )
    .unwrap();

    assert!(grammar.parse("42").is_ok());
    assert!(grammar.parse("-42").is_ok());
    assert!(grammar.parse("-").is_err());
}

#[test]
fn furthest_error_precedence_surfaces_through_a_dsl_choice() {
    // First alternative fails further into the input (expecting `C` past
    // "ab", i.e. at end of input) than the second (expecting `D` right
    // after "a"); the reported failure should be the first alternative's,
    // even though it is listed before the one that fails earlier.
    let grammar = compile(
        r#"
        A    ::= "a";
        B    ::= "b";
        C    ::= "c";
        D    ::= "d";
        Root ::= (A B C) | (A D);
        "#,
    )
    .unwrap();

    let err = grammar.parse("ab").unwrap_err();
    assert!(err.message.contains('C'), "message was: {}", err.message);
}

#[test]
fn empty_literal_matches_without_consuming_a_token() {
    let grammar = compile(
        r#"
        Digit ::= /[0-9]/;
        Maybe ::= Digit | "";
        "#,
    )
    .unwrap();

    assert!(grammar.parse("5").is_ok());
    assert!(grammar.parse("").is_ok());
}

#[test]
fn grammar_errors_on_a_dangling_reference_with_the_rule_name_in_the_message() {
    let err = compile("Root ::= Ghost;\n").unwrap_err();
    assert!(err.message.contains("Ghost"));
}

#[test]
fn lexical_error_is_reported_for_an_unrecognized_character() {
    let grammar = compile("Digit ::= /[0-9]/;\nDigits ::= Digit+;\n").unwrap();
    let err = grammar.parse("1#2").unwrap_err();
    assert!(err.rendered_snippet().contains('#'));
    assert_eq!(err.message, "Unrecognized token");
}
