//! Grammar tests for the raw `$filter` parse tree

use odata_syntax::parser::{ODataParser, Rule, parse_tree};
use pest::Parser;

fn accepts(input: &str) -> bool {
    ODataParser::parse(Rule::filter, input).is_ok()
}

#[test]
fn test_accepts_relations() {
    let inputs = vec![
        "Name eq 'John'",
        "Address/City ne 'London'",
        "Price lt 20",
        "Price le 200.5",
        "Rating gt -1",
        "Active eq true",
        "Manager eq null",
        "FirstName eq LastName",
        "length(Name) eq Other",
    ];

    for input in inputs {
        assert!(accepts(input), "Failed to parse: {}", input);
    }
}

#[test]
fn test_accepts_functions_and_arithmetic() {
    let inputs = vec![
        "substringof('Alfreds', CompanyName) eq true",
        "trim(toupper(CompanyName)) eq 'ALFREDS'",
        "year(BirthDate) eq 1971",
        "Price add 2.45 eq 5.00",
        "Price mod 2 eq 0",
        "concat('B', concat(A, C))",
        "length(Name)",
        "contains( Name , 'x' )",
    ];

    for input in inputs {
        assert!(accepts(input), "Failed to parse: {}", input);
    }
}

#[test]
fn test_accepts_boolean_structure() {
    let inputs = vec![
        "not (A eq 1 and B eq 2)",
        "not(Name eq 'John')",
        "not endswith(Description, 'milk')",
        "A eq 1 and B eq 2 or C eq 3",
        "((A eq 1))",
        "  Price lt 20  ",
        "Name eq 'it''s' and Note eq ''",
    ];

    for input in inputs {
        assert!(accepts(input), "Failed to parse: {}", input);
    }
}

#[test]
fn test_keywords_are_whole_words() {
    assert!(accepts("notes eq 1"));
    assert!(accepts("trueValue eq 1"));
    assert!(accepts("order eq 1 and android eq 2"));
    assert!(!accepts("Name eqx 'John'"));
}

#[test]
fn test_rejects_malformed_input() {
    let inputs = vec![
        "foo frob 1",
        "Name eq",
        "Name eq 'unterminated",
        "(A eq 1",
        "A eq 1 and",
        "Price add 2",
        "",
        "f()",
        "Address/ eq 1",
        "a//b eq 1",
        "/City eq 'x'",
        "length(Address/) eq 2",
    ];

    for input in inputs {
        assert!(!accepts(input), "Should have rejected: {:?}", input);
    }
}

#[test]
fn test_continuation_nests_to_the_right() {
    let tree = parse_tree("A eq 1 and B eq 2 or C eq 3", 64).unwrap();
    let bool_expr = tree.into_inner().find(|p| p.as_rule() == Rule::bool_common_expr);
    let and_expr = bool_expr
        .unwrap()
        .into_inner()
        .find(|p| p.as_rule() == Rule::and_expr)
        .expect("and continuation");

    assert_eq!(and_expr.as_str(), " and B eq 2 or C eq 3");
}
