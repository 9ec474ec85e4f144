//! Filter compilation through the public API

use model::{
    core::literal::Literal,
    error::FilterError,
    filter::{Expression, FieldPath, Lookup, Predicate, RelOp},
};
use planner::{Compiler, FilterSettings, compile};
use std::{sync::Arc, thread};

#[test]
fn test_navigation_path_segments() {
    let spec = compile("Address/City ne 'London'").unwrap();
    assert_eq!(
        spec.predicate,
        Some(Predicate::comparison(
            Expression::field(&["Address", "City"]),
            RelOp::Ne,
            Expression::literal("London")
        ))
    );
}

#[test]
fn test_date_parts_and_rounding() {
    let spec = compile("year(BirthDate) eq 1971 and round(Freight) ge 32").unwrap();
    let Some(Predicate::And(left, right)) = spec.predicate else {
        panic!("expected a conjunction");
    };

    assert_eq!(
        *left,
        Predicate::comparison(
            FieldPath::from_navigation("BirthDate")
                .with_lookup(Lookup::Year)
                .into(),
            RelOp::Eq,
            Literal::Integer(1971).into()
        )
    );
    assert!(matches!(*right, Predicate::Comparison { op: RelOp::Ge, .. }));
}

#[test]
fn test_two_annotations_joined_by_or() {
    let spec = compile("Price mul 2 gt 100 or Price div 2 lt 5").unwrap();

    assert_eq!(spec.annotations.len(), 2);
    assert_eq!(spec.deferred.len(), 2);
    assert!(spec.deferred_are_annotated());
    assert_eq!(spec.predicate.map(|p| p.leaf_count()), Some(2));
}

#[test]
fn test_spec_serializes_to_json() {
    let spec = compile("Price add 2.45 eq 5.00").unwrap();
    let json = serde_json::to_value(&spec).unwrap();

    assert_eq!(json["deferred"], serde_json::json!(["annotated_value_1"]));
    assert!(json["annotations"]["annotated_value_1"]["Arithmetic"].is_object());
}

#[test]
fn test_depth_limit_from_settings() {
    let input = format!("{}A eq 1{}", "(".repeat(65), ")".repeat(65));
    assert_eq!(
        compile(&input).unwrap_err(),
        FilterError::DepthExceeded { limit: 64 }
    );

    let relaxed = Compiler::new(FilterSettings::default().with_max_depth(128));
    assert!(relaxed.compile(&input).is_ok());
}

#[test]
fn test_shared_compiler_across_threads() {
    let compiler = Arc::new(Compiler::default());
    let handles = (0..4)
        .map(|i| {
            let compiler = Arc::clone(&compiler);
            thread::spawn(move || compiler.compile(&format!("Price add {i} eq 10")))
        })
        .collect::<Vec<_>>();

    for handle in handles {
        let spec = handle.join().unwrap().unwrap();
        assert_eq!(
            spec.annotations.keys().collect::<Vec<_>>(),
            vec!["annotated_value_1"]
        );
    }
}
