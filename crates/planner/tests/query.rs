//! End-to-end planning of OData query strings

use model::{
    error::FilterError,
    filter::{Expression, Predicate, RelOp},
    query::RowRange,
};
use planner::{FilterSettings, PlanError, query::QueryPlanner};

#[test]
fn test_plan_full_query_string() {
    let planner = QueryPlanner::default();
    let plan = planner
        .plan_query_string(
            "?$filter=Price%20add%202.45%20eq%205.00&$orderby=Name%20desc,LastName\
             &$select=Name/company,%20LastName&$expand=Orders&$top=100&$skip=50",
        )
        .unwrap();

    let filter = plan.filter.as_ref().unwrap();
    assert!(filter.deferred.contains("annotated_value_1"));
    assert_eq!(plan.order_by, vec!["-Name", "LastName"]);
    assert_eq!(plan.select, vec!["Name__company", "LastName"]);
    assert_eq!(plan.expand, vec!["Orders"]);
    assert_eq!(plan.range.and_then(|r| r.as_bounded()), Some(50..150));
}

#[test]
fn test_plan_from_pairs() {
    let planner = QueryPlanner::default();
    let plan = planner
        .plan([("$filter", "Name eq 'John'"), ("$top", "10"), ("format", "json")])
        .unwrap();

    assert_eq!(
        plan.filter.unwrap().predicate,
        Some(Predicate::comparison(
            Expression::field(&["Name"]),
            RelOp::Eq,
            Expression::literal("John")
        ))
    );
    assert_eq!(plan.range, Some(RowRange::top(10)));
    assert!(plan.order_by.is_empty());
}

#[test]
fn test_plus_decodes_to_space() {
    let plan = QueryPlanner::default()
        .plan_query_string("$filter=Price+lt+20&$skip=5")
        .unwrap();
    assert!(plan.filter.unwrap().predicate.is_some());
    assert_eq!(plan.range, Some(RowRange::skip(5)));
}

#[test]
fn test_projection_excludes_deferred() {
    let plan = QueryPlanner::default()
        .plan([
            ("$filter", "concat(First, Last) eq 'AnnB'"),
            ("$select", "First,annotated_value_1"),
        ])
        .unwrap();
    assert_eq!(plan.projection(), Some(vec!["First"]));
}

#[test]
fn test_custom_separator() {
    let planner = QueryPlanner::new(FilterSettings::default().with_separator("."));
    let plan = planner.plan([("$orderby", "Address/City desc")]).unwrap();
    assert_eq!(plan.order_by, vec!["-Address.City"]);
}

#[test]
fn test_invalid_options() {
    let planner = QueryPlanner::default();

    let err = planner.plan([("$top", "ten")]).unwrap_err();
    assert!(matches!(err, PlanError::InvalidOption { ref key, .. } if key == "$top"));

    let err = planner.plan([("$filter", "foo frob 1")]).unwrap_err();
    assert!(matches!(err, PlanError::Filter(FilterError::Syntax { .. })));
}
