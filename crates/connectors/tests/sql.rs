//! Rendering compiled filters through the SQL backend

use connectors::sql::{
    SqlBackend,
    dialect::{self, MySql, Postgres},
};
use model::core::literal::Literal;
use planner::{Compiler, FilterSettings, query::QueryPlanner};

#[test]
fn test_mixed_filter_postgres() {
    let spec = planner::compile(
        "startswith(CompanyName, 'Alfr') and (Freight gt 10.5 or not (Region eq null))",
    )
    .unwrap();
    let out = SqlBackend::new(&Postgres).render(&spec).unwrap();

    assert_eq!(
        out.where_clause.as_deref(),
        Some(r#"("CompanyName" LIKE $1 ESCAPE '!' AND ("Freight" > $2 OR NOT ("Region" IS NULL)))"#)
    );
    assert_eq!(
        out.params,
        vec![Literal::from("Alfr%"), Literal::Float(10.5)]
    );
}

#[test]
fn test_flattened_chain_mysql() {
    let spec = planner::compile("A eq 1 and B eq 2 and C eq 3").unwrap();
    let out = SqlBackend::new(&MySql).render(&spec).unwrap();
    assert_eq!(
        out.where_clause.as_deref(),
        Some("(`A` = ? AND `B` = ? AND `C` = ?)")
    );
}

#[test]
fn test_dialect_by_name_and_plan_projection() {
    let planner = QueryPlanner::default();
    let plan = planner
        .plan_query_string("$filter=concat(First,Last)%20eq%20'AnnB'&$select=First,Last")
        .unwrap();
    let spec = plan.filter.as_ref().unwrap();

    let dialect = dialect::from_name("postgres").unwrap();
    let out = SqlBackend::new(dialect.as_ref()).render(spec).unwrap();

    assert_eq!(
        out.columns,
        vec![r#"CONCAT("First", "Last") AS "annotated_value_1""#]
    );
    assert_eq!(out.hidden, vec!["annotated_value_1"]);
    assert_eq!(plan.projection(), Some(vec!["First", "Last"]));
}

#[test]
fn test_custom_annotation_prefix_is_quoted() {
    let compiler = Compiler::new(FilterSettings::default().with_annotation_prefix("calc"));
    let spec = compiler.compile("Price mod 2 eq 0").unwrap();
    let out = SqlBackend::new(&MySql).render(&spec).unwrap();

    assert_eq!(out.columns, vec!["(`Price` % ?) AS `calc_1`"]);
    assert_eq!(out.where_clause.as_deref(), Some("(`Price` % ?) = ?"));
}

#[test]
fn test_field_named_like_annotation_keeps_its_column() {
    let spec = planner::compile("annotated_value_1 eq 3 and Price add 1 eq 2").unwrap();
    let out = SqlBackend::new(&Postgres).render(&spec).unwrap();

    assert_eq!(out.columns, vec![r#"("Price" + $1) AS "annotated_value_2""#]);
    assert_eq!(
        out.where_clause.as_deref(),
        Some(r#"("annotated_value_1" = $2 AND ("Price" + $3) = $4)"#)
    );
    assert_eq!(out.hidden, vec!["annotated_value_2"]);
}
