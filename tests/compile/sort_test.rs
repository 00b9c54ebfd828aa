//! Tests for sort compilation.

use folio::compile::compile_sort;
use folio::model::FieldSet;
use folio::sql::{Dialect, Query, SortDir, TableRef};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn allowed() -> FieldSet {
    FieldSet::new()
        .with("X", "X")
        .with("Y", "Y")
        .with("Sort", "Sort order")
        .with("Member.Surname", "Owner")
}

fn order_sql(order: &folio::compile::OrderExpr, dialect: Dialect) -> String {
    Query::new()
        .select_star()
        .from(TableRef::new("Page"))
        .order_by(order.to_order_by())
        .to_sql(dialect)
}

#[test]
fn test_direction_persists() {
    let order = compile_sort(&allowed(), &strings(&["X", "Y"]), &strings(&["DESC"]), &[], "ID");
    let dirs: Vec<SortDir> = order.terms().iter().map(|t| t.dir).collect();
    assert_eq!(dirs, vec![SortDir::Desc, SortDir::Desc]);
    assert_eq!(order.to_string(), "X DESC, Y DESC");
}

#[test]
fn test_direction_changes_only_on_exact_keyword() {
    let order = compile_sort(
        &allowed(),
        &strings(&["X", "Y", "Sort"]),
        &strings(&["DESC", "asc", "ASC"]),
        &[],
        "ID",
    );
    assert_eq!(order.to_string(), "X DESC, Y DESC, Sort ASC");
}

#[test]
fn test_unknown_fields_skipped() {
    let order = compile_sort(
        &allowed(),
        &strings(&["Missing", "Y"]),
        &strings(&["DESC", ""]),
        &[],
        "ID",
    );
    assert_eq!(order.to_string(), "Y ASC");
    assert!(!order.is_fallback());
}

#[test]
fn test_fallback_to_identity() {
    let order = compile_sort(&allowed(), &strings(&["Gone"]), &[], &[], "ID");
    assert!(order.is_fallback());
    assert_eq!(order.to_string(), "ID ASC");
}

#[test]
fn test_numeric_fields_are_coerced() {
    let order = compile_sort(
        &allowed(),
        &strings(&["Sort", "Member.Surname"]),
        &strings(&["ASC"]),
        &strings(&["Sort"]),
        "ID",
    );
    assert_eq!(order.to_string(), "Sort + 0 ASC, Member_Surname ASC");

    insta::assert_snapshot!(order_sql(&order, Dialect::Postgres), @r#"
    SELECT
      *
    FROM "Page"
    ORDER BY CAST("Sort" AS NUMERIC) ASC, "Member"."Surname" ASC
    "#);
    assert!(order_sql(&order, Dialect::DuckDb).contains("TRY_CAST(\"Sort\" AS DOUBLE) ASC"));
    assert!(order_sql(&order, Dialect::TSql).contains("TRY_CAST([Sort] AS FLOAT) ASC"));
}

#[test]
fn test_numeric_field_named_in_resolved_form() {
    let order = compile_sort(
        &allowed(),
        &strings(&["Member.Surname"]),
        &[],
        &strings(&["Member_Surname"]),
        "ID",
    );
    assert!(order.terms()[0].numeric);
}
