//! Tests for condition compilation and filter quoting.

use folio::compile::{
    compile_conditions, ConditionOp, ConditionValue, FilterQuoter, ALLOWED_OPERATORS,
};
use folio::model::FieldSet;
use folio::sql::Dialect;
use sqlparser::dialect::{MsSqlDialect, MySqlDialect, PostgreSqlDialect, SQLiteDialect};
use sqlparser::parser::Parser;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn allowed() -> FieldSet {
    FieldSet::new()
        .with("A", "A")
        .with("B", "B")
        .with("C", "C")
        .with("Status", "Status")
        .with("Title", "Title")
        .with("Member.Surname", "Owner")
}

#[test]
fn test_compilation_stops_at_unknown_operator() {
    let filter = compile_conditions(
        &allowed(),
        &strings(&["A", "B", "C"]),
        &strings(&["=", "??", "<="]),
        &strings(&["1", "2", "3"]),
    );
    assert_eq!(filter.len(), 1);
    assert_eq!(Dialect::Sqlite.quote_filter(&filter), "\"A\" = '1'");
}

#[test]
fn test_compilation_stops_at_missing_value() {
    let filter = compile_conditions(
        &allowed(),
        &strings(&["A", "B", "C"]),
        &strings(&["=", ">", "<"]),
        &strings(&["1", ""]),
    );
    assert_eq!(filter.len(), 1);
}

#[test]
fn test_unknown_field_is_skipped_not_fatal() {
    let filter = compile_conditions(
        &allowed(),
        &strings(&["Password", "Status"]),
        &strings(&["=", "<>"]),
        &strings(&["x", "Draft"]),
    );
    assert_eq!(filter.len(), 1);
    assert_eq!(filter.predicates()[0].field, "Status");
    assert_eq!(filter.predicates()[0].op, ConditionOp::Ne);
    assert_eq!(Dialect::Postgres.quote_filter(&filter), "\"Status\" <> 'Draft'");
}

#[test]
fn test_in_splits_members() {
    let filter = compile_conditions(
        &allowed(),
        &strings(&["Status"]),
        &strings(&["IN"]),
        &strings(&["Active, Pending,,Archived"]),
    );
    assert_eq!(
        filter.predicates()[0].value,
        ConditionValue::List(strings(&["Active", "Pending", "Archived"]))
    );
    insta::assert_snapshot!(
        Dialect::Sqlite.quote_filter(&filter),
        @r#""Status" IN ('Active', 'Pending', 'Archived')"#
    );
}

#[test]
fn test_in_without_members_matches_nothing() {
    let filter = compile_conditions(
        &allowed(),
        &strings(&["Status"]),
        &strings(&["IN"]),
        &strings(&[" , ,"]),
    );
    assert_eq!(filter.len(), 1);

    let tsql = Dialect::TSql.quote_filter(&filter);
    assert_eq!(tsql, "1 = 0");
    let sql = format!("SELECT * FROM t WHERE {}", tsql);
    assert!(Parser::parse_sql(&MsSqlDialect {}, &sql).is_ok());
}

#[test]
fn test_dotted_condition_field() {
    let filter = compile_conditions(
        &allowed(),
        &strings(&["Member.Surname"]),
        &strings(&["="]),
        &strings(&["Smith"]),
    );
    assert_eq!(
        Dialect::MySql.quote_filter(&filter),
        "`Member`.`Surname` = 'Smith'"
    );
}

#[test]
fn test_empty_definition_is_neutral() {
    let filter = compile_conditions(&allowed(), &[], &[], &[]);
    assert!(filter.is_neutral());
    assert_eq!(Dialect::DuckDb.quote_filter(&filter), "1 = 1");
}

#[test]
fn test_values_cannot_inject() {
    let filter = compile_conditions(
        &allowed(),
        &strings(&["Title", "A"]),
        &strings(&["=", "="]),
        &strings(&["x' OR '1'='1", "1; DROP TABLE Page; --"]),
    );
    let sqlite = Dialect::Sqlite.quote_filter(&filter);
    assert_eq!(
        sqlite,
        "\"Title\" = 'x'' OR ''1''=''1' AND \"A\" = '1; DROP TABLE Page; --'"
    );

    // Still one WHERE clause with two conjuncts, in every dialect
    let checks: [(Dialect, &dyn sqlparser::dialect::Dialect); 3] = [
        (Dialect::Sqlite, &SQLiteDialect {}),
        (Dialect::Postgres, &PostgreSqlDialect {}),
        (Dialect::MySql, &MySqlDialect {}),
    ];
    for (dialect, parser_dialect) in checks {
        let sql = format!("SELECT * FROM t WHERE {}", dialect.quote_filter(&filter));
        let statements = Parser::parse_sql(parser_dialect, &sql).unwrap();
        assert_eq!(statements.len(), 1, "{}", sql);
    }
}

#[test]
fn test_operator_table() {
    let keys: Vec<&str> = ALLOWED_OPERATORS.iter().map(|(k, _)| *k).collect();
    assert_eq!(keys, vec!["=", "<>", ">=", ">", "<", "<=", "IN"]);

    for (key, label) in ALLOWED_OPERATORS {
        let op = ConditionOp::parse(key).unwrap();
        assert_eq!(op.label(), label);
    }
    assert_eq!(ConditionOp::parse("!="), Some(ConditionOp::Ne));
    assert_eq!(ConditionOp::parse("in"), Some(ConditionOp::In));
    assert_eq!(ConditionOp::parse("LIKE"), None);
}
