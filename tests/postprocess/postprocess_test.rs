//! Tests for row post-processing: blanking, row additions and column totals.

use folio::model::{ReportDefinition, Row, Value};
use folio::postprocess::{Pagination, PostProcessor, ROW_TOTAL_COLUMN};

fn years(values: &[i64]) -> Vec<Row> {
    values.iter().map(|y| Row::new().with("Year", *y)).collect()
}

fn column(rows: &[Row], key: &str) -> Vec<Value> {
    rows.iter()
        .map(|r| r.get(key).cloned().unwrap_or_default())
        .collect()
}

#[test]
fn test_blanking_consecutive_years() {
    let mut def = ReportDefinition::new("Budgets");
    def.clear_columns = vec!["Year".into()];

    let processed = PostProcessor::from_definition(&def).apply(years(&[2020, 2020, 2021, 2021]));
    assert_eq!(
        column(&processed.rows, "Year"),
        vec![
            Value::Int(2020),
            Value::from(""),
            Value::Int(2021),
            Value::from("")
        ]
    );
}

#[test]
fn test_blanking_is_not_global_dedup() {
    let processor = PostProcessor::new(&["Year".to_string()], &[], &[]);
    let processed = processor.apply(years(&[2020, 2021, 2020]));
    assert_eq!(
        column(&processed.rows, "Year"),
        vec![Value::Int(2020), Value::Int(2021), Value::Int(2020)]
    );
}

#[test]
fn test_row_and_column_totals_together() {
    let mut def = ReportDefinition::new("Budgets");
    def.add_in_rows = vec!["Q1".into(), "Q2".into()];
    def.add_cols = vec!["Q1".into(), ROW_TOTAL_COLUMN.into()];

    let rows = vec![
        Row::new().with("Team", "Web").with("Q1", 100).with("Q2", "50"),
        Row::new().with("Team", "Ops").with("Q1", 25.5).with("Q2", Value::Null),
    ];
    let processed = PostProcessor::from_definition(&def).apply(rows);

    assert_eq!(
        column(&processed.rows, ROW_TOTAL_COLUMN),
        vec![Value::Int(150), Value::Float(25.5)]
    );
    let totals = processed.totals.unwrap();
    assert_eq!(totals.get("Q1"), Some(&Value::Float(125.5)));
    assert_eq!(totals.get(ROW_TOTAL_COLUMN), Some(&Value::Float(175.5)));
    assert_eq!(totals.get("Team"), None);
}

#[test]
fn test_sections_in_first_seen_order() {
    let rows = vec![
        Row::new().with("Region", "North").with("Sales", 1),
        Row::new().with("Region", "South").with("Sales", 2),
        Row::new().with("Region", "North").with("Sales", 3),
    ];
    let pagination = Pagination {
        key: "Region".into(),
        header: "Region: $name".into(),
    };
    let report = PostProcessor::default().process(rows, Some(&pagination));

    let titles: Vec<_> = report
        .sections
        .iter()
        .map(|s| s.title.clone().unwrap_or_default())
        .collect();
    assert_eq!(titles, vec!["Region: North", "Region: South"]);
    assert_eq!(
        column(&report.sections[0].rows, "Sales"),
        vec![Value::Int(1), Value::Int(3)]
    );
    assert!(report.totals.is_none());
}

#[test]
fn test_empty_rows() {
    let processor = PostProcessor::new(&["A".to_string()], &["A".to_string()], &["A".to_string()]);
    let processed = processor.apply(Vec::new());
    assert!(processed.rows.is_empty());
    assert_eq!(
        processed.totals.unwrap().get("A"),
        Some(&Value::Int(0))
    );
}
