//! End-to-end report generation against a SQLite fixture.

use folio::model::{JoinSpec, ReportDefinition, ReportFormat, ReportRecord, StaticCatalog, Value};
use folio::pipeline::{Delivery, ReportArtifact, ReportError, ReportPipeline};
use folio::source::SqliteSource;
use folio::sql::JoinType;
use folio::storage::FsStorage;
use std::fs;
use std::path::Path;

const FIXTURE: &str = "
CREATE TABLE Member (ID INTEGER PRIMARY KEY, Surname TEXT);
INSERT INTO Member VALUES (1, 'Smith');
INSERT INTO Member VALUES (2, 'Jones');

CREATE TABLE Page (
    ID INTEGER PRIMARY KEY,
    Title TEXT,
    Status TEXT,
    Sort TEXT,
    Amount INTEGER,
    OwnerID INTEGER
);
INSERT INTO Page VALUES (1, 'Home', 'Active', '11', 10, 1);
INSERT INTO Page VALUES (2, 'About', 'Active', '2', 20, 1);
INSERT INTO Page VALUES (3, 'Old', 'Archived', '1', 5, 2);
INSERT INTO Page VALUES (4, 'Contact', 'Active', '1', 7, 1);
";

fn catalog() -> StaticCatalog {
    catalog_with_sort(true)
}

fn catalog_with_sort(numeric: bool) -> StaticCatalog {
    let catalog = StaticCatalog::new("Pages", "Page")
        .field("Title", "Title")
        .field("Status", "Status");
    let catalog = if numeric {
        catalog.numeric_field("Sort", "Sort order")
    } else {
        catalog.field("Sort", "Sort order")
    };
    catalog
        .field("Amount", "Amount")
        .field("Member.Surname", "Owner")
        .join(JoinSpec {
            table: "Member".into(),
            kind: JoinType::Left,
            left: "Page.OwnerID".into(),
            right: "Member.ID".into(),
        })
}

fn pipeline() -> ReportPipeline<StaticCatalog, SqliteSource> {
    pipeline_for(catalog())
}

fn pipeline_for(catalog: StaticCatalog) -> ReportPipeline<StaticCatalog, SqliteSource> {
    let source = SqliteSource::open_in_memory().unwrap();
    source.connection().execute_batch(FIXTURE).unwrap();
    ReportPipeline::new(catalog, source)
}

fn active_by_sort() -> ReportDefinition {
    ReportDefinition::new("Active pages")
        .select("Title", Some("Page"))
        .select("Sort", Some("Order"))
        .condition("Status", "=", "Active")
        .sort("Sort", "ASC")
}

#[test]
fn test_filtered_numeric_sort() {
    let pipeline = pipeline();
    let def = active_by_sort();

    let ctx = pipeline.prepare(&def, "csv").unwrap();
    assert_eq!(ctx.headers.labels().collect::<Vec<_>>(), vec!["Page", "Order"]);

    let rows = &ctx.report.sections[0].rows;
    let sort: Vec<f64> = rows
        .iter()
        .filter_map(|r| r.get("Sort").and_then(Value::as_f64))
        .collect();
    assert_eq!(sort, vec![1.0, 2.0, 11.0]);
    assert!(sort.windows(2).all(|w| w[0] < w[1]));

    let artifact = pipeline.create_report(&def, "csv", Delivery::Inline).unwrap();
    assert_eq!(
        artifact,
        ReportArtifact::Content("Page,Order\r\nContact,1\r\nAbout,2\r\nHome,11\r\n".into())
    );
}

#[test]
fn test_numeric_sort_differs_from_text_order() {
    let def = ReportDefinition::new("Sort only")
        .select("Sort", None)
        .condition("Status", "=", "Active")
        .sort("Sort", "ASC");

    let text_order = pipeline_for(catalog_with_sort(false))
        .create_report(&def, "csv", Delivery::Inline)
        .unwrap();
    assert_eq!(text_order.as_text(), Some("Sort order\r\n1\r\n11\r\n2\r\n"));

    let numeric_order = pipeline_for(catalog_with_sort(true))
        .create_report(&def, "csv", Delivery::Inline)
        .unwrap();
    assert_eq!(numeric_order.as_text(), Some("Sort order\r\n1\r\n2\r\n11\r\n"));
}

#[test]
fn test_sections_and_totals() {
    let mut def = ReportDefinition::new("Pages by status")
        .select("Title", None)
        .select("Amount", None)
        .paginate("Status", "Status: $name")
        .sort("Status", "ASC")
        .sort("Title", "");
    def.add_cols = vec!["Amount".into()];

    let artifact = pipeline().create_report(&def, "csv", Delivery::Inline).unwrap();
    let text = artifact.as_text().unwrap().replace("\r\n", "\n");
    insta::assert_snapshot!(text.trim_end(), @r"
    Title,Amount
    Status: Active
    About,20
    Contact,7
    Home,10
    Status: Archived
    Old,5
    ,42
    ");
}

#[test]
fn test_sections_by_joined_field_without_selection() {
    let def = ReportDefinition::new("By owner").paginate("Member.Surname", "Owner $name");

    let ctx = pipeline().prepare(&def, "html").unwrap();
    let titles: Vec<Option<&str>> = ctx
        .report
        .sections
        .iter()
        .map(|s| s.title.as_deref())
        .collect();
    assert_eq!(titles, vec![Some("Owner Smith"), Some("Owner Jones")]);
    assert_eq!(ctx.report.sections[0].rows.len(), 3);
    assert_eq!(ctx.report.sections[1].rows.len(), 1);
}

#[test]
fn test_joined_field_with_blanking() {
    let mut def = ReportDefinition::new("Owners")
        .select("Title", Some("Page"))
        .select("Member.Surname", None)
        .condition("Status", "=", "Active")
        .sort("Member.Surname", "ASC")
        .sort("Title", "");
    def.clear_columns = vec!["Member.Surname".into()];

    let artifact = pipeline().create_report(&def, "csv", Delivery::Inline).unwrap();
    assert_eq!(
        artifact.as_text(),
        Some("Page,Owner\r\nAbout,Smith\r\nContact,\r\nHome,\r\n")
    );
}

#[test]
fn test_html_report() {
    let artifact = pipeline()
        .create_report(&active_by_sort(), "html", Delivery::Inline)
        .unwrap();
    let html = artifact.as_text().unwrap();
    assert!(html.contains("<h1>Active pages</h1>"));
    assert!(html.contains("<th>Page</th><th>Order</th>"));
    assert!(html.contains("<tr><td>Contact</td><td>1</td></tr>"));
}

#[test]
fn test_unknown_format_placeholder() {
    let artifact = pipeline()
        .create_report(&active_by_sort(), "xlsx", Delivery::Inline)
        .unwrap();
    assert!(artifact.is_placeholder());
    assert_eq!(artifact.as_text(), Some("Formatter for xlsx not found!"));
}

#[test]
fn test_bad_catalog_propagates_source_error() {
    let source = SqliteSource::open_in_memory().unwrap();
    let pipeline = ReportPipeline::new(StaticCatalog::new("Ghost", "Nowhere"), source);
    let err = pipeline
        .create_report(&ReportDefinition::new("x"), "csv", Delivery::Inline)
        .unwrap_err();
    assert!(matches!(err, ReportError::Source(_)));
}

#[test]
fn test_generate_report_into_storage() {
    let dir = tempfile::tempdir().unwrap();
    let temp = dir.path().join("tmp");
    fs::create_dir(&temp).unwrap();
    let storage = FsStorage::new(dir.path().join("assets"));

    let pipeline = pipeline().with_temp_dir(&temp);
    let mut record = ReportRecord::new(5, active_by_sort());

    let stored = pipeline
        .generate_report(&mut record, ReportFormat::Html, &storage)
        .unwrap();
    assert_eq!(
        stored.path,
        Path::new("advanced-reports/preview/5/Active-pages.html")
    );
    assert_eq!(record.html_file.as_deref(), Some(stored.path.as_path()));
    assert!(fs::read_to_string(&stored.full_path)
        .unwrap()
        .contains("<td>Home</td>"));
    assert_eq!(fs::read_dir(&temp).unwrap().count(), 0);

    // A second run replaces the stored file and keeps the record pointing at it
    let again = pipeline
        .generate_report(&mut record, ReportFormat::Html, &storage)
        .unwrap();
    assert_eq!(again.path, stored.path);
}

#[test]
fn test_generate_report_placeholder_is_not_stored() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FsStorage::new(dir.path());
    let pipeline = pipeline()
        .with_temp_dir(dir.path())
        .with_formatters(folio::format::FormatterRegistry::new());
    let mut record = ReportRecord::new(1, active_by_sort());

    let err = pipeline
        .generate_report(&mut record, ReportFormat::Csv, &storage)
        .unwrap_err();
    assert!(matches!(err, ReportError::NotStored(_)));
    assert_eq!(record.csv_file, None);
}
