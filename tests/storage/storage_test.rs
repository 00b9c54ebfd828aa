//! Tests for managed report storage.

use folio::model::ReportFormat;
use folio::storage::{report_file_name, FsStorage, ReportStorage, StorageError};
use std::fs;
use std::path::Path;

#[test]
fn test_file_names() {
    assert_eq!(
        report_file_name("Quarterly Budget Q1", ReportFormat::Pdf),
        "Quarterly-Budget-Q1.pdf"
    );
    assert_eq!(
        report_file_name("Sales/Costs: 2024", ReportFormat::Csv),
        "SalesCosts-2024.csv"
    );
    assert_eq!(report_file_name("", ReportFormat::Html), "report.html");
}

#[test]
fn test_preview_and_report_folders() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FsStorage::new(dir.path());

    assert_eq!(
        storage.folder(None, 12).unwrap(),
        Path::new("advanced-reports/preview/12")
    );
    assert_eq!(
        storage.folder(Some(3), 12).unwrap(),
        Path::new("advanced-reports/3/12")
    );
    assert!(dir.path().join("advanced-reports/3/12").is_dir());
}

#[test]
fn test_store_reports_size_and_paths() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FsStorage::new(dir.path().join("assets"));
    let source = dir.path().join("render.html");
    fs::write(&source, "<html></html>").unwrap();

    let folder = storage.folder(Some(1), 1).unwrap();
    let stored = storage.store(&folder, "Report.html", &source).unwrap();

    assert_eq!(stored.size, 13);
    assert_eq!(stored.full_path, storage.root().join(&stored.path));
    assert!(source.exists(), "source is copied, not moved");
}

#[test]
fn test_store_into_unwritable_root() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("file");
    fs::write(&blocker, "x").unwrap();

    // The root is a file, so no folder can be created beneath it
    let storage = FsStorage::new(&blocker);
    let err = storage.folder(Some(1), 1).unwrap_err();
    assert!(matches!(err, StorageError::CreateFolder { .. }));
}
