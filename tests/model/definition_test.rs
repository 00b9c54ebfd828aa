//! Tests for loading definition files.

use folio::compile::compile_definition;
use folio::model::{DefinitionFile, FieldCatalog, ValueFormat};
use folio::sql::{Dialect, JoinType};
use std::fs;

const PAGES: &str = r#"
[catalog]
name = "Pages"
entity = "Page"

[[catalog.fields]]
name = "Title"
label = "Page title"

[[catalog.fields]]
name = "Sort"
numeric = true
format = { kind = "number" }

[[catalog.fields]]
name = "Member.Surname"
label = "Owner"

[[catalog.joins]]
table = "Member"
left = "Page.OwnerID"
right = "Member.ID"

[report]
title = "Pages by owner"
selected_fields = ["Title", "Member.Surname"]
field_headers = ["Page"]
sort_fields = ["Sort"]
sort_directions = ["DESC"]
"#;

#[test]
fn test_toml_definition_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pages.toml");
    fs::write(&path, PAGES).unwrap();

    let file = DefinitionFile::from_path(&path).unwrap();
    let catalog = &file.catalog;
    assert_eq!(catalog.report_name(), "Pages");
    assert_eq!(catalog.numeric_sort_fields(), vec!["Sort"]);
    assert_eq!(catalog.joins()[0].kind, JoinType::Left);
    assert_eq!(
        catalog.field_formats().get("Sort"),
        Some(&ValueFormat::Number { decimals: 0 })
    );
    assert_eq!(catalog.fields().label("Sort"), Some("Sort"));

    let compiled = compile_definition(catalog, &file.report);
    insta::assert_snapshot!(compiled.to_sql(Dialect::Sqlite), @r#"
    SELECT
      "Title",
      "Member"."Surname" AS "Member_Surname"
    FROM "Page"
    LEFT JOIN "Member" ON "Page"."OwnerID" = "Member"."ID"
    ORDER BY "Sort" + 0 DESC
    "#);
}

#[test]
fn test_json_definition_with_legacy_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("members.JSON");
    fs::write(
        &path,
        r#"{
            "catalog": {
                "name": "Members",
                "entity": "Member",
                "fields": [{ "name": "Surname" }, { "name": "Email" }]
            },
            "report": {
                "Title": "Members",
                "ReportFields": ["Surname"],
                "ConditionFields": ["Email"],
                "ConditionOps": ["<>"],
                "ConditionValues": [""]
            }
        }"#,
    )
    .unwrap();

    let file = DefinitionFile::from_path(&path).unwrap();
    let compiled = compile_definition(&file.catalog, &file.report);
    // Empty value ends the conditions
    assert!(compiled.filter.is_neutral());
    assert_eq!(compiled.projection.len(), 1);
}

#[test]
fn test_invalid_toml() {
    let err = DefinitionFile::from_toml_str("[catalog]\nname = ").unwrap_err();
    assert!(err.to_string().starts_with("Failed to parse TOML definition"));
}
