//! Tests for projection and header compilation.

use folio::compile::{compile_projection, resolve};
use folio::model::FieldSet;
use folio::sql::Dialect;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn allowed() -> FieldSet {
    FieldSet::new()
        .with("Title", "Page title")
        .with("Created", "Created")
        .with("Member.Surname", "Owner")
}

#[test]
fn test_resolve() {
    assert_eq!(resolve("Table.Field"), "Table_Field");
    assert_eq!(resolve("Plain"), "Plain");
    assert_eq!(resolve(&resolve("Table.Field")), "Table_Field");
}

#[test]
fn test_dotted_fields_are_aliased() {
    let (projection, headers) = compile_projection(
        &allowed(),
        &strings(&["Title", "Member.Surname"]),
        &[],
    );
    let select: Vec<String> = projection
        .to_select()
        .iter()
        .map(|s| s.to_tokens_for_dialect(Dialect::Sqlite).serialize(Dialect::Sqlite))
        .collect();
    assert_eq!(
        select,
        vec!["\"Title\"", "\"Member\".\"Surname\" AS \"Member_Surname\""]
    );
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec![("Title", "Page title"), ("Member_Surname", "Owner")]
    );
}

#[test]
fn test_header_overrides_and_fallbacks() {
    let (_, headers) = compile_projection(
        &allowed(),
        &strings(&["Title", "Created", "Member.Surname"]),
        &strings(&["Name", "  "]),
    );
    assert_eq!(
        headers.labels().collect::<Vec<_>>(),
        vec!["Name", "Created", "Owner"]
    );
}

#[test]
fn test_unknown_field_keeps_header_only() {
    let (projection, headers) =
        compile_projection(&allowed(), &strings(&["Title", "Secret"]), &[]);
    assert_eq!(projection.len(), 1);
    assert!(!projection.contains_key("Secret"));
    assert_eq!(headers.get("Secret"), Some("Secret"));
}

#[test]
fn test_nothing_selected() {
    let (projection, headers) = compile_projection(&allowed(), &[], &[]);
    assert!(projection.is_empty());
    assert!(headers.is_empty());
}
