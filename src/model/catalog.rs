//! Field catalogs: what a report kind may select, filter and sort on.
//!
//! Each report kind supplies a [`FieldCatalog`]. The compilers only ever see
//! fields the catalog lists, which is what keeps stale or hostile field
//! references out of generated SQL.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::value::ValueFormat;
use crate::sql::{field, ExprExt, Join, JoinType, TableRef};

/// Ordered set of selectable fields with their display labels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSet {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: &str, label: &str) -> Self {
        self.insert(name, label);
        self
    }

    /// Add a field, or relabel it if already present.
    pub fn insert(&mut self, name: &str, label: &str) {
        match self.index.get(name) {
            Some(&i) => self.entries[i].1 = label.to_string(),
            None => {
                self.index.insert(name.to_string(), self.entries.len());
                self.entries.push((name.to_string(), label.to_string()));
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn label(&self, name: &str) -> Option<&str> {
        self.index.get(name).map(|&i| self.entries[i].1.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, l)| (n.as_str(), l.as_str()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for FieldSet {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut set = FieldSet::new();
        for (name, label) in iter {
            set.insert(name, label);
        }
        set
    }
}

/// A join a catalog declares so dotted fields can reach another table.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct JoinSpec {
    pub table: String,
    #[serde(default)]
    pub kind: JoinType,
    /// Field on the already-joined side, e.g. `Page.OwnerID`.
    pub left: String,
    /// Field on the joined table, e.g. `Member.ID`.
    pub right: String,
}

impl JoinSpec {
    pub fn to_join(&self) -> Join {
        Join {
            join_type: self.kind,
            table: TableRef::new(&self.table),
            on: field(&self.left).eq(field(&self.right)),
        }
    }
}

/// Metadata a report kind must supply.
///
/// `report_name`, `fields`, `numeric_sort_fields` and `entity` have no
/// defaults; a report kind that does not provide them does not compile.
pub trait FieldCatalog {
    /// Human name of the report kind.
    fn report_name(&self) -> &str;

    /// Selectable fields and their labels.
    fn fields(&self) -> FieldSet;

    /// Fields stored as text that must order by numeric magnitude.
    fn numeric_sort_fields(&self) -> Vec<String>;

    /// The base table queried.
    fn entity(&self) -> TableRef;

    fn joins(&self) -> Vec<JoinSpec> {
        Vec::new()
    }

    /// Field used when a report has no valid sort terms.
    fn identity_field(&self) -> &str {
        "ID"
    }

    /// Display formats keyed by field reference.
    fn field_formats(&self) -> HashMap<String, ValueFormat> {
        HashMap::new()
    }
}

// =============================================================================
// StaticCatalog
// =============================================================================

/// A catalog field entry as written in a definition file.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CatalogField {
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    /// Order by magnitude even though the column holds text.
    #[serde(default)]
    pub numeric: bool,
    #[serde(default)]
    pub format: Option<ValueFormat>,
}

/// A catalog declared in data rather than code.
///
/// ```toml
/// [catalog]
/// name = "Pages"
/// entity = "Page"
///
/// [[catalog.fields]]
/// name = "Title"
///
/// [[catalog.fields]]
/// name = "Sort"
/// numeric = true
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StaticCatalog {
    pub name: String,
    pub entity: String,
    #[serde(default)]
    pub schema: Option<String>,
    #[serde(default = "default_identity")]
    pub identity: String,
    #[serde(default)]
    pub fields: Vec<CatalogField>,
    #[serde(default)]
    pub joins: Vec<JoinSpec>,
}

fn default_identity() -> String {
    "ID".into()
}

impl StaticCatalog {
    pub fn new(name: &str, entity: &str) -> Self {
        Self {
            name: name.into(),
            entity: entity.into(),
            schema: None,
            identity: default_identity(),
            fields: Vec::new(),
            joins: Vec::new(),
        }
    }

    /// Add a text field.
    pub fn field(mut self, name: &str, label: &str) -> Self {
        self.fields.push(CatalogField {
            name: name.into(),
            label: Some(label.into()),
            numeric: false,
            format: None,
        });
        self
    }

    /// Add a field that sorts numerically.
    pub fn numeric_field(mut self, name: &str, label: &str) -> Self {
        self.fields.push(CatalogField {
            name: name.into(),
            label: Some(label.into()),
            numeric: true,
            format: None,
        });
        self
    }

    /// Attach a display format to an existing field.
    pub fn format(mut self, name: &str, format: ValueFormat) -> Self {
        if let Some(f) = self.fields.iter_mut().find(|f| f.name == name) {
            f.format = Some(format);
        }
        self
    }

    pub fn join(mut self, spec: JoinSpec) -> Self {
        self.joins.push(spec);
        self
    }
}

impl FieldCatalog for StaticCatalog {
    fn report_name(&self) -> &str {
        &self.name
    }

    fn fields(&self) -> FieldSet {
        let mut set = FieldSet::new();
        for f in &self.fields {
            set.insert(&f.name, f.label.as_deref().unwrap_or(&f.name));
        }
        set
    }

    fn numeric_sort_fields(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.fields
            .iter()
            .filter(|f| f.numeric && seen.insert(f.name.as_str()))
            .map(|f| f.name.clone())
            .collect()
    }

    fn entity(&self) -> TableRef {
        let table = TableRef::new(&self.entity);
        match &self.schema {
            Some(schema) => table.with_schema(schema),
            None => table,
        }
    }

    fn joins(&self) -> Vec<JoinSpec> {
        self.joins.clone()
    }

    fn identity_field(&self) -> &str {
        &self.identity
    }

    fn field_formats(&self) -> HashMap<String, ValueFormat> {
        self.fields
            .iter()
            .filter_map(|f| f.format.clone().map(|fmt| (f.name.clone(), fmt)))
            .collect()
    }
}
