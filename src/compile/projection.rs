//! Projection compilation: selected fields to a SELECT list and header labels.

use super::names::resolve;
use crate::model::FieldSet;
use crate::sql::{field, star, ExprExt, SelectExpr};

/// A selected field as it appears in the SELECT list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectedField {
    /// Field reference as written in the definition.
    pub field: String,
    /// `Table_Field` for dotted references.
    pub alias: Option<String>,
}

impl ProjectedField {
    pub fn new(field_ref: &str) -> Self {
        let alias = field_ref.contains('.').then(|| resolve(field_ref));
        Self {
            field: field_ref.to_string(),
            alias,
        }
    }

    /// Key the column appears under in result rows.
    pub fn key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.field)
    }

    pub fn to_select(&self) -> SelectExpr {
        match &self.alias {
            Some(alias) => field(&self.field).alias(alias),
            None => SelectExpr::new(field(&self.field)),
        }
    }
}

/// Ordered SELECT list. Empty means "all columns".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Projection {
    fields: Vec<ProjectedField>,
    /// `*` precedes the listed fields.
    all_columns: bool,
}

impl Projection {
    /// Every column, plus one field that `*` would not name by its row key.
    pub fn all_columns_with(projected: ProjectedField) -> Self {
        Self {
            fields: vec![projected],
            all_columns: true,
        }
    }

    /// Whether every column of the joined tables is selected.
    pub fn selects_all_columns(&self) -> bool {
        self.all_columns || self.fields.is_empty()
    }

    pub fn fields(&self) -> &[ProjectedField] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.iter().any(|f| f.key() == key)
    }

    /// Add a field unless one with the same key is already selected.
    pub fn push(&mut self, projected: ProjectedField) {
        if !self.contains_key(projected.key()) {
            self.fields.push(projected);
        }
    }

    pub fn to_select(&self) -> Vec<SelectExpr> {
        let all = self.all_columns.then(|| SelectExpr::new(star()));
        all.into_iter()
            .chain(self.fields.iter().map(ProjectedField::to_select))
            .collect()
    }
}

/// Column key to display label, in display order.
///
/// Re-inserting a key replaces its label but keeps its first position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    entries: Vec<(String, String)>,
}

impl HeaderMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, label: &str) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, l)) => *l = label.to_string(),
            None => self.entries.push((key.to_string(), label.to_string())),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, l)| l.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, l)| l.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, l)| (k.as_str(), l.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Compile the selected fields.
///
/// Only catalog fields are projected. Every selected field gets a header:
/// the non-empty override at its position, else the catalog label, else the
/// reference itself.
pub fn compile_projection(
    allowed: &FieldSet,
    selected: &[String],
    headers: &[String],
) -> (Projection, HeaderMap) {
    let mut projection = Projection::default();
    let mut header_map = HeaderMap::new();

    for (i, field_ref) in selected.iter().enumerate() {
        let key = resolve(field_ref);
        let label = headers
            .get(i)
            .map(String::as_str)
            .filter(|h| !h.trim().is_empty())
            .or_else(|| allowed.label(field_ref))
            .unwrap_or(field_ref.as_str());
        header_map.insert(&key, label);

        if allowed.contains(field_ref) {
            projection.push(ProjectedField::new(field_ref));
        } else {
            tracing::debug!(index = i, field = %field_ref, "selected field not in catalog, not projected");
        }
    }

    (projection, header_map)
}
