//! Result-set post-processing applied before rendering.
//!
//! Three passes over the fetched rows:
//!
//! - **Row addition**: each row gets a [`ROW_TOTAL_COLUMN`] holding the sum of
//!   its `add_in_rows` columns.
//! - **Column totals**: each `add_cols` column is summed over every row into a
//!   single totals row.
//! - **Blanking**: in each `clear_columns` column, a value repeating the
//!   previous row's value is replaced by an empty one.
//!
//! Sums and comparisons always read the values as fetched, so blanking never
//! changes a total. Non-numeric values count as zero.

use std::collections::HashMap;

use crate::compile::resolve;
use crate::model::{ReportDefinition, Row, Value};

/// Column holding the per-row sum.
pub const ROW_TOTAL_COLUMN: &str = "RowTotal";

/// Rows after post-processing, with the totals row if one was requested.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessedRows {
    pub rows: Vec<Row>,
    pub totals: Option<Row>,
}

/// A run of rows sharing one pagination value.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    /// `page_header` with `$name` replaced; `None` when not paginated.
    pub title: Option<String>,
    pub rows: Vec<Row>,
}

/// Post-processed rows split into sections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessedReport {
    pub sections: Vec<Section>,
    pub totals: Option<Row>,
}

impl ProcessedReport {
    pub fn row_count(&self) -> usize {
        self.sections.iter().map(|s| s.rows.len()).sum()
    }
}

/// How sections are formed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    /// Row key whose value partitions the rows.
    pub key: String,
    /// Title template; `$name` is replaced by the section value.
    pub header: String,
}

impl Pagination {
    pub fn title(&self, value: &str) -> String {
        self.header.replace("$name", value)
    }
}

/// Blanking and aggregation rules, keyed by resolved column names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostProcessor {
    pub clear: Vec<String>,
    pub add_in_row: Vec<String>,
    pub totals: Vec<String>,
}

impl PostProcessor {
    pub fn new(clear: &[String], add_in_row: &[String], totals: &[String]) -> Self {
        let keys = |fields: &[String]| -> Vec<String> { fields.iter().map(|f| resolve(f)).collect() };
        Self {
            clear: keys(clear),
            add_in_row: keys(add_in_row),
            totals: keys(totals),
        }
    }

    pub fn from_definition(def: &ReportDefinition) -> Self {
        Self::new(&def.clear_columns, &def.add_in_rows, &def.add_cols)
    }

    /// Process rows as one block.
    pub fn apply(&self, rows: Vec<Row>) -> ProcessedRows {
        let mut rows = self.add_row_totals(rows);
        let totals = self.column_totals(&rows);
        self.blank(&mut rows);
        ProcessedRows { rows, totals }
    }

    /// Process rows and split them into sections.
    ///
    /// Sections appear in the order their value is first seen. Blanking
    /// restarts in each section; totals span all rows.
    pub fn process(&self, rows: Vec<Row>, pagination: Option<&Pagination>) -> ProcessedReport {
        let rows = self.add_row_totals(rows);
        let totals = self.column_totals(&rows);

        let mut sections = match pagination {
            None => vec![Section { title: None, rows }],
            Some(p) => partition(rows, p),
        };

        for section in &mut sections {
            self.blank(&mut section.rows);
        }

        tracing::debug!(
            sections = sections.len(),
            totals = totals.is_some(),
            "post-processed report rows"
        );

        ProcessedReport { sections, totals }
    }

    fn add_row_totals(&self, mut rows: Vec<Row>) -> Vec<Row> {
        if self.add_in_row.is_empty() {
            return rows;
        }
        for row in &mut rows {
            let sum: f64 = self
                .add_in_row
                .iter()
                .filter_map(|key| row.get(key).and_then(Value::as_f64))
                .sum();
            row.insert(ROW_TOTAL_COLUMN, Value::from_sum(sum));
        }
        rows
    }

    fn column_totals(&self, rows: &[Row]) -> Option<Row> {
        if self.totals.is_empty() {
            return None;
        }
        let totals: Row = self
            .totals
            .iter()
            .map(|key| {
                let sum: f64 = rows
                    .iter()
                    .filter_map(|row| row.get(key).and_then(Value::as_f64))
                    .sum();
                (key.clone(), Value::from_sum(sum))
            })
            .collect();
        Some(totals)
    }

    fn blank(&self, rows: &mut [Row]) {
        if self.clear.is_empty() {
            return;
        }
        let mut previous: HashMap<&str, Value> = HashMap::new();
        for row in rows.iter_mut() {
            for key in &self.clear {
                let Some(current) = row.get(key).cloned() else {
                    continue;
                };
                let repeated = previous.get(key.as_str()) == Some(&current);
                previous.insert(key.as_str(), current);
                if repeated {
                    row.insert(key, Value::Text(String::new()));
                }
            }
        }
    }
}

fn partition(rows: Vec<Row>, pagination: &Pagination) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let name = row
            .get(&pagination.key)
            .map(Value::to_string)
            .unwrap_or_default();
        let i = *index.entry(name.clone()).or_insert_with(|| {
            sections.push(Section {
                title: Some(pagination.title(&name)),
                rows: Vec::new(),
            });
            sections.len() - 1
        });
        sections[i].rows.push(row);
    }

    sections
}
