//! Report rendering.
//!
//! A [`ReportFormatter`] turns a [`ReportContext`] into text. Formatters are
//! looked up by format name in a [`FormatterRegistry`]. Formats with no
//! formatter of their own render through another one and are converted
//! afterwards (`pdf` renders as `html`, see [`render_format_for`]).

mod convert;
mod csv;
mod html;

pub use convert::{CommandConverter, ConvertError, ConvertResult, ConvertTarget, Converter};
pub use self::csv::CsvFormatter;
pub use html::HtmlFormatter;

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::compile::{resolve, HeaderMap};
use crate::model::{Row, Value, ValueFormat};
use crate::postprocess::{ProcessedReport, ROW_TOTAL_COLUMN};

/// Formats rendered through another format, then converted.
const CONVERSION_FORMATS: [(&str, &str); 1] = [("pdf", "html")];

/// Label of the per-row sum column when the definition gives none.
pub const ROW_TOTAL_LABEL: &str = "Total";

/// The format a requested format is rendered in, and whether it is converted after.
pub fn render_format_for(format: &str) -> (&str, bool) {
    CONVERSION_FORMATS
        .iter()
        .find(|(from, _)| from.eq_ignore_ascii_case(format))
        .map(|(_, to)| (*to, true))
        .unwrap_or((format, false))
}

/// Everything a formatter may show.
#[derive(Debug, Clone)]
pub struct ReportContext {
    pub title: String,
    pub description: String,
    /// The format that was requested, before any conversion.
    pub format: String,
    pub generated_at: DateTime<Utc>,
    pub headers: HeaderMap,
    pub report: ProcessedReport,
    /// Display formats keyed by row key.
    formats: HashMap<String, ValueFormat>,
}

impl ReportContext {
    pub fn new(title: &str, format: &str, headers: HeaderMap, report: ProcessedReport) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            format: format.into(),
            generated_at: Utc::now(),
            headers,
            report,
            formats: HashMap::new(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_generated_at(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = at;
        self
    }

    /// Attach display formats keyed by field reference.
    pub fn with_formats(mut self, formats: HashMap<String, ValueFormat>) -> Self {
        self.formats = formats
            .into_iter()
            .map(|(field, fmt)| (resolve(&field), fmt))
            .collect();
        self
    }

    /// Displayed columns as (row key, label).
    ///
    /// Without headers (nothing selected) the first row's columns are shown
    /// under their own names. The row total column is appended when present.
    pub fn columns(&self) -> Vec<(String, String)> {
        let mut columns: Vec<(String, String)> = if self.headers.is_empty() {
            self.rows()
                .next()
                .map(|row| {
                    row.columns()
                        .filter(|c| *c != ROW_TOTAL_COLUMN)
                        .map(|c| (c.to_string(), c.to_string()))
                        .collect()
                })
                .unwrap_or_default()
        } else {
            self.headers
                .iter()
                .map(|(k, l)| (k.to_string(), l.to_string()))
                .collect()
        };

        let has_row_total = self.rows().any(|r| r.get(ROW_TOTAL_COLUMN).is_some());
        if has_row_total && !columns.iter().any(|(k, _)| k == ROW_TOTAL_COLUMN) {
            columns.push((ROW_TOTAL_COLUMN.into(), ROW_TOTAL_LABEL.into()));
        }
        columns
    }

    /// Display text of one cell.
    pub fn cell(&self, row: &Row, key: &str) -> String {
        match row.get(key) {
            None => String::new(),
            Some(value) => self.display(key, value),
        }
    }

    fn display(&self, key: &str, value: &Value) -> String {
        if value.is_empty() {
            return String::new();
        }
        match self.formats.get(key) {
            Some(fmt) => fmt.apply(value),
            None => value.to_string(),
        }
    }

    /// Whether sections carry titles.
    pub fn is_paginated(&self) -> bool {
        self.report.sections.iter().any(|s| s.title.is_some())
    }

    fn rows(&self) -> impl Iterator<Item = &Row> {
        self.report.sections.iter().flat_map(|s| s.rows.iter())
    }
}

/// Errors raised while rendering a report.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("Failed writing report text: {0}")]
    Write(#[from] std::fmt::Error),

    #[error("Failed writing CSV: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("Failed flushing CSV: {0}")]
    Flush(#[source] std::io::Error),

    #[error("CSV output is not UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

pub type FormatResult<T> = Result<T, FormatError>;

/// Renders a report context into one output format.
pub trait ReportFormatter {
    fn format(&self, ctx: &ReportContext) -> FormatResult<String>;
}

/// Format name to formatter.
#[derive(Default)]
pub struct FormatterRegistry {
    formatters: HashMap<String, Box<dyn ReportFormatter + Send + Sync>>,
}

impl FormatterRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the `html` and `csv` formatters.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("html", HtmlFormatter);
        registry.register("csv", CsvFormatter);
        registry
    }

    pub fn register(&mut self, name: &str, formatter: impl ReportFormatter + Send + Sync + 'static) {
        self.formatters
            .insert(name.to_ascii_lowercase(), Box::new(formatter));
    }

    pub fn get(&self, name: &str) -> Option<&(dyn ReportFormatter + Send + Sync)> {
        self.formatters
            .get(&name.to_ascii_lowercase())
            .map(|f| f.as_ref())
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.formatters.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for FormatterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatterRegistry")
            .field("formats", &self.names())
            .finish()
    }
}
