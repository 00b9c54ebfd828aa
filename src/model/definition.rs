//! Stored report definitions and generated report records.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::catalog::StaticCatalog;

/// Error loading a definition file.
#[derive(Debug, thiserror::Error)]
pub enum DefinitionError {
    #[error("Failed to read definition file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse TOML definition: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to parse JSON definition: {0}")]
    Json(#[from] serde_json::Error),
}

pub type DefinitionResult<T> = Result<T, DefinitionError>;

/// A report definition as persisted by whatever edits it.
///
/// The positional sequences are independent and may differ in length.
/// Nothing is validated here; compilation skips what it cannot use.
/// Field names accept the legacy CamelCase keys.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReportDefinition {
    #[serde(alias = "Title")]
    pub title: String,

    #[serde(alias = "Description")]
    pub description: String,

    /// Field references to display, in display order. May be `Table.Field`.
    #[serde(alias = "ReportFields")]
    pub selected_fields: Vec<String>,

    /// Header overrides aligned with `selected_fields`. Empty means "use the label".
    #[serde(alias = "ReportHeaders")]
    pub field_headers: Vec<String>,

    #[serde(alias = "ConditionFields")]
    pub condition_fields: Vec<String>,

    #[serde(alias = "ConditionOps")]
    pub condition_operators: Vec<String>,

    #[serde(alias = "ConditionValues")]
    pub condition_values: Vec<String>,

    /// Field whose value partitions the output into sections.
    #[serde(alias = "PaginateBy")]
    pub paginate_by: Option<String>,

    /// Section title template; `$name` is replaced by the section value.
    #[serde(alias = "PageHeader")]
    pub page_header: String,

    #[serde(alias = "SortBy")]
    pub sort_fields: Vec<String>,

    #[serde(alias = "SortDir")]
    pub sort_directions: Vec<String>,

    #[serde(alias = "ClearColumns")]
    pub clear_columns: Vec<String>,

    #[serde(alias = "AddInRows")]
    pub add_in_rows: Vec<String>,

    #[serde(alias = "AddCols")]
    pub add_cols: Vec<String>,
}

impl Default for ReportDefinition {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            selected_fields: Vec::new(),
            field_headers: Vec::new(),
            condition_fields: Vec::new(),
            condition_operators: Vec::new(),
            condition_values: Vec::new(),
            paginate_by: None,
            page_header: "$name".into(),
            sort_fields: Vec::new(),
            sort_directions: Vec::new(),
            clear_columns: Vec::new(),
            add_in_rows: Vec::new(),
            add_cols: Vec::new(),
        }
    }
}

impl ReportDefinition {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Select a field with an optional header override.
    pub fn select(mut self, field: &str, header: Option<&str>) -> Self {
        self.selected_fields.push(field.into());
        self.field_headers.push(header.unwrap_or_default().into());
        self
    }

    pub fn condition(mut self, field: &str, op: &str, value: &str) -> Self {
        self.condition_fields.push(field.into());
        self.condition_operators.push(op.into());
        self.condition_values.push(value.into());
        self
    }

    pub fn sort(mut self, field: &str, dir: &str) -> Self {
        self.sort_fields.push(field.into());
        self.sort_directions.push(dir.into());
        self
    }

    pub fn paginate(mut self, field: &str, header: &str) -> Self {
        self.paginate_by = Some(field.into());
        self.page_header = header.into();
        self
    }

    /// The pagination field, ignoring a blank entry.
    pub fn pagination_field(&self) -> Option<&str> {
        self.paginate_by.as_deref().filter(|f| !f.trim().is_empty())
    }
}

/// A definition file: the catalog a report runs against plus the report itself.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DefinitionFile {
    pub catalog: StaticCatalog,
    #[serde(default)]
    pub report: ReportDefinition,
}

impl DefinitionFile {
    /// Load from a `.toml` or `.json` file, chosen by extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> DefinitionResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| DefinitionError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::from_json_str(&content),
            _ => Self::from_toml_str(&content),
        }
    }

    pub fn from_toml_str(s: &str) -> DefinitionResult<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_json_str(s: &str) -> DefinitionResult<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

// =============================================================================
// Output formats and generated records
// =============================================================================

/// Output formats a generated report can be stored as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportFormat {
    Html,
    Csv,
    Pdf,
}

impl ReportFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportFormat::Html => "html",
            ReportFormat::Csv => "csv",
            ReportFormat::Pdf => "pdf",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown report format: {0}")]
pub struct UnknownFormat(pub String);

impl FromStr for ReportFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "html" => Ok(ReportFormat::Html),
            "csv" => Ok(ReportFormat::Csv),
            "pdf" => Ok(ReportFormat::Pdf),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

/// A generated report instance.
///
/// `id` identifies the instance (the owner folder in storage). `report_id`
/// links back to the template report it was generated from; a record with
/// none is a preview.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRecord {
    pub id: u64,
    pub report_id: Option<u64>,
    pub definition: ReportDefinition,
    pub html_file: Option<PathBuf>,
    pub csv_file: Option<PathBuf>,
    pub pdf_file: Option<PathBuf>,
}

impl ReportRecord {
    pub fn new(id: u64, definition: ReportDefinition) -> Self {
        Self {
            id,
            report_id: None,
            definition,
            html_file: None,
            csv_file: None,
            pdf_file: None,
        }
    }

    pub fn with_report_id(mut self, report_id: u64) -> Self {
        self.report_id = Some(report_id);
        self
    }

    pub fn file(&self, format: ReportFormat) -> Option<&Path> {
        match format {
            ReportFormat::Html => self.html_file.as_deref(),
            ReportFormat::Csv => self.csv_file.as_deref(),
            ReportFormat::Pdf => self.pdf_file.as_deref(),
        }
    }

    pub fn set_file(&mut self, format: ReportFormat, path: PathBuf) {
        let slot = match format {
            ReportFormat::Html => &mut self.html_file,
            ReportFormat::Csv => &mut self.csv_file,
            ReportFormat::Pdf => &mut self.pdf_file,
        };
        *slot = Some(path);
    }
}
