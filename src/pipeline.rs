//! Report generation.
//!
//! ```text
//! ReportDefinition ─→ compile ─→ fetch ─→ post-process ─→ ReportContext
//!                                                             │
//!                                     formatter (html, csv) ◄─┘
//!                                             │
//!                           convert (pdf) ◄───┤
//!                                             ▼
//!                              Content │ File │ Streamed
//! ```
//!
//! Every call recomputes from the data source; nothing is cached.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::compile::{compile_definition, CompiledQuery};
use crate::format::{
    render_format_for, ConvertError, ConvertTarget, Converter, FormatError, FormatterRegistry,
    ReportContext,
};
use crate::model::{FieldCatalog, ReportDefinition, ReportFormat, ReportRecord};
use crate::postprocess::{Pagination, PostProcessor};
use crate::source::{DataSource, SourceError};
use crate::storage::{report_file_name, ReportStorage, StorageError, StoredFile};

/// Errors that stop a report from being produced.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Failed to fetch report rows: {0}")]
    Source(#[from] SourceError),

    #[error("Failed formatting report: {0}")]
    Format(#[from] FormatError),

    #[error("Failed converting report: {0}")]
    Convert(#[from] ConvertError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Failed creating report: {0}")]
    Persist(#[source] std::io::Error),

    #[error("Failed writing report to client: {0}")]
    Stream(#[source] std::io::Error),

    #[error("No converter configured for format '{0}'")]
    MissingConverter(String),

    #[error("Report in format '{0}' produced no file")]
    NotStored(String),
}

pub type ReportResult<T> = Result<T, ReportError>;

/// Pipeline stages, as logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Compiling,
    Formatting,
    Converting,
    Storing,
}

/// What one report generation produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportArtifact {
    /// Formatted text.
    Content(String),
    /// Converted bytes.
    Binary(Vec<u8>),
    /// No formatter was registered; the text says so.
    Placeholder(String),
    /// Written to a temp file.
    File(PathBuf),
    /// Written to the caller's sink.
    Streamed,
}

impl ReportArtifact {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, ReportArtifact::Placeholder(_))
    }

    /// Text of the artifact, for content and placeholders.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ReportArtifact::Content(s) | ReportArtifact::Placeholder(s) => Some(s),
            _ => None,
        }
    }
}

/// Where a generated report goes.
pub enum Delivery<'a> {
    /// Return it in memory.
    Inline,
    /// Write it to a uniquely named temp file.
    Store,
    /// Write it to a client sink.
    Stream(&'a mut dyn Write),
}

/// Turns definitions for one report kind into formatted output.
pub struct ReportPipeline<C: FieldCatalog, S: DataSource> {
    catalog: C,
    source: S,
    formatters: FormatterRegistry,
    converter: Option<Box<dyn Converter>>,
    temp_dir: PathBuf,
}

impl<C: FieldCatalog, S: DataSource> ReportPipeline<C, S> {
    /// A pipeline with the default formatters and no converter.
    pub fn new(catalog: C, source: S) -> Self {
        Self {
            catalog,
            source,
            formatters: FormatterRegistry::with_defaults(),
            converter: None,
            temp_dir: std::env::temp_dir(),
        }
    }

    pub fn with_formatters(mut self, formatters: FormatterRegistry) -> Self {
        self.formatters = formatters;
        self
    }

    pub fn with_converter(mut self, converter: Box<dyn Converter>) -> Self {
        self.converter = Some(converter);
        self
    }

    pub fn with_temp_dir(mut self, dir: &Path) -> Self {
        self.temp_dir = dir.to_path_buf();
        self
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn compile(&self, def: &ReportDefinition) -> CompiledQuery {
        compile_definition(&self.catalog, def)
    }

    /// Fetch and post-process rows into what a formatter renders.
    pub fn prepare(&self, def: &ReportDefinition, format: &str) -> ReportResult<ReportContext> {
        tracing::debug!(stage = ?Stage::Compiling, report = %def.title, format, "report stage");
        let compiled = self.compile(def);
        let rows = self.source.fetch(&compiled)?;

        let pagination = compiled.paginate_key.clone().map(|key| Pagination {
            key,
            header: def.page_header.clone(),
        });
        let report = PostProcessor::from_definition(def).process(rows, pagination.as_ref());

        Ok(
            ReportContext::new(&def.title, format, compiled.headers, report)
                .with_description(&def.description)
                .with_formats(self.catalog.field_formats()),
        )
    }

    /// Generate a report in `format` and deliver it.
    ///
    /// An unregistered format yields [`ReportArtifact::Placeholder`] whatever
    /// the delivery; a placeholder is never converted, stored or streamed.
    pub fn create_report(
        &self,
        def: &ReportDefinition,
        format: &str,
        delivery: Delivery<'_>,
    ) -> ReportResult<ReportArtifact> {
        let ctx = self.prepare(def, format)?;
        let (render_format, needs_conversion) = render_format_for(format);

        tracing::debug!(stage = ?Stage::Formatting, render_format, "report stage");
        let Some(formatter) = self.formatters.get(render_format) else {
            tracing::warn!(format, "no formatter registered, returning placeholder");
            return Ok(ReportArtifact::Placeholder(format!(
                "Formatter for {} not found!",
                format
            )));
        };
        let content = formatter.format(&ctx)?;

        if needs_conversion {
            return self.convert(&content, format, delivery);
        }

        match delivery {
            Delivery::Inline => Ok(ReportArtifact::Content(content)),
            Delivery::Store => {
                tracing::debug!(stage = ?Stage::Storing, "report stage");
                self.write_temp(&content, format).map(ReportArtifact::File)
            }
            Delivery::Stream(sink) => {
                sink.write_all(content.as_bytes())
                    .and_then(|_| sink.flush())
                    .map_err(ReportError::Stream)?;
                Ok(ReportArtifact::Streamed)
            }
        }
    }

    /// Generate a report into managed storage and point the record at it.
    ///
    /// The record is updated only once the file is in place. A failure after
    /// the copy leaves the stored file behind.
    pub fn generate_report(
        &self,
        record: &mut ReportRecord,
        format: ReportFormat,
        storage: &dyn ReportStorage,
    ) -> ReportResult<StoredFile> {
        let temp = match self.create_report(&record.definition, format.as_str(), Delivery::Store)? {
            ReportArtifact::File(path) => path,
            _ => return Err(ReportError::NotStored(format.to_string())),
        };

        let name = report_file_name(&record.definition.title, format);
        let folder = storage.folder(record.report_id, record.id)?;
        let stored = storage.store(&folder, &name, &temp);

        if let Err(e) = fs::remove_file(&temp) {
            tracing::warn!(path = %temp.display(), error = %e, "failed to remove temp report");
        }

        let stored = stored?;
        record.set_file(format, stored.path.clone());
        Ok(stored)
    }

    fn convert(
        &self,
        html: &str,
        format: &str,
        delivery: Delivery<'_>,
    ) -> ReportResult<ReportArtifact> {
        let converter = self
            .converter
            .as_ref()
            .ok_or_else(|| ReportError::MissingConverter(format.to_string()))?;
        tracing::debug!(stage = ?Stage::Converting, format, "report stage");

        match delivery {
            Delivery::Inline => {
                let mut bytes = Vec::new();
                converter.convert(html, ConvertTarget::Browser(&mut bytes))?;
                Ok(ReportArtifact::Binary(bytes))
            }
            Delivery::Store => converter
                .convert(html, ConvertTarget::Store(&self.temp_dir))?
                .map(ReportArtifact::File)
                .ok_or_else(|| ReportError::NotStored(format.to_string())),
            Delivery::Stream(sink) => {
                converter.convert(html, ConvertTarget::Browser(sink))?;
                Ok(ReportArtifact::Streamed)
            }
        }
    }

    fn write_temp(&self, content: &str, format: &str) -> ReportResult<PathBuf> {
        let mut file = tempfile::Builder::new()
            .prefix(format)
            .suffix(&format!(".{}", format))
            .tempfile_in(&self.temp_dir)
            .map_err(ReportError::Persist)?;
        file.write_all(content.as_bytes())
            .map_err(ReportError::Persist)?;

        let path = file
            .into_temp_path()
            .keep()
            .map_err(|e| ReportError::Persist(e.error))?;
        tracing::debug!(path = %path.display(), "report written to temp file");
        Ok(path)
    }
}
