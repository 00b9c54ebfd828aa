//! Managed storage for generated report files.
//!
//! Generated files live under `advanced-reports/<report id>/<owner id>`,
//! with `preview` standing in for the report id of a preview. A file is
//! copied in from wherever it was rendered; the copy is what a
//! [`ReportRecord`](crate::model::ReportRecord) points at.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::model::ReportFormat;

/// Top-level folder for generated reports.
pub const REPORTS_FOLDER: &str = "advanced-reports";

/// Folder segment used when no report id is known.
pub const PREVIEW_FOLDER: &str = "preview";

static SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" +").unwrap());
static UNSAFE_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9.+_\-]").unwrap());

/// Errors from managed storage.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Failed to create folder {path}: {source}")]
    CreateFolder {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to copy {from} into storage: {source}")]
    Copy {
        from: PathBuf,
        source: std::io::Error,
    },

    #[error("Source file {0} does not exist")]
    MissingSource(PathBuf),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// A file held in managed storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Path relative to the storage root.
    pub path: PathBuf,
    pub full_path: PathBuf,
    pub size: u64,
}

/// Where generated reports are kept.
pub trait ReportStorage {
    /// Relative folder for a report instance, created if needed.
    fn folder(&self, report_id: Option<u64>, owner_id: u64) -> StorageResult<PathBuf>;

    /// Copy `source` into `folder` as `name`, replacing any existing file.
    fn store(&self, folder: &Path, name: &str, source: &Path) -> StorageResult<StoredFile>;
}

/// Storage in a plain directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ReportStorage for FsStorage {
    fn folder(&self, report_id: Option<u64>, owner_id: u64) -> StorageResult<PathBuf> {
        let report = report_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| PREVIEW_FOLDER.to_string());
        let folder = Path::new(REPORTS_FOLDER)
            .join(report)
            .join(owner_id.to_string());

        let full = self.root.join(&folder);
        fs::create_dir_all(&full).map_err(|source| StorageError::CreateFolder {
            path: full.clone(),
            source,
        })?;
        Ok(folder)
    }

    fn store(&self, folder: &Path, name: &str, source: &Path) -> StorageResult<StoredFile> {
        if !source.exists() {
            return Err(StorageError::MissingSource(source.to_path_buf()));
        }

        let path = folder.join(name);
        let full_path = self.root.join(&path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).map_err(|source| StorageError::CreateFolder {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let size = fs::copy(source, &full_path).map_err(|e| StorageError::Copy {
            from: source.to_path_buf(),
            source: e,
        })?;
        tracing::info!(path = %full_path.display(), size, "stored report file");

        Ok(StoredFile {
            path,
            full_path,
            size,
        })
    }
}

/// File name for a generated report.
///
/// Runs of spaces become `-` and anything outside `[A-Za-z0-9.+_-]` is
/// dropped. A title with nothing left is named `report`.
pub fn report_file_name(title: &str, format: ReportFormat) -> String {
    let dashed = SPACES.replace_all(title.trim(), "-");
    let safe = UNSAFE_CHARS.replace_all(&dashed, "");
    let stem = if safe.is_empty() { "report" } else { safe.as_ref() };
    format!("{}.{}", stem, format)
}
