//! HTML to PDF conversion through an external program.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Error from a conversion.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("I/O error during conversion: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to start converter '{command}': {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("Converter '{command}' exited with {status}: {stderr}")]
    Failed {
        command: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("Failed to keep converted file: {0}")]
    Persist(#[from] tempfile::PathPersistError),
}

pub type ConvertResult<T> = Result<T, ConvertError>;

/// Where converted output goes.
pub enum ConvertTarget<'a> {
    /// Write a uniquely named file into this directory and return its path.
    Store(&'a Path),
    /// Write the converted bytes to a client sink.
    Browser(&'a mut dyn Write),
}

/// Turns rendered HTML into a document format.
pub trait Converter {
    /// Returns the stored path for [`ConvertTarget::Store`], `None` otherwise.
    fn convert(&self, html: &str, target: ConvertTarget<'_>) -> ConvertResult<Option<PathBuf>>;
}

/// Runs an external HTML-to-PDF program such as `wkhtmltopdf`.
///
/// `{input}` and `{output}` in `args` are replaced by the HTML and PDF paths;
/// when neither appears, the two paths are appended in that order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandConverter {
    pub command: String,
    pub args: Vec<String>,
    /// Directory for intermediate files.
    pub work_dir: PathBuf,
}

impl CommandConverter {
    pub fn new(command: &str) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            work_dir: std::env::temp_dir(),
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn with_work_dir(mut self, dir: &Path) -> Self {
        self.work_dir = dir.to_path_buf();
        self
    }

    fn arguments(&self, input: &Path, output: &Path) -> Vec<String> {
        let input = input.display().to_string();
        let output = output.display().to_string();
        let templated = self
            .args
            .iter()
            .any(|a| a.contains("{input}") || a.contains("{output}"));

        let mut args: Vec<String> = self
            .args
            .iter()
            .map(|a| a.replace("{input}", &input).replace("{output}", &output))
            .collect();
        if !templated {
            args.push(input);
            args.push(output);
        }
        args
    }

    fn run(&self, input: &Path, output: &Path) -> ConvertResult<()> {
        let args = self.arguments(input, output);
        tracing::debug!(command = %self.command, ?args, "running converter");

        let result = Command::new(&self.command)
            .args(&args)
            .output()
            .map_err(|source| ConvertError::Spawn {
                command: self.command.clone(),
                source,
            })?;

        if !result.status.success() {
            return Err(ConvertError::Failed {
                command: self.command.clone(),
                status: result.status,
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

impl Converter for CommandConverter {
    fn convert(&self, html: &str, target: ConvertTarget<'_>) -> ConvertResult<Option<PathBuf>> {
        let mut input = tempfile::Builder::new()
            .prefix("folio")
            .suffix(".html")
            .tempfile_in(&self.work_dir)?;
        input.write_all(html.as_bytes())?;
        input.flush()?;

        match target {
            ConvertTarget::Store(dir) => {
                let output = tempfile::Builder::new()
                    .prefix("pdf")
                    .suffix(".pdf")
                    .tempfile_in(dir)?
                    .into_temp_path();
                self.run(input.path(), &output)?;
                let path = output.keep()?;
                tracing::debug!(path = %path.display(), "converted report stored");
                Ok(Some(path))
            }
            ConvertTarget::Browser(sink) => {
                let output = tempfile::Builder::new()
                    .prefix("pdf")
                    .suffix(".pdf")
                    .tempfile_in(&self.work_dir)?
                    .into_temp_path();
                self.run(input.path(), &output)?;
                sink.write_all(&fs::read(&output)?)?;
                sink.flush()?;
                Ok(None)
            }
        }
    }
}
