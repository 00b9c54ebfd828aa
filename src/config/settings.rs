//! TOML-based configuration for folio.
//!
//! Supports a config file (folio.toml) with environment variable expansion
//! in path and command values.
//!
//! Example configuration:
//! ```toml
//! [report]
//! dialect = "sqlite"
//! default_format = "html"
//! temp_dir = "/var/tmp/folio"
//!
//! [storage]
//! root = "${HOME}/assets"
//!
//! [source]
//! database = "./data/site.db"
//!
//! [converter]
//! command = "wkhtmltopdf"
//! args = ["--quiet", "{input}", "{output}"]
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::format::CommandConverter;
use crate::model::{ReportFormat, UnknownFormat};
use crate::sql::{Dialect, UnknownDialect};

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error(transparent)]
    Dialect(#[from] UnknownDialect),

    #[error(transparent)]
    Format(#[from] UnknownFormat),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub report: ReportSettings,
    pub storage: StorageSettings,
    pub source: SourceSettings,
    pub converter: ConverterSettings,
}

/// Report generation defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReportSettings {
    /// SQL dialect used when printing compiled queries.
    pub dialect: String,

    /// Format used when none is requested.
    pub default_format: String,

    /// Where temp report files are written. Defaults to the system temp dir.
    pub temp_dir: Option<String>,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            dialect: "sqlite".to_string(),
            default_format: "html".to_string(),
            temp_dir: None,
        }
    }
}

/// Managed storage for generated reports.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageSettings {
    pub root: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            root: "./assets".to_string(),
        }
    }
}

/// Default data source.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SourceSettings {
    /// SQLite database path.
    pub database: Option<String>,
}

/// External HTML-to-PDF program.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConverterSettings {
    pub command: String,

    /// Arguments; `{input}` and `{output}` are replaced by file paths.
    pub args: Vec<String>,
}

impl Default for ConverterSettings {
    fn default() -> Self {
        Self {
            command: "wkhtmltopdf".to_string(),
            args: vec!["--quiet".to_string()],
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `FOLIO_CONFIG`
    /// 2. `./folio.toml`
    /// 3. `~/.config/folio/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("FOLIO_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("folio.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("folio").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }

    pub fn dialect(&self) -> Result<Dialect, SettingsError> {
        Ok(self.report.dialect.parse()?)
    }

    pub fn default_format(&self) -> Result<ReportFormat, SettingsError> {
        Ok(self.report.default_format.parse()?)
    }

    /// Temp directory with environment variables expanded.
    pub fn temp_dir(&self) -> Result<PathBuf, SettingsError> {
        match &self.report.temp_dir {
            Some(dir) => Ok(PathBuf::from(expand_env_vars(dir)?)),
            None => Ok(env::temp_dir()),
        }
    }

    /// Storage root with environment variables expanded.
    pub fn storage_root(&self) -> Result<PathBuf, SettingsError> {
        Ok(PathBuf::from(expand_env_vars(&self.storage.root)?))
    }

    /// Database path with environment variables expanded, if one is set.
    pub fn database(&self) -> Result<Option<PathBuf>, SettingsError> {
        self.source
            .database
            .as_deref()
            .map(|db| expand_env_vars(db).map(PathBuf::from))
            .transpose()
    }

    /// The configured PDF converter, working in the temp directory.
    pub fn converter(&self) -> Result<CommandConverter, SettingsError> {
        let args = self
            .converter
            .args
            .iter()
            .map(|a| expand_env_vars(a))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(CommandConverter::new(&expand_env_vars(&self.converter.command)?)
            .with_args(args)
            .with_work_dir(&self.temp_dir()?))
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax. `{input}`-style placeholders
/// without a leading `$` are left alone.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let var_name: String = if chars.peek() == Some(&'{') {
            chars.next(); // consume '{'
            chars.by_ref().take_while(|&ch| ch != '}').collect()
        } else {
            // $VAR (ends at non-alphanumeric/underscore)
            let mut name = String::new();
            while let Some(ch) = chars.next_if(|ch| ch.is_alphanumeric() || *ch == '_') {
                name.push(ch);
            }
            if name.is_empty() {
                // Just a lone $, keep it
                result.push('$');
                continue;
            }
            name
        };

        let value =
            env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
        result.push_str(&value);
    }

    Ok(result)
}
