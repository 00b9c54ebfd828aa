//! Configuration module for folio.
//!
//! Handles the settings file and environment variable expansion.

mod settings;

pub use settings::{
    expand_env_vars, ConverterSettings, ReportSettings, Settings, SettingsError, SourceSettings,
    StorageSettings,
};
