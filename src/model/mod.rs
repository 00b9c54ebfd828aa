//! Report model types: definitions, catalogs and result values.

pub mod catalog;
pub mod definition;
pub mod value;

pub use catalog::{CatalogField, FieldCatalog, FieldSet, JoinSpec, StaticCatalog};
pub use definition::{
    DefinitionError, DefinitionFile, DefinitionResult, ReportDefinition, ReportFormat,
    ReportRecord, UnknownFormat,
};
pub use value::{Row, Value, ValueFormat};
