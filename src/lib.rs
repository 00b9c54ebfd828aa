//! # folio
//!
//! A declarative reporting engine: stored report definitions compiled to
//! safe multi-dialect SQL, post-processed, and rendered as HTML, CSV or PDF.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │        ReportDefinition          FieldCatalog            │
//! │  (fields, conditions, sort)   (allowed fields, joins)    │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [compile]
//! ┌─────────────────────────────────────────────────────────┐
//! │   CompiledQuery: filter, order, projection, headers      │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [sql + source]
//! ┌─────────────────────────────────────────────────────────┐
//! │                     Rows                                 │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [postprocess]
//! ┌─────────────────────────────────────────────────────────┐
//! │     Sections, blanked columns, row and column totals     │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [format + storage]
//! ┌─────────────────────────────────────────────────────────┐
//! │            HTML │ CSV │ PDF, inline or stored           │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod compile;
pub mod config;
pub mod format;
pub mod model;
pub mod pipeline;
pub mod postprocess;
pub mod source;
pub mod sql;
pub mod storage;

// Re-export SQL submodules at crate level
pub use sql::dialect;
pub use sql::expr;
pub use sql::query;
pub use sql::token;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::compile::{compile_definition, resolve, CompiledQuery, FilterQuoter};
    pub use crate::dialect::{Dialect, SqlDialect};
    pub use crate::expr::{
        // Constructors
        col,
        field,
        lit_int,
        lit_str,
        star,
        table_col,
        // Types
        BinaryOperator,
        Expr,
        ExprExt,
        Literal,
    };
    pub use crate::format::{FormatterRegistry, ReportContext, ReportFormatter};
    pub use crate::model::{
        FieldCatalog, ReportDefinition, ReportFormat, ReportRecord, Row, StaticCatalog, Value,
    };
    pub use crate::pipeline::{Delivery, ReportArtifact, ReportPipeline};
    pub use crate::query::{Join, JoinType, OrderByExpr, Query, SelectExpr, SortDir, TableRef};
    pub use crate::source::{DataSource, SqliteSource};
    pub use crate::storage::{FsStorage, ReportStorage};
    pub use crate::token::{Token, TokenStream};
}

// Also export at crate root for convenience
pub use dialect::Dialect;
pub use model::{FieldCatalog, ReportDefinition};
pub use pipeline::ReportPipeline;
