//! DuckDB SQL dialect.
//!
//! DuckDB is PostgreSQL-compatible with extensions:
//! - ANSI identifier quoting (`"`)
//! - TRY_CAST for safe casting

use super::helpers;
use super::SqlDialect;
use crate::sql::token::TokenStream;

/// DuckDB SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct DuckDb;

impl SqlDialect for DuckDb {
    fn name(&self) -> &'static str {
        "duckdb"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_double(ident)
    }

    fn emit_numeric_coercion(&self, expr: &TokenStream) -> TokenStream {
        // VARCHAR + INTEGER has no implicit cast in DuckDB
        helpers::emit_numeric_coercion_try_cast(expr, "DOUBLE")
    }
}
