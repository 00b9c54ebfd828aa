//! PostgreSQL SQL dialect.
//!
//! PostgreSQL features:
//! - ANSI identifier quoting (`"`)
//! - Strict typing: `text + integer` is an error, so numeric sorts need a CAST

use super::helpers;
use super::SqlDialect;
use crate::sql::token::TokenStream;

/// PostgreSQL SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct Postgres;

impl SqlDialect for Postgres {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_double(ident)
    }

    fn emit_numeric_coercion(&self, expr: &TokenStream) -> TokenStream {
        helpers::emit_numeric_coercion_cast(expr, "NUMERIC")
    }
}
