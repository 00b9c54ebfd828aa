//! SQLite SQL dialect.
//!
//! SQLite is the dialect of the bundled data source:
//! - ANSI identifier quoting (`"`)
//! - Type affinity makes `expr + 0` a numeric conversion

use super::helpers;
use super::SqlDialect;

/// SQLite SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct Sqlite;

impl SqlDialect for Sqlite {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_double(ident)
    }

    // Uses default emit_numeric_coercion (expr + 0)
}
