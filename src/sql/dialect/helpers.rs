//! Shared helper functions for SQL dialect implementations.
//!
//! This module provides reusable building blocks that dialects can compose
//! to implement the `SqlDialect` trait with minimal duplication.

use super::super::token::{Token, TokenStream};

// =============================================================================
// Identifier Quoting
// =============================================================================

/// Quote identifier with double quotes (ANSI style).
/// Used by: Postgres, DuckDB, SQLite
pub fn quote_double(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote identifier with backticks.
/// Used by: MySQL
pub fn quote_backtick(ident: &str) -> String {
    format!("`{}`", ident.replace('`', "``"))
}

/// Quote identifier with square brackets.
/// Used by: T-SQL (SQL Server, Azure Synapse)
pub fn quote_bracket(ident: &str) -> String {
    format!("[{}]", ident.replace(']', "]]"))
}

// =============================================================================
// String Quoting
// =============================================================================

/// Quote string with single quotes (standard SQL).
/// Used by: All dialects
pub fn quote_string_single(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Quote string with backslash escaping as well as doubled quotes.
/// Used by: MySQL (backslash is an escape character unless NO_BACKSLASH_ESCAPES)
pub fn quote_string_backslash(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "''"))
}

/// Quote string with N prefix for Unicode (T-SQL).
/// Used by: T-SQL for non-ASCII strings
pub fn quote_string_unicode(s: &str) -> String {
    format!("N'{}'", s.replace('\'', "''"))
}

// =============================================================================
// Numeric Coercion
// =============================================================================

/// `expr + 0` - implicit string-to-number conversion.
/// Used by: MySQL, SQLite
pub fn emit_numeric_coercion_additive(expr: &TokenStream) -> TokenStream {
    let mut ts = TokenStream::new();
    ts.append(expr)
        .space()
        .push(Token::Plus)
        .space()
        .push(Token::LitInt(0));
    ts
}

/// `CAST(expr AS <type>)`.
/// Used by: Postgres
pub fn emit_numeric_coercion_cast(expr: &TokenStream, type_name: &'static str) -> TokenStream {
    emit_cast(Token::Cast, expr, type_name)
}

/// `TRY_CAST(expr AS <type>)` - non-numeric strings become NULL instead of failing.
/// Used by: DuckDB, T-SQL
pub fn emit_numeric_coercion_try_cast(expr: &TokenStream, type_name: &'static str) -> TokenStream {
    emit_cast(Token::TryCast, expr, type_name)
}

fn emit_cast(keyword: Token, expr: &TokenStream, type_name: &'static str) -> TokenStream {
    let mut ts = TokenStream::new();
    ts.push(keyword)
        .lparen()
        .append(expr)
        .space()
        .push(Token::As)
        .space()
        .push(Token::TypeName(type_name))
        .rparen();
    ts
}
