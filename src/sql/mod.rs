//! SQL generation module.
//!
//! This module provides a type-safe SQL builder that renders report queries
//! for several dialects. It includes:
//!
//! - [`query`] - SELECT query builder
//! - [`expr`] - Expression AST and builder DSL
//! - [`token`] - Token types for SQL generation
//! - [`dialect`] - SQL dialect implementations

pub mod dialect;
pub mod expr;
pub mod query;
pub mod token;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types at the sql module level
pub use dialect::{Dialect, SqlDialect, UnknownDialect};
pub use expr::{
    col, field, lit_int, lit_str, star, table_col, BinaryOperator, Expr, ExprExt,
    Literal,
};
pub use query::{Join, JoinType, OrderByExpr, Query, SelectExpr, SortDir, TableRef};
pub use token::{Token, TokenStream};
