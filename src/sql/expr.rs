//! Expression AST - the core of SQL expression building.
//!
//! This module provides a strongly-typed AST for the expressions a report
//! query needs: column references, literals, comparisons, IN lists and
//! numeric coercion, with exhaustive pattern matching enforced by the compiler.

use super::dialect::{Dialect, SqlDialect};
use super::token::{Token, TokenStream};

// =============================================================================
// Expression AST
// =============================================================================

/// A SQL expression.
///
/// Every variant must be handled in `to_tokens()` - the compiler enforces this.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Column reference: optional_table.column
    Column {
        table: Option<String>,
        column: String,
    },

    /// Literal values
    Literal(Literal),

    /// Binary operation: left op right
    BinaryOp {
        left: Box<Expr>,
        op: BinaryOperator,
        right: Box<Expr>,
    },

    /// IN: expr IN (values...)
    In { expr: Box<Expr>, values: Vec<Expr> },

    /// Coerce a string-stored number so it orders by magnitude.
    ///
    /// Rendering is dialect-specific (`x + 0`, `CAST`, `TRY_CAST`).
    Numeric(Box<Expr>),

    /// Wildcard: *
    Star,
}

/// Literal values.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    String(String),
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    // Comparison
    Eq,
    Ne,
    Lt,
    Gt,
    Lte,
    Gte,
    // Logical
    And,
}

impl Expr {
    /// Convert this expression to a token stream (dialect-agnostic).
    pub fn to_tokens(&self) -> TokenStream {
        self.to_tokens_for_dialect(Dialect::default())
    }

    /// Convert this expression to a token stream for a specific dialect.
    pub fn to_tokens_for_dialect(&self, dialect: Dialect) -> TokenStream {
        let mut ts = TokenStream::new();

        match self {
            Expr::Column { table, column } => {
                if let Some(t) = table {
                    ts.push(Token::Ident(t.clone()));
                    ts.push(Token::Dot);
                }
                ts.push(Token::Ident(column.clone()));
            }

            Expr::Literal(lit) => {
                ts.push(match lit {
                    Literal::Int(n) => Token::LitInt(*n),
                    Literal::String(s) => Token::LitString(s.clone()),
                });
            }

            Expr::BinaryOp { left, op, right } => {
                ts.append(&left.to_tokens_for_dialect(dialect));
                ts.space();
                ts.push(binary_op_to_token(*op));
                ts.space();
                ts.append(&right.to_tokens_for_dialect(dialect));
            }

            Expr::In { expr, values } => {
                // "x IN ()" is invalid SQL; `1 = 0` matches nothing in every dialect
                if values.is_empty() {
                    ts.push(Token::LitInt(1))
                        .space()
                        .push(Token::Eq)
                        .space()
                        .push(Token::LitInt(0));
                } else {
                    ts.append(&expr.to_tokens_for_dialect(dialect));
                    ts.space().push(Token::In).space().lparen();
                    for (i, val) in values.iter().enumerate() {
                        if i > 0 {
                            ts.comma().space();
                        }
                        ts.append(&val.to_tokens_for_dialect(dialect));
                    }
                    ts.rparen();
                }
            }

            Expr::Numeric(inner) => {
                ts.append(&dialect.emit_numeric_coercion(&inner.to_tokens_for_dialect(dialect)));
            }

            Expr::Star => {
                ts.push(Token::Star);
            }
        }

        ts
    }

    /// Render this expression as SQL text for a dialect.
    pub fn to_sql(&self, dialect: Dialect) -> String {
        self.to_tokens_for_dialect(dialect).serialize(dialect)
    }
}

fn binary_op_to_token(op: BinaryOperator) -> Token {
    match op {
        BinaryOperator::Eq => Token::Eq,
        BinaryOperator::Ne => Token::Ne,
        BinaryOperator::Lt => Token::Lt,
        BinaryOperator::Gt => Token::Gt,
        BinaryOperator::Lte => Token::Lte,
        BinaryOperator::Gte => Token::Gte,
        BinaryOperator::And => Token::And,
    }
}

// =============================================================================
// Expression Constructors
// =============================================================================

/// Create a column reference.
pub fn col(name: &str) -> Expr {
    Expr::Column {
        table: None,
        column: name.into(),
    }
}

/// Create a table-qualified column reference.
pub fn table_col(table: &str, column: &str) -> Expr {
    Expr::Column {
        table: Some(table.into()),
        column: column.into(),
    }
}

/// Create a column reference from a report field reference.
///
/// `Table.Field` becomes a qualified column, anything else a bare column.
pub fn field(reference: &str) -> Expr {
    match reference.split_once('.') {
        Some((table, column)) if !table.is_empty() && !column.is_empty() => {
            table_col(table, column)
        }
        _ => col(reference),
    }
}

/// Create an integer literal.
pub fn lit_int(n: i64) -> Expr {
    Expr::Literal(Literal::Int(n))
}

/// Create a string literal.
pub fn lit_str(s: &str) -> Expr {
    Expr::Literal(Literal::String(s.into()))
}

/// Create a `*` wildcard.
pub fn star() -> Expr {
    Expr::Star
}

// =============================================================================
// Expression Builder Trait
// =============================================================================

/// Extension trait for building expressions fluently.
pub trait ExprExt: Sized {
    fn into_expr(self) -> Expr;

    // Comparison operators
    fn eq(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Eq, other.into())
    }

    fn ne(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Ne, other.into())
    }

    fn gt(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Gt, other.into())
    }

    fn gte(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Gte, other.into())
    }

    fn lt(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Lt, other.into())
    }

    fn lte(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Lte, other.into())
    }

    // Logical operators
    fn and(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::And, other.into())
    }

    // IN operator
    fn in_list(self, values: Vec<Expr>) -> Expr {
        Expr::In {
            expr: Box::new(self.into_expr()),
            values,
        }
    }

    /// Order/compare this expression numerically.
    fn numeric(self) -> Expr {
        Expr::Numeric(Box::new(self.into_expr()))
    }

    /// Alias this expression (for SELECT list).
    fn alias(self, name: &str) -> crate::sql::query::SelectExpr {
        crate::sql::query::SelectExpr {
            expr: self.into_expr(),
            alias: Some(name.into()),
        }
    }
}

fn binary(left: Expr, op: BinaryOperator, right: Expr) -> Expr {
    Expr::BinaryOp {
        left: Box::new(left),
        op,
        right: Box::new(right),
    }
}

impl ExprExt for Expr {
    fn into_expr(self) -> Expr {
        self
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<i64> for Expr {
    fn from(n: i64) -> Self {
        lit_int(n)
    }
}

impl From<&str> for Expr {
    fn from(s: &str) -> Self {
        lit_str(s)
    }
}

impl From<String> for Expr {
    fn from(s: String) -> Self {
        Expr::Literal(Literal::String(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_splits_dotted_reference() {
        assert_eq!(field("Member.Surname"), table_col("Member", "Surname"));
        assert_eq!(field("Title"), col("Title"));
        assert_eq!(field(".Title"), col(".Title"));
    }

    #[test]
    fn test_comparison_renders_quoted() {
        let expr = field("Member.Surname").eq("O'Hara");
        assert_eq!(
            expr.to_sql(Dialect::Postgres),
            "\"Member\".\"Surname\" = 'O''Hara'"
        );
    }

    #[test]
    fn test_in_list() {
        let expr = col("Status").in_list(vec![lit_str("Open"), lit_str("Closed")]);
        assert_eq!(
            expr.to_sql(Dialect::MySql),
            "`Status` IN ('Open', 'Closed')"
        );
    }

    #[test]
    fn test_empty_in_list_matches_nothing() {
        let expr = col("Status").in_list(vec![]);
        assert_eq!(expr.to_sql(Dialect::DuckDb), "1 = 0");
        assert_eq!(expr.to_sql(Dialect::TSql), "1 = 0");
    }

    #[test]
    fn test_and_chain() {
        let expr = col("A").eq("1").and(col("B").ne("2"));
        assert_eq!(expr.to_sql(Dialect::Sqlite), "\"A\" = '1' AND \"B\" <> '2'");
    }

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(col("Sort").numeric().to_sql(Dialect::Sqlite), "\"Sort\" + 0");
        assert_eq!(
            col("Sort").numeric().to_sql(Dialect::Postgres),
            "CAST(\"Sort\" AS NUMERIC)"
        );
    }
}
