//! Filter compilation: parallel condition arrays to one AND-ed filter.
//!
//! Entries are read in order and the first structurally incomplete one ends
//! the filter: a missing or empty operator or value, or an operator outside
//! the allowed set. A complete entry naming a field the catalog does not
//! offer is dropped on its own and compilation continues.
//!
//! Values never become SQL text here. A [`FilterExpr`] turns into an
//! [`Expr`] whose values are literals, and only a dialect quotes them.

use std::fmt;

use crate::model::FieldSet;
use crate::sql::{field, lit_str, Dialect, Expr, ExprExt};

/// Stored operator keys with their display labels.
pub const ALLOWED_OPERATORS: [(&str, &str); 7] = [
    ("=", "="),
    ("<>", "!="),
    (">=", ">="),
    (">", ">"),
    ("<", "<"),
    ("<=", "<="),
    ("IN", "In List"),
];

/// A comparison operator a condition may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionOp {
    Eq,
    Ne,
    Gte,
    Gt,
    Lt,
    Lte,
    In,
}

impl ConditionOp {
    /// Parse a stored operator. `!=` and `<>` are the same operator.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "=" => Some(ConditionOp::Eq),
            "!=" | "<>" => Some(ConditionOp::Ne),
            ">=" => Some(ConditionOp::Gte),
            ">" => Some(ConditionOp::Gt),
            "<" => Some(ConditionOp::Lt),
            "<=" => Some(ConditionOp::Lte),
            op if op.eq_ignore_ascii_case("IN") => Some(ConditionOp::In),
            _ => None,
        }
    }

    /// Label shown when picking an operator.
    pub fn label(self) -> &'static str {
        match self {
            ConditionOp::Eq => "=",
            ConditionOp::Ne => "!=",
            ConditionOp::Gte => ">=",
            ConditionOp::Gt => ">",
            ConditionOp::Lt => "<",
            ConditionOp::Lte => "<=",
            ConditionOp::In => "In List",
        }
    }
}

impl fmt::Display for ConditionOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConditionOp::Eq => "=",
            ConditionOp::Ne => "<>",
            ConditionOp::Gte => ">=",
            ConditionOp::Gt => ">",
            ConditionOp::Lt => "<",
            ConditionOp::Lte => "<=",
            ConditionOp::In => "IN",
        })
    }
}

/// Right-hand side of a predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionValue {
    Single(String),
    /// Members of an `IN` list, trimmed.
    List(Vec<String>),
}

/// One `field op value` conjunct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub field: String,
    pub op: ConditionOp,
    pub value: ConditionValue,
}

impl Predicate {
    pub fn to_expr(&self) -> Expr {
        let column = field(&self.field);
        match (&self.value, self.op) {
            (ConditionValue::List(members), _) => {
                column.in_list(members.iter().map(|m| lit_str(m)).collect())
            }
            (ConditionValue::Single(v), ConditionOp::Eq) => column.eq(v.as_str()),
            (ConditionValue::Single(v), ConditionOp::Ne) => column.ne(v.as_str()),
            (ConditionValue::Single(v), ConditionOp::Gte) => column.gte(v.as_str()),
            (ConditionValue::Single(v), ConditionOp::Gt) => column.gt(v.as_str()),
            (ConditionValue::Single(v), ConditionOp::Lt) => column.lt(v.as_str()),
            (ConditionValue::Single(v), ConditionOp::Lte) => column.lte(v.as_str()),
            (ConditionValue::Single(v), ConditionOp::In) => column.in_list(vec![lit_str(v)]),
        }
    }
}

/// Conjunction of predicates. Empty means "match everything".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterExpr {
    predicates: Vec<Predicate>,
}

impl FilterExpr {
    /// The filter that matches every row.
    pub fn neutral() -> Self {
        Self::default()
    }

    pub fn is_neutral(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn push(&mut self, predicate: Predicate) {
        self.predicates.push(predicate);
    }

    /// The WHERE expression, or `None` for the neutral filter.
    pub fn to_expr(&self) -> Option<Expr> {
        let mut iter = self.predicates.iter().map(Predicate::to_expr);
        let first = iter.next()?;
        Some(iter.fold(first, |acc, next| acc.and(next)))
    }
}

/// Renders a filter as quoted SQL text.
pub trait FilterQuoter {
    fn quote_filter(&self, filter: &FilterExpr) -> String;
}

impl FilterQuoter for Dialect {
    fn quote_filter(&self, filter: &FilterExpr) -> String {
        match filter.to_expr() {
            Some(expr) => expr.to_sql(*self),
            None => "1 = 1".into(),
        }
    }
}

/// Compile aligned condition arrays into a filter.
pub fn compile_conditions(
    allowed: &FieldSet,
    fields: &[String],
    ops: &[String],
    values: &[String],
) -> FilterExpr {
    let mut filter = FilterExpr::neutral();

    for (i, field_ref) in fields.iter().enumerate() {
        let op_raw = ops.get(i).map(String::as_str).unwrap_or_default();
        let value = values.get(i).map(String::as_str).unwrap_or_default();

        if op_raw.is_empty() || value.is_empty() {
            tracing::debug!(index = i, field = %field_ref, "condition incomplete, stopping");
            break;
        }

        let Some(op) = ConditionOp::parse(op_raw) else {
            tracing::debug!(index = i, op = %op_raw, "unknown condition operator, stopping");
            break;
        };

        if !allowed.contains(field_ref) {
            tracing::debug!(index = i, field = %field_ref, "condition field not in catalog, skipped");
            continue;
        }

        let value = match op {
            ConditionOp::In => ConditionValue::List(
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|m| !m.is_empty())
                    .map(String::from)
                    .collect(),
            ),
            _ => ConditionValue::Single(value.to_string()),
        };

        filter.push(Predicate {
            field: field_ref.clone(),
            op,
            value,
        });
    }

    filter
}
