//! Ordering compilation: parallel sort arrays to an ORDER BY list.
//!
//! Unlike conditions, an unusable sort entry never ends compilation: fields
//! outside the catalog are skipped and the next entry is considered.

use std::collections::HashSet;
use std::fmt;

use super::names::resolve;
use crate::model::FieldSet;
use crate::sql::{field, ExprExt, OrderByExpr, SortDir};

/// One ORDER BY term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortTerm {
    /// Field reference as written in the definition.
    pub field: String,
    /// Resolved identifier.
    pub name: String,
    pub dir: SortDir,
    /// Coerced so string-stored numbers order by magnitude.
    pub numeric: bool,
}

impl SortTerm {
    pub fn to_order_by(&self) -> OrderByExpr {
        let mut expr = field(&self.field);
        if self.numeric {
            expr = expr.numeric();
        }
        OrderByExpr {
            expr,
            dir: self.dir,
        }
    }
}

/// The compiled ordering. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderExpr {
    terms: Vec<SortTerm>,
    fallback: bool,
}

impl OrderExpr {
    /// Order by the identity field, ascending.
    pub fn identity(identity: &str) -> Self {
        Self {
            terms: vec![SortTerm {
                field: identity.to_string(),
                name: identity.to_string(),
                dir: SortDir::Asc,
                numeric: false,
            }],
            fallback: true,
        }
    }

    pub fn terms(&self) -> &[SortTerm] {
        &self.terms
    }

    /// Whether no definition entry was usable and the identity order applies.
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    pub fn to_order_by(&self) -> Vec<OrderByExpr> {
        self.terms.iter().map(SortTerm::to_order_by).collect()
    }
}

impl fmt::Display for OrderExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, term) in self.terms.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(&term.name)?;
            if term.numeric {
                f.write_str(" + 0")?;
            }
            write!(f, " {}", term.dir.as_str())?;
        }
        Ok(())
    }
}

/// Compile aligned sort arrays into an ordering.
///
/// `numeric_fields` may name fields in dotted or resolved form.
pub fn compile_sort(
    allowed: &FieldSet,
    sort_fields: &[String],
    sort_dirs: &[String],
    numeric_fields: &[String],
    identity: &str,
) -> OrderExpr {
    let numeric: HashSet<String> = numeric_fields.iter().map(|f| resolve(f)).collect();
    let mut dir = SortDir::Asc;
    let mut terms = Vec::new();

    for (i, field_ref) in sort_fields.iter().enumerate() {
        if !allowed.contains(field_ref) {
            tracing::debug!(index = i, field = %field_ref, "sort field not in catalog, skipped");
            continue;
        }

        match sort_dirs.get(i).map(String::as_str) {
            Some("ASC") => dir = SortDir::Asc,
            Some("DESC") => dir = SortDir::Desc,
            _ => {}
        }

        let name = resolve(field_ref);
        terms.push(SortTerm {
            field: field_ref.clone(),
            numeric: numeric.contains(&name),
            name,
            dir,
        });
    }

    if terms.is_empty() {
        return OrderExpr::identity(identity);
    }

    OrderExpr {
        terms,
        fallback: false,
    }
}
