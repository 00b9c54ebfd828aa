//! Report definition compilation.
//!
//! A [`ReportDefinition`] is loose, positional configuration. Compilation
//! checks every field reference against the report's [`FieldCatalog`] and
//! produces a [`CompiledQuery`]:
//!
//! ```text
//! ReportDefinition ──┬─ conditions ─→ FilterExpr
//!   + FieldCatalog   ├─ sort ───────→ OrderExpr
//!                    └─ selection ──→ Projection + HeaderMap
//!                                         │
//!                                         ▼
//!                                   CompiledQuery ─→ Query ─→ SQL
//! ```
//!
//! Nothing here fails. Unusable entries are skipped or end their list, and
//! are logged at `debug`.

pub mod condition;
pub mod names;
pub mod projection;
pub mod sort;

pub use condition::{
    compile_conditions, ConditionOp, ConditionValue, FilterExpr, FilterQuoter, Predicate,
    ALLOWED_OPERATORS,
};
pub use names::resolve;
pub use projection::{compile_projection, HeaderMap, ProjectedField, Projection};
pub use sort::{compile_sort, OrderExpr, SortTerm};

use crate::model::{FieldCatalog, ReportDefinition};
use crate::sql::{table_col, Dialect, ExprExt, Join, OrderByExpr, Query, TableRef};

/// Everything needed to fetch a report's rows. Rebuilt for every run.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub entity: TableRef,
    pub joins: Vec<Join>,
    pub projection: Projection,
    pub filter: FilterExpr,
    pub order: OrderExpr,
    pub headers: HeaderMap,
    /// Row key of the pagination field, when it is usable.
    pub paginate_key: Option<String>,
}

impl CompiledQuery {
    /// Build the SELECT. An empty projection selects every column.
    pub fn to_query(&self) -> Query {
        let mut query = if self.projection.is_empty() {
            Query::new().select_star()
        } else {
            Query::new().select(self.projection.to_select())
        };

        query = query.from(self.entity.clone());
        for join in &self.joins {
            query = query.join(join.join_type, join.table.clone(), join.on.clone());
        }

        if let Some(filter) = self.filter.to_expr() {
            query = query.filter(filter);
        }

        query.order_by(self.order_by())
    }

    pub fn to_sql(&self, dialect: Dialect) -> String {
        self.to_query().to_sql(dialect)
    }

    fn order_by(&self) -> Vec<OrderByExpr> {
        // The identity column is ambiguous once another table is joined
        if self.order.is_fallback() && !self.joins.is_empty() {
            let qualifier = &self.entity.table;
            return self
                .order
                .terms()
                .iter()
                .map(|t| {
                    let mut expr = table_col(qualifier, &t.field);
                    if t.numeric {
                        expr = expr.numeric();
                    }
                    OrderByExpr { expr, dir: t.dir }
                })
                .collect();
        }
        self.order.to_order_by()
    }
}

/// Compile a definition against its catalog.
pub fn compile_definition<C: FieldCatalog + ?Sized>(
    catalog: &C,
    def: &ReportDefinition,
) -> CompiledQuery {
    let allowed = catalog.fields();

    let filter = compile_conditions(
        &allowed,
        &def.condition_fields,
        &def.condition_operators,
        &def.condition_values,
    );
    let order = compile_sort(
        &allowed,
        &def.sort_fields,
        &def.sort_directions,
        &catalog.numeric_sort_fields(),
        catalog.identity_field(),
    );
    let (mut projection, headers) =
        compile_projection(&allowed, &def.selected_fields, &def.field_headers);

    // Sections need the pagination value even when it is not displayed
    let paginate_key = match def.pagination_field() {
        Some(f) if allowed.contains(f) => {
            let projected = ProjectedField::new(f);
            let key = projected.key().to_string();
            if !projection.is_empty() {
                projection.push(projected);
            } else if projected.alias.is_some() {
                // `*` names a joined column after its own field, not the row key
                projection = Projection::all_columns_with(projected);
            }
            Some(key)
        }
        Some(f) => {
            tracing::debug!(field = %f, "pagination field not in catalog, ignored");
            None
        }
        None => None,
    };

    tracing::debug!(
        report = catalog.report_name(),
        conditions = filter.len(),
        sort_terms = order.terms().len(),
        projected = projection.len(),
        "compiled report definition"
    );

    CompiledQuery {
        entity: catalog.entity(),
        joins: catalog.joins().iter().map(|j| j.to_join()).collect(),
        projection,
        filter,
        order,
        headers,
        paginate_key,
    }
}
