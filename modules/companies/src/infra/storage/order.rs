//! Turns a resolved [`OrderExpression`] into SQL `ORDER BY` terms.

use std::collections::HashMap;

use sea_orm::{ColumnTrait, EntityTrait, IdenStatic, Order, QueryOrder};
use shaping_core::{OrderExpression, SortDirection};

use super::entity::{company, employee};

/// Canonical field name (case-insensitive) → column.
pub struct ColumnMap<E: EntityTrait> {
    map: HashMap<String, E::Column>,
    tiebreaker: E::Column,
}

impl<E: EntityTrait> ColumnMap<E> {
    /// `tiebreaker` is appended to every ordering that does not already use it.
    pub fn new(tiebreaker: E::Column) -> Self {
        Self {
            map: HashMap::new(),
            tiebreaker,
        }
    }

    pub fn insert(mut self, field: &str, col: E::Column) -> Self {
        self.map.insert(field.to_lowercase(), col);
        self
    }

    pub fn get(&self, field: &str) -> Option<E::Column> {
        self.map.get(&field.to_lowercase()).copied()
    }
}

pub fn company_columns() -> ColumnMap<company::Entity> {
    use company::Column;
    ColumnMap::new(Column::Id)
        .insert("Id", Column::Id)
        .insert("Name", Column::Name)
        .insert("Address", Column::Address)
        .insert("Country", Column::Country)
}

pub fn employee_columns() -> ColumnMap<employee::Entity> {
    use employee::Column;
    ColumnMap::new(Column::Id)
        .insert("Id", Column::Id)
        .insert("Name", Column::Name)
        .insert("Age", Column::Age)
        .insert("Position", Column::Position)
}

pub trait OrderExpressionExt<E: EntityTrait>: Sized {
    fn apply_order_expression(self, order: &OrderExpression, columns: &ColumnMap<E>) -> Self;
}

impl<E> OrderExpressionExt<E> for sea_orm::Select<E>
where
    E: EntityTrait,
    E::Column: ColumnTrait + Copy,
{
    fn apply_order_expression(self, order: &OrderExpression, columns: &ColumnMap<E>) -> Self {
        let mut query = self;
        let mut has_tiebreaker = false;

        for clause in order.clauses() {
            let Some(col) = columns.get(clause.field) else {
                // Schema and column map disagree; sorting on it is impossible.
                tracing::warn!(field = clause.field, "No column for order field, skipped");
                continue;
            };
            has_tiebreaker |= col.as_str() == columns.tiebreaker.as_str();
            let sea_order = match clause.direction {
                SortDirection::Ascending => Order::Asc,
                SortDirection::Descending => Order::Desc,
            };
            query = query.order_by(col, sea_order);
        }

        if !has_tiebreaker {
            query = query.order_by(columns.tiebreaker, Order::Asc);
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};
    use shaping_core::SortDirection::*;

    fn expr(clauses: &[(&'static str, SortDirection)]) -> OrderExpression {
        clauses
            .iter()
            .fold(OrderExpression::empty(), |acc, &(field, dir)| {
                acc.ensure_tiebreaker(field, dir)
            })
    }

    fn sql(order: &OrderExpression) -> String {
        employee::Entity::find()
            .apply_order_expression(order, &employee_columns())
            .build(DbBackend::Sqlite)
            .to_string()
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let cols = employee_columns();
        assert!(matches!(cols.get("age"), Some(employee::Column::Age)));
        assert!(matches!(cols.get("POSITION"), Some(employee::Column::Position)));
        assert!(cols.get("CompanyId").is_none());
        assert!(cols.get("salary").is_none());
    }

    #[test]
    fn test_clauses_render_in_order_with_id_tiebreaker() {
        let order = expr(&[("Age", Descending), ("Name", Ascending)]);
        let sql = sql(&order);
        assert!(
            sql.ends_with(
                r#"ORDER BY "employees"."age" DESC, "employees"."name" ASC, "employees"."id" ASC"#
            ),
            "{sql}"
        );
    }

    #[test]
    fn test_explicit_id_is_not_duplicated() {
        let order = expr(&[("Id", Descending)]);
        let sql = sql(&order);
        assert!(sql.ends_with(r#"ORDER BY "employees"."id" DESC"#), "{sql}");
    }

    #[test]
    fn test_empty_expression_still_orders_by_id() {
        let sql = sql(&OrderExpression::empty());
        assert!(sql.ends_with(r#"ORDER BY "employees"."id" ASC"#), "{sql}");
    }

    #[test]
    fn test_company_columns_cover_declared_fields() {
        let cols = company_columns();
        for field in ["Id", "Name", "Address", "Country"] {
            assert!(cols.get(field).is_some(), "{field}");
        }
    }
}
