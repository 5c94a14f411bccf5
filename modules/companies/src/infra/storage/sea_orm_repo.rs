//! SeaORM-backed repository implementations for the domain ports.
//!
//! Generic over `C: ConnectionTrait + TransactionTrait`, so they work with a
//! `DatabaseConnection` or inside an outer transaction.

use anyhow::Context;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QuerySelect, Select, TransactionTrait,
};
use shaping_core::OrderExpression;
use uuid::Uuid;

use crate::contract::model::{Company, Employee};
use crate::domain::repo::{
    CompaniesRepository, CompanyFilter, EmployeeFilter, EmployeesRepository, PageRequest,
};
use crate::infra::storage::entity::{company, employee};
use crate::infra::storage::order::{
    company_columns, employee_columns, ColumnMap, OrderExpressionExt,
};

fn search_pattern(term: &Option<String>) -> Option<String> {
    term.as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| format!("%{}%", t.to_lowercase()))
}

fn company_query(filter: &CompanyFilter) -> Select<company::Entity> {
    let mut q = company::Entity::find();
    if let Some(pattern) = search_pattern(&filter.search_term) {
        q = q.filter(
            sea_orm::sea_query::Expr::expr(sea_orm::sea_query::Func::lower(
                sea_orm::sea_query::Expr::col((company::Entity, company::Column::Name)),
            ))
            .like(pattern),
        );
    }
    q
}

fn employee_query(filter: &EmployeeFilter) -> Select<employee::Entity> {
    let mut cond = Condition::all()
        .add(employee::Column::CompanyId.eq(filter.company_id))
        .add(employee::Column::Age.between(filter.age.min, filter.age.max));
    if let Some(pattern) = search_pattern(&filter.search_term) {
        cond = cond.add(
            sea_orm::sea_query::Expr::expr(sea_orm::sea_query::Func::lower(
                sea_orm::sea_query::Expr::col((employee::Entity, employee::Column::Name)),
            ))
            .like(pattern),
        );
    }
    employee::Entity::find().filter(cond)
}

fn paged<E: EntityTrait>(
    q: Select<E>,
    order: &OrderExpression,
    columns: &ColumnMap<E>,
    page: PageRequest,
) -> Select<E> {
    q.apply_order_expression(order, columns)
        .offset(page.offset())
        .limit(u64::from(page.page_size))
}

/// Companies repository. Holds a connection object; its lifetime/ownership is up to the caller.
pub struct SeaOrmCompaniesRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync,
{
    conn: C,
    columns: ColumnMap<company::Entity>,
}

impl<C> SeaOrmCompaniesRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self {
            conn,
            columns: company_columns(),
        }
    }
}

#[async_trait::async_trait]
impl<C> CompaniesRepository for SeaOrmCompaniesRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync + 'static,
{
    async fn fetch_page(
        &self,
        filter: &CompanyFilter,
        order: &OrderExpression,
        page: PageRequest,
    ) -> anyhow::Result<Vec<Company>> {
        let rows = paged(company_query(filter), order, &self.columns, page)
            .all(&self.conn)
            .await
            .context("fetch_page failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count(&self, filter: &CompanyFilter) -> anyhow::Result<u64> {
        company_query(filter)
            .count(&self.conn)
            .await
            .context("count failed")
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Company>> {
        let found = company::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("find_by_id failed")?;
        Ok(found.map(Into::into))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> anyhow::Result<Vec<Company>> {
        let rows = company::Entity::find()
            .filter(company::Column::Id.is_in(ids.iter().copied()))
            .all(&self.conn)
            .await
            .context("find_by_ids failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn insert(&self, companies: Vec<(Company, Vec<Employee>)>) -> anyhow::Result<()> {
        let txn = self.conn.begin().await.context("begin failed")?;
        for (company, employees) in companies {
            company::ActiveModel::from(company)
                .insert(&txn)
                .await
                .context("insert company failed")?;
            if !employees.is_empty() {
                employee::Entity::insert_many(employees.into_iter().map(employee::ActiveModel::from))
                    .exec(&txn)
                    .await
                    .context("insert employees failed")?;
            }
        }
        txn.commit().await.context("commit failed")?;
        Ok(())
    }

    async fn update(&self, company: Company, new_employees: Vec<Employee>) -> anyhow::Result<()> {
        let txn = self.conn.begin().await.context("begin failed")?;
        company::ActiveModel::from(company)
            .update(&txn)
            .await
            .context("update company failed")?;
        if !new_employees.is_empty() {
            employee::Entity::insert_many(new_employees.into_iter().map(employee::ActiveModel::from))
                .exec(&txn)
                .await
                .context("insert employees failed")?;
        }
        txn.commit().await.context("commit failed")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let txn = self.conn.begin().await.context("begin failed")?;
        // Explicit so the cascade does not depend on the foreign_keys pragma.
        employee::Entity::delete_many()
            .filter(employee::Column::CompanyId.eq(id))
            .exec(&txn)
            .await
            .context("delete employees failed")?;
        let res = company::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .context("delete company failed")?;
        txn.commit().await.context("commit failed")?;
        Ok(res.rows_affected > 0)
    }
}

/// Employees repository.
pub struct SeaOrmEmployeesRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
    columns: ColumnMap<employee::Entity>,
}

impl<C> SeaOrmEmployeesRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self {
            conn,
            columns: employee_columns(),
        }
    }
}

#[async_trait::async_trait]
impl<C> EmployeesRepository for SeaOrmEmployeesRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn fetch_page(
        &self,
        filter: &EmployeeFilter,
        order: &OrderExpression,
        page: PageRequest,
    ) -> anyhow::Result<Vec<Employee>> {
        let rows = paged(employee_query(filter), order, &self.columns, page)
            .all(&self.conn)
            .await
            .context("fetch_page failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count(&self, filter: &EmployeeFilter) -> anyhow::Result<u64> {
        employee_query(filter)
            .count(&self.conn)
            .await
            .context("count failed")
    }

    async fn find(&self, company_id: Uuid, id: Uuid) -> anyhow::Result<Option<Employee>> {
        let found = employee::Entity::find_by_id(id)
            .filter(employee::Column::CompanyId.eq(company_id))
            .one(&self.conn)
            .await
            .context("find failed")?;
        Ok(found.map(Into::into))
    }

    async fn insert(&self, e: Employee) -> anyhow::Result<()> {
        let _ = employee::ActiveModel::from(e)
            .insert(&self.conn)
            .await
            .context("insert failed")?;
        Ok(())
    }

    async fn update(&self, e: Employee) -> anyhow::Result<()> {
        let _ = employee::ActiveModel::from(e)
            .update(&self.conn)
            .await
            .context("update failed")?;
        Ok(())
    }

    async fn delete(&self, company_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let res = employee::Entity::delete_many()
            .filter(employee::Column::Id.eq(id))
            .filter(employee::Column::CompanyId.eq(company_id))
            .exec(&self.conn)
            .await
            .context("delete failed")?;
        Ok(res.rows_affected > 0)
    }
}
