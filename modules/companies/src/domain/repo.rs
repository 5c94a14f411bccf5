use async_trait::async_trait;
use shaping_core::{OrderExpression, RangeFilter, RequestParameters};
use uuid::Uuid;

use crate::contract::model::{Company, Employee, EmployeeUpdate, NewEmployee};

/// Which page to fetch. `page_size` is already clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page_number: u32,
    pub page_size: u32,
}

impl PageRequest {
    pub fn new(page_number: u32, page_size: u32) -> Self {
        Self {
            page_number: page_number.max(1),
            page_size: page_size.max(1),
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page_number - 1) * u64::from(self.page_size)
    }
}

impl From<&RequestParameters> for PageRequest {
    fn from(p: &RequestParameters) -> Self {
        Self::new(p.page_number(), p.page_size())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyFilter {
    /// Case-insensitive substring of the name.
    pub search_term: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeFilter {
    pub company_id: Uuid,
    /// Inclusive; callers validate `min <= max` before building the filter.
    pub age: RangeFilter<i32>,
    pub search_term: Option<String>,
}

impl EmployeeFilter {
    pub fn for_company(company_id: Uuid) -> Self {
        Self {
            company_id,
            age: RangeFilter::new(0, i32::MAX),
            search_term: None,
        }
    }
}

/// Persistence port for companies. Object-safe via `async_trait`.
#[async_trait]
pub trait CompaniesRepository: Send + Sync {
    /// One page of companies matching `filter`, sorted by `order`.
    async fn fetch_page(
        &self,
        filter: &CompanyFilter,
        order: &OrderExpression,
        page: PageRequest,
    ) -> anyhow::Result<Vec<Company>>;
    /// Number of companies matching `filter`, regardless of paging.
    async fn count(&self, filter: &CompanyFilter) -> anyhow::Result<u64>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Company>>;
    async fn find_by_ids(&self, ids: &[Uuid]) -> anyhow::Result<Vec<Company>>;
    /// Insert companies together with their initial employees, atomically.
    async fn insert(&self, companies: Vec<(Company, Vec<Employee>)>) -> anyhow::Result<()>;
    /// Replace company fields and add `new_employees`, atomically.
    async fn update(&self, company: Company, new_employees: Vec<Employee>) -> anyhow::Result<()>;
    /// Delete the company and all its employees. Returns true if a row was deleted.
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
}

/// Persistence port for employees, always scoped to one company.
#[async_trait]
pub trait EmployeesRepository: Send + Sync {
    async fn fetch_page(
        &self,
        filter: &EmployeeFilter,
        order: &OrderExpression,
        page: PageRequest,
    ) -> anyhow::Result<Vec<Employee>>;
    async fn count(&self, filter: &EmployeeFilter) -> anyhow::Result<u64>;
    async fn find(&self, company_id: Uuid, id: Uuid) -> anyhow::Result<Option<Employee>>;
    async fn insert(&self, employee: Employee) -> anyhow::Result<()>;
    async fn update(&self, employee: Employee) -> anyhow::Result<()>;
    async fn delete(&self, company_id: Uuid, id: Uuid) -> anyhow::Result<bool>;
}

/// Build a persisted employee from creation data.
pub fn new_employee_record(company_id: Uuid, e: NewEmployee) -> Employee {
    Employee {
        id: Uuid::new_v4(),
        name: e.name,
        age: e.age,
        position: e.position,
        company_id,
    }
}

/// Copy full-update data onto an existing employee.
pub fn apply_employee_update(mut current: Employee, update: EmployeeUpdate) -> Employee {
    current.name = update.name;
    current.age = update.age;
    current.position = update.position;
    current
}
