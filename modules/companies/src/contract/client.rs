use async_trait::async_trait;
use shaping_core::{OrderExpression, PagedResult};
use uuid::Uuid;

use crate::contract::{
    error::CompaniesError,
    model::{Company, CompanyUpdate, Employee, EmployeePatch, EmployeeUpdate, NewCompany, NewEmployee},
};
use crate::domain::repo::{CompanyFilter, EmployeeFilter, PageRequest};

/// Public API of the companies module for in-process consumers.
#[async_trait]
pub trait CompaniesApi: Send + Sync {
    async fn list_companies(
        &self,
        filter: CompanyFilter,
        order: OrderExpression,
        page: PageRequest,
    ) -> Result<PagedResult<Company>, CompaniesError>;

    async fn get_company(&self, id: Uuid) -> Result<Company, CompaniesError>;

    async fn get_companies_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Company>, CompaniesError>;

    async fn create_company(&self, new_company: NewCompany) -> Result<Company, CompaniesError>;

    async fn update_company(&self, id: Uuid, update: CompanyUpdate) -> Result<(), CompaniesError>;

    async fn delete_company(&self, id: Uuid) -> Result<(), CompaniesError>;

    async fn list_employees(
        &self,
        filter: EmployeeFilter,
        order: OrderExpression,
        page: PageRequest,
    ) -> Result<PagedResult<Employee>, CompaniesError>;

    async fn get_employee(&self, company_id: Uuid, id: Uuid) -> Result<Employee, CompaniesError>;

    async fn create_employee(
        &self,
        company_id: Uuid,
        new_employee: NewEmployee,
    ) -> Result<Employee, CompaniesError>;

    async fn update_employee(
        &self,
        company_id: Uuid,
        id: Uuid,
        update: EmployeeUpdate,
    ) -> Result<(), CompaniesError>;

    async fn patch_employee(
        &self,
        company_id: Uuid,
        id: Uuid,
        patch: EmployeePatch,
    ) -> Result<Employee, CompaniesError>;

    async fn delete_employee(&self, company_id: Uuid, id: Uuid) -> Result<(), CompaniesError>;
}
