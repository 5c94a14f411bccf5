use async_trait::async_trait;
use shaping_core::{OrderExpression, PagedResult};
use std::sync::Arc;
use uuid::Uuid;

use crate::contract::{
    client::CompaniesApi,
    error::CompaniesError,
    model::{Company, CompanyUpdate, Employee, EmployeePatch, EmployeeUpdate, NewCompany, NewEmployee},
};
use crate::domain::repo::{CompanyFilter, EmployeeFilter, PageRequest};
use crate::domain::service::Service;

/// Local implementation of the CompaniesApi trait that delegates to the domain service
pub struct CompaniesLocalClient {
    service: Arc<Service>,
}

impl CompaniesLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl CompaniesApi for CompaniesLocalClient {
    async fn list_companies(
        &self,
        filter: CompanyFilter,
        order: OrderExpression,
        page: PageRequest,
    ) -> Result<PagedResult<Company>, CompaniesError> {
        self.service
            .list_companies(filter, order, page)
            .await
            .map_err(Into::into)
    }

    async fn get_company(&self, id: Uuid) -> Result<Company, CompaniesError> {
        self.service.get_company(id).await.map_err(Into::into)
    }

    async fn get_companies_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Company>, CompaniesError> {
        self.service
            .get_companies_by_ids(ids)
            .await
            .map_err(Into::into)
    }

    async fn create_company(&self, new_company: NewCompany) -> Result<Company, CompaniesError> {
        self.service
            .create_company(new_company)
            .await
            .map_err(Into::into)
    }

    async fn update_company(&self, id: Uuid, update: CompanyUpdate) -> Result<(), CompaniesError> {
        self.service
            .update_company(id, update)
            .await
            .map_err(Into::into)
    }

    async fn delete_company(&self, id: Uuid) -> Result<(), CompaniesError> {
        self.service.delete_company(id).await.map_err(Into::into)
    }

    async fn list_employees(
        &self,
        filter: EmployeeFilter,
        order: OrderExpression,
        page: PageRequest,
    ) -> Result<PagedResult<Employee>, CompaniesError> {
        self.service
            .list_employees(filter, order, page)
            .await
            .map_err(Into::into)
    }

    async fn get_employee(&self, company_id: Uuid, id: Uuid) -> Result<Employee, CompaniesError> {
        self.service
            .get_employee(company_id, id)
            .await
            .map_err(Into::into)
    }

    async fn create_employee(
        &self,
        company_id: Uuid,
        new_employee: NewEmployee,
    ) -> Result<Employee, CompaniesError> {
        self.service
            .create_employee(company_id, new_employee)
            .await
            .map_err(Into::into)
    }

    async fn update_employee(
        &self,
        company_id: Uuid,
        id: Uuid,
        update: EmployeeUpdate,
    ) -> Result<(), CompaniesError> {
        self.service
            .update_employee(company_id, id, update)
            .await
            .map_err(Into::into)
    }

    async fn patch_employee(
        &self,
        company_id: Uuid,
        id: Uuid,
        patch: EmployeePatch,
    ) -> Result<Employee, CompaniesError> {
        self.service
            .patch_employee(company_id, id, patch)
            .await
            .map_err(Into::into)
    }

    async fn delete_employee(&self, company_id: Uuid, id: Uuid) -> Result<(), CompaniesError> {
        self.service
            .delete_employee(company_id, id)
            .await
            .map_err(Into::into)
    }
}
