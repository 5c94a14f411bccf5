use std::sync::Arc;

use shaping_core::{OrderExpression, PagedResult, SortDirection};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::contract::model::{
    Company, CompanyUpdate, Employee, EmployeePatch, EmployeeUpdate, NewCompany, NewEmployee,
};
use crate::domain::error::{DomainError, FieldError};
use crate::domain::repo::{
    apply_employee_update, new_employee_record, CompaniesRepository, CompanyFilter,
    EmployeeFilter, EmployeesRepository, PageRequest,
};

/// Field limits enforced on every write.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub max_company_name_length: usize,
    pub max_address_length: usize,
    pub max_country_length: usize,
    pub max_employee_name_length: usize,
    pub max_position_length: usize,
    pub min_employee_age: i32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_company_name_length: 30,
            max_address_length: 60,
            max_country_length: 30,
            max_employee_name_length: 30,
            max_position_length: 20,
            min_employee_age: 18,
        }
    }
}

/// Canonical field used when a request asks for no (resolvable) ordering.
pub const DEFAULT_ORDER_FIELD: &str = "Name";

/// Domain service with business rules for companies and their employees.
/// Depends only on the repository ports, not on infra types.
#[derive(Clone)]
pub struct Service {
    companies: Arc<dyn CompaniesRepository>,
    employees: Arc<dyn EmployeesRepository>,
    config: ServiceConfig,
}

fn db_err(e: anyhow::Error) -> DomainError {
    DomainError::database(format!("{e:#}"))
}

impl Service {
    pub fn new(
        companies: Arc<dyn CompaniesRepository>,
        employees: Arc<dyn EmployeesRepository>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            companies,
            employees,
            config,
        }
    }

    // --- companies ---

    #[instrument(
        name = "companies.service.list_companies",
        skip(self, filter),
        fields(order = %order, page = page.page_number, size = page.page_size)
    )]
    pub async fn list_companies(
        &self,
        filter: CompanyFilter,
        order: OrderExpression,
        page: PageRequest,
    ) -> Result<PagedResult<Company>, DomainError> {
        let order = order.with_fallback(DEFAULT_ORDER_FIELD, SortDirection::Ascending);
        let total = self.companies.count(&filter).await.map_err(db_err)?;
        let items = self
            .companies
            .fetch_page(&filter, &order, page)
            .await
            .map_err(db_err)?;
        debug!(returned = items.len(), total, "Listed companies");
        Ok(PagedResult::new(items, page.page_number, page.page_size, total))
    }

    #[instrument(name = "companies.service.get_company", skip(self), fields(company_id = %id))]
    pub async fn get_company(&self, id: Uuid) -> Result<Company, DomainError> {
        debug!("Getting company by id");
        self.companies
            .find_by_id(id)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::company_not_found(id))
    }

    /// All companies in `ids`, in request order. Fails if any id is unknown.
    #[instrument(name = "companies.service.get_companies_by_ids", skip(self, ids), fields(count = ids.len()))]
    pub async fn get_companies_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Company>, DomainError> {
        if ids.is_empty() {
            return Err(DomainError::invalid_input("Parameter ids is null or empty"));
        }
        let found = self.companies.find_by_ids(ids).await.map_err(db_err)?;

        let mut ordered = Vec::with_capacity(ids.len());
        let mut missing = Vec::new();
        for id in ids {
            match found.iter().find(|c| c.id == *id) {
                Some(c) => ordered.push(c.clone()),
                None => missing.push(*id),
            }
        }
        if !missing.is_empty() {
            return Err(DomainError::CompaniesNotFound { missing });
        }
        Ok(ordered)
    }

    #[instrument(
        name = "companies.service.create_company",
        skip(self, new_company),
        fields(name = %new_company.name, employees = new_company.employees.len())
    )]
    pub async fn create_company(&self, new_company: NewCompany) -> Result<Company, DomainError> {
        info!("Creating new company");
        let mut created = self.create_companies(vec![new_company]).await?;
        created.pop().ok_or_else(|| DomainError::database("insert returned no company"))
    }

    /// Validate and insert all companies in one transaction.
    #[instrument(name = "companies.service.create_companies", skip(self, batch), fields(count = batch.len()))]
    pub async fn create_companies(&self, batch: Vec<NewCompany>) -> Result<Vec<Company>, DomainError> {
        if batch.is_empty() {
            return Err(DomainError::invalid_input("Company collection is null or empty"));
        }
        for c in &batch {
            self.validate_company(&c.name, &c.address, c.country.as_deref(), &c.employees)?;
        }

        let rows: Vec<(Company, Vec<Employee>)> = batch
            .into_iter()
            .map(|c| {
                let company = Company {
                    id: Uuid::new_v4(),
                    name: c.name,
                    address: c.address,
                    country: c.country,
                };
                let employees = c
                    .employees
                    .into_iter()
                    .map(|e| new_employee_record(company.id, e))
                    .collect();
                (company, employees)
            })
            .collect();
        let companies: Vec<Company> = rows.iter().map(|(c, _)| c.clone()).collect();

        self.companies.insert(rows).await.map_err(db_err)?;
        info!(count = companies.len(), "Created companies");
        Ok(companies)
    }

    #[instrument(name = "companies.service.update_company", skip(self, update), fields(company_id = %id))]
    pub async fn update_company(&self, id: Uuid, update: CompanyUpdate) -> Result<(), DomainError> {
        info!("Updating company");
        self.validate_company(
            &update.name,
            &update.address,
            update.country.as_deref(),
            &update.employees,
        )?;
        let mut company = self.get_company(id).await?;
        company.name = update.name;
        company.address = update.address;
        company.country = update.country;

        let new_employees = update
            .employees
            .into_iter()
            .map(|e| new_employee_record(id, e))
            .collect();
        self.companies
            .update(company, new_employees)
            .await
            .map_err(db_err)?;
        info!("Successfully updated company");
        Ok(())
    }

    #[instrument(name = "companies.service.delete_company", skip(self), fields(company_id = %id))]
    pub async fn delete_company(&self, id: Uuid) -> Result<(), DomainError> {
        info!("Deleting company");
        let deleted = self.companies.delete(id).await.map_err(db_err)?;
        if !deleted {
            return Err(DomainError::company_not_found(id));
        }
        info!("Successfully deleted company");
        Ok(())
    }

    // --- employees ---

    #[instrument(
        name = "companies.service.list_employees",
        skip(self, filter),
        fields(company_id = %filter.company_id, order = %order, page = page.page_number, size = page.page_size)
    )]
    pub async fn list_employees(
        &self,
        filter: EmployeeFilter,
        order: OrderExpression,
        page: PageRequest,
    ) -> Result<PagedResult<Employee>, DomainError> {
        if !filter.age.is_valid() {
            return Err(DomainError::invalid_input(
                "Max age can't be less than min age.",
            ));
        }
        self.ensure_company(filter.company_id).await?;

        let order = order.with_fallback(DEFAULT_ORDER_FIELD, SortDirection::Ascending);
        let total = self.employees.count(&filter).await.map_err(db_err)?;
        let items = self
            .employees
            .fetch_page(&filter, &order, page)
            .await
            .map_err(db_err)?;
        debug!(returned = items.len(), total, "Listed employees");
        Ok(PagedResult::new(items, page.page_number, page.page_size, total))
    }

    #[instrument(name = "companies.service.get_employee", skip(self), fields(company_id = %company_id, employee_id = %id))]
    pub async fn get_employee(&self, company_id: Uuid, id: Uuid) -> Result<Employee, DomainError> {
        self.ensure_company(company_id).await?;
        self.employees
            .find(company_id, id)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::employee_not_found(company_id, id))
    }

    #[instrument(
        name = "companies.service.create_employee",
        skip(self, new_employee),
        fields(company_id = %company_id, name = %new_employee.name)
    )]
    pub async fn create_employee(
        &self,
        company_id: Uuid,
        new_employee: NewEmployee,
    ) -> Result<Employee, DomainError> {
        info!("Creating new employee");
        let errors = self.employee_errors(
            &new_employee.name,
            new_employee.age,
            &new_employee.position,
        );
        if !errors.is_empty() {
            return Err(DomainError::validation(errors));
        }
        self.ensure_company(company_id).await?;

        let employee = new_employee_record(company_id, new_employee);
        self.employees
            .insert(employee.clone())
            .await
            .map_err(db_err)?;
        info!(employee_id = %employee.id, "Successfully created employee");
        Ok(employee)
    }

    #[instrument(name = "companies.service.update_employee", skip(self, update), fields(company_id = %company_id, employee_id = %id))]
    pub async fn update_employee(
        &self,
        company_id: Uuid,
        id: Uuid,
        update: EmployeeUpdate,
    ) -> Result<(), DomainError> {
        info!("Updating employee");
        let errors = self.employee_errors(&update.name, update.age, &update.position);
        if !errors.is_empty() {
            return Err(DomainError::validation(errors));
        }
        let current = self.get_employee(company_id, id).await?;
        self.employees
            .update(apply_employee_update(current, update))
            .await
            .map_err(db_err)?;
        info!("Successfully updated employee");
        Ok(())
    }

    /// Apply `patch` and validate the patched result as a whole.
    #[instrument(name = "companies.service.patch_employee", skip(self, patch), fields(company_id = %company_id, employee_id = %id))]
    pub async fn patch_employee(
        &self,
        company_id: Uuid,
        id: Uuid,
        patch: EmployeePatch,
    ) -> Result<Employee, DomainError> {
        info!("Patching employee");
        let current = self.get_employee(company_id, id).await?;
        if patch.is_empty() {
            debug!("Empty patch, nothing to do");
            return Ok(current);
        }

        let patched = patch.apply_to(&current);
        let errors = self.employee_errors(&patched.name, patched.age, &patched.position);
        if !errors.is_empty() {
            return Err(DomainError::validation(errors));
        }
        let updated = apply_employee_update(current, patched);
        self.employees
            .update(updated.clone())
            .await
            .map_err(db_err)?;
        info!("Successfully patched employee");
        Ok(updated)
    }

    #[instrument(name = "companies.service.delete_employee", skip(self), fields(company_id = %company_id, employee_id = %id))]
    pub async fn delete_employee(&self, company_id: Uuid, id: Uuid) -> Result<(), DomainError> {
        info!("Deleting employee");
        self.ensure_company(company_id).await?;
        let deleted = self
            .employees
            .delete(company_id, id)
            .await
            .map_err(db_err)?;
        if !deleted {
            return Err(DomainError::employee_not_found(company_id, id));
        }
        info!("Successfully deleted employee");
        Ok(())
    }

    async fn ensure_company(&self, id: Uuid) -> Result<(), DomainError> {
        self.get_company(id).await.map(|_| ())
    }

    // --- validation helpers ---

    fn validate_company(
        &self,
        name: &str,
        address: &str,
        country: Option<&str>,
        employees: &[NewEmployee],
    ) -> Result<(), DomainError> {
        let cfg = &self.config;
        let mut errors = Vec::new();
        required_max(&mut errors, "name", name, cfg.max_company_name_length);
        required_max(&mut errors, "address", address, cfg.max_address_length);
        if let Some(country) = country {
            if country.chars().count() > cfg.max_country_length {
                errors.push(FieldError::new(
                    "country",
                    format!("must be at most {} characters", cfg.max_country_length),
                ));
            }
        }
        for (i, e) in employees.iter().enumerate() {
            errors.extend(
                self.employee_errors(&e.name, e.age, &e.position)
                    .into_iter()
                    .map(|fe| FieldError::new(format!("employees/{i}/{}", fe.field), fe.message)),
            );
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(DomainError::validation(errors))
        }
    }

    fn employee_errors(&self, name: &str, age: i32, position: &str) -> Vec<FieldError> {
        let cfg = &self.config;
        let mut errors = Vec::new();
        required_max(&mut errors, "name", name, cfg.max_employee_name_length);
        if age < cfg.min_employee_age {
            errors.push(FieldError::new(
                "age",
                format!("must be at least {}", cfg.min_employee_age),
            ));
        }
        required_max(&mut errors, "position", position, cfg.max_position_length);
        errors
    }
}

fn required_max(errors: &mut Vec<FieldError>, field: &str, value: &str, max: usize) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, "is required"));
    } else if value.chars().count() > max {
        errors.push(FieldError::new(
            field,
            format!("must be at most {max} characters"),
        ));
    }
}
