use std::sync::Arc;

use apikit::{
    created_at, no_content, paged_json, JsonPayload, PathParams, Problem, ProblemResponse,
    QueryParams,
};
use axum::{
    extract::Extension,
    http::Uri,
    response::{IntoResponse, Json, Response},
};
use shaping_core::{build_order_expression, shape, shape_one, FieldSelection, OrderExpression};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::api::rest::dto::{
    CompanyDto, CreateCompanyReq, CreateEmployeeReq, EmployeeDto, PatchEmployeeBody,
    UpdateCompanyReq, UpdateEmployeeReq,
};
use crate::api::rest::error::to_problem;
use crate::api::rest::query::{
    CompanyParameters, CompanyQuery, EmployeeParameters, EmployeeQuery, FieldsQuery,
};
use crate::api::rest::schema::ShapingContext;
use crate::contract::model::{Company, Employee};
use crate::domain::error::DomainError;
use crate::domain::service::Service;

type HandlerResult = Result<Response, ProblemResponse>;

fn log_unresolved(order: Option<&OrderExpression>, fields: &[String]) {
    let sort = order.map(OrderExpression::unresolved).unwrap_or_default();
    if !sort.is_empty() || !fields.is_empty() {
        debug!(?sort, ?fields, "Ignoring unknown sort or field names");
    }
}

/// `(id1,id2)` or `id1,id2` into ids. Empty input yields an empty list.
fn parse_id_list(raw: &str) -> Result<Vec<Uuid>, String> {
    let trimmed = raw.trim();
    let inner = trimmed
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .unwrap_or(trimmed);
    inner
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| Uuid::parse_str(s).map_err(|_| format!("'{s}' is not a valid id")))
        .collect()
}

fn collection_location(companies: &[Company]) -> String {
    let ids: Vec<String> = companies.iter().map(|c| c.id.to_string()).collect();
    format!("/api/companies/collection/({})", ids.join(","))
}

// --- companies ---

/// List companies (shaped, paged)
#[utoipa::path(
    get,
    path = "/api/companies",
    tag = "companies",
    params(
        ("pageNumber" = Option<u32>, Query, description = "1-based page number (default: 1)"),
        ("pageSize" = Option<u32>, Query, description = "Items per page (default: 10, max: 50)"),
        ("orderBy" = Option<String>, Query, description = "Comma-separated fields, e.g. `name desc, country`"),
        ("fields" = Option<String>, Query, description = "Comma-separated fields to return; `Id` is always included"),
        ("searchTerm" = Option<String>, Query, description = "Case-insensitive name substring")
    ),
    responses(
        (status = 200, description = "Page of companies", body = Vec<CompanyDto>,
            headers(("X-Pagination" = String, description = "Page metadata as JSON"))),
        (status = 400, description = "Bad Request", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn list_companies(
    Extension(svc): Extension<Arc<Service>>,
    Extension(ctx): Extension<Arc<ShapingContext>>,
    QueryParams(query): QueryParams<CompanyQuery>,
    uri: Uri,
) -> HandlerResult {
    info!("Listing companies with query: {:?}", query);

    let params = CompanyParameters::from_query(&query, ctx.limits).map_err(|e| to_problem(e, &uri))?;
    let schema = ctx.registry.get::<Company>().map_err(|e| to_problem(e, &uri))?;
    let order = build_order_expression(params.common.order_by(), schema);
    let selection = FieldSelection::resolve(params.common.fields(), schema);
    log_unresolved(Some(&order), selection.unresolved());

    let page = svc
        .list_companies(params.filter(), order, params.page())
        .await
        .map_err(|e| {
            error!("Failed to list companies: {}", e);
            to_problem(e, &uri)
        })?;
    paged_json(page.map_items(|c| shape_one(&c, &selection))).map_err(|p| p.at(uri.path()))
}

/// Get a company by ID (shaped)
#[utoipa::path(
    get,
    path = "/api/companies/{company_id}",
    tag = "companies",
    params(
        ("company_id" = Uuid, Path, description = "Company UUID"),
        ("fields" = Option<String>, Query, description = "Comma-separated fields to return")
    ),
    responses(
        (status = 200, description = "Company found", body = CompanyDto),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn get_company(
    Extension(svc): Extension<Arc<Service>>,
    Extension(ctx): Extension<Arc<ShapingContext>>,
    PathParams(id): PathParams<Uuid>,
    QueryParams(query): QueryParams<FieldsQuery>,
    uri: Uri,
) -> HandlerResult {
    info!("Getting company with id: {}", id);

    let schema = ctx.registry.get::<Company>().map_err(|e| to_problem(e, &uri))?;
    let selection = FieldSelection::resolve(query.fields.as_deref(), schema);
    log_unresolved(None, selection.unresolved());

    match svc.get_company(id).await {
        Ok(company) => Ok(Json(shape_one(&company, &selection)).into_response()),
        Err(e) => {
            error!("Failed to get company {}: {}", id, e);
            Err(to_problem(e, &uri))
        }
    }
}

/// Create a company, optionally with employees
#[utoipa::path(
    post,
    path = "/api/companies",
    tag = "companies",
    request_body = CreateCompanyReq,
    responses(
        (status = 201, description = "Created company", body = CompanyDto,
            headers(("Location" = String, description = "URL of the new company"))),
        (status = 400, description = "Bad Request", body = Problem, content_type = "application/problem+json"),
        (status = 422, description = "Validation error", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn create_company(
    Extension(svc): Extension<Arc<Service>>,
    uri: Uri,
    JsonPayload(req_body): JsonPayload<CreateCompanyReq>,
) -> HandlerResult {
    info!("Creating company: {:?}", req_body);

    match svc.create_company(req_body.into()).await {
        Ok(company) => {
            let location = format!("/api/companies/{}", company.id);
            Ok(created_at(&location, CompanyDto::from(company)))
        }
        Err(e) => {
            error!("Failed to create company: {}", e);
            Err(to_problem(e, &uri))
        }
    }
}

/// Get several companies by ID, in request order
#[utoipa::path(
    get,
    path = "/api/companies/collection/{ids}",
    tag = "companies",
    params(
        ("ids" = String, Path, description = "Comma-separated company UUIDs, optionally in parentheses"),
        ("fields" = Option<String>, Query, description = "Comma-separated fields to return")
    ),
    responses(
        (status = 200, description = "Companies", body = Vec<CompanyDto>),
        (status = 400, description = "Bad Request", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Some ids are unknown", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn get_company_collection(
    Extension(svc): Extension<Arc<Service>>,
    Extension(ctx): Extension<Arc<ShapingContext>>,
    PathParams(raw_ids): PathParams<String>,
    QueryParams(query): QueryParams<FieldsQuery>,
    uri: Uri,
) -> HandlerResult {
    info!("Getting company collection: {}", raw_ids);

    let ids = parse_id_list(&raw_ids).map_err(|msg| to_problem(DomainError::invalid_input(msg), &uri))?;
    let schema = ctx.registry.get::<Company>().map_err(|e| to_problem(e, &uri))?;
    let selection = FieldSelection::resolve(query.fields.as_deref(), schema);
    log_unresolved(None, selection.unresolved());

    match svc.get_companies_by_ids(&ids).await {
        Ok(companies) => Ok(Json(shape(&companies, &selection)).into_response()),
        Err(e) => {
            error!("Failed to get company collection: {}", e);
            Err(to_problem(e, &uri))
        }
    }
}

/// Create several companies at once
#[utoipa::path(
    post,
    path = "/api/companies/collection",
    tag = "companies",
    request_body = Vec<CreateCompanyReq>,
    responses(
        (status = 201, description = "Created companies", body = Vec<CompanyDto>,
            headers(("Location" = String, description = "Collection URL of the new companies"))),
        (status = 400, description = "Bad Request", body = Problem, content_type = "application/problem+json"),
        (status = 422, description = "Validation error", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn create_company_collection(
    Extension(svc): Extension<Arc<Service>>,
    uri: Uri,
    JsonPayload(req_body): JsonPayload<Vec<CreateCompanyReq>>,
) -> HandlerResult {
    info!("Creating {} companies", req_body.len());

    let batch = req_body.into_iter().map(Into::into).collect();
    match svc.create_companies(batch).await {
        Ok(companies) => {
            let location = collection_location(&companies);
            let dtos: Vec<CompanyDto> = companies.into_iter().map(CompanyDto::from).collect();
            Ok(created_at(&location, dtos))
        }
        Err(e) => {
            error!("Failed to create companies: {}", e);
            Err(to_problem(e, &uri))
        }
    }
}

/// Replace a company; listed employees are added
#[utoipa::path(
    put,
    path = "/api/companies/{company_id}",
    tag = "companies",
    params(("company_id" = Uuid, Path, description = "Company UUID")),
    request_body = UpdateCompanyReq,
    responses(
        (status = 204, description = "Company updated"),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
        (status = 422, description = "Validation error", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn update_company(
    Extension(svc): Extension<Arc<Service>>,
    PathParams(id): PathParams<Uuid>,
    uri: Uri,
    JsonPayload(req_body): JsonPayload<UpdateCompanyReq>,
) -> HandlerResult {
    info!("Updating company {} with: {:?}", id, req_body);

    match svc.update_company(id, req_body.into()).await {
        Ok(()) => Ok(no_content()),
        Err(e) => {
            error!("Failed to update company {}: {}", id, e);
            Err(to_problem(e, &uri))
        }
    }
}

/// Delete a company and its employees
#[utoipa::path(
    delete,
    path = "/api/companies/{company_id}",
    tag = "companies",
    params(("company_id" = Uuid, Path, description = "Company UUID")),
    responses(
        (status = 204, description = "Company deleted"),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn delete_company(
    Extension(svc): Extension<Arc<Service>>,
    PathParams(id): PathParams<Uuid>,
    uri: Uri,
) -> HandlerResult {
    info!("Deleting company: {}", id);

    match svc.delete_company(id).await {
        Ok(()) => Ok(no_content()),
        Err(e) => {
            error!("Failed to delete company {}: {}", id, e);
            Err(to_problem(e, &uri))
        }
    }
}

// --- employees ---

/// List a company's employees (filtered, shaped, paged)
#[utoipa::path(
    get,
    path = "/api/companies/{company_id}/employees",
    tag = "employees",
    params(
        ("company_id" = Uuid, Path, description = "Company UUID"),
        ("pageNumber" = Option<u32>, Query, description = "1-based page number (default: 1)"),
        ("pageSize" = Option<u32>, Query, description = "Items per page (default: 10, max: 50)"),
        ("orderBy" = Option<String>, Query, description = "Comma-separated fields, e.g. `age desc, name`"),
        ("fields" = Option<String>, Query, description = "Comma-separated fields to return; `Id` is always included"),
        ("minAge" = Option<i32>, Query, description = "Inclusive lower age bound (default: 0)"),
        ("maxAge" = Option<i32>, Query, description = "Inclusive upper age bound (default: unbounded)"),
        ("searchTerm" = Option<String>, Query, description = "Case-insensitive name substring")
    ),
    responses(
        (status = 200, description = "Page of employees", body = Vec<EmployeeDto>,
            headers(("X-Pagination" = String, description = "Page metadata as JSON"))),
        (status = 400, description = "Bad Request", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Company not found", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn list_employees(
    Extension(svc): Extension<Arc<Service>>,
    Extension(ctx): Extension<Arc<ShapingContext>>,
    PathParams(company_id): PathParams<Uuid>,
    QueryParams(query): QueryParams<EmployeeQuery>,
    uri: Uri,
) -> HandlerResult {
    info!("Listing employees of company {} with query: {:?}", company_id, query);

    let params = EmployeeParameters::from_query(&query, ctx.limits).map_err(|e| to_problem(e, &uri))?;
    let schema = ctx.registry.get::<Employee>().map_err(|e| to_problem(e, &uri))?;
    let order = build_order_expression(params.common.order_by(), schema);
    let selection = FieldSelection::resolve(params.common.fields(), schema);
    log_unresolved(Some(&order), selection.unresolved());

    let page = svc
        .list_employees(params.filter(company_id), order, params.page())
        .await
        .map_err(|e| {
            error!("Failed to list employees of company {}: {}", company_id, e);
            to_problem(e, &uri)
        })?;
    paged_json(page.map_items(|e| shape_one(&e, &selection))).map_err(|p| p.at(uri.path()))
}

/// Get one employee of a company (shaped)
#[utoipa::path(
    get,
    path = "/api/companies/{company_id}/employees/{id}",
    tag = "employees",
    params(
        ("company_id" = Uuid, Path, description = "Company UUID"),
        ("id" = Uuid, Path, description = "Employee UUID"),
        ("fields" = Option<String>, Query, description = "Comma-separated fields to return")
    ),
    responses(
        (status = 200, description = "Employee found", body = EmployeeDto),
        (status = 404, description = "Company or employee not found", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn get_employee(
    Extension(svc): Extension<Arc<Service>>,
    Extension(ctx): Extension<Arc<ShapingContext>>,
    PathParams((company_id, id)): PathParams<(Uuid, Uuid)>,
    QueryParams(query): QueryParams<FieldsQuery>,
    uri: Uri,
) -> HandlerResult {
    info!("Getting employee {} of company {}", id, company_id);

    let schema = ctx.registry.get::<Employee>().map_err(|e| to_problem(e, &uri))?;
    let selection = FieldSelection::resolve(query.fields.as_deref(), schema);
    log_unresolved(None, selection.unresolved());

    match svc.get_employee(company_id, id).await {
        Ok(employee) => Ok(Json(shape_one(&employee, &selection)).into_response()),
        Err(e) => {
            error!("Failed to get employee {}: {}", id, e);
            Err(to_problem(e, &uri))
        }
    }
}

/// Create an employee for a company
#[utoipa::path(
    post,
    path = "/api/companies/{company_id}/employees",
    tag = "employees",
    params(("company_id" = Uuid, Path, description = "Company UUID")),
    request_body = CreateEmployeeReq,
    responses(
        (status = 201, description = "Created employee", body = EmployeeDto,
            headers(("Location" = String, description = "URL of the new employee"))),
        (status = 404, description = "Company not found", body = Problem, content_type = "application/problem+json"),
        (status = 422, description = "Validation error", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn create_employee(
    Extension(svc): Extension<Arc<Service>>,
    PathParams(company_id): PathParams<Uuid>,
    uri: Uri,
    JsonPayload(req_body): JsonPayload<CreateEmployeeReq>,
) -> HandlerResult {
    info!("Creating employee for company {}: {:?}", company_id, req_body);

    match svc.create_employee(company_id, req_body.into()).await {
        Ok(employee) => {
            let location = format!("/api/companies/{}/employees/{}", company_id, employee.id);
            Ok(created_at(&location, EmployeeDto::from(employee)))
        }
        Err(e) => {
            error!("Failed to create employee for company {}: {}", company_id, e);
            Err(to_problem(e, &uri))
        }
    }
}

/// Replace an employee
#[utoipa::path(
    put,
    path = "/api/companies/{company_id}/employees/{id}",
    tag = "employees",
    params(
        ("company_id" = Uuid, Path, description = "Company UUID"),
        ("id" = Uuid, Path, description = "Employee UUID")
    ),
    request_body = UpdateEmployeeReq,
    responses(
        (status = 204, description = "Employee updated"),
        (status = 404, description = "Company or employee not found", body = Problem, content_type = "application/problem+json"),
        (status = 422, description = "Validation error", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn update_employee(
    Extension(svc): Extension<Arc<Service>>,
    PathParams((company_id, id)): PathParams<(Uuid, Uuid)>,
    uri: Uri,
    JsonPayload(req_body): JsonPayload<UpdateEmployeeReq>,
) -> HandlerResult {
    info!("Updating employee {} with: {:?}", id, req_body);

    match svc.update_employee(company_id, id, req_body.into()).await {
        Ok(()) => Ok(no_content()),
        Err(e) => {
            error!("Failed to update employee {}: {}", id, e);
            Err(to_problem(e, &uri))
        }
    }
}

/// Partially update an employee (merge object or JSON Patch)
#[utoipa::path(
    patch,
    path = "/api/companies/{company_id}/employees/{id}",
    tag = "employees",
    params(
        ("company_id" = Uuid, Path, description = "Company UUID"),
        ("id" = Uuid, Path, description = "Employee UUID")
    ),
    request_body = PatchEmployeeBody,
    responses(
        (status = 204, description = "Employee patched"),
        (status = 400, description = "Unsupported patch", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Company or employee not found", body = Problem, content_type = "application/problem+json"),
        (status = 422, description = "Patched employee is invalid", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn patch_employee(
    Extension(svc): Extension<Arc<Service>>,
    PathParams((company_id, id)): PathParams<(Uuid, Uuid)>,
    uri: Uri,
    JsonPayload(req_body): JsonPayload<PatchEmployeeBody>,
) -> HandlerResult {
    info!("Patching employee {} with: {:?}", id, req_body);

    let patch = req_body
        .into_patch()
        .map_err(|msg| to_problem(DomainError::invalid_input(msg), &uri))?;
    match svc.patch_employee(company_id, id, patch).await {
        Ok(_) => Ok(no_content()),
        Err(e) => {
            error!("Failed to patch employee {}: {}", id, e);
            Err(to_problem(e, &uri))
        }
    }
}

/// Delete an employee
#[utoipa::path(
    delete,
    path = "/api/companies/{company_id}/employees/{id}",
    tag = "employees",
    params(
        ("company_id" = Uuid, Path, description = "Company UUID"),
        ("id" = Uuid, Path, description = "Employee UUID")
    ),
    responses(
        (status = 204, description = "Employee deleted"),
        (status = 404, description = "Company or employee not found", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn delete_employee(
    Extension(svc): Extension<Arc<Service>>,
    PathParams((company_id, id)): PathParams<(Uuid, Uuid)>,
    uri: Uri,
) -> HandlerResult {
    info!("Deleting employee {} of company {}", id, company_id);

    match svc.delete_employee(company_id, id).await {
        Ok(()) => Ok(no_content()),
        Err(e) => {
            error!("Failed to delete employee {}: {}", id, e);
            Err(to_problem(e, &uri))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_list_accepts_parentheses_and_spaces() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let ids = parse_id_list(&format!("({a}, {b})")).unwrap();
        assert_eq!(ids, vec![a, b]);
        assert_eq!(parse_id_list(&format!("{a}")).unwrap(), vec![a]);
    }

    #[test]
    fn id_list_rejects_garbage_and_allows_empty() {
        assert!(parse_id_list("(abc)").is_err());
        assert!(parse_id_list("()").unwrap().is_empty());
    }
}
