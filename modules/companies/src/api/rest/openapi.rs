use apikit::{Problem, ValidationError};
use shaping_core::PageMeta;
use utoipa::OpenApi;

use crate::api::rest::dto::{
    CompanyDto, CreateCompanyReq, CreateEmployeeReq, EmployeeDto, PatchEmployeeBody,
    PatchEmployeeReq, PatchOperation,
};
use crate::api::rest::handlers;

/// OpenAPI documentation for the companies REST surface
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Company Employees API",
        version = "1.0.0",
        description = "Companies and their employees, with field selection, sorting and paging on list endpoints. Page metadata is returned in the `X-Pagination` header as a serialized `PageMeta`."
    ),
    tags(
        (name = "companies", description = "Company endpoints"),
        (name = "employees", description = "Employee endpoints, nested under a company")
    ),
    paths(
        handlers::list_companies,
        handlers::get_company,
        handlers::create_company,
        handlers::get_company_collection,
        handlers::create_company_collection,
        handlers::update_company,
        handlers::delete_company,
        handlers::list_employees,
        handlers::get_employee,
        handlers::create_employee,
        handlers::update_employee,
        handlers::patch_employee,
        handlers::delete_employee,
    ),
    components(schemas(
        CompanyDto,
        EmployeeDto,
        CreateCompanyReq,
        CreateEmployeeReq,
        PatchEmployeeReq,
        PatchOperation,
        PatchEmployeeBody,
        PageMeta,
        Problem,
        ValidationError,
    ))
)]
pub struct ApiDoc;

/// The document as JSON, ready to hand to the ingress.
pub fn openapi_document() -> anyhow::Result<serde_json::Value> {
    Ok(serde_json::to_value(ApiDoc::openapi())?)
}
