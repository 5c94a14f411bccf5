use apikit::{
    from_parts, shaping_error_to_problem, unprocessable, ApiError, ProblemResponse,
    ValidationError,
};
use axum::http::{StatusCode, Uri};

use crate::domain::error::{DomainError, FieldError};

/// Map domain error to RFC9457 ProblemResponse
pub fn map_domain_error(e: &DomainError, instance: &str) -> ProblemResponse {
    match e {
        DomainError::CompanyNotFound { id } => from_parts(
            StatusCode::NOT_FOUND,
            "COMPANY_NOT_FOUND",
            "Company not found",
            format!("Company with id {id} doesn't exist in the database."),
            instance,
        ),
        DomainError::CompaniesNotFound { .. } => from_parts(
            StatusCode::NOT_FOUND,
            "COMPANIES_NOT_FOUND",
            "Companies not found",
            e.to_string(),
            instance,
        ),
        DomainError::EmployeeNotFound { id, .. } => from_parts(
            StatusCode::NOT_FOUND,
            "EMPLOYEE_NOT_FOUND",
            "Employee not found",
            format!("Employee with id {id} doesn't exist in the database."),
            instance,
        ),
        DomainError::Validation { errors } => {
            unprocessable("One or more fields are invalid", validation_errors(errors)).at(instance)
        }
        DomainError::InvalidInput { message } => from_parts(
            StatusCode::BAD_REQUEST,
            "INVALID_INPUT",
            "Bad request",
            message.clone(),
            instance,
        ),
        DomainError::Database { .. } => {
            // Log the internal error details but don't expose them to the client
            tracing::error!(error = ?e, "Database error occurred");
            from_parts(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_DB",
                "Internal error",
                "An internal database error occurred",
                instance,
            )
        }
    }
}

/// Map request-parameter errors; the age range gets its own wording.
pub fn map_params_error(e: &shaping_core::Error, instance: &str) -> ProblemResponse {
    match e {
        shaping_core::Error::InvalidRange { filter: "age", .. } => from_parts(
            StatusCode::BAD_REQUEST,
            "INVALID_RANGE",
            "Invalid range",
            "Max age can't be less than min age.",
            instance,
        ),
        _ => shaping_error_to_problem(e, instance),
    }
}

/// Render any boundary error against the request path.
pub fn to_problem(e: impl Into<ApiError<DomainError>>, uri: &Uri) -> ProblemResponse {
    let instance = uri.path();
    match e.into() {
        ApiError::Params(e) => map_params_error(&e, instance),
        ApiError::Domain(e) => map_domain_error(&e, instance),
        ApiError::Problem(p) => p.at(instance),
    }
}

/// `employees/0/name` becomes the JSON pointer `/Employees/0/Name`.
fn pointer(field: &str) -> String {
    field
        .split('/')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => format!("/{}{}", first.to_ascii_uppercase(), chars.as_str()),
                None => "/".to_owned(),
            }
        })
        .collect()
}

fn validation_errors(errors: &[FieldError]) -> Vec<ValidationError> {
    errors
        .iter()
        .map(|fe| ValidationError::new(pointer(&fe.field), fe.message.clone()))
        .collect()
}

impl From<DomainError> for ApiError<DomainError> {
    fn from(e: DomainError) -> Self {
        ApiError::Domain(e)
    }
}

impl From<DomainError> for ProblemResponse {
    fn from(e: DomainError) -> Self {
        map_domain_error(&e, "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn not_found_maps_to_404() {
        let p = map_domain_error(&DomainError::company_not_found(Uuid::nil()), "/api/companies/x");
        assert_eq!(p.0.status, 404);
        assert_eq!(p.0.code, "COMPANY_NOT_FOUND");
        assert_eq!(p.0.instance, "/api/companies/x");
    }

    #[test]
    fn validation_maps_to_422_with_pointers() {
        let e = DomainError::validation(vec![
            FieldError::new("name", "is required"),
            FieldError::new("employees/0/age", "must be at least 18"),
        ]);
        let p = map_domain_error(&e, "/api/companies");
        assert_eq!(p.0.status, 422);
        assert_eq!(p.0.code, "VALIDATION");
        let errors = p.0.errors.unwrap();
        assert_eq!(errors[0].pointer, "/Name");
        assert_eq!(errors[1].pointer, "/Employees/0/Age");
    }

    #[test]
    fn database_details_are_hidden() {
        let p = map_domain_error(&DomainError::database("disk I/O error"), "/");
        assert_eq!(p.0.status, 500);
        assert!(!p.0.detail.contains("disk"));
    }

    #[test]
    fn inverted_age_range_uses_fixed_detail() {
        let e = shaping_core::Error::InvalidRange {
            filter: "age",
            min: "40".into(),
            max: "30".into(),
        };
        let p = to_problem(e, &Uri::from_static("/api/companies/1/employees"));
        assert_eq!(p.0.status, 400);
        assert_eq!(p.0.detail, "Max age can't be less than min age.");
        assert_eq!(p.0.instance, "/api/companies/1/employees");
    }
}
