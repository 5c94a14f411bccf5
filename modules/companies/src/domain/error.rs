use thiserror::Error;
use uuid::Uuid;

/// One failed field rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Slash-separated path, e.g. `name` or `employees/0/age`.
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Company not found: {id}")]
    CompanyNotFound { id: Uuid },

    #[error("Some ids are not valid in a collection: {missing:?}")]
    CompaniesNotFound { missing: Vec<Uuid> },

    #[error("Employee {id} not found in company {company_id}")]
    EmployeeNotFound { company_id: Uuid, id: Uuid },

    #[error("Validation failed: {}", join_field_errors(.errors))]
    Validation { errors: Vec<FieldError> },

    #[error("{message}")]
    InvalidInput { message: String },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn company_not_found(id: Uuid) -> Self {
        Self::CompanyNotFound { id }
    }

    pub fn employee_not_found(company_id: Uuid, id: Uuid) -> Self {
        Self::EmployeeNotFound { company_id, id }
    }

    pub fn validation(errors: Vec<FieldError>) -> Self {
        Self::Validation { errors }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}
