use thiserror::Error;
use uuid::Uuid;

/// Errors that are safe to expose to other modules
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompaniesError {
    #[error("Company not found: {id}")]
    CompanyNotFound { id: Uuid },

    #[error("Employee not found: {id}")]
    EmployeeNotFound { id: Uuid },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error")]
    Internal,
}

impl CompaniesError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

impl From<crate::domain::error::DomainError> for CompaniesError {
    fn from(domain_error: crate::domain::error::DomainError) -> Self {
        use crate::domain::error::DomainError::*;
        match domain_error {
            CompanyNotFound { id } => Self::CompanyNotFound { id },
            CompaniesNotFound { missing } => Self::CompanyNotFound {
                id: missing.first().copied().unwrap_or_default(),
            },
            EmployeeNotFound { id, .. } => Self::EmployeeNotFound { id },
            e @ (Validation { .. } | InvalidInput { .. }) => Self::validation(e.to_string()),
            Database { .. } => Self::Internal,
        }
    }
}
