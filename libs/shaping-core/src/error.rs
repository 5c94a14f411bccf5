/// Unified error type for schema registration and request-parameter validation.
///
/// Unknown sort or field names are never errors; they are collected on the
/// resolved value instead (see `OrderExpression::unresolved`).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("schema `{entity}` declares no identifier field")]
    MissingIdentifier { entity: &'static str },

    #[error("schema `{entity}` declares field `{field}` more than once")]
    DuplicateField {
        entity: &'static str,
        field: String,
    },

    #[error("schema for `{0}` is already registered")]
    DuplicateSchema(&'static str),

    #[error("no schema registered for `{0}`")]
    SchemaNotFound(&'static str),

    #[error("invalid {filter} range: min {min} is greater than max {max}")]
    InvalidRange {
        filter: &'static str,
        min: String,
        max: String,
    },

    #[error("invalid query parameter `{param}`: {value:?} is not an integer")]
    InvalidQueryParam { param: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, Error>;
