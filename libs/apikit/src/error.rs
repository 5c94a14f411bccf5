use axum::http::StatusCode;
use axum::response::IntoResponse;
use shaping_core::Error as ShapingError;

use crate::problem::{from_parts, ProblemResponse};

/// Unified API error type that handles all errors at the API boundary
///
/// This centralizes error handling so that handlers can use `?` operator
/// and automatically get proper RFC 9457 Problem+json responses.
///
/// The `D` type parameter allows different modules to use their own domain error types
/// while still getting unified error handling at the API boundary.
#[derive(thiserror::Error, Debug)]
pub enum ApiError<D> {
    /// Paging, sorting, field selection or range-filter errors
    #[error(transparent)]
    Params(ShapingError),

    /// Domain business logic errors
    #[error(transparent)]
    Domain(D),

    /// Already rendered problem (extractor rejections and the like)
    #[error("{0}")]
    Problem(ProblemResponse),
}

impl<D> From<ShapingError> for ApiError<D> {
    fn from(e: ShapingError) -> Self {
        ApiError::Params(e)
    }
}

impl<D> From<ProblemResponse> for ApiError<D> {
    fn from(p: ProblemResponse) -> Self {
        ApiError::Problem(p)
    }
}

impl<D> IntoResponse for ApiError<D>
where
    D: Into<ProblemResponse>,
{
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::Params(e) => shaping_error_to_problem(&e, "").into_response(),
            ApiError::Domain(e) => e.into().into_response(),
            ApiError::Problem(p) => p.into_response(),
        }
    }
}

/// Map request-parameter errors to RFC 9457 problems.
///
/// Schema errors only happen when a module registered its schemas wrongly,
/// so they surface as 500 and are logged rather than exposed.
pub fn shaping_error_to_problem(e: &ShapingError, instance: &str) -> ProblemResponse {
    match e {
        ShapingError::InvalidRange { .. } => from_parts(
            StatusCode::BAD_REQUEST,
            "INVALID_RANGE",
            "Invalid range",
            e.to_string(),
            instance,
        ),
        ShapingError::InvalidQueryParam { .. } => from_parts(
            StatusCode::BAD_REQUEST,
            "INVALID_QUERY",
            "Invalid query",
            e.to_string(),
            instance,
        ),
        ShapingError::MissingIdentifier { .. }
        | ShapingError::DuplicateField { .. }
        | ShapingError::DuplicateSchema(_)
        | ShapingError::SchemaNotFound(_) => {
            tracing::error!(error = %e, "Entity schema misconfiguration");
            from_parts(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SCHEMA",
                "Internal error",
                "An internal error occurred",
                instance,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Missing;

    impl From<Missing> for ProblemResponse {
        fn from(_: Missing) -> Self {
            crate::problem::not_found("missing")
        }
    }

    #[test]
    fn invalid_range_maps_to_400() {
        let e = ShapingError::InvalidRange {
            filter: "age",
            min: "40".into(),
            max: "10".into(),
        };
        let p = shaping_error_to_problem(&e, "/api/companies/1/employees");
        assert_eq!(p.0.status, 400);
        assert_eq!(p.0.code, "INVALID_RANGE");
        assert_eq!(p.0.instance, "/api/companies/1/employees");
    }

    #[test]
    fn unparsable_query_maps_to_400() {
        let e = ShapingError::InvalidQueryParam {
            param: "pageSize",
            value: "many".into(),
        };
        let p = shaping_error_to_problem(&e, "/");
        assert_eq!(p.0.status, 400);
        assert_eq!(p.0.code, "INVALID_QUERY");
    }

    #[test]
    fn schema_errors_are_internal() {
        let p = shaping_error_to_problem(&ShapingError::SchemaNotFound("X"), "/");
        assert_eq!(p.0.status, 500);
        assert!(!p.0.detail.contains('X'));
    }

    #[test]
    fn api_error_renders_each_variant() {
        let r = ApiError::<Missing>::Domain(Missing).into_response();
        assert_eq!(r.status(), StatusCode::NOT_FOUND);

        let r = ApiError::<Missing>::from(ShapingError::SchemaNotFound("X")).into_response();
        assert_eq!(r.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let r = ApiError::<Missing>::from(crate::problem::bad_request("no")).into_response();
        assert_eq!(r.status(), StatusCode::BAD_REQUEST);
    }
}
