//! HTTP boundary helpers shared by REST modules: RFC 9457 problems, a
//! unified handler error type, response helpers and problem-rendering
//! extractors.

pub mod error;
pub mod extract;
pub mod problem;
pub mod response;

pub use error::{shaping_error_to_problem, ApiError};
pub use extract::{JsonPayload, PathParams, QueryParams};
pub use problem::{
    bad_request, from_parts, internal_error, not_found, unprocessable, Problem, ProblemResponse,
    ValidationError, APPLICATION_PROBLEM_JSON,
};
pub use response::{created_at, no_content, paged_json, pagination_headers, X_PAGINATION};
