//! Extractors whose rejections render as problem responses instead of
//! axum's plain-text defaults.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::http::StatusCode;
use serde::de::DeserializeOwned;

use crate::problem::{from_parts, ProblemResponse};

/// Query-string extractor. Undecodable query strings become `400 INVALID_QUERY`.
#[derive(Debug, Clone, Default)]
pub struct QueryParams<T>(pub T);

impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ProblemResponse;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(error = %rejection, "Rejected query string");
                Err(from_parts(
                    StatusCode::BAD_REQUEST,
                    "INVALID_QUERY",
                    "Invalid query",
                    rejection.body_text(),
                    parts.uri.path(),
                ))
            }
        }
    }
}

/// Path extractor. Segments that do not parse (e.g. a malformed UUID) become
/// `400 INVALID_PATH`.
#[derive(Debug, Clone)]
pub struct PathParams<T>(pub T);

impl<S, T> FromRequestParts<S> for PathParams<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ProblemResponse;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(error = %rejection, "Rejected path parameters");
                Err(from_parts(
                    StatusCode::BAD_REQUEST,
                    "INVALID_PATH",
                    "Invalid path parameter",
                    rejection.body_text(),
                    parts.uri.path(),
                ))
            }
        }
    }
}

/// JSON body extractor.
///
/// A missing or malformed body is `400 BAD_REQUEST`; a well-formed body that
/// does not fit the target type is `422 VALIDATION`.
#[derive(Debug, Clone, Default)]
pub struct JsonPayload<T>(pub T);

impl<S, T> FromRequest<S> for JsonPayload<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ProblemResponse;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let path = req.uri().path().to_owned();
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(error = %rejection, "Rejected JSON body");
                let (status, code, title) = match &rejection {
                    JsonRejection::JsonDataError(_) => (
                        StatusCode::UNPROCESSABLE_ENTITY,
                        "VALIDATION",
                        "Validation error",
                    ),
                    _ => (StatusCode::BAD_REQUEST, "INVALID_BODY", "Invalid body"),
                };
                Err(from_parts(status, code, title, rejection.body_text(), &path))
            }
        }
    }
}
