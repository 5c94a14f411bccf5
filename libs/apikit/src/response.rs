use axum::{
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use shaping_core::{PageMeta, PagedResult};

use crate::problem::{internal_error, ProblemResponse};

/// Response header carrying the serialized [`PageMeta`] of a list response.
pub const X_PAGINATION: HeaderName = HeaderName::from_static("x-pagination");

/// 201 Created + `Location` + JSON
pub fn created_at<T: serde::Serialize>(location: &str, value: T) -> Response {
    let mut resp = (StatusCode::CREATED, Json(value)).into_response();
    if let Ok(v) = HeaderValue::from_str(location) {
        resp.headers_mut().insert(header::LOCATION, v);
    }
    resp
}

/// 204 No Content
pub fn no_content() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

/// `X-Pagination` header map for `meta`.
pub fn pagination_headers(meta: &PageMeta) -> Result<HeaderMap, ProblemResponse> {
    let json = serde_json::to_string(meta).map_err(|e| {
        tracing::error!(error = %e, "Failed to serialize pagination metadata");
        internal_error("Failed to serialize pagination metadata")
    })?;
    let value = HeaderValue::from_str(&json).map_err(|e| {
        tracing::error!(error = %e, "Pagination metadata is not a valid header value");
        internal_error("Failed to serialize pagination metadata")
    })?;

    let mut headers = HeaderMap::new();
    headers.insert(X_PAGINATION, value);
    Ok(headers)
}

/// 200 OK with the page items as the JSON body and the metadata in `X-Pagination`.
pub fn paged_json<T: serde::Serialize>(page: PagedResult<T>) -> Result<Response, ProblemResponse> {
    let (items, meta) = page.into_parts();
    let headers = pagination_headers(&meta)?;
    Ok((StatusCode::OK, headers, Json(items)).into_response())
}


#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn paged_json_splits_body_and_header() {
        let page = PagedResult::new(vec!["a", "b"], 2, 2, 5);
        let resp = paged_json(page).unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let header = resp
            .headers()
            .get("X-Pagination")
            .and_then(|v| v.to_str().ok())
            .unwrap()
            .to_string();
        let meta: PageMeta = serde_json::from_str(&header).unwrap();
        assert_eq!(meta, PageMeta::new(2, 2, 5));

        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let items: Vec<String> = serde_json::from_slice(&body).unwrap();
        assert_eq!(items, ["a", "b"]);
    }

    #[test]
    fn created_at_sets_location() {
        let resp = created_at("/api/companies/42", serde_json::json!({"id": 42}));
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap(),
            "/api/companies/42"
        );
    }

    #[tokio::test]
    async fn no_content_has_empty_body() {
        let resp = no_content();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert!(body.is_empty());
    }
}
