use std::sync::Arc;

use apikit::ProblemResponse;
use axum::{
    body::Body,
    extract::Extension,
    http::Request,
    response::{Html, Json},
};
use serde_json::{json, Value};

use crate::request_id::XRequestId;

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// The OpenAPI document registered at startup.
#[derive(Clone)]
pub struct OpenApiDoc(pub Arc<Value>);

pub async fn serve_openapi(Extension(doc): Extension<OpenApiDoc>) -> Json<Value> {
    Json((*doc.0).clone())
}

pub async fn serve_docs() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8"/>
  <title>Company Employees API</title>
  <script src="https://unpkg.com/@stoplight/elements@latest/web-components.min.js"></script>
  <link rel="stylesheet" href="https://unpkg.com/@stoplight/elements@latest/styles.min.css">
</head>
<body>
  <elements-api apiDescriptionUrl="/openapi.json" router="hash" layout="sidebar"></elements-api>
</body>
</html>"#,
    )
}

/// Problem response for paths no module serves.
pub async fn not_found(req: Request<Body>) -> ProblemResponse {
    let path = req.uri().path();
    let mut problem = apikit::not_found(format!("No route for {path}")).at(path);
    if let Some(XRequestId(id)) = req.extensions().get::<XRequestId>() {
        problem.0 = problem.0.with_request_id(id.clone());
    }
    problem
}
