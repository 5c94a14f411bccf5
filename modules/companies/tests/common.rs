#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use tower::ServiceExt;

use companies::infra::storage::migrations::Migrator;
use companies::{Companies, CompaniesConfig};

/// A single-connection in-memory SQLite database. Every pooled connection
/// would otherwise see its own empty database.
pub async fn connect() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1).sqlx_logging(false);
    Database::connect(opts)
        .await
        .expect("Failed to connect to test database")
}

/// Fresh database with migrations applied.
pub async fn test_db() -> DatabaseConnection {
    let db = connect().await;
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

/// Module over a migrated database holding the demo companies.
pub async fn seeded_module() -> Companies {
    let config = CompaniesConfig {
        seed_demo_data: true,
        ..CompaniesConfig::default()
    };
    let module = Companies::init(connect().await, config).expect("init");
    module.migrate().await.expect("migrate");
    module
}

pub fn router(module: &Companies) -> Router {
    module.register_rest(Router::new())
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// `X-Pagination` parsed as JSON.
    pub fn pagination(&self) -> Value {
        serde_json::from_str(self.header("x-pagination").expect("X-Pagination header"))
            .expect("X-Pagination is JSON")
    }
}

pub async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&json).unwrap())
        }
        None => Body::empty(),
    };
    let response = router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    TestResponse {
        status,
        headers,
        body,
    }
}

pub async fn get(router: &Router, uri: &str) -> TestResponse {
    send(router, Method::GET, uri, None).await
}

/// Values of `key` across a JSON array body.
pub fn column<'a>(body: &'a Value, key: &str) -> Vec<&'a Value> {
    body.as_array()
        .expect("array body")
        .iter()
        .map(|item| &item[key])
        .collect()
}
