//! Tests to verify that service methods and handlers emit the expected logs

mod common;

use axum::http::StatusCode;
use shaping_core::OrderExpression;
use tracing_test::traced_test;
use uuid::Uuid;

use companies::domain::repo::{CompanyFilter, PageRequest};
use companies::infra::storage::seed::IT_SOLUTIONS;

#[traced_test]
#[tokio::test]
async fn list_companies_emits_span() {
    let module = common::seeded_module().await;
    let result = module
        .service()
        .list_companies(
            CompanyFilter::default(),
            OrderExpression::empty(),
            PageRequest::new(1, 10),
        )
        .await;

    assert!(result.is_ok());
    assert!(logs_contain("companies.service.list_companies"));
    assert!(logs_contain("Listed companies"));
}

#[traced_test]
#[tokio::test]
async fn get_company_failure_is_logged_by_handler() {
    let module = common::seeded_module().await;
    let app = common::router(&module);

    let resp = common::get(&app, &format!("/api/companies/{}", Uuid::new_v4())).await;

    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert!(logs_contain("companies.service.get_company"));
    assert!(logs_contain("Failed to get company"));
}

#[traced_test]
#[tokio::test]
async fn unknown_sort_and_field_names_are_logged() {
    let module = common::seeded_module().await;
    let app = common::router(&module);

    let resp = common::get(
        &app,
        &format!("/api/companies/{IT_SOLUTIONS}/employees?orderBy=salary&fields=name,shoe"),
    )
    .await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(logs_contain("Ignoring unknown sort or field names"));
    assert!(logs_contain("salary"));
    assert!(logs_contain("shoe"));
}
