use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};

use crate::api::rest::handlers;
use crate::api::rest::schema::ShapingContext;
use crate::domain::service::Service;

/// Mount the companies and employees routes on `router`.
///
/// Path parameters keep the same name at the same segment across routes
/// (`{company_id}` then `{id}`) since the router rejects conflicting names.
pub fn register_routes(
    router: Router,
    service: Arc<Service>,
    shaping: Arc<ShapingContext>,
) -> Router {
    router
        .route(
            "/api/companies",
            get(handlers::list_companies).post(handlers::create_company),
        )
        .route(
            "/api/companies/collection",
            post(handlers::create_company_collection),
        )
        .route(
            "/api/companies/collection/{ids}",
            get(handlers::get_company_collection),
        )
        .route(
            "/api/companies/{company_id}",
            get(handlers::get_company)
                .put(handlers::update_company)
                .delete(handlers::delete_company),
        )
        .route(
            "/api/companies/{company_id}/employees",
            get(handlers::list_employees).post(handlers::create_employee),
        )
        .route(
            "/api/companies/{company_id}/employees/{id}",
            get(handlers::get_employee)
                .put(handlers::update_employee)
                .patch(handlers::patch_employee)
                .delete(handlers::delete_employee),
        )
        .layer(Extension(shaping))
        .layer(Extension(service))
}
