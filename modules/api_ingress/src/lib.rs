//! HTTP front door: wraps module routes in the shared middleware stack and
//! serves them until a shutdown signal arrives.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{extract::Extension, middleware::from_fn, routing::get, Router};
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

mod config;
pub mod request_id;
pub mod web;

pub use config::ApiIngressConfig;

/// Owns the outer router. Modules hand in their routes (and optionally an
/// OpenAPI document); the ingress adds health, docs and middleware.
#[derive(Clone, Default)]
pub struct ApiIngress {
    config: ApiIngressConfig,
    openapi: Option<Arc<serde_json::Value>>,
}

impl ApiIngress {
    pub fn new(config: ApiIngressConfig) -> Self {
        Self {
            config,
            openapi: None,
        }
    }

    /// OpenAPI document served at `/openapi.json` when docs are enabled.
    pub fn with_openapi(mut self, doc: serde_json::Value) -> Self {
        self.openapi = Some(Arc::new(doc));
        self
    }

    pub fn config(&self) -> &ApiIngressConfig {
        &self.config
    }

    /// Build the HTTP router around `routes`.
    pub fn build_router(&self, routes: Router) -> Router {
        tracing::debug!("Building router");
        let mut router = Router::new()
            .route("/health", get(web::health_check))
            .merge(routes);

        if self.config.enable_docs {
            if let Some(doc) = &self.openapi {
                router = router
                    .route("/openapi.json", get(web::serve_openapi))
                    .route("/docs", get(web::serve_docs))
                    .layer(Extension(web::OpenApiDoc(doc.clone())));
            } else {
                tracing::warn!("enable_docs is set but no OpenAPI document was registered");
            }
        }

        let router = router.fallback(web::not_found);

        // Layers are added innermost first. Resulting order, outermost to innermost:
        // SetRequestId -> PropagateRequestId -> Trace -> push_req_id_to_extensions
        //   -> CORS -> Timeout -> BodyLimit -> handler
        let x_request_id = request_id::header();

        let mut router = router
            .layer(RequestBodyLimitLayer::new(self.config.body_limit_bytes))
            .layer(TimeoutLayer::new(Duration::from_secs(self.config.timeout_sec)));

        if self.config.cors_enabled {
            router = router.layer(CorsLayer::permissive());
        }

        router
            .layer(from_fn(request_id::push_req_id_to_extensions))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(request_id::make_span)
                    .on_response(request_id::on_response),
            )
            .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
            .layer(SetRequestIdLayer::new(x_request_id, request_id::MakeReqId))
    }

    /// Bind `bind_addr` and serve `router` until `shutdown` resolves.
    pub async fn serve<F>(&self, router: Router, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(&self.config.bind_addr)
            .await
            .with_context(|| format!("Failed to bind '{}'", self.config.bind_addr))?;
        serve_listener(listener, router, shutdown).await
    }
}

/// Serve on an already bound listener with graceful shutdown.
pub async fn serve_listener<F>(listener: TcpListener, router: Router, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    tracing::info!("HTTP server bound on {}", addr);

    let shutdown = async move {
        shutdown.await;
        tracing::info!("HTTP server shutting down gracefully");
    };

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server failed")
}
