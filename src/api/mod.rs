//! API module
//!
//! HTTP surface over the ledger service.

use std::sync::Arc;

use axum::{middleware as axum_middleware, Router};
use tower_http::trace::TraceLayer;

use crate::service::LedgerService;

pub mod middleware;
pub mod routes;

pub use middleware::RequestTimeout;
pub use routes::{create_router, ServiceHandle};

/// Assemble the full application: routes, operation-context injection,
/// request logging, health probe.
///
/// Layers run bottom-up, so the context is attached before logging reads it.
pub fn build_router(service: Arc<dyn LedgerService>, timeout: RequestTimeout) -> Router {
    let api_router = create_router()
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
        .layer(axum_middleware::from_fn_with_state(
            timeout,
            middleware::context_middleware,
        ));

    Router::new()
        .route("/health", axum::routing::get(health_check))
        .merge(api_router)
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
