//! Route configuration.

use crate::handlers;
use crate::metrics::metrics_handler;
use crate::state::AppState;
use axum::Router;
use axum::routing::{get, post, put};
use tower_http::trace::TraceLayer;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/v1/health", get(handlers::health_check))
        .route("/v1/datasets", post(handlers::create_dataset))
        .route(
            "/v1/artifacts",
            post(handlers::create_artifact).get(handlers::get_artifact),
        )
        .route("/v1/tags", put(handlers::put_tag));

    // When enabled, this endpoint must be network-restricted to the
    // Prometheus scrapers. See crate::metrics.
    if state.config.server.metrics_enabled {
        router = router.route("/metrics", get(metrics_handler));
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}
