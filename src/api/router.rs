use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;
use super::auth::require_auth;
use super::handlers;

pub fn create_router(state: AppState) -> Router {
    // Public routes — no authentication required
    let public = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::metrics::render))
        .route("/api/auth/login", post(handlers::auth::login));

    // Protected API routes — require Bearer token when AUTH_SECRET is set
    let protected = Router::new()
        // Orders
        .route("/api/orders", get(handlers::orders::list).post(handlers::orders::create))
        .route(
            "/api/orders/:id",
            get(handlers::orders::detail)
                .put(handlers::orders::update)
                .delete(handlers::orders::delete),
        )
        .route(
            "/api/orders/:id/milestones/:milestone",
            post(handlers::orders::set_milestone),
        )
        // CSV transfer
        .route("/api/orders/export/csv", get(handlers::transfer::export_csv))
        .route("/api/orders/import/csv", post(handlers::transfer::import_csv))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    public
        .merge(protected)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
