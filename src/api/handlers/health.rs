use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde_json::json;

use crate::AppState;

/// GET /health — liveness plus a database round trip.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let db_ok = sqlx::query("SELECT 1").execute(&state.db).await.is_ok();
    let timestamp = Utc::now().to_rfc3339();

    if db_ok {
        (
            StatusCode::OK,
            Json(json!({ "status": "healthy", "timestamp": timestamp })),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "unhealthy", "db": "disconnected", "timestamp": timestamp })),
        )
    }
}
