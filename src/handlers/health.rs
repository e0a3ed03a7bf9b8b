use crate::{db, AppState};
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub database: String,
    pub version: String,
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// Liveness plus database connectivity
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service and database are up", body = HealthStatus),
        (status = 503, description = "Database unreachable", body = HealthStatus)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let (status, database, code) = match db::check_connection(&state.db).await {
        Ok(()) => ("ok", "up", StatusCode::OK),
        Err(err) => {
            warn!(error = %err, "Health check failed to reach the database");
            ("degraded", "down", StatusCode::SERVICE_UNAVAILABLE)
        }
    };

    (
        code,
        Json(HealthStatus {
            status: status.to_string(),
            database: database.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}
