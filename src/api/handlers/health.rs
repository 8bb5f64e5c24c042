//! Health check endpoints for monitoring and load balancers.
//!
//! With the postgres backend the pool is probed directly; the memory backend
//! is always reported healthy.

use std::collections::BTreeMap;
use std::time::Instant;

use axum::{Json, extract::State, http::StatusCode};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::HEALTH_TAG;
use crate::api::dto::{ComponentHealth, HealthResponse, HealthStatus};
use crate::state::AppState;

/// - `GET /health`
/// - `GET /health/ready`
/// - `GET /health/live`
pub fn health_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(health_check))
        .routes(routes!(readiness_check))
        .routes(routes!(liveness_check))
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Service is unhealthy", body = HealthResponse)
    ),
    tag = HEALTH_TAG
)]
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let mut checks = BTreeMap::new();
    checks.insert("storage".to_string(), check_storage(&state).await);

    let response = HealthResponse::from_checks(&state.version, checks);
    let status = match response.status {
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
    };

    (status, Json(response))
}

/// Ready once storage answers.
#[utoipa::path(
    get,
    path = "/health/ready",
    responses(
        (status = 200, description = "Service is ready"),
        (status = 503, description = "Service is not ready")
    ),
    tag = HEALTH_TAG
)]
pub async fn readiness_check(State(state): State<AppState>) -> StatusCode {
    match check_storage(&state).await.status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Degraded | HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    }
}

#[utoipa::path(
    get,
    path = "/health/live",
    responses(
        (status = 200, description = "Service is alive")
    ),
    tag = HEALTH_TAG
)]
pub async fn liveness_check() -> StatusCode {
    StatusCode::OK
}

async fn check_storage(state: &AppState) -> ComponentHealth {
    let start_time = Instant::now();
    let Some(pool) = state.db_pool.as_ref() else {
        return ComponentHealth {
            status: HealthStatus::Healthy,
            message: Some("memory backend".to_string()),
            response_time_ms: Some(0),
        };
    };

    let (status, message) = match pool.get().await {
        Ok(mut conn) => {
            use diesel_async::RunQueryDsl;

            match diesel::sql_query("SELECT 1").execute(&mut conn).await {
                Ok(_) => (HealthStatus::Healthy, "postgres connected".to_string()),
                Err(e) => (HealthStatus::Unhealthy, format!("Query failed: {e}")),
            }
        }
        Err(e) => (HealthStatus::Unhealthy, format!("Connection failed: {e}")),
    };

    if status == HealthStatus::Unhealthy {
        tracing::warn!(message = %message, "Storage health check failed");
    }

    ComponentHealth {
        status,
        message: Some(message),
        response_time_ms: Some(start_time.elapsed().as_millis() as u64),
    }
}
