//! Reads and changes the log filter of the running server.

use axum::{Json, extract::State};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::LOGGING_TAG;
use crate::api::dto::{ErrorResponse, LogLevelRequest, LogLevelResponse};
use crate::error::{AppError, AppResult};
use crate::logger::LogLevelHandle;
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;

/// - `GET /api/logging/level`
/// - `PUT /api/logging/level`
pub fn logging_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(get_log_level, set_log_level))
}

fn handle(state: &AppState) -> AppResult<&LogLevelHandle> {
    state.log_level.as_ref().ok_or_else(|| AppError::BadRequest {
        message: "Runtime log level changes are not enabled on this server".to_string(),
    })
}

fn current(handle: &LogLevelHandle) -> AppResult<LogLevelResponse> {
    let level = handle.current_level().ok_or_else(|| AppError::Internal {
        source: anyhow::anyhow!("Log subscriber is no longer installed"),
    })?;
    Ok(LogLevelResponse { level })
}

#[utoipa::path(
    get,
    path = "/api/logging/level",
    tag = LOGGING_TAG,
    responses(
        (status = 200, description = "Active filter", body = LogLevelResponse),
        (status = 400, description = "No reloadable logger", body = ErrorResponse)
    )
)]
async fn get_log_level(State(state): State<AppState>) -> AppResult<Json<LogLevelResponse>> {
    Ok(Json(current(handle(&state)?)?))
}

#[utoipa::path(
    put,
    path = "/api/logging/level",
    tag = LOGGING_TAG,
    request_body = LogLevelRequest,
    responses(
        (status = 200, description = "Filter replaced", body = LogLevelResponse),
        (status = 400, description = "Unknown level or directive", body = ErrorResponse)
    )
)]
async fn set_log_level(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LogLevelRequest>,
) -> AppResult<Json<LogLevelResponse>> {
    let handle = handle(&state)?;
    let previous = handle.current_level();

    handle
        .set_level(payload.level.trim())
        .map_err(|e| AppError::Validation {
            field: "level".to_string(),
            reason: e.to_string(),
        })?;

    let response = current(handle)?;
    tracing::info!(previous = ?previous, level = %response.level, "Log level changed");
    Ok(Json(response))
}
