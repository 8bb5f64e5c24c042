//! `GET /` greeting.

use axum::{Json, extract::State};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::HEALTH_TAG;
use crate::api::dto::WelcomeResponse;
use crate::state::AppState;

pub fn root_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(welcome))
}

#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Welcome message", body = WelcomeResponse)),
    tag = HEALTH_TAG
)]
pub async fn welcome(State(state): State<AppState>) -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: format!("Welcome to the widgets API ({} backend)", state.storage_backend()),
    })
}
