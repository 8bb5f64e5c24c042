//! WidgetB handlers, mounted under `/api/widgets`.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::WIDGET_B_TAG;
use crate::api::dto::{
    CreateWidgetBRequest, ErrorResponse, PaginatedResponse, PaginationParams,
    UpdateWidgetBRequest, WidgetBFilter, WidgetBResponse,
};
use crate::error::{AppError, AppResult};
use crate::services::WIDGET_B;
use crate::state::AppState;
use crate::utils::validate::{ValidatedJson, ValidatedQuery};

pub fn widget_b_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_widgets_b, create_widget_b))
        .routes(routes!(get_widget_b, update_widget_b, delete_widget_b))
}

/// `widgetAId` narrows the listing; an unknown id yields an empty page.
#[utoipa::path(
    get,
    path = "/widget-b",
    tag = WIDGET_B_TAG,
    params(PaginationParams, WidgetBFilter),
    responses(
        (status = 200, description = "One page of WidgetBs", body = PaginatedResponse<WidgetBResponse>),
        (status = 400, description = "Invalid query parameters", body = ErrorResponse)
    )
)]
async fn list_widgets_b(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<PaginationParams>,
    ValidatedQuery(filter): ValidatedQuery<WidgetBFilter>,
) -> AppResult<Json<PaginatedResponse<WidgetBResponse>>> {
    let (widgets, total) = state
        .services
        .widgets
        .list_widgets_b(filter.widget_a_id, params.offset(), params.limit())
        .await?;

    let page = PaginatedResponse::new(widgets, &params, total.max(0) as u64);
    Ok(Json(page.map(WidgetBResponse::from)))
}

#[utoipa::path(
    post,
    path = "/widget-b",
    tag = WIDGET_B_TAG,
    request_body = CreateWidgetBRequest,
    responses(
        (status = 201, description = "WidgetB created", body = WidgetBResponse),
        (status = 400, description = "Validation failed or unknown widgetAId", body = ErrorResponse)
    )
)]
async fn create_widget_b(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateWidgetBRequest>,
) -> AppResult<(StatusCode, Json<WidgetBResponse>)> {
    let widget = state
        .services
        .widgets
        .create_widget_b(payload.into_new())
        .await?;
    Ok((StatusCode::CREATED, Json(widget.into())))
}

#[utoipa::path(
    get,
    path = "/widget-b/{id}",
    tag = WIDGET_B_TAG,
    params(("id" = i32, Path, description = "WidgetB ID")),
    responses(
        (status = 200, description = "WidgetB found", body = WidgetBResponse),
        (status = 404, description = "WidgetB not found", body = ErrorResponse)
    )
)]
async fn get_widget_b(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<WidgetBResponse>> {
    let widget = state.services.widgets.get_widget_b(id).await?;
    Ok(Json(widget.into()))
}

#[utoipa::path(
    put,
    path = "/widget-b/{id}",
    tag = WIDGET_B_TAG,
    params(("id" = i32, Path, description = "WidgetB ID")),
    request_body = UpdateWidgetBRequest,
    responses(
        (status = 200, description = "WidgetB updated", body = WidgetBResponse),
        (status = 400, description = "Validation failed or unknown widgetAId", body = ErrorResponse),
        (status = 404, description = "WidgetB not found", body = ErrorResponse)
    )
)]
async fn update_widget_b(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateWidgetBRequest>,
) -> AppResult<Json<WidgetBResponse>> {
    let widget = state
        .services
        .widgets
        .update_widget_b(id, payload.into_update())
        .await?;
    Ok(Json(widget.into()))
}

#[utoipa::path(
    delete,
    path = "/widget-b/{id}",
    tag = WIDGET_B_TAG,
    params(("id" = i32, Path, description = "WidgetB ID")),
    responses(
        (status = 204, description = "WidgetB deleted"),
        (status = 404, description = "WidgetB not found", body = ErrorResponse)
    )
)]
async fn delete_widget_b(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    if state.services.widgets.delete_widget_b(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found(WIDGET_B, id))
    }
}
