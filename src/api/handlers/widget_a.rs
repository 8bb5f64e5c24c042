//! WidgetA handlers, mounted under `/api/widgets`.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::WIDGET_A_TAG;
use crate::api::dto::{
    CreateWidgetARequest, ErrorResponse, PaginatedResponse, PaginationParams,
    UpdateWidgetARequest, WidgetAResponse, WidgetBResponse,
};
use crate::error::{AppError, AppResult};
use crate::services::WIDGET_A;
use crate::state::AppState;
use crate::utils::validate::{ValidatedJson, ValidatedQuery};

/// Routes:
/// - GET    /widget-a
/// - POST   /widget-a
/// - GET    /widget-a/{id}
/// - PUT    /widget-a/{id}
/// - DELETE /widget-a/{id}
/// - GET    /widget-a/{id}/widget-b
pub fn widget_a_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_widgets_a, create_widget_a))
        .routes(routes!(get_widget_a, update_widget_a, delete_widget_a))
        .routes(routes!(list_widget_a_children))
}

#[utoipa::path(
    get,
    path = "/widget-a",
    tag = WIDGET_A_TAG,
    params(PaginationParams),
    responses(
        (status = 200, description = "One page of WidgetAs", body = PaginatedResponse<WidgetAResponse>),
        (status = 400, description = "Invalid paging parameters", body = ErrorResponse)
    )
)]
async fn list_widgets_a(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<PaginationParams>,
) -> AppResult<Json<PaginatedResponse<WidgetAResponse>>> {
    let (widgets, total) = state
        .services
        .widgets
        .list_widgets_a(params.offset(), params.limit())
        .await?;

    let page = PaginatedResponse::new(widgets, &params, total.max(0) as u64);
    Ok(Json(page.map(WidgetAResponse::from)))
}

#[utoipa::path(
    post,
    path = "/widget-a",
    tag = WIDGET_A_TAG,
    request_body = CreateWidgetARequest,
    responses(
        (status = 201, description = "WidgetA created", body = WidgetAResponse),
        (status = 400, description = "Validation failed", body = ErrorResponse)
    )
)]
async fn create_widget_a(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateWidgetARequest>,
) -> AppResult<(StatusCode, Json<WidgetAResponse>)> {
    let widget = state
        .services
        .widgets
        .create_widget_a(payload.into_new())
        .await?;
    Ok((StatusCode::CREATED, Json(widget.into())))
}

#[utoipa::path(
    get,
    path = "/widget-a/{id}",
    tag = WIDGET_A_TAG,
    params(("id" = i32, Path, description = "WidgetA ID")),
    responses(
        (status = 200, description = "WidgetA found", body = WidgetAResponse),
        (status = 404, description = "WidgetA not found", body = ErrorResponse)
    )
)]
async fn get_widget_a(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<WidgetAResponse>> {
    let widget = state.services.widgets.get_widget_a(id).await?;
    Ok(Json(widget.into()))
}

#[utoipa::path(
    put,
    path = "/widget-a/{id}",
    tag = WIDGET_A_TAG,
    params(("id" = i32, Path, description = "WidgetA ID")),
    request_body = UpdateWidgetARequest,
    responses(
        (status = 200, description = "WidgetA updated", body = WidgetAResponse),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 404, description = "WidgetA not found", body = ErrorResponse)
    )
)]
async fn update_widget_a(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateWidgetARequest>,
) -> AppResult<Json<WidgetAResponse>> {
    let widget = state
        .services
        .widgets
        .update_widget_a(id, payload.into_update())
        .await?;
    Ok(Json(widget.into()))
}

/// Attached WidgetBs are detached, not deleted.
#[utoipa::path(
    delete,
    path = "/widget-a/{id}",
    tag = WIDGET_A_TAG,
    params(("id" = i32, Path, description = "WidgetA ID")),
    responses(
        (status = 204, description = "WidgetA deleted"),
        (status = 404, description = "WidgetA not found", body = ErrorResponse)
    )
)]
async fn delete_widget_a(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    if state.services.widgets.delete_widget_a(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found(WIDGET_A, id))
    }
}

#[utoipa::path(
    get,
    path = "/widget-a/{id}/widget-b",
    tag = WIDGET_A_TAG,
    params(("id" = i32, Path, description = "WidgetA ID"), PaginationParams),
    responses(
        (status = 200, description = "WidgetBs attached to the WidgetA", body = PaginatedResponse<WidgetBResponse>),
        (status = 404, description = "WidgetA not found", body = ErrorResponse)
    )
)]
async fn list_widget_a_children(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedQuery(params): ValidatedQuery<PaginationParams>,
) -> AppResult<Json<PaginatedResponse<WidgetBResponse>>> {
    let (children, total) = state
        .services
        .widgets
        .list_children(id, params.offset(), params.limit())
        .await?;

    let page = PaginatedResponse::new(children, &params, total.max(0) as u64);
    Ok(Json(page.map(WidgetBResponse::from)))
}
