//! Router configuration for the API.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    http::{HeaderName, HeaderValue, Method, StatusCode, header},
    middleware,
    routing::get,
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;

use crate::api::doc::{ApiDoc, OPENAPI_JSON_PATH};
use crate::api::handlers;
use crate::api::middleware::{
    REQUEST_ID_HEADER, global_error_handler, logging_middleware, request_id_middleware,
};
use crate::config::ServerConfig;
use crate::state::AppState;

pub const API_PREFIX: &str = "/api/widgets";

fn api_router() -> OpenApiRouter<AppState> {
    let widgets = OpenApiRouter::new()
        .merge(handlers::widget_a::widget_a_routes())
        .merge(handlers::widget_b::widget_b_routes());

    OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(handlers::root::root_routes())
        .merge(handlers::health::health_routes())
        .merge(handlers::logging::logging_routes())
        .nest(API_PREFIX, widgets)
}

/// The OpenAPI document served at [`OPENAPI_JSON_PATH`].
pub fn openapi() -> utoipa::openapi::OpenApi {
    api_router().split_for_parts().1
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, request_id.clone()])
        .expose_headers([request_id]);

    if origins.iter().any(|o| o == "*") {
        return layer.allow_origin(AllowOrigin::any());
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring unusable CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(allowed))
}

/// Requests running past `timeout` are answered with 408.
fn timeout_layer(timeout: Duration) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout)
}

/// Creates the application router with all routes and middleware.
///
/// Last added runs first, so a request passes through compression, CORS,
/// request id, logging, error normalization and finally the timeout.
pub fn create_router(state: AppState, server: &ServerConfig) -> Router {
    let (router, openapi) = api_router().split_for_parts();
    let openapi = Arc::new(openapi);

    router
        .route(
            OPENAPI_JSON_PATH,
            get(move || {
                let openapi = Arc::clone(&openapi);
                async move { Json(openapi.as_ref().clone()) }
            }),
        )
        .layer(timeout_layer(Duration::from_secs(server.request_timeout)))
        .layer(middleware::from_fn(global_error_handler))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors_layer(&server.cors_origins))
        .layer(CompressionLayer::new())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_widget_routes() {
        let doc = openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        for expected in [
            "/",
            "/health",
            "/api/logging/level",
            "/api/widgets/widget-a",
            "/api/widgets/widget-a/{id}",
            "/api/widgets/widget-a/{id}/widget-b",
            "/api/widgets/widget-b",
            "/api/widgets/widget-b/{id}",
        ] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing {expected} in {paths:?}"
            );
        }
    }

    #[test]
    fn test_router_builds_with_wildcard_cors() {
        let server = ServerConfig {
            cors_origins: vec!["*".to_string()],
            ..Default::default()
        };
        let _router = create_router(AppState::in_memory("test"), &server);
    }

    #[tokio::test]
    async fn test_slow_request_times_out_with_error_body() {
        let router = Router::new()
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    "done"
                }),
            )
            .layer(timeout_layer(Duration::from_millis(50)))
            .layer(middleware::from_fn(global_error_handler));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await });

        let response = reqwest::get(format!("http://{address}/slow")).await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::REQUEST_TIMEOUT);

        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["code"], "REQUEST_TIMEOUT");
    }
}
