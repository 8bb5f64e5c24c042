//! Error handler for converting AppError to HTTP responses.
//!
//! [`AppError`] renders itself as an [`ErrorResponse`]; [`global_error_handler`]
//! catches everything else (router 404/405, timeouts, plain-text rejections)
//! and stamps the request id on every error body.

use axum::{
    Json,
    body::{Body, Bytes},
    extract::{
        Request,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{HeaderValue, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};

use super::RequestId;
use crate::api::dto::ErrorResponse;
use crate::error::AppError;

/// Upper bound when buffering an error body for rewriting.
const MAX_ERROR_BODY_BYTES: usize = 64 * 1024;

impl IntoResponse for AppError {
    /// # Status Code Mapping
    /// - NotFound → 404
    /// - Duplicate → 409
    /// - Validation / ValidationErrors / BadRequest → 400
    /// - ConnectionPool → 503
    /// - Database / Internal → 500, message sanitized
    fn into_response(self) -> Response {
        let status = error_to_status_code(&self);
        let code = error_to_code(&self);

        let body = match &self {
            AppError::NotFound {
                entity,
                field,
                value,
            } => ErrorResponse::new(code, format!("{entity} not found"))
                .with_details(json!({ "entity": entity, "field": field, "value": value })),
            AppError::Duplicate {
                entity,
                field,
                value,
            } => ErrorResponse::new(code, format!("{entity} with {field} '{value}' already exists"))
                .with_details(json!({ "entity": entity, "field": field, "value": value })),
            AppError::Validation { .. } | AppError::ValidationErrors { .. } => {
                ErrorResponse::new(code, "Request validation failed")
                    .with_details(json!({ "errors": self.field_errors() }))
            }
            AppError::BadRequest { message } => ErrorResponse::new(code, message.as_str()),
            AppError::Database { operation, source } => {
                tracing::error!(operation = %operation, error = ?source, "Database operation failed");
                ErrorResponse::new(code, "Database operation failed")
            }
            AppError::ConnectionPool { source } => {
                tracing::error!(error = ?source, "Database connection unavailable");
                ErrorResponse::new(code, "Database connection unavailable")
            }
            AppError::Internal { source } => {
                tracing::error!(error = ?source, "Internal error");
                ErrorResponse::new(code, "An internal error occurred")
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let message = match rejection {
            JsonRejection::MissingJsonContentType(_) => {
                "Expected request with `Content-Type: application/json`".to_string()
            }
            other => other.body_text(),
        };
        AppError::BadRequest { message }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest {
            message: rejection.body_text(),
        }
    }
}

/// Maps an AppError variant to its HTTP status code.
pub fn error_to_status_code(error: &AppError) -> StatusCode {
    match error {
        AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        AppError::Duplicate { .. } => StatusCode::CONFLICT,
        AppError::Validation { .. }
        | AppError::ValidationErrors { .. }
        | AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        AppError::ConnectionPool { .. } => StatusCode::SERVICE_UNAVAILABLE,
        AppError::Database { .. } | AppError::Internal { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Maps an AppError variant to its error code string.
pub fn error_to_code(error: &AppError) -> &'static str {
    match error {
        AppError::NotFound { .. } => "NOT_FOUND",
        AppError::Duplicate { .. } => "DUPLICATE_ENTRY",
        AppError::Validation { .. } | AppError::ValidationErrors { .. } => "VALIDATION_ERROR",
        AppError::BadRequest { .. } => "BAD_REQUEST",
        AppError::Database { .. } => "DATABASE_ERROR",
        AppError::ConnectionPool { .. } => "SERVICE_UNAVAILABLE",
        AppError::Internal { .. } => "INTERNAL_ERROR",
    }
}

fn status_to_code(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST => "BAD_REQUEST",
        StatusCode::NOT_FOUND => "NOT_FOUND",
        StatusCode::METHOD_NOT_ALLOWED => "METHOD_NOT_ALLOWED",
        StatusCode::UNSUPPORTED_MEDIA_TYPE => "UNSUPPORTED_MEDIA_TYPE",
        StatusCode::REQUEST_TIMEOUT => "REQUEST_TIMEOUT",
        StatusCode::PAYLOAD_TOO_LARGE => "PAYLOAD_TOO_LARGE",
        StatusCode::UNPROCESSABLE_ENTITY => "UNPROCESSABLE_CONTENT",
        StatusCode::SERVICE_UNAVAILABLE => "SERVICE_UNAVAILABLE",
        s if s.is_server_error() => "INTERNAL_SERVER_ERROR",
        _ => "UNKNOWN_ERROR",
    }
}

fn default_message(status: StatusCode) -> String {
    match status {
        StatusCode::NOT_FOUND => "The requested resource was not found".to_string(),
        StatusCode::METHOD_NOT_ALLOWED => "HTTP method not allowed for this endpoint".to_string(),
        StatusCode::REQUEST_TIMEOUT => "Request timeout".to_string(),
        s => s
            .canonical_reason()
            .unwrap_or("An unknown error occurred")
            .to_string(),
    }
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"))
}

/// Rewrites every error response into the [`ErrorResponse`] shape.
///
/// Must run inside `request_id_middleware` so the id is in the extensions.
pub async fn global_error_handler(request: Request, next: Next) -> Response {
    let request_id = request.extensions().get::<RequestId>().cloned();
    let response = next.run(request).await;

    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let already_json = is_json(&response);
    let (mut parts, body) = response.into_parts();
    let bytes = match axum::body::to_bytes(body, MAX_ERROR_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(_) => {
            parts.headers.remove(header::CONTENT_LENGTH);
            return Response::from_parts(parts, Body::empty());
        }
    };

    let mut value = if already_json {
        serde_json::from_slice::<Value>(&bytes).unwrap_or(Value::Null)
    } else {
        Value::Null
    };

    if !value.is_object() {
        let original = String::from_utf8_lossy(&bytes).trim().to_string();
        let message = if original.is_empty() {
            default_message(status)
        } else {
            original
        };
        value = json!(ErrorResponse::new(status_to_code(status), message));
    }

    if let (Some(RequestId(id)), Some(object)) = (request_id, value.as_object_mut()) {
        object
            .entry("requestId")
            .or_insert_with(|| Value::String(id));
    }

    let body = Bytes::from(serde_json::to_vec(&value).unwrap_or_default());
    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );

    Response::from_parts(parts, Body::from(body))
}
