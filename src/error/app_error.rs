use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::error::DatabaseErrorConverter;

/// Application-wide error type.
///
/// Every handler returns this; [`axum::response::IntoResponse`] for it lives in
/// `api::middleware::error_handler`.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Resource not found: {entity} with {field}={value}")]
    NotFound {
        entity: String,
        field: String,
        value: String,
    },

    #[error("Duplicate entry: {entity}.{field} = '{value}' already exists")]
    Duplicate {
        entity: String,
        field: String,
        value: String,
    },

    /// Single-field rule violation detected by a service or the database
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Request body failed its declared field rules
    #[error("Validation failed: {}", summarize(.errors))]
    ValidationErrors { errors: Vec<ValidationFieldError> },

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Database operation failed: {operation}")]
    Database {
        operation: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Connection pool error")]
    ConnectionPool {
        #[source]
        source: anyhow::Error,
    },

    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

/// One `{field, message}` entry of a validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ValidationFieldError {
    #[schema(example = "name")]
    pub field: String,
    #[schema(example = "Name is required")]
    pub message: String,
}

impl ValidationFieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

fn summarize(errors: &[ValidationFieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl AppError {
    pub fn not_found(entity: &str, id: i32) -> Self {
        AppError::NotFound {
            entity: entity.to_string(),
            field: "id".to_string(),
            value: id.to_string(),
        }
    }

    /// Field errors in a stable order, whatever the variant.
    pub fn field_errors(&self) -> Vec<ValidationFieldError> {
        match self {
            AppError::ValidationErrors { errors } => errors.clone(),
            AppError::Validation { field, reason } => {
                vec![ValidationFieldError::new(field.clone(), reason.clone())]
            }
            _ => Vec::new(),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<ValidationFieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                let field = field.to_string();
                errs.iter().map(move |err| {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string());
                    ValidationFieldError::new(field.clone(), message)
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field).then(a.message.cmp(&b.message)));

        AppError::ValidationErrors { errors: fields }
    }
}

impl From<crate::config::ConfigError> for AppError {
    fn from(error: crate::config::ConfigError) -> Self {
        match error {
            crate::config::ConfigError::ValidationError { field, message } => {
                AppError::Validation {
                    field,
                    reason: message,
                }
            }
            other => AppError::Internal {
                source: anyhow::Error::new(other),
            },
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl From<diesel::result::Error> for AppError {
    fn from(error: diesel::result::Error) -> Self {
        DatabaseErrorConverter::convert_diesel_error(error, "database operation")
    }
}

impl From<bb8::RunError<diesel_async::pooled_connection::PoolError>> for AppError {
    fn from(error: bb8::RunError<diesel_async::pooled_connection::PoolError>) -> Self {
        AppError::ConnectionPool {
            source: anyhow::Error::new(error),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
