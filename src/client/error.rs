use thiserror::Error;

use crate::error::ValidationFieldError;

/// Everything that can go wrong talking to the widgets API.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid API URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-2xx answer; `message` comes from the error body when there is one
    #[error("{message} (HTTP {status}){}", format_fields(.errors))]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
        errors: Vec<ValidationFieldError>,
    },

    #[error("Unexpected response from {url}: {message}")]
    Decode { url: String, message: String },

    /// Rejected locally, nothing was sent
    #[error("Validation failed{}", format_fields(.errors))]
    Validation { errors: Vec<ValidationFieldError> },
}

fn format_fields(errors: &[ValidationFieldError]) -> String {
    if errors.is_empty() {
        return String::new();
    }
    let joined = errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ");
    format!(": {joined}")
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn field_errors(&self) -> &[ValidationFieldError] {
        match self {
            ClientError::Api { errors, .. } | ClientError::Validation { errors } => errors,
            _ => &[],
        }
    }
}

impl From<validator::ValidationErrors> for ClientError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ClientError::Validation {
            errors: crate::error::AppError::from(errors).field_errors(),
        }
    }
}
