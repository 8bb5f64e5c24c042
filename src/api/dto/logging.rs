//! Runtime log level bodies.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct LogLevelRequest {
    /// A level (`debug`) or full filter directives (`info,widgets_rs::api=trace`)
    #[serde(default)]
    #[validate(length(min = 1, message = "Level is required"))]
    #[schema(example = "debug")]
    pub level: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LogLevelResponse {
    #[schema(example = "info")]
    pub level: String,
}
