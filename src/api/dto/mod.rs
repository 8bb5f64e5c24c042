//! Data Transfer Objects for API requests and responses.
//!
//! - `widget` - WidgetA / WidgetB requests and responses
//! - `pagination` - paging parameters and the paginated envelope
//! - `error` - the error body shared by every failure
//! - `health` - health and welcome bodies
//! - `logging` - runtime log level

mod error;
mod health;
mod logging;
mod pagination;
mod widget;

pub use error::ErrorResponse;
pub use health::{ComponentHealth, HealthResponse, HealthStatus, WelcomeResponse};
pub use logging::{LogLevelRequest, LogLevelResponse};
pub use pagination::{DEFAULT_PAGE_SIZE, PaginatedResponse, PaginationParams, total_pages};
pub use widget::{
    CreateWidgetARequest, CreateWidgetBRequest, DESCRIPTION_MAX_CHARS, NAME_MAX_CHARS,
    UpdateWidgetARequest, UpdateWidgetBRequest, WidgetAResponse, WidgetBFilter, WidgetBResponse,
    validate_description, validate_name,
};
