use utoipa::OpenApi;

pub const WIDGET_A_TAG: &str = "WidgetA";
pub const WIDGET_B_TAG: &str = "WidgetB";
pub const HEALTH_TAG: &str = "Health";
pub const LOGGING_TAG: &str = "Logging";

pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Widgets",
        description = "CRUD API for WidgetA and WidgetB",
    ),
    components(
        schemas(
            crate::api::dto::ErrorResponse,
            crate::error::ValidationFieldError,
        )
    ),
    tags(
        (name = WIDGET_A_TAG, description = "WidgetA endpoints"),
        (name = WIDGET_B_TAG, description = "WidgetB endpoints"),
        (name = HEALTH_TAG, description = "Health check endpoints"),
        (name = LOGGING_TAG, description = "Runtime log level"),
    )
)]
pub struct ApiDoc;
