//! HTTP client for the widgets API and the list/detail flows built on it.

pub mod error;
pub mod http;
pub mod list;
pub mod render;

pub use error::ClientError;
pub use http::{WidgetClient, decode_body};
pub use list::{ListPage, Resource, WidgetAResource, WidgetBResource};
pub use render::{Row, render_list, render_widget_a, render_widget_b};
