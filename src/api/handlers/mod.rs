//! HTTP request handlers, one module per resource.

pub mod health;
pub mod logging;
pub mod root;
pub mod widget_a;
pub mod widget_b;
