mod widget_a;
mod widget_b;

pub use widget_a::{NewWidgetA, UpdateWidgetA, WidgetA};
pub use widget_b::{NewWidgetB, UpdateWidgetB, WidgetB};
