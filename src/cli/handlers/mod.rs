//! One handler per subcommand family.

pub mod migrate;
pub mod serve;
pub mod widgets;

pub use migrate::MigrateCommandHandler;
pub use serve::ServeCommandHandler;
pub use widgets::{WidgetCommandHandler, retry_hint};
