//! Business rules on top of the repositories.

mod widget_service;

pub use widget_service::{WIDGET_A, WIDGET_B, WidgetService};

use crate::repositories::Repositories;

/// Aggregates all services; cheap to clone.
#[derive(Clone)]
pub struct Services {
    pub widgets: WidgetService,
}

impl Services {
    pub fn new(repos: Repositories) -> Self {
        Self {
            widgets: WidgetService::new(repos),
        }
    }
}
