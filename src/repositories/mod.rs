//! Data access for widgets.
//!
//! Handlers and services only see the [`WidgetARepository`] and
//! [`WidgetBRepository`] traits; the backend is chosen from
//! `database.backend` at startup.

mod memory;
mod traits;
mod widget_a_repo;
mod widget_b_repo;

pub use memory::MemoryStore;
pub use traits::{Page, WidgetARepository, WidgetBRepository};
pub use widget_a_repo::PgWidgetARepository;
pub use widget_b_repo::PgWidgetBRepository;

use std::sync::Arc;

use crate::db::AsyncDbPool;

/// Aggregates the repositories; cloning only bumps reference counts.
#[derive(Clone)]
pub struct Repositories {
    pub widgets_a: Arc<dyn WidgetARepository>,
    pub widgets_b: Arc<dyn WidgetBRepository>,
}

impl Repositories {
    pub fn postgres(pool: AsyncDbPool) -> Self {
        Self {
            widgets_a: Arc::new(PgWidgetARepository::new(pool.clone())),
            widgets_b: Arc::new(PgWidgetBRepository::new(pool)),
        }
    }

    /// Both traits served by one shared [`MemoryStore`].
    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            widgets_a: store.clone(),
            widgets_b: store,
        }
    }
}
