//! Storage traits shared by the PostgreSQL and in-memory backends.

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{NewWidgetA, NewWidgetB, UpdateWidgetA, UpdateWidgetB, WidgetA, WidgetB};

/// One page of rows plus the total row count of the (filtered) table.
pub type Page<T> = (Vec<T>, i64);

/// Storage for WidgetA rows.
///
/// Listing is ordered by ascending id. `update` and `delete` report a missing
/// row as `None` / `false` rather than an error.
#[async_trait]
pub trait WidgetARepository: Send + Sync {
    async fn create(&self, new_widget: NewWidgetA) -> AppResult<WidgetA>;

    async fn find_by_id(&self, widget_id: i32) -> AppResult<Option<WidgetA>>;

    async fn list_paginated(&self, offset: i64, limit: i64) -> AppResult<Page<WidgetA>>;

    async fn update(&self, widget_id: i32, changes: UpdateWidgetA) -> AppResult<Option<WidgetA>>;

    /// Also detaches every WidgetB that referenced the row.
    async fn delete(&self, widget_id: i32) -> AppResult<bool>;
}

/// Storage for WidgetB rows.
#[async_trait]
pub trait WidgetBRepository: Send + Sync {
    async fn create(&self, new_widget: NewWidgetB) -> AppResult<WidgetB>;

    async fn find_by_id(&self, widget_id: i32) -> AppResult<Option<WidgetB>>;

    /// With `parent` set only rows referencing that WidgetA are counted and returned.
    async fn list_paginated(
        &self,
        parent: Option<i32>,
        offset: i64,
        limit: i64,
    ) -> AppResult<Page<WidgetB>>;

    async fn update(&self, widget_id: i32, changes: UpdateWidgetB) -> AppResult<Option<WidgetB>>;

    async fn delete(&self, widget_id: i32) -> AppResult<bool>;
}
