//! WidgetA / WidgetB operations.
//!
//! Turns missing rows into `NotFound` and checks that a WidgetB only ever
//! references an existing WidgetA before touching storage.

use crate::error::{AppError, AppResult};
use crate::models::{NewWidgetA, NewWidgetB, UpdateWidgetA, UpdateWidgetB, WidgetA, WidgetB};
use crate::repositories::{Page, Repositories};

pub const WIDGET_A: &str = "WidgetA";
pub const WIDGET_B: &str = "WidgetB";

#[derive(Clone)]
pub struct WidgetService {
    repos: Repositories,
}

impl WidgetService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    // ------------------------------------------------------------------
    // WidgetA
    // ------------------------------------------------------------------

    pub async fn create_widget_a(&self, new_widget: NewWidgetA) -> AppResult<WidgetA> {
        let widget = self.repos.widgets_a.create(new_widget).await?;
        tracing::debug!(widget_a_id = widget.id, "WidgetA created");
        Ok(widget)
    }

    pub async fn get_widget_a(&self, id: i32) -> AppResult<WidgetA> {
        self.repos
            .widgets_a
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(WIDGET_A, id))
    }

    pub async fn list_widgets_a(&self, offset: i64, limit: i64) -> AppResult<Page<WidgetA>> {
        self.repos.widgets_a.list_paginated(offset, limit).await
    }

    /// An empty change set returns the stored row untouched.
    pub async fn update_widget_a(&self, id: i32, changes: UpdateWidgetA) -> AppResult<WidgetA> {
        self.repos
            .widgets_a
            .update(id, changes)
            .await?
            .ok_or_else(|| AppError::not_found(WIDGET_A, id))
    }

    /// Returns `false` when nothing was deleted.
    pub async fn delete_widget_a(&self, id: i32) -> AppResult<bool> {
        let deleted = self.repos.widgets_a.delete(id).await?;
        if deleted {
            tracing::debug!(widget_a_id = id, "WidgetA deleted, children detached");
        }
        Ok(deleted)
    }

    // ------------------------------------------------------------------
    // WidgetB
    // ------------------------------------------------------------------

    pub async fn create_widget_b(&self, new_widget: NewWidgetB) -> AppResult<WidgetB> {
        self.ensure_reference(new_widget.widget_a_id).await?;
        let widget = self.repos.widgets_b.create(new_widget).await?;
        tracing::debug!(widget_b_id = widget.id, widget_a_id = ?widget.widget_a_id, "WidgetB created");
        Ok(widget)
    }

    pub async fn get_widget_b(&self, id: i32) -> AppResult<WidgetB> {
        self.repos
            .widgets_b
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(WIDGET_B, id))
    }

    /// `parent` narrows the listing; an unknown parent simply yields no rows.
    pub async fn list_widgets_b(
        &self,
        parent: Option<i32>,
        offset: i64,
        limit: i64,
    ) -> AppResult<Page<WidgetB>> {
        self.repos
            .widgets_b
            .list_paginated(parent, offset, limit)
            .await
    }

    /// Children of one WidgetA; `NotFound` when the WidgetA does not exist.
    pub async fn list_children(
        &self,
        widget_a_id: i32,
        offset: i64,
        limit: i64,
    ) -> AppResult<Page<WidgetB>> {
        self.get_widget_a(widget_a_id).await?;
        self.list_widgets_b(Some(widget_a_id), offset, limit).await
    }

    pub async fn update_widget_b(&self, id: i32, changes: UpdateWidgetB) -> AppResult<WidgetB> {
        // Report a missing WidgetB before complaining about its reference
        self.get_widget_b(id).await?;
        if let Some(reference) = changes.widget_a_id {
            self.ensure_reference(reference).await?;
        }

        self.repos
            .widgets_b
            .update(id, changes)
            .await?
            .ok_or_else(|| AppError::not_found(WIDGET_B, id))
    }

    pub async fn delete_widget_b(&self, id: i32) -> AppResult<bool> {
        self.repos.widgets_b.delete(id).await
    }

    async fn ensure_reference(&self, widget_a_id: Option<i32>) -> AppResult<()> {
        let Some(parent) = widget_a_id else {
            return Ok(());
        };

        match self.repos.widgets_a.find_by_id(parent).await? {
            Some(_) => Ok(()),
            None => Err(AppError::Validation {
                field: "widgetAId".to_string(),
                reason: format!("{WIDGET_A} with id {parent} does not exist"),
            }),
        }
    }
}
