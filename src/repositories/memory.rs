//! Process-local storage backend.
//!
//! Mirrors the PostgreSQL schema closely enough for the HTTP contract: ids are
//! assigned from 1 and never reused, listings are ordered by id, a dangling
//! `widget_a_id` is rejected, and deleting a WidgetA detaches its WidgetBs.

use std::collections::BTreeMap;

use async_trait::async_trait;
use jiff_diesel::ToDiesel;
use tokio::sync::RwLock;

use crate::error::{AppError, AppResult};
use crate::models::{NewWidgetA, NewWidgetB, UpdateWidgetA, UpdateWidgetB, WidgetA, WidgetB};
use crate::repositories::traits::{Page, WidgetARepository, WidgetBRepository};

#[derive(Default)]
struct Tables {
    widgets_a: BTreeMap<i32, WidgetA>,
    widgets_b: BTreeMap<i32, WidgetB>,
    last_a_id: i32,
    last_b_id: i32,
}

impl Tables {
    fn check_reference(&self, widget_a_id: Option<i32>) -> AppResult<()> {
        match widget_a_id {
            Some(parent) if !self.widgets_a.contains_key(&parent) => Err(AppError::Validation {
                field: "widgetAId".to_string(),
                reason: format!("Referenced record '{parent}' does not exist"),
            }),
            _ => Ok(()),
        }
    }
}

/// Both widget tables behind one lock, so parent deletes and child writes
/// observe each other.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn page_of<T: Clone>(rows: impl Iterator<Item = T>, offset: i64, limit: i64) -> Vec<T> {
    rows.skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .collect()
}

#[async_trait]
impl WidgetARepository for MemoryStore {
    async fn create(&self, new_widget: NewWidgetA) -> AppResult<WidgetA> {
        let mut tables = self.tables.write().await;
        tables.last_a_id += 1;

        let now = jiff::Timestamp::now().to_diesel();
        let widget = WidgetA {
            id: tables.last_a_id,
            name: new_widget.name,
            description: new_widget.description,
            created_at: now,
            updated_at: now,
        };
        tables.widgets_a.insert(widget.id, widget.clone());

        Ok(widget)
    }

    async fn find_by_id(&self, widget_id: i32) -> AppResult<Option<WidgetA>> {
        Ok(self.tables.read().await.widgets_a.get(&widget_id).cloned())
    }

    async fn list_paginated(&self, offset: i64, limit: i64) -> AppResult<Page<WidgetA>> {
        let tables = self.tables.read().await;
        let items = page_of(tables.widgets_a.values().cloned(), offset, limit);

        Ok((items, tables.widgets_a.len() as i64))
    }

    async fn update(&self, widget_id: i32, changes: UpdateWidgetA) -> AppResult<Option<WidgetA>> {
        let mut tables = self.tables.write().await;
        let Some(widget) = tables.widgets_a.get_mut(&widget_id) else {
            return Ok(None);
        };

        if !changes.is_empty() {
            changes.apply_to(widget);
            widget.updated_at = jiff::Timestamp::now().to_diesel();
        }

        Ok(Some(widget.clone()))
    }

    async fn delete(&self, widget_id: i32) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.widgets_a.remove(&widget_id).is_none() {
            return Ok(false);
        }

        let now = jiff::Timestamp::now().to_diesel();
        for child in tables
            .widgets_b
            .values_mut()
            .filter(|b| b.widget_a_id == Some(widget_id))
        {
            child.widget_a_id = None;
            child.updated_at = now;
        }

        Ok(true)
    }
}

#[async_trait]
impl WidgetBRepository for MemoryStore {
    async fn create(&self, new_widget: NewWidgetB) -> AppResult<WidgetB> {
        let mut tables = self.tables.write().await;
        tables.check_reference(new_widget.widget_a_id)?;
        tables.last_b_id += 1;

        let now = jiff::Timestamp::now().to_diesel();
        let widget = WidgetB {
            id: tables.last_b_id,
            name: new_widget.name,
            description: new_widget.description,
            widget_a_id: new_widget.widget_a_id,
            created_at: now,
            updated_at: now,
        };
        tables.widgets_b.insert(widget.id, widget.clone());

        Ok(widget)
    }

    async fn find_by_id(&self, widget_id: i32) -> AppResult<Option<WidgetB>> {
        Ok(self.tables.read().await.widgets_b.get(&widget_id).cloned())
    }

    async fn list_paginated(
        &self,
        parent: Option<i32>,
        offset: i64,
        limit: i64,
    ) -> AppResult<Page<WidgetB>> {
        let tables = self.tables.read().await;
        let matches = |b: &&WidgetB| parent.is_none() || b.widget_a_id == parent;

        let total = tables.widgets_b.values().filter(matches).count() as i64;
        let items = page_of(
            tables.widgets_b.values().filter(matches).cloned(),
            offset,
            limit,
        );

        Ok((items, total))
    }

    async fn update(&self, widget_id: i32, changes: UpdateWidgetB) -> AppResult<Option<WidgetB>> {
        let mut tables = self.tables.write().await;
        if let Some(reference) = changes.widget_a_id {
            tables.check_reference(reference)?;
        }

        let Some(widget) = tables.widgets_b.get_mut(&widget_id) else {
            return Ok(None);
        };

        if !changes.is_empty() {
            changes.apply_to(widget);
            widget.updated_at = jiff::Timestamp::now().to_diesel();
        }

        Ok(Some(widget.clone()))
    }

    async fn delete(&self, widget_id: i32) -> AppResult<bool> {
        Ok(self
            .tables
            .write()
            .await
            .widgets_b
            .remove(&widget_id)
            .is_some())
    }
}
