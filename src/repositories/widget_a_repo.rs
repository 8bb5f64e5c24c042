//! PostgreSQL storage for `widgets_a`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult};
use crate::models::{NewWidgetA, UpdateWidgetA, WidgetA};
use crate::repositories::traits::{Page, WidgetARepository};

#[derive(Clone)]
pub struct PgWidgetARepository {
    pool: AsyncDbPool,
}

impl PgWidgetARepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WidgetARepository for PgWidgetARepository {
    async fn create(&self, new_widget: NewWidgetA) -> AppResult<WidgetA> {
        use crate::schema::widgets_a::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::insert_into(widgets_a)
            .values(&new_widget)
            .returning(WidgetA::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn find_by_id(&self, widget_id: i32) -> AppResult<Option<WidgetA>> {
        use crate::schema::widgets_a::dsl::*;
        let mut conn = self.pool.get().await?;

        widgets_a
            .find(widget_id)
            .select(WidgetA::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    async fn list_paginated(&self, offset: i64, limit: i64) -> AppResult<Page<WidgetA>> {
        use crate::schema::widgets_a::dsl::*;
        let mut conn = self.pool.get().await?;

        let total: i64 = widgets_a.count().get_result(&mut conn).await?;
        let items = widgets_a
            .select(WidgetA::as_select())
            .order(id.asc())
            .offset(offset)
            .limit(limit)
            .load(&mut conn)
            .await?;

        Ok((items, total))
    }

    async fn update(&self, widget_id: i32, changes: UpdateWidgetA) -> AppResult<Option<WidgetA>> {
        if changes.is_empty() {
            return self.find_by_id(widget_id).await;
        }

        use crate::schema::widgets_a::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::update(widgets_a.find(widget_id))
            .set(&changes)
            .returning(WidgetA::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    async fn delete(&self, widget_id: i32) -> AppResult<bool> {
        use crate::schema::widgets_a::dsl::*;
        let mut conn = self.pool.get().await?;

        // widgets_b.widget_a_id is ON DELETE SET NULL
        let affected = diesel::delete(widgets_a.find(widget_id))
            .execute(&mut conn)
            .await?;

        Ok(affected > 0)
    }
}
