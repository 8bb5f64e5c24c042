//! PostgreSQL storage for `widgets_b`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult};
use crate::models::{NewWidgetB, UpdateWidgetB, WidgetB};
use crate::repositories::traits::{Page, WidgetBRepository};

#[derive(Clone)]
pub struct PgWidgetBRepository {
    pool: AsyncDbPool,
}

impl PgWidgetBRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WidgetBRepository for PgWidgetBRepository {
    async fn create(&self, new_widget: NewWidgetB) -> AppResult<WidgetB> {
        use crate::schema::widgets_b::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::insert_into(widgets_b)
            .values(&new_widget)
            .returning(WidgetB::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn find_by_id(&self, widget_id: i32) -> AppResult<Option<WidgetB>> {
        use crate::schema::widgets_b::dsl::*;
        let mut conn = self.pool.get().await?;

        widgets_b
            .find(widget_id)
            .select(WidgetB::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    async fn list_paginated(
        &self,
        parent: Option<i32>,
        offset: i64,
        limit: i64,
    ) -> AppResult<Page<WidgetB>> {
        use crate::schema::widgets_b::dsl::*;
        let mut conn = self.pool.get().await?;

        let mut count_query = widgets_b.select(diesel::dsl::count_star()).into_boxed();
        let mut page_query = widgets_b.select(WidgetB::as_select()).into_boxed();
        if let Some(parent_id) = parent {
            count_query = count_query.filter(widget_a_id.eq(parent_id));
            page_query = page_query.filter(widget_a_id.eq(parent_id));
        }

        let total: i64 = count_query.get_result(&mut conn).await?;
        let items = page_query
            .order(id.asc())
            .offset(offset)
            .limit(limit)
            .load(&mut conn)
            .await?;

        Ok((items, total))
    }

    async fn update(&self, widget_id: i32, changes: UpdateWidgetB) -> AppResult<Option<WidgetB>> {
        if changes.is_empty() {
            return self.find_by_id(widget_id).await;
        }

        use crate::schema::widgets_b::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::update(widgets_b.find(widget_id))
            .set(&changes)
            .returning(WidgetB::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    async fn delete(&self, widget_id: i32) -> AppResult<bool> {
        use crate::schema::widgets_b::dsl::*;
        let mut conn = self.pool.get().await?;

        let affected = diesel::delete(widgets_b.find(widget_id))
            .execute(&mut conn)
            .await?;

        Ok(affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::widgets_b::dsl::*;

    fn update_sql(changes: &UpdateWidgetB) -> String {
        diesel::debug_query::<diesel::pg::Pg, _>(
            &diesel::update(widgets_b.find(1)).set(changes),
        )
        .to_string()
    }

    #[test]
    fn test_changeset_skips_absent_fields() {
        let sql = update_sql(&UpdateWidgetB {
            name: Some("cog".to_string()),
            ..Default::default()
        });
        assert!(sql.contains(r#""name" = $1"#), "{sql}");
        assert!(!sql.contains(r#""description""#), "{sql}");
        assert!(!sql.contains(r#""widget_a_id" ="#), "{sql}");
    }

    #[test]
    fn test_changeset_writes_null_for_cleared_fields() {
        let sql = update_sql(&UpdateWidgetB {
            description: Some(None),
            widget_a_id: Some(None),
            ..Default::default()
        });
        assert!(sql.contains(r#""description" = $1"#), "{sql}");
        assert!(sql.contains(r#""widget_a_id" = $2"#), "{sql}");
        assert!(sql.contains("[None, None, 1]"), "{sql}");
        assert!(!sql.contains(r#""name" ="#), "{sql}");
    }

    #[test]
    fn test_changeset_reattaches_parent() {
        let sql = update_sql(&UpdateWidgetB {
            widget_a_id: Some(Some(7)),
            ..Default::default()
        });
        assert!(sql.contains(r#""widget_a_id" = $1"#), "{sql}");
        assert!(sql.contains("[Some(7), 1]"), "{sql}");
    }
}
