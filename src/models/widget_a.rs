use diesel::prelude::*;
use jiff_diesel::Timestamp;

/// Row of `widgets_a`
#[derive(Debug, Queryable, Selectable, Identifiable, Clone, PartialEq)]
#[diesel(table_name = crate::schema::widgets_a)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct WidgetA {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Insertable, Clone, PartialEq)]
#[diesel(table_name = crate::schema::widgets_a)]
pub struct NewWidgetA {
    pub name: String,
    pub description: Option<String>,
}

/// Partial update; `description: Some(None)` writes NULL.
#[derive(Debug, AsChangeset, Clone, Default, PartialEq)]
#[diesel(table_name = crate::schema::widgets_a)]
pub struct UpdateWidgetA {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
}

impl UpdateWidgetA {
    /// Diesel rejects an UPDATE with an empty SET clause.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }

    pub fn apply_to(&self, widget: &mut WidgetA) {
        if let Some(name) = &self.name {
            widget.name = name.clone();
        }
        if let Some(description) = &self.description {
            widget.description = description.clone();
        }
    }
}
