use diesel::prelude::*;
use jiff_diesel::Timestamp;

use crate::models::WidgetA;

/// Row of `widgets_b`; `widget_a_id` is cleared when the parent is deleted.
#[derive(Debug, Queryable, Selectable, Identifiable, Associations, Clone, PartialEq)]
#[diesel(belongs_to(WidgetA))]
#[diesel(table_name = crate::schema::widgets_b)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct WidgetB {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub widget_a_id: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Insertable, Clone, PartialEq)]
#[diesel(table_name = crate::schema::widgets_b)]
pub struct NewWidgetB {
    pub name: String,
    pub description: Option<String>,
    pub widget_a_id: Option<i32>,
}

#[derive(Debug, AsChangeset, Clone, Default, PartialEq)]
#[diesel(table_name = crate::schema::widgets_b)]
pub struct UpdateWidgetB {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub widget_a_id: Option<Option<i32>>,
}

impl UpdateWidgetB {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.widget_a_id.is_none()
    }

    pub fn apply_to(&self, widget: &mut WidgetB) {
        if let Some(name) = &self.name {
            widget.name = name.clone();
        }
        if let Some(description) = &self.description {
            widget.description = description.clone();
        }
        if let Some(widget_a_id) = self.widget_a_id {
            widget.widget_a_id = widget_a_id;
        }
    }
}
