//! WidgetA / WidgetB request and response DTOs.
//!
//! Shared by the HTTP handlers and [`crate::client`], so both sides apply the
//! same field rules.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::models::{NewWidgetA, NewWidgetB, UpdateWidgetA, UpdateWidgetB, WidgetA, WidgetB};
use crate::utils::serde_ext::{double_option, null_as_default};

pub const NAME_MAX_CHARS: usize = 50;
pub const DESCRIPTION_MAX_CHARS: usize = 200;

pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::new("required").with_message(Cow::Borrowed("Name is required")));
    }
    if name.chars().count() > NAME_MAX_CHARS {
        return Err(ValidationError::new("length")
            .with_message(Cow::Borrowed("Name must be 50 characters or less")));
    }
    Ok(())
}

pub fn validate_description(description: &str) -> Result<(), ValidationError> {
    if description.chars().count() > DESCRIPTION_MAX_CHARS {
        return Err(ValidationError::new("length")
            .with_message(Cow::Borrowed("Description must be 200 characters or less")));
    }
    Ok(())
}

/// Empty descriptions are stored as absent.
fn normalize_description(description: Option<String>) -> Option<String> {
    description.filter(|d| !d.is_empty())
}

fn check_patch(name: Option<&String>, description: Option<&Option<String>>) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    if let Some(Err(err)) = name.map(|n| validate_name(n)) {
        errors.add("name", err);
    }
    if let Some(Some(description)) = description {
        if let Err(err) = validate_description(description) {
            errors.add("description", err);
        }
    }
    errors
}

// ============================================================================
// WidgetA
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateWidgetARequest {
    #[serde(default)]
    #[validate(custom(function = "validate_name"))]
    #[schema(example = "Sprocket", max_length = 50)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_description"))]
    #[schema(example = "A toothed wheel", max_length = 200)]
    pub description: Option<String>,
}

impl CreateWidgetARequest {
    pub fn into_new(self) -> NewWidgetA {
        NewWidgetA {
            name: self.name,
            description: normalize_description(self.description),
        }
    }
}

/// Partial update; `"description": null` clears the description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWidgetARequest {
    /// `null` is rejected as "Name is required"
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(max_length = 50)]
    pub name: Option<String>,

    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>, nullable, max_length = 200)]
    pub description: Option<Option<String>>,
}

impl Validate for UpdateWidgetARequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let errors = check_patch(self.name.as_ref(), self.description.as_ref());
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl UpdateWidgetARequest {
    pub fn into_update(self) -> UpdateWidgetA {
        UpdateWidgetA {
            name: self.name,
            description: self.description.map(normalize_description),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WidgetAResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Sprocket")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[schema(value_type = String, format = DateTime, example = "2025-01-15T12:00:00Z")]
    pub created_at: jiff::Timestamp,
    #[schema(value_type = String, format = DateTime, example = "2025-01-15T12:00:00Z")]
    pub updated_at: jiff::Timestamp,
}

impl From<WidgetA> for WidgetAResponse {
    fn from(widget: WidgetA) -> Self {
        Self {
            id: widget.id,
            name: widget.name,
            description: widget.description,
            created_at: widget.created_at.to_jiff(),
            updated_at: widget.updated_at.to_jiff(),
        }
    }
}

// ============================================================================
// WidgetB
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateWidgetBRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_name"))]
    #[schema(example = "Cog", max_length = 50)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_description"))]
    #[schema(max_length = 200)]
    pub description: Option<String>,

    /// Owning WidgetA; must exist when given
    #[serde(default, alias = "widget_a_id", skip_serializing_if = "Option::is_none")]
    #[schema(example = 1)]
    pub widget_a_id: Option<i32>,
}

impl CreateWidgetBRequest {
    pub fn into_new(self) -> NewWidgetB {
        NewWidgetB {
            name: self.name,
            description: normalize_description(self.description),
            widget_a_id: self.widget_a_id,
        }
    }
}

/// Partial update; `null` clears `description` or detaches from the WidgetA.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWidgetBRequest {
    /// `null` is rejected as "Name is required"
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(max_length = 50)]
    pub name: Option<String>,

    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>, nullable, max_length = 200)]
    pub description: Option<Option<String>>,

    #[serde(
        default,
        alias = "widget_a_id",
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<i32>, nullable)]
    pub widget_a_id: Option<Option<i32>>,
}

impl Validate for UpdateWidgetBRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let errors = check_patch(self.name.as_ref(), self.description.as_ref());
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl UpdateWidgetBRequest {
    pub fn into_update(self) -> UpdateWidgetB {
        UpdateWidgetB {
            name: self.name,
            description: self.description.map(normalize_description),
            widget_a_id: self.widget_a_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WidgetBResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Cog")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "widget_a_id")]
    #[schema(example = 1)]
    pub widget_a_id: Option<i32>,
    #[schema(value_type = String, format = DateTime, example = "2025-01-15T12:00:00Z")]
    pub created_at: jiff::Timestamp,
    #[schema(value_type = String, format = DateTime, example = "2025-01-15T12:00:00Z")]
    pub updated_at: jiff::Timestamp,
}

impl From<WidgetB> for WidgetBResponse {
    fn from(widget: WidgetB) -> Self {
        Self {
            id: widget.id,
            name: widget.name,
            description: widget.description,
            widget_a_id: widget.widget_a_id,
            created_at: widget.created_at.to_jiff(),
            updated_at: widget.updated_at.to_jiff(),
        }
    }
}

/// Extra filter for `GET /widget-b`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, IntoParams, Validate)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct WidgetBFilter {
    /// Only WidgetBs attached to this WidgetA
    #[serde(default, alias = "widget_a_id")]
    pub widget_a_id: Option<i32>,
}
