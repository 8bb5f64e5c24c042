use std::sync::OnceLock;

use regex::Regex;

/// Pulls table, column and value out of PostgreSQL constraint violation text.
pub struct ConstraintParser;

struct RegexPatterns {
    key_value: Regex,
    column_name: Regex,
    table_name: Regex,
}

impl RegexPatterns {
    fn new() -> Self {
        // Literal patterns; compilation cannot fail.
        Self {
            // DETAIL: Key (widget_a_id)=(999) is not present in table "widgets_a".
            key_value: Regex::new(r"Key \(([^)]+)\)=\(([^)]*)\)").unwrap(),
            column_name: Regex::new(r#"column "([^"]+)""#).unwrap(),
            // `on table "x"` for foreign keys, `of relation "x"` / `for relation "x"` otherwise
            table_name: Regex::new(r#"(?:table|relation) "([^"]+)""#).unwrap(),
        }
    }
}

static REGEX_PATTERNS: OnceLock<RegexPatterns> = OnceLock::new();

const CONSTRAINT_SUFFIXES: &[&str] = &["_fkey", "_key", "_check", "_not_null", "_idx", "_pkey"];

impl ConstraintParser {
    fn patterns() -> &'static RegexPatterns {
        REGEX_PATTERNS.get_or_init(RegexPatterns::new)
    }

    /// `(table, column, value)` of a unique violation.
    pub fn parse_unique_violation(
        message: &str,
        table: Option<&str>,
        constraint_name: Option<&str>,
    ) -> Option<(String, String, String)> {
        let table = table
            .map(str::to_string)
            .or_else(|| Self::extract_table_from_message(message));

        if let Some((column, value)) = Self::extract_key_value_from_message(message) {
            return Some((table.unwrap_or_else(|| "resource".to_string()), column, value));
        }

        let (table, column) = Self::split_constraint_name(constraint_name?, table.as_deref())?;
        Some((table, column, "duplicate_value".to_string()))
    }

    /// `(table, column)` of a not-null violation.
    pub fn parse_not_null_violation(message: &str, table: Option<&str>) -> Option<(String, String)> {
        let column = Self::extract_column_from_message(message)?;
        let table = table
            .map(str::to_string)
            .or_else(|| Self::extract_table_from_message(message))
            .unwrap_or_else(|| "resource".to_string());
        Some((table, column))
    }

    /// `(table, column, referenced value)` of a foreign key violation.
    pub fn parse_foreign_key_violation(
        message: &str,
        table: Option<&str>,
        constraint_name: Option<&str>,
    ) -> Option<(String, String, String)> {
        let table = table
            .map(str::to_string)
            .or_else(|| Self::extract_table_from_message(message));

        if let Some((column, value)) = Self::extract_key_value_from_message(message) {
            return Some((table.unwrap_or_else(|| "resource".to_string()), column, value));
        }

        let (table, column) = Self::split_constraint_name(constraint_name?, table.as_deref())?;
        Some((table, column, "invalid_reference".to_string()))
    }

    /// Splits `widgets_b_widget_a_id_fkey` into `("widgets_b", "widget_a_id")`.
    ///
    /// With a known table the prefix is stripped exactly; otherwise the first
    /// segment is taken as the table.
    pub fn split_constraint_name(
        constraint_name: &str,
        table: Option<&str>,
    ) -> Option<(String, String)> {
        let stem = CONSTRAINT_SUFFIXES
            .iter()
            .find_map(|suffix| constraint_name.strip_suffix(suffix))?;

        if let Some(table) = table {
            let column = stem.strip_prefix(table)?.strip_prefix('_')?;
            return (!column.is_empty()).then(|| (table.to_string(), column.to_string()));
        }

        let (table, column) = stem.split_once('_')?;
        (!column.is_empty()).then(|| (table.to_string(), column.to_string()))
    }

    pub fn extract_column_from_message(message: &str) -> Option<String> {
        Self::patterns()
            .column_name
            .captures(message)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// First quoted table or relation name, i.e. the table being written.
    pub fn extract_table_from_message(message: &str) -> Option<String> {
        Self::patterns()
            .table_name
            .captures(message)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    pub fn extract_key_value_from_message(message: &str) -> Option<(String, String)> {
        Self::patterns().key_value.captures(message).and_then(|caps| {
            let field = caps.get(1)?.as_str().to_string();
            let value = caps.get(2)?.as_str().to_string();
            Some((field, value))
        })
    }

    /// `widget_a_id` -> `widgetAId`, matching the JSON field names.
    pub fn wire_field_name(column: &str) -> String {
        let mut out = String::with_capacity(column.len());
        let mut upper = false;
        for c in column.chars() {
            if c == '_' {
                upper = true;
            } else if upper {
                out.extend(c.to_uppercase());
                upper = false;
            } else {
                out.push(c);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FK_MESSAGE: &str = "insert or update on table \"widgets_b\" violates foreign key constraint \"widgets_b_widget_a_id_fkey\"\nKey (widget_a_id)=(999) is not present in table \"widgets_a\".";

    #[test]
    fn test_parse_foreign_key_violation_from_message() {
        let result = ConstraintParser::parse_foreign_key_violation(
            FK_MESSAGE,
            None,
            Some("widgets_b_widget_a_id_fkey"),
        );
        assert_eq!(
            result,
            Some(("widgets_b".to_string(), "widget_a_id".to_string(), "999".to_string()))
        );
    }

    #[test]
    fn test_parse_foreign_key_violation_from_constraint_only() {
        let result = ConstraintParser::parse_foreign_key_violation(
            "violates foreign key constraint",
            Some("widgets_b"),
            Some("widgets_b_widget_a_id_fkey"),
        );
        assert_eq!(
            result,
            Some((
                "widgets_b".to_string(),
                "widget_a_id".to_string(),
                "invalid_reference".to_string()
            ))
        );
    }

    #[test]
    fn test_parse_unique_violation() {
        let message = "duplicate key value violates unique constraint \"widgets_a_name_key\"\nKey (name)=(Gear) already exists.";
        let result =
            ConstraintParser::parse_unique_violation(message, Some("widgets_a"), Some("widgets_a_name_key"));
        assert_eq!(
            result,
            Some(("widgets_a".to_string(), "name".to_string(), "Gear".to_string()))
        );
    }

    #[test]
    fn test_parse_not_null_violation_with_relation() {
        let message = "null value in column \"name\" of relation \"widgets_a\" violates not-null constraint";
        assert_eq!(
            ConstraintParser::parse_not_null_violation(message, None),
            Some(("widgets_a".to_string(), "name".to_string()))
        );
    }

    #[test]
    fn test_split_constraint_name() {
        assert_eq!(
            ConstraintParser::split_constraint_name("widgets_b_widget_a_id_fkey", Some("widgets_b")),
            Some(("widgets_b".to_string(), "widget_a_id".to_string()))
        );
        assert_eq!(
            ConstraintParser::split_constraint_name("users_email_key", None),
            Some(("users".to_string(), "email".to_string()))
        );
        assert_eq!(ConstraintParser::split_constraint_name("invalid", None), None);
        assert_eq!(
            ConstraintParser::split_constraint_name("widgets_a_name_key", Some("widgets_b")),
            None
        );
    }

    #[test]
    fn test_wire_field_name() {
        assert_eq!(ConstraintParser::wire_field_name("widget_a_id"), "widgetAId");
        assert_eq!(ConstraintParser::wire_field_name("name"), "name");
        assert_eq!(ConstraintParser::wire_field_name("created_at"), "createdAt");
    }

    #[test]
    fn test_graceful_parsing_failures() {
        let message = "completely unrelated error message";
        assert_eq!(ConstraintParser::parse_unique_violation(message, None, None), None);
        assert_eq!(ConstraintParser::parse_not_null_violation(message, None), None);
        assert_eq!(ConstraintParser::parse_foreign_key_violation(message, None, None), None);
    }
}
