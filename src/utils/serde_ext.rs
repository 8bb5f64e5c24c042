//! Serde helpers shared by request DTOs.

use serde::{Deserialize, Deserializer};

/// Keeps "field present but null" apart from "field absent".
///
/// Use together with `#[serde(default)]`: an absent field stays `None`,
/// `null` becomes `Some(None)` and a value becomes `Some(Some(v))`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Reads `null` as `T::default()` so a field that must not be null reaches
/// validation as an empty value instead of vanishing as "absent".
pub fn null_as_default<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de> + Default,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(|value| Some(value.unwrap_or_default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "double_option")]
        description: Option<Option<String>>,
    }

    #[derive(Debug, Deserialize)]
    struct Rename {
        #[serde(default, deserialize_with = "null_as_default")]
        name: Option<String>,
    }

    #[test]
    fn test_absent_null_and_value_are_distinct() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.description, None);

        let null: Patch = serde_json::from_str(r#"{"description": null}"#).unwrap();
        assert_eq!(null.description, Some(None));

        let value: Patch = serde_json::from_str(r#"{"description": "x"}"#).unwrap();
        assert_eq!(value.description, Some(Some("x".to_string())));
    }

    #[test]
    fn test_null_becomes_default_not_absent() {
        let absent: Rename = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.name, None);

        let null: Rename = serde_json::from_str(r#"{"name": null}"#).unwrap();
        assert_eq!(null.name, Some(String::new()));

        let value: Rename = serde_json::from_str(r#"{"name": "x"}"#).unwrap();
        assert_eq!(value.name, Some("x".to_string()));
    }
}
