//! JSON utility functions

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value as JsonValue;

/// Lenient field deserializer: malformed input degrades to the default
///
/// Accepts either the value directly or a JSON-encoded string of the value
/// (the shape a hidden-form round-trip produces). Anything that fails to
/// parse becomes `T::default()` instead of rejecting the whole request.
pub fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = JsonValue::deserialize(deserializer)?;
    let value = match value {
        JsonValue::String(s) => serde_json::from_str(&s).unwrap_or(JsonValue::Null),
        v => v,
    };
    Ok(serde_json::from_value(value).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Default, PartialEq, Deserialize)]
    struct Holder {
        #[serde(default, deserialize_with = "lenient")]
        items: Vec<u32>,
        #[serde(default, deserialize_with = "lenient")]
        limit: Option<i64>,
    }

    #[test]
    fn direct_values_pass_through() {
        let holder: Holder =
            serde_json::from_value(json!({"items": [1, 2], "limit": 50})).unwrap();
        assert_eq!(holder.items, vec![1, 2]);
        assert_eq!(holder.limit, Some(50));
    }

    #[test]
    fn string_encoded_values_are_unwrapped() {
        let holder: Holder =
            serde_json::from_value(json!({"items": "[3,4]", "limit": "25"})).unwrap();
        assert_eq!(holder.items, vec![3, 4]);
        assert_eq!(holder.limit, Some(25));
    }

    #[test]
    fn malformed_values_degrade_to_defaults() {
        let holder: Holder =
            serde_json::from_value(json!({"items": "{not json", "limit": {"a": 1}})).unwrap();
        assert!(holder.items.is_empty());
        assert_eq!(holder.limit, None);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let holder: Holder = serde_json::from_value(json!({})).unwrap();
        assert_eq!(holder, Holder::default());
    }
}
