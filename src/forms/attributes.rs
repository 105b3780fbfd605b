//! Conversions between the editable attribute list a form works with and the
//! key-unique JSON object that is stored.

use sea_orm::prelude::Json;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One editable `{key, value}` row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributePair {
    #[serde(default, deserialize_with = "super::lenient::string_or_empty")]
    pub key: String,
    #[serde(default, deserialize_with = "super::lenient::string_or_empty")]
    pub value: String,
}

impl AttributePair {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// A row with a blank key or blank value counts as absent.
    pub fn is_blank(&self) -> bool {
        self.key.trim().is_empty() || self.value.trim().is_empty()
    }
}

pub type AttributeMap = BTreeMap<String, String>;

/// Expands a mapping into editable rows, in the mapping's iteration order.
pub fn to_pairs(mapping: &AttributeMap) -> Vec<AttributePair> {
    mapping
        .iter()
        .map(|(key, value)| AttributePair::new(key.clone(), value.clone()))
        .collect()
}

/// Collapses rows into a mapping.
///
/// Blank rows are skipped, keys and values are trimmed and a repeated key
/// keeps the last value. Callers that must reject repeated keys validate
/// before getting here.
pub fn to_mapping(pairs: &[AttributePair]) -> AttributeMap {
    let mut mapping = AttributeMap::new();
    for pair in pairs {
        if pair.is_blank() {
            continue;
        }
        mapping.insert(pair.key.trim().to_string(), pair.value.trim().to_string());
    }
    mapping
}

/// Reads a stored attribute column. Non-string values are rendered as JSON
/// text; anything that is not an object yields an empty mapping.
pub fn from_json(stored: Option<&Json>) -> AttributeMap {
    match stored {
        Some(Json::Object(object)) => object
            .iter()
            .map(|(key, value)| {
                let value = match value {
                    Json::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (key.clone(), value)
            })
            .collect(),
        _ => AttributeMap::new(),
    }
}

/// Stored form of a mapping; an empty mapping is stored as NULL.
pub fn to_json(mapping: &AttributeMap) -> Option<Json> {
    if mapping.is_empty() {
        return None;
    }
    Some(Json::Object(
        mapping
            .iter()
            .map(|(key, value)| (key.clone(), Json::String(value.clone())))
            .collect(),
    ))
}

/// `to_json(to_mapping(pairs))`
pub fn pairs_to_json(pairs: &[AttributePair]) -> Option<Json> {
    to_json(&to_mapping(pairs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn to_mapping_trims_and_skips_blank_rows() {
        let pairs = vec![
            AttributePair::new("  Size ", " 5L "),
            AttributePair::new("", "orphan"),
            AttributePair::new("Colour", "   "),
        ];

        let mapping = to_mapping(&pairs);

        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.get("Size").map(String::as_str), Some("5L"));
    }

    #[test]
    fn to_mapping_last_write_wins() {
        let pairs = vec![
            AttributePair::new("Grade", "A"),
            AttributePair::new("Grade ", "B"),
        ];
        assert_eq!(to_mapping(&pairs).get("Grade").map(String::as_str), Some("B"));
    }

    #[test]
    fn from_json_stringifies_scalars() {
        let stored = json!({"Size": "5L", "Count": 3, "Sealed": true});
        let mapping = from_json(Some(&stored));
        assert_eq!(mapping["Size"], "5L");
        assert_eq!(mapping["Count"], "3");
        assert_eq!(mapping["Sealed"], "true");
    }

    #[test]
    fn from_json_ignores_non_objects() {
        assert!(from_json(None).is_empty());
        assert!(from_json(Some(&json!(["a", "b"]))).is_empty());
    }

    #[test]
    fn empty_mapping_is_stored_as_null() {
        assert_eq!(to_json(&AttributeMap::new()), None);
        assert_eq!(
            pairs_to_json(&[AttributePair::new("Size", "5L")]),
            Some(json!({"Size": "5L"}))
        );
    }

    fn trimmed_token() -> impl Strategy<Value = String> {
        "[A-Za-z0-9][A-Za-z0-9 _-]{0,10}[A-Za-z0-9]|[A-Za-z0-9]"
    }

    proptest! {
        #[test]
        fn mapping_survives_pairs_round_trip(
            mapping in prop::collection::btree_map(trimmed_token(), trimmed_token(), 0..12)
        ) {
            prop_assert_eq!(to_mapping(&to_pairs(&mapping)), mapping);
        }

        #[test]
        fn mapping_survives_json_round_trip(
            mapping in prop::collection::btree_map(trimmed_token(), trimmed_token(), 0..12)
        ) {
            prop_assert_eq!(from_json(to_json(&mapping).as_ref()), mapping);
        }
    }
}
