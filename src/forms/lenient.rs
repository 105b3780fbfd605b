//! Serde helpers for form payloads.
//!
//! Browser forms send everything as text and drop nothing, so these accept
//! both the urlencoded shapes (`"5"`, `""`) and the JSON shapes (`5`, `null`)
//! for the same field.

use serde::de::{Deserialize, DeserializeOwned, Deserializer};
use serde::Serializer;
use serde_json::Value;

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Text field where blank means absent.
pub fn opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_text(value).filter(|s| !s.trim().is_empty()))
}

/// Text field where absent means empty.
pub fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_text(value).unwrap_or_default())
}

/// Numeric field; text that does not parse as a number counts as absent.
pub fn opt_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    })
}

/// List field; `null` or a missing list is empty.
pub fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Vec<T>>::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

/// Writes whole numbers without a fractional part so seeded forms show `5`, not `5.0`.
pub fn whole_number<S>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(n) if n.fract() == 0.0 && n.abs() < i64::MAX as f64 => {
            serializer.serialize_i64(*n as i64)
        }
        Some(n) => serializer.serialize_f64(*n),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "opt_text")]
        text: Option<String>,
        #[serde(default, deserialize_with = "opt_number")]
        number: Option<f64>,
        #[serde(default, deserialize_with = "list")]
        items: Vec<String>,
    }

    #[test]
    fn blank_text_is_absent() {
        let probe: Probe = serde_json::from_value(json!({"text": "   "})).unwrap();
        assert_eq!(probe.text, None);
        let probe: Probe = serde_json::from_value(json!({"text": 42})).unwrap();
        assert_eq!(probe.text.as_deref(), Some("42"));
    }

    #[test]
    fn numbers_accept_text() {
        let probe: Probe = serde_json::from_value(json!({"number": " 5 "})).unwrap();
        assert_eq!(probe.number, Some(5.0));
        let probe: Probe = serde_json::from_value(json!({"number": "five"})).unwrap();
        assert_eq!(probe.number, None);
        let probe: Probe = serde_json::from_value(json!({"number": 2.5})).unwrap();
        assert_eq!(probe.number, Some(2.5));
    }

    #[test]
    fn null_list_is_empty() {
        let probe: Probe = serde_json::from_value(json!({"items": null})).unwrap();
        assert!(probe.items.is_empty());
        let probe: Probe = serde_json::from_value(json!({})).unwrap();
        assert!(probe.items.is_empty());
    }
}
