//! Submission rules for every form the API accepts.
//!
//! Rules that only look at the submitted values are expressed with the
//! `validator` derive where the form is flat. The quotation and product forms
//! also depend on what is already stored, so they are checked against a
//! [`ProductSnapshot`] read just before validation.

pub mod catalog;
pub mod directory;
pub mod quotation;

use crate::forms::attributes::AttributePair;
use crate::forms::{FieldErrors, FieldPath};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;
use validator::ValidationError;

pub const DUPLICATE_ATTRIBUTE_KEY: &str = "Attribute keys must be unique.";

/// Comparison form of a name: trimmed and lower-cased.
pub fn fold_name(name: &str) -> String {
    name.trim().to_lowercase()
}

pub fn char_count(value: &str) -> usize {
    value.trim().chars().count()
}

pub fn parse_uuid(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}

/// Accepts `2024-05-01`, RFC 3339 timestamps and `2024-05-01T10:30[:00]`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|timestamp| timestamp.date())
}

/// Rejects repeated attribute keys.
///
/// Rows with a blank key or value are ignored. Only rows below `limit` get an
/// error attached, but every row is compared against.
pub fn check_attribute_keys(
    attributes: &[AttributePair],
    limit: usize,
    base: &FieldPath,
    errors: &mut FieldErrors,
) {
    if attributes.len() < 2 {
        return;
    }
    let folded: Vec<Option<String>> = attributes
        .iter()
        .map(|pair| (!pair.is_blank()).then(|| fold_name(&pair.key)))
        .collect();

    for (index, key) in folded.iter().enumerate().take(limit) {
        let Some(key) = key else { continue };
        let repeated = folded
            .iter()
            .enumerate()
            .any(|(other, candidate)| other != index && candidate.as_ref() == Some(key));
        if repeated {
            errors.add(
                base.clone().index(index).key("key"),
                DUPLICATE_ATTRIBUTE_KEY,
            );
        }
    }
}

/// What validation needs to know about the stored catalog.
#[derive(Debug, Clone, Default)]
pub struct ProductSnapshot {
    names: HashSet<String>,
    products: HashMap<Uuid, String>,
    categories: HashSet<Uuid>,
}

impl ProductSnapshot {
    pub fn new(
        products: impl IntoIterator<Item = (Uuid, String)>,
        categories: impl IntoIterator<Item = Uuid>,
    ) -> Self {
        let products: HashMap<Uuid, String> = products.into_iter().collect();
        let names = products.values().map(|name| fold_name(name)).collect();
        Self {
            names,
            products,
            categories: categories.into_iter().collect(),
        }
    }

    /// True when a stored product already uses `name` (trimmed, case-folded).
    pub fn has_name(&self, name: &str) -> bool {
        self.names.contains(&fold_name(name))
    }

    /// Like [`has_name`](Self::has_name) but ignoring the product being edited.
    pub fn has_name_other_than(&self, name: &str, except: Uuid) -> bool {
        let folded = fold_name(name);
        self.products
            .iter()
            .any(|(id, stored)| *id != except && fold_name(stored) == folded)
    }

    pub fn product_name(&self, id: &Uuid) -> Option<&str> {
        self.products.get(id).map(String::as_str)
    }

    pub fn has_category(&self, id: &Uuid) -> bool {
        self.categories.contains(id)
    }
}

/// Records `message` under `field` when the value is missing or blank.
pub(crate) fn require(
    value: &Option<String>,
    field: &str,
    message: &str,
    errors: &mut FieldErrors,
) {
    if value.as_deref().map_or(true, |v| v.trim().is_empty()) {
        errors.add(field, message);
    }
}

pub(crate) fn validate_uuid(value: &str) -> Result<(), ValidationError> {
    if parse_uuid(value).is_some() {
        Ok(())
    } else {
        let mut err = ValidationError::new("uuid");
        err.message = Some("Invalid selection".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn fold_name_trims_and_lowercases() {
        assert_eq!(fold_name("  Deck Cleaner "), "deck cleaner");
        assert_eq!(fold_name("WIDGET"), fold_name("widget"));
    }

    #[test]
    fn parse_date_accepts_common_shapes() {
        assert_eq!(parse_date("2024-05-01").unwrap().day(), 1);
        assert_eq!(parse_date("2024-05-01T10:30:00Z").unwrap().month(), 5);
        assert_eq!(parse_date("2024-05-01T10:30").unwrap().year(), 2024);
        assert!(parse_date("01/05/2024").is_none());
        assert!(parse_date("").is_none());
    }

    #[test]
    fn attribute_keys_ignore_blank_rows() {
        let attributes = vec![
            AttributePair::new("Colour", "red"),
            AttributePair::new("colour", ""),
            AttributePair::new("  ", "blue"),
        ];
        let mut errors = FieldErrors::new();
        check_attribute_keys(&attributes, 10, &FieldPath::field("attributes"), &mut errors);
        assert!(errors.is_empty());
    }

    #[test]
    fn attribute_keys_flag_each_repeat_below_limit() {
        let attributes = vec![
            AttributePair::new("Colour", "red"),
            AttributePair::new(" colour ", "blue"),
            AttributePair::new("COLOUR", "green"),
        ];
        let mut errors = FieldErrors::new();
        check_attribute_keys(&attributes, 2, &FieldPath::field("attributes"), &mut errors);
        assert!(errors.contains("attributes[0].key", DUPLICATE_ATTRIBUTE_KEY));
        assert!(errors.contains("attributes[1].key", DUPLICATE_ATTRIBUTE_KEY));
        assert!(!errors.has("attributes[2].key"));
    }

    #[test]
    fn snapshot_name_checks_fold_case_and_whitespace() {
        let widget = Uuid::new_v4();
        let snapshot = ProductSnapshot::new(vec![(widget, "Widget".to_string())], vec![]);
        assert!(snapshot.has_name(" widget "));
        assert!(!snapshot.has_name("gadget"));
        assert!(!snapshot.has_name_other_than("WIDGET", widget));
        assert!(snapshot.has_name_other_than("WIDGET", Uuid::new_v4()));
    }
}
