use super::{char_count, check_attribute_keys, parse_uuid, require, ProductSnapshot};
use crate::forms::attributes::AttributePair;
use crate::forms::lenient;
use crate::forms::{FieldErrors, FieldPath};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Attribute rows past this index are compared against but never flagged.
pub const MAX_ATTRIBUTES_PER_PRODUCT: usize = 20;

pub const PRODUCT_NAME_TAKEN: &str =
    "Product names must be unique. This product name is already used in another product.";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductForm {
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub product_name: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_number",
        serialize_with = "lenient::whole_number"
    )]
    pub product_ref_number: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub product_description: Option<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub product_attributes: Vec<AttributePair>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub product_category_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub ref_number: i32,
    pub description: Option<String>,
    pub attributes: Vec<AttributePair>,
    pub category_id: Uuid,
}

/// Checks a product form. `editing` is the id of the product being edited,
/// which may keep its own name.
pub fn validate_product(
    form: &ProductForm,
    snapshot: &ProductSnapshot,
    editing: Option<Uuid>,
) -> Result<ProductDraft, FieldErrors> {
    let mut errors = FieldErrors::new();

    let name = match form.product_name.as_deref().map(str::trim) {
        None => {
            errors.add("product_name", "Product name is required");
            None
        }
        Some(name) if char_count(name) < 2 => {
            errors.add("product_name", "Must be min 2 chars");
            None
        }
        Some(name) if char_count(name) > 100 => {
            errors.add("product_name", "Must be max 100 chars");
            None
        }
        Some(name) => {
            let taken = match editing {
                Some(id) => snapshot.has_name_other_than(name, id),
                None => snapshot.has_name(name),
            };
            if taken {
                errors.add("product_name", PRODUCT_NAME_TAKEN);
                None
            } else {
                Some(name.to_string())
            }
        }
    };

    let ref_number = match form.product_ref_number {
        None => {
            errors.add("product_ref_number", "Product reference number is required");
            None
        }
        Some(n) if n <= 0.0 => {
            errors.add("product_ref_number", "Must be a positive number");
            None
        }
        Some(n) if n.fract() != 0.0 => {
            errors.add("product_ref_number", "Must be a whole number");
            None
        }
        Some(n) if n > i32::MAX as f64 => {
            errors.add("product_ref_number", "Reference number is too large");
            None
        }
        Some(n) => Some(n as i32),
    };

    let description = form
        .product_description
        .as_deref()
        .map(str::trim)
        .map(str::to_string);
    if description.as_deref().map(char_count).unwrap_or(0) > 500 {
        errors.add("product_description", "Must be max 500 chars");
    }

    let category_id = match form.product_category_id.as_deref() {
        None => {
            errors.add("product_category_id", "Product category ID is required");
            None
        }
        Some(raw) => match parse_uuid(raw) {
            None => {
                errors.add("product_category_id", "Invalid product category selection");
                None
            }
            Some(id) if !snapshot.has_category(&id) => {
                errors.add("product_category_id", "Selected product category no longer exists");
                None
            }
            Some(id) => Some(id),
        },
    };

    check_attribute_keys(
        &form.product_attributes,
        MAX_ATTRIBUTES_PER_PRODUCT,
        &FieldPath::field("product_attributes"),
        &mut errors,
    );

    match (name, ref_number, category_id) {
        (Some(name), Some(ref_number), Some(category_id)) if errors.is_empty() => {
            Ok(ProductDraft {
                name,
                ref_number,
                description,
                attributes: form.product_attributes.clone(),
                category_id,
            })
        }
        _ => Err(errors),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct CategoryForm {
    #[serde(default, deserialize_with = "lenient::opt_text")]
    #[validate(length(min = 2, max = 100, message = "Must be between 2 and 100 chars"))]
    pub product_category_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub product_category_attributes: Vec<AttributePair>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryDraft {
    pub name: String,
    pub attributes: Vec<AttributePair>,
}

pub fn validate_category(form: &CategoryForm) -> Result<CategoryDraft, FieldErrors> {
    let mut errors = match form.validate() {
        Ok(()) => FieldErrors::new(),
        Err(e) => FieldErrors::from_validator(&e),
    };
    require(
        &form.product_category_name,
        "product_category_name",
        "Product category name is required",
        &mut errors,
    );

    check_attribute_keys(
        &form.product_category_attributes,
        MAX_ATTRIBUTES_PER_PRODUCT,
        &FieldPath::field("product_category_attributes"),
        &mut errors,
    );

    match form.product_category_name.as_deref().map(str::trim) {
        Some(name) if errors.is_empty() => Ok(CategoryDraft {
            name: name.to_string(),
            attributes: form.product_category_attributes.clone(),
        }),
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::DUPLICATE_ATTRIBUTE_KEY;
    use serde_json::json;

    fn snapshot(existing: Uuid, category: Uuid) -> ProductSnapshot {
        ProductSnapshot::new(vec![(existing, "Hydraulic Hose".to_string())], vec![category])
    }

    #[test]
    fn valid_product_form_produces_draft() {
        let category = Uuid::new_v4();
        let form: ProductForm = serde_json::from_value(json!({
            "product_name": " Deck Cleaner ",
            "product_ref_number": "4411",
            "product_description": "Concentrated",
            "product_category_id": category.to_string(),
            "product_attributes": [{"key": "Size", "value": "5L"}]
        }))
        .unwrap();

        let draft = validate_product(&form, &snapshot(Uuid::new_v4(), category), None).unwrap();

        assert_eq!(draft.name, "Deck Cleaner");
        assert_eq!(draft.ref_number, 4411);
        assert_eq!(draft.category_id, category);
        assert_eq!(draft.attributes.len(), 1);
    }

    #[test]
    fn product_name_must_be_unique_except_for_itself() {
        let existing = Uuid::new_v4();
        let category = Uuid::new_v4();
        let form: ProductForm = serde_json::from_value(json!({
            "product_name": "hydraulic hose",
            "product_ref_number": 7,
            "product_category_id": category.to_string()
        }))
        .unwrap();
        let snapshot = snapshot(existing, category);

        let errors = validate_product(&form, &snapshot, None).unwrap_err();
        assert!(errors.contains("product_name", PRODUCT_NAME_TAKEN));

        assert!(validate_product(&form, &snapshot, Some(existing)).is_ok());
    }

    #[test]
    fn product_field_rules() {
        let form: ProductForm = serde_json::from_value(json!({
            "product_name": "X",
            "product_ref_number": -3,
            "product_description": "d".repeat(501),
            "product_category_id": "not-a-uuid",
            "product_attributes": [
                {"key": "Grade", "value": "A"},
                {"key": "grade", "value": "B"}
            ]
        }))
        .unwrap();

        let errors = validate_product(&form, &ProductSnapshot::default(), None).unwrap_err();

        assert!(errors.contains("product_name", "Must be min 2 chars"));
        assert!(errors.contains("product_ref_number", "Must be a positive number"));
        assert!(errors.contains("product_description", "Must be max 500 chars"));
        assert!(errors.contains("product_category_id", "Invalid product category selection"));
        assert!(errors.contains("product_attributes[1].key", DUPLICATE_ATTRIBUTE_KEY));
    }

    #[test]
    fn product_category_must_exist() {
        let form: ProductForm = serde_json::from_value(json!({
            "product_name": "Filter",
            "product_ref_number": 1,
            "product_category_id": Uuid::new_v4().to_string()
        }))
        .unwrap();

        let errors = validate_product(&form, &ProductSnapshot::default(), None).unwrap_err();

        assert!(errors.contains(
            "product_category_id",
            "Selected product category no longer exists"
        ));
    }

    #[test]
    fn category_form_rules() {
        let form: CategoryForm = serde_json::from_value(json!({
            "product_category_name": "C",
            "product_category_attributes": [
                {"key": "Unit", "value": "kg"},
                {"key": "UNIT ", "value": "lb"}
            ]
        }))
        .unwrap();

        let errors = validate_category(&form).unwrap_err();

        assert!(errors.contains("product_category_name", "Must be between 2 and 100 chars"));
        assert!(errors.contains("product_category_attributes[1].key", DUPLICATE_ATTRIBUTE_KEY));
    }

    #[test]
    fn category_name_is_required() {
        let errors = validate_category(&CategoryForm::default()).unwrap_err();
        assert!(errors.contains("product_category_name", "Product category name is required"));
    }
}
