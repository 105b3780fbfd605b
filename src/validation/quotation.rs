//! Rules for the quotation request form.
//!
//! The form carries the quotation header and a list of line items. A line item
//! either points at a stored product or, when `product_id` is `"new"`, describes
//! a product to create in the same save. Besides per-field checks the form is
//! checked as a whole: product names must not repeat across line items and
//! attribute keys must not repeat within a line item.

use super::{
    char_count, check_attribute_keys, fold_name, parse_date, parse_uuid, ProductSnapshot,
};
use crate::forms::attributes::AttributePair;
use crate::forms::lenient;
use crate::forms::{FieldErrors, FieldPath};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `product_id` value that selects the inline new-product fields.
pub const NEW_PRODUCT: &str = "new";
pub const MAX_LINE_ITEMS: usize = 50;
pub const MAX_QUANTITY: f64 = 10_000.0;
/// Line items (and attribute rows) past this index are compared against but
/// never flagged themselves.
pub const CROSS_CHECK_LIMIT: usize = 10;

pub const DUPLICATE_PRODUCT_NAME: &str = "Product names must be unique within a quotation.";
pub const EXISTING_PRODUCT_NAME: &str = "A product with this name already exists.";

const LINE_ITEMS: &str = "quotation_request_line_items";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuotationForm {
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub quotation_request_ref: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub quotation_request_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub quotation_request_vessel: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub company_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub employee_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub quotation_request_line_items: Vec<LineItemForm>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItemForm {
    /// Present when the form was seeded from a stored line item. Ignored on save.
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub quotation_request_line_item_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub product_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_number",
        serialize_with = "lenient::whole_number"
    )]
    pub quotation_request_line_item_quantity: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub new_product_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub new_product_ref: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub new_product_description: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub new_product_category_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub attributes: Vec<AttributePair>,
}

impl LineItemForm {
    fn is_new_product(&self) -> bool {
        self.product_id.as_deref().map(str::trim) == Some(NEW_PRODUCT)
    }
}

/// A quotation that passed every rule.
#[derive(Debug, Clone, PartialEq)]
pub struct QuotationDraft {
    pub reference: String,
    pub request_date: NaiveDate,
    pub vessel: String,
    pub company_id: Uuid,
    pub employee_id: Uuid,
    pub line_items: Vec<LineItemDraft>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineItemDraft {
    pub product: ProductChoice,
    pub quantity: i32,
    pub attributes: Vec<AttributePair>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProductChoice {
    Existing(Uuid),
    New(NewProductDraft),
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewProductDraft {
    pub name: String,
    pub reference: Option<String>,
    pub description: Option<String>,
    pub category_id: Uuid,
}

impl NewProductDraft {
    /// Stored reference number: the leading integer of the reference text
    /// (`"12abc"` is 12), or 0 when it does not start with one.
    pub fn ref_number(&self) -> i32 {
        let Some(raw) = self.reference.as_deref().map(str::trim) else {
            return 0;
        };
        let sign_len = usize::from(raw.starts_with(['-', '+']));
        let digits = raw[sign_len..]
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(raw.len() - sign_len);
        raw[..sign_len + digits].parse::<i32>().unwrap_or(0)
    }
}

fn line_item_path(index: usize) -> FieldPath {
    FieldPath::field(LINE_ITEMS).index(index)
}

/// Checks `form` against every quotation rule.
///
/// `snapshot` must be read from storage right before the call; it decides
/// whether referenced products exist and whether new names are taken.
pub fn validate_quotation(
    form: &QuotationForm,
    snapshot: &ProductSnapshot,
) -> Result<QuotationDraft, FieldErrors> {
    let mut errors = FieldErrors::new();

    let reference = match form.quotation_request_ref.as_deref().map(str::trim) {
        None => {
            errors.add("quotation_request_ref", "Reference is required");
            None
        }
        Some(value) if char_count(value) > 50 => {
            errors.add("quotation_request_ref", "Reference must be max 50 characters");
            None
        }
        Some(value) => Some(value.to_string()),
    };

    let request_date = match form.quotation_request_date.as_deref() {
        None => {
            errors.add("quotation_request_date", "Date is required");
            None
        }
        Some(raw) => {
            let parsed = parse_date(raw);
            if parsed.is_none() {
                errors.add("quotation_request_date", "Please enter a valid date");
            }
            parsed
        }
    };

    let vessel = match form.quotation_request_vessel.as_deref().map(str::trim) {
        None => {
            errors.add("quotation_request_vessel", "Vessel name is required");
            None
        }
        Some(value) if char_count(value) < 2 => {
            errors.add(
                "quotation_request_vessel",
                "Vessel name must be at least 2 characters",
            );
            None
        }
        Some(value) if char_count(value) > 100 => {
            errors.add(
                "quotation_request_vessel",
                "Vessel name must be max 100 characters",
            );
            None
        }
        Some(value) => Some(value.to_string()),
    };

    let company_id = required_uuid(
        form.company_id.as_deref(),
        "company_id",
        "Please select a company",
        "Invalid company selection",
        &mut errors,
    );
    let employee_id = required_uuid(
        form.employee_id.as_deref(),
        "employee_id",
        "Please select an employee",
        "Invalid employee selection",
        &mut errors,
    );

    let items = &form.quotation_request_line_items;
    if items.is_empty() {
        errors.add(LINE_ITEMS, "At least one line item is required");
    } else if items.len() > MAX_LINE_ITEMS {
        errors.add(LINE_ITEMS, "Cannot exceed 50 line items");
    }

    let line_items: Vec<Option<LineItemDraft>> = items
        .iter()
        .enumerate()
        .map(|(index, item)| validate_line_item(index, item, snapshot, &mut errors))
        .collect();

    check_unique_product_names(items, snapshot, &mut errors);

    if !errors.is_empty() {
        return Err(errors);
    }

    match (
        reference,
        request_date,
        vessel,
        company_id,
        employee_id,
        line_items.into_iter().collect::<Option<Vec<_>>>(),
    ) {
        (
            Some(reference),
            Some(request_date),
            Some(vessel),
            Some(company_id),
            Some(employee_id),
            Some(line_items),
        ) => Ok(QuotationDraft {
            reference,
            request_date,
            vessel,
            company_id,
            employee_id,
            line_items,
        }),
        _ => {
            errors.add(LINE_ITEMS, "Quotation could not be read");
            Err(errors)
        }
    }
}

fn required_uuid(
    raw: Option<&str>,
    path: &str,
    missing: &str,
    invalid: &str,
    errors: &mut FieldErrors,
) -> Option<Uuid> {
    match raw {
        None => {
            errors.add(path, missing);
            None
        }
        Some(raw) => {
            let parsed = parse_uuid(raw);
            if parsed.is_none() {
                errors.add(path, invalid);
            }
            parsed
        }
    }
}

fn validate_quantity(raw: Option<f64>, path: FieldPath, errors: &mut FieldErrors) -> Option<i32> {
    let message = match raw {
        None => "Quantity is required",
        Some(n) if n.fract() != 0.0 => "Quantity must be a whole number",
        Some(n) if n < 1.0 => "Quantity must be at least 1",
        Some(n) if n > MAX_QUANTITY => "Quantity cannot exceed 10,000",
        Some(n) => return Some(n as i32),
    };
    errors.add(path, message);
    None
}

fn validate_line_item(
    index: usize,
    item: &LineItemForm,
    snapshot: &ProductSnapshot,
    errors: &mut FieldErrors,
) -> Option<LineItemDraft> {
    let path = line_item_path(index);

    let quantity = validate_quantity(
        item.quotation_request_line_item_quantity,
        path.clone().key("quotation_request_line_item_quantity"),
        errors,
    );

    let product = if item.is_new_product() {
        validate_new_product(&path, item, snapshot, errors).map(ProductChoice::New)
    } else {
        let product_path = path.clone().key("product_id");
        match item.product_id.as_deref() {
            None => {
                errors.add(product_path, "Please select a product");
                None
            }
            Some(raw) => match parse_uuid(raw) {
                None => {
                    errors.add(product_path, "Invalid product selection");
                    None
                }
                Some(id) if snapshot.product_name(&id).is_none() => {
                    errors.add(product_path, "Selected product no longer exists");
                    None
                }
                Some(id) => Some(ProductChoice::Existing(id)),
            },
        }
    };

    check_attribute_keys(
        &item.attributes,
        CROSS_CHECK_LIMIT,
        &path.clone().key("attributes"),
        errors,
    );

    Some(LineItemDraft {
        product: product?,
        quantity: quantity?,
        attributes: item.attributes.clone(),
    })
}

fn validate_new_product(
    path: &FieldPath,
    item: &LineItemForm,
    snapshot: &ProductSnapshot,
    errors: &mut FieldErrors,
) -> Option<NewProductDraft> {
    let name_path = path.clone().key("new_product_name");
    let name = match item.new_product_name.as_deref().map(str::trim) {
        None => {
            errors.add(&name_path, "Product name is required for new products");
            None
        }
        Some(name) if char_count(name) > 100 => {
            errors.add(&name_path, "Product name must be max 100 characters");
            None
        }
        Some(name) if snapshot.has_name(name) => {
            errors.add(&name_path, EXISTING_PRODUCT_NAME);
            None
        }
        Some(name) => Some(name.to_string()),
    };

    let category_path = path.clone().key("new_product_category_id");
    let category_id = match item.new_product_category_id.as_deref() {
        None => {
            errors.add(&category_path, "Product category is required for new products");
            None
        }
        Some(raw) => match parse_uuid(raw) {
            None => {
                errors.add(&category_path, "Invalid product category selection");
                None
            }
            Some(id) if !snapshot.has_category(&id) => {
                errors.add(&category_path, "Selected product category no longer exists");
                None
            }
            Some(id) => Some(id),
        },
    };

    let reference = item.new_product_ref.as_deref().map(str::trim);
    if let Some(reference) = reference {
        if char_count(reference) < 2 {
            errors.add(
                path.clone().key("new_product_ref"),
                "Reference number must be at least 2 characters",
            );
        }
    }

    let description = item
        .new_product_description
        .as_deref()
        .map(str::trim)
        .map(str::to_string);
    if description.as_deref().map(char_count).unwrap_or(0) > 500 {
        errors.add(
            path.clone().key("new_product_description"),
            "Description must be max 500 characters",
        );
    }

    Some(NewProductDraft {
        name: name?,
        reference: reference.map(str::to_string),
        description,
        category_id: category_id?,
    })
}

/// The name a line item ends up pointing at, folded for comparison.
fn effective_name(item: &LineItemForm, snapshot: &ProductSnapshot) -> Option<String> {
    let name = if item.is_new_product() {
        item.new_product_name.as_deref()
    } else {
        item.product_id
            .as_deref()
            .and_then(parse_uuid)
            .and_then(|id| snapshot.product_name(&id))
    };
    name.map(fold_name).filter(|name| !name.is_empty())
}

fn check_unique_product_names(
    items: &[LineItemForm],
    snapshot: &ProductSnapshot,
    errors: &mut FieldErrors,
) {
    let names: Vec<Option<String>> = items
        .iter()
        .map(|item| effective_name(item, snapshot))
        .collect();

    for (index, name) in names.iter().enumerate().take(CROSS_CHECK_LIMIT) {
        let Some(name) = name else { continue };
        let repeated = names
            .iter()
            .enumerate()
            .any(|(other, candidate)| other != index && candidate.as_ref() == Some(name));
        if !repeated {
            continue;
        }
        let field = if items[index].is_new_product() {
            "new_product_name"
        } else {
            "product_id"
        };
        errors.add(line_item_path(index).key(field), DUPLICATE_PRODUCT_NAME);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    struct Fixture {
        widget: Uuid,
        gasket: Uuid,
        category: Uuid,
        snapshot: ProductSnapshot,
    }

    fn fixture() -> Fixture {
        let widget = Uuid::new_v4();
        let gasket = Uuid::new_v4();
        let category = Uuid::new_v4();
        let snapshot = ProductSnapshot::new(
            vec![(widget, "Widget".to_string()), (gasket, "Gasket".to_string())],
            vec![category],
        );
        Fixture {
            widget,
            gasket,
            category,
            snapshot,
        }
    }

    fn header() -> serde_json::Value {
        json!({
            "quotation_request_ref": "QR-2024-001",
            "quotation_request_date": "2024-05-01",
            "quotation_request_vessel": "MV Aurora",
            "company_id": Uuid::new_v4().to_string(),
            "employee_id": Uuid::new_v4().to_string(),
        })
    }

    fn form_with(items: serde_json::Value) -> QuotationForm {
        let mut value = header();
        value["quotation_request_line_items"] = items;
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn accepts_existing_product_line() {
        let fx = fixture();
        let form = form_with(json!([
            {"product_id": fx.widget.to_string(), "quotation_request_line_item_quantity": "5"}
        ]));

        let draft = validate_quotation(&form, &fx.snapshot).unwrap();

        assert_eq!(draft.reference, "QR-2024-001");
        assert_eq!(draft.line_items.len(), 1);
        assert_eq!(draft.line_items[0].quantity, 5);
        assert_eq!(draft.line_items[0].product, ProductChoice::Existing(fx.widget));
    }

    #[test]
    fn accepts_new_product_line() {
        let fx = fixture();
        let form = form_with(json!([{
            "product_id": "new",
            "new_product_name": " Deck Cleaner ",
            "new_product_ref": "12345",
            "new_product_category_id": fx.category.to_string(),
            "quotation_request_line_item_quantity": 2,
            "attributes": [{"key": "Size", "value": "5L"}]
        }]));

        let draft = validate_quotation(&form, &fx.snapshot).unwrap();

        match &draft.line_items[0].product {
            ProductChoice::New(product) => {
                assert_eq!(product.name, "Deck Cleaner");
                assert_eq!(product.category_id, fx.category);
                assert_eq!(product.ref_number(), 12345);
            }
            other => panic!("expected a new product, got {:?}", other),
        }
    }

    #[test]
    fn reports_missing_header_fields() {
        let form: QuotationForm = serde_json::from_value(json!({
            "quotation_request_line_items": []
        }))
        .unwrap();

        let errors = validate_quotation(&form, &fixture().snapshot).unwrap_err();

        assert!(errors.contains("quotation_request_ref", "Reference is required"));
        assert!(errors.contains("quotation_request_date", "Date is required"));
        assert!(errors.contains("quotation_request_vessel", "Vessel name is required"));
        assert!(errors.contains("company_id", "Please select a company"));
        assert!(errors.contains("employee_id", "Please select an employee"));
        assert!(errors.contains(LINE_ITEMS, "At least one line item is required"));
    }

    #[test]
    fn rejects_bad_header_values() {
        let fx = fixture();
        let mut value = header();
        value["quotation_request_ref"] = json!("R".repeat(51));
        value["quotation_request_date"] = json!("not a date");
        value["quotation_request_vessel"] = json!("M");
        value["company_id"] = json!("acme");
        value["quotation_request_line_items"] =
            json!([{"product_id": fx.widget.to_string(), "quotation_request_line_item_quantity": 1}]);
        let form: QuotationForm = serde_json::from_value(value).unwrap();

        let errors = validate_quotation(&form, &fx.snapshot).unwrap_err();

        assert!(errors.contains("quotation_request_ref", "Reference must be max 50 characters"));
        assert!(errors.contains("quotation_request_date", "Please enter a valid date"));
        assert!(errors.contains(
            "quotation_request_vessel",
            "Vessel name must be at least 2 characters"
        ));
        assert!(errors.contains("company_id", "Invalid company selection"));
    }

    #[rstest]
    #[case(json!(null), "Quantity is required")]
    #[case(json!("lots"), "Quantity is required")]
    #[case(json!(2.5), "Quantity must be a whole number")]
    #[case(json!(0), "Quantity must be at least 1")]
    #[case(json!("10001"), "Quantity cannot exceed 10,000")]
    fn rejects_quantity(#[case] quantity: serde_json::Value, #[case] message: &str) {
        let fx = fixture();
        let form = form_with(json!([
            {"product_id": fx.widget.to_string(), "quotation_request_line_item_quantity": quantity}
        ]));

        let errors = validate_quotation(&form, &fx.snapshot).unwrap_err();

        assert!(errors.contains(
            "quotation_request_line_items[0].quotation_request_line_item_quantity",
            message
        ));
    }

    #[test]
    fn accepts_quantity_bounds() {
        let fx = fixture();
        let form = form_with(json!([
            {"product_id": fx.widget.to_string(), "quotation_request_line_item_quantity": 1},
            {"product_id": fx.gasket.to_string(), "quotation_request_line_item_quantity": 10000}
        ]));
        assert!(validate_quotation(&form, &fx.snapshot).is_ok());
    }

    #[test]
    fn rejects_more_than_fifty_line_items() {
        let fx = fixture();
        let items: Vec<_> = (0..51)
            .map(|i| json!({
                "product_id": "new",
                "new_product_name": format!("Part {}", i),
                "new_product_category_id": fx.category.to_string(),
                "quotation_request_line_item_quantity": 1
            }))
            .collect();
        let form = form_with(json!(items));

        let errors = validate_quotation(&form, &fx.snapshot).unwrap_err();

        assert!(errors.contains(LINE_ITEMS, "Cannot exceed 50 line items"));
    }

    #[test]
    fn product_reference_rules() {
        let fx = fixture();
        let form = form_with(json!([
            {"quotation_request_line_item_quantity": 1},
            {"product_id": "widget", "quotation_request_line_item_quantity": 1},
            {"product_id": Uuid::new_v4().to_string(), "quotation_request_line_item_quantity": 1}
        ]));

        let errors = validate_quotation(&form, &fx.snapshot).unwrap_err();

        assert!(errors.contains(
            "quotation_request_line_items[0].product_id",
            "Please select a product"
        ));
        assert!(errors.contains(
            "quotation_request_line_items[1].product_id",
            "Invalid product selection"
        ));
        assert!(errors.contains(
            "quotation_request_line_items[2].product_id",
            "Selected product no longer exists"
        ));
    }

    #[test]
    fn new_product_requires_name_and_category() {
        let fx = fixture();
        let form = form_with(json!([
            {"product_id": "new", "new_product_ref": " x ", "quotation_request_line_item_quantity": 1}
        ]));

        let errors = validate_quotation(&form, &fx.snapshot).unwrap_err();

        assert!(errors.has("quotation_request_line_items[0].new_product_name"));
        assert!(errors.has("quotation_request_line_items[0].new_product_category_id"));
        assert!(errors.contains(
            "quotation_request_line_items[0].new_product_ref",
            "Reference number must be at least 2 characters"
        ));
    }

    #[test]
    fn new_product_name_must_not_exist_in_catalog() {
        let fx = fixture();
        let form = form_with(json!([{
            "product_id": "new",
            "new_product_name": "  gasket ",
            "new_product_category_id": fx.category.to_string(),
            "quotation_request_line_item_quantity": 1
        }]));

        let errors = validate_quotation(&form, &fx.snapshot).unwrap_err();

        assert!(errors.contains(
            "quotation_request_line_items[0].new_product_name",
            EXISTING_PRODUCT_NAME
        ));
    }

    #[test]
    fn new_and_existing_lines_must_not_share_a_name() {
        let fx = fixture();
        let snapshot = ProductSnapshot::new(
            vec![(fx.widget, "Widget".to_string())],
            vec![fx.category],
        );
        let form = form_with(json!([
            {
                "product_id": "new",
                "new_product_name": "Sprocket",
                "new_product_category_id": fx.category.to_string(),
                "quotation_request_line_item_quantity": 1
            },
            {
                "product_id": "new",
                "new_product_name": " SPROCKET",
                "new_product_category_id": fx.category.to_string(),
                "quotation_request_line_item_quantity": 1
            },
            {"product_id": fx.widget.to_string(), "quotation_request_line_item_quantity": 1},
            {"product_id": fx.widget.to_string(), "quotation_request_line_item_quantity": 3}
        ]));

        let errors = validate_quotation(&form, &snapshot).unwrap_err();

        assert!(errors.contains(
            "quotation_request_line_items[0].new_product_name",
            DUPLICATE_PRODUCT_NAME
        ));
        assert!(errors.contains(
            "quotation_request_line_items[1].new_product_name",
            DUPLICATE_PRODUCT_NAME
        ));
        assert!(errors.contains(
            "quotation_request_line_items[2].product_id",
            DUPLICATE_PRODUCT_NAME
        ));
        assert!(errors.contains(
            "quotation_request_line_items[3].product_id",
            DUPLICATE_PRODUCT_NAME
        ));
    }

    #[test]
    fn name_collisions_past_the_cross_check_limit_are_only_flagged_below_it() {
        let fx = fixture();
        let mut items: Vec<_> = (0..11)
            .map(|i| json!({
                "product_id": "new",
                "new_product_name": format!("Part {}", i),
                "new_product_category_id": fx.category.to_string(),
                "quotation_request_line_item_quantity": 1
            }))
            .collect();
        items.push(json!({
            "product_id": "new",
            "new_product_name": "part 10",
            "new_product_category_id": fx.category.to_string(),
            "quotation_request_line_item_quantity": 1
        }));
        items.push(json!({
            "product_id": "new",
            "new_product_name": "part 3",
            "new_product_category_id": fx.category.to_string(),
            "quotation_request_line_item_quantity": 1
        }));
        let form = form_with(json!(items));

        let result = validate_quotation(&form, &fx.snapshot);

        // items 10 and 11 repeat each other but sit past the limit
        let errors = result.unwrap_err();
        assert!(errors.contains(
            "quotation_request_line_items[3].new_product_name",
            DUPLICATE_PRODUCT_NAME
        ));
        assert!(!errors.has("quotation_request_line_items[10].new_product_name"));
        assert!(!errors.has("quotation_request_line_items[11].new_product_name"));
        assert!(!errors.has("quotation_request_line_items[12].new_product_name"));
    }

    #[test]
    fn duplicate_attribute_keys_flag_the_second_row() {
        let fx = fixture();
        let form = form_with(json!([{
            "product_id": fx.widget.to_string(),
            "quotation_request_line_item_quantity": 1,
            "attributes": [
                {"key": "Color", "value": "red"},
                {"key": "color", "value": "blue"}
            ]
        }]));

        let errors = validate_quotation(&form, &fx.snapshot).unwrap_err();

        assert!(errors.contains(
            "quotation_request_line_items[0].attributes[1].key",
            super::super::DUPLICATE_ATTRIBUTE_KEY
        ));
    }

    #[test]
    fn blank_attribute_rows_are_not_duplicates() {
        let fx = fixture();
        let form = form_with(json!([{
            "product_id": fx.widget.to_string(),
            "quotation_request_line_item_quantity": 1,
            "attributes": [
                {"key": "Color", "value": "red"},
                {"key": "color", "value": "  "},
                {"key": "", "value": "blue"}
            ]
        }]));

        assert!(validate_quotation(&form, &fx.snapshot).is_ok());
    }

    #[rstest]
    #[case(Some("12345"), 12345)]
    #[case(Some("12abc"), 12)]
    #[case(Some(" 42 pcs"), 42)]
    #[case(Some("-7"), -7)]
    #[case(Some("REF-9"), 0)]
    #[case(None, 0)]
    fn new_product_reference_number(#[case] raw: Option<&str>, #[case] expected: i32) {
        let draft = NewProductDraft {
            name: "Valve".into(),
            reference: raw.map(str::to_string),
            description: None,
            category_id: Uuid::new_v4(),
        };
        assert_eq!(draft.ref_number(), expected);
    }
}
