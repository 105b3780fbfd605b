use super::{require, validate_uuid};
use crate::entities::company::CompanyType;
use crate::forms::lenient;
use crate::forms::FieldErrors;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+?[0-9\s\-()]+$").unwrap());

fn validate_phone(value: &str) -> Result<(), ValidationError> {
    let message = if !PHONE_RE.is_match(value) {
        "Please enter a valid mobile number"
    } else {
        let digits = value.chars().filter(char::is_ascii_digit).count();
        if (10..=15).contains(&digits) {
            return Ok(());
        }
        "Must be between 10 and 15 digits"
    };
    let mut err = ValidationError::new("phone");
    err.message = Some(message.into());
    Err(err)
}

fn validate_mobile(value: &str) -> Result<(), ValidationError> {
    if PHONE_RE.is_match(value) {
        return Ok(());
    }
    let mut err = ValidationError::new("mobile");
    err.message = Some("Please enter a valid mobile number".into());
    Err(err)
}

fn validate_company_type(value: &str) -> Result<(), ValidationError> {
    match value.trim().parse::<i32>().ok().and_then(CompanyType::from_code) {
        Some(_) => Ok(()),
        None => {
            let mut err = ValidationError::new("company_type");
            err.message = Some("Please select a company type".into());
            Err(err)
        }
    }
}

fn text(value: &Option<String>) -> String {
    value.as_deref().map(str::trim).unwrap_or_default().to_string()
}

fn errors_of<T: Validate>(form: &T) -> FieldErrors {
    match form.validate() {
        Ok(()) => FieldErrors::new(),
        Err(e) => FieldErrors::from_validator(&e),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct CompanyForm {
    #[serde(default, deserialize_with = "lenient::opt_text")]
    #[validate(length(min = 2, max = 100, message = "Must be between 2 and 100 chars"))]
    pub company_name: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_text")]
    #[validate(
        email(message = "Must be a valid email"),
        length(max = 100, message = "Must be max 100 chars")
    )]
    pub company_email: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_text")]
    #[validate(custom = "validate_phone")]
    pub company_phone: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_text")]
    #[validate(length(min = 2, max = 100, message = "Must be between 2 and 100 chars"))]
    pub company_add1: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_text")]
    #[validate(length(max = 100, message = "Must be max 100 chars"))]
    pub company_add2: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_text")]
    #[validate(length(min = 2, max = 100, message = "Must be between 2 and 100 chars"))]
    pub company_city: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_text")]
    #[validate(length(min = 2, max = 20, message = "Must be between 2 and 20 chars"))]
    pub company_post_code: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_text")]
    #[validate(length(min = 2, max = 100, message = "Must be between 2 and 100 chars"))]
    pub country: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_text")]
    #[validate(custom = "validate_company_type")]
    pub company_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompanyDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub country: String,
    pub company_type: CompanyType,
}

/// Joins the address lines into the single stored string.
pub fn collapse_address(lines: &[&str]) -> String {
    lines
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

impl CompanyForm {
    /// Rebuilds the edit form from a stored company. The address is split back
    /// on commas: four parts are street, street 2, city, post code; three
    /// parts have no second street line.
    pub fn from_stored(
        name: &str,
        email: &str,
        phone: &str,
        address: &str,
        country: &str,
        company_type: CompanyType,
    ) -> Self {
        let parts: Vec<&str> = address.split(',').map(str::trim).collect();
        let owned = |s: &str| (!s.is_empty()).then(|| s.to_string());
        let (add1, add2, city, post_code) = match parts.as_slice() {
            [add1, add2, city, post_code, ..] => (*add1, *add2, *city, *post_code),
            [add1, city, post_code] => (*add1, "", *city, *post_code),
            _ => (address.trim(), "", "", ""),
        };
        Self {
            company_name: owned(name),
            company_email: owned(email),
            company_phone: owned(phone),
            company_add1: owned(add1),
            company_add2: owned(add2),
            company_city: owned(city),
            company_post_code: owned(post_code),
            country: owned(country),
            company_type: Some(company_type.code().to_string()),
        }
    }
}

pub fn validate_company(form: &CompanyForm) -> Result<CompanyDraft, FieldErrors> {
    let mut errors = errors_of(form);
    for (value, field, message) in [
        (&form.company_name, "company_name", "Company name is required"),
        (&form.company_email, "company_email", "Email is required"),
        (&form.company_phone, "company_phone", "Phone number is required"),
        (&form.company_add1, "company_add1", "Street address is required"),
        (&form.company_city, "company_city", "City is required"),
        (&form.company_post_code, "company_post_code", "Post code is required"),
        (&form.country, "country", "Country is required"),
        (&form.company_type, "company_type", "Company type is required"),
    ] {
        require(value, field, message, &mut errors);
    }
    if !errors.is_empty() {
        return Err(errors);
    }

    let company_type = form
        .company_type
        .as_deref()
        .and_then(|raw| raw.trim().parse::<i32>().ok())
        .and_then(CompanyType::from_code);
    let Some(company_type) = company_type else {
        errors.add("company_type", "Please select a company type");
        return Err(errors);
    };

    Ok(CompanyDraft {
        name: text(&form.company_name),
        email: text(&form.company_email),
        phone: text(&form.company_phone),
        address: collapse_address(&[
            text(&form.company_add1).as_str(),
            text(&form.company_add2).as_str(),
            text(&form.company_city).as_str(),
            text(&form.company_post_code).as_str(),
        ]),
        country: text(&form.country),
        company_type,
    })
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct EmployeeForm {
    #[serde(default, deserialize_with = "lenient::opt_text")]
    #[validate(length(max = 50, message = "Employee firstname must be less than 50 characters"))]
    pub employee_firstname: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_text")]
    #[validate(length(max = 50, message = "Employee lastname must be less than 50 characters"))]
    pub employee_lastname: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_text")]
    #[validate(custom = "validate_mobile")]
    pub employee_mobile: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_text")]
    #[validate(
        email(message = "Must be a valid email"),
        length(max = 100, message = "Must be max 100 chars")
    )]
    pub employee_email: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub employee_position: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub position: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_text")]
    #[validate(custom = "validate_uuid")]
    pub company_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeDraft {
    pub name: String,
    pub mobile: String,
    pub email: String,
    pub employee_position: String,
    pub position: String,
    pub company_id: Uuid,
}

/// Splits a stored full name at the first space.
pub fn split_name(full_name: &str) -> (String, String) {
    match full_name.trim().split_once(' ') {
        Some((first, last)) => (first.to_string(), last.trim().to_string()),
        None => (full_name.trim().to_string(), String::new()),
    }
}

impl EmployeeForm {
    pub fn from_stored(
        name: &str,
        mobile: &str,
        email: &str,
        employee_position: &str,
        position: &str,
        company_id: Uuid,
    ) -> Self {
        let (first, last) = split_name(name);
        let owned = |s: &str| (!s.is_empty()).then(|| s.to_string());
        Self {
            employee_firstname: owned(&first),
            employee_lastname: owned(&last),
            employee_mobile: owned(mobile),
            employee_email: owned(email),
            employee_position: owned(employee_position),
            position: owned(position),
            company_id: Some(company_id.to_string()),
        }
    }
}

pub fn validate_employee(form: &EmployeeForm) -> Result<EmployeeDraft, FieldErrors> {
    let mut errors = errors_of(form);
    for (value, field, message) in [
        (&form.employee_firstname, "employee_firstname", "Employee firstname is required"),
        (&form.employee_lastname, "employee_lastname", "Employee lastname is required"),
        (&form.employee_mobile, "employee_mobile", "Employee mobile is required"),
        (&form.employee_email, "employee_email", "Email is required"),
        (&form.employee_position, "employee_position", "Employee position is required"),
        (&form.position, "position", "Position is required"),
        (&form.company_id, "company_id", "Company ID is required"),
    ] {
        require(value, field, message, &mut errors);
    }
    if !errors.is_empty() {
        return Err(errors);
    }

    let Some(company_id) = form.company_id.as_deref().and_then(super::parse_uuid) else {
        errors.add("company_id", "Invalid selection");
        return Err(errors);
    };

    Ok(EmployeeDraft {
        name: format!(
            "{} {}",
            text(&form.employee_firstname),
            text(&form.employee_lastname)
        ),
        mobile: text(&form.employee_mobile),
        email: text(&form.employee_email),
        employee_position: text(&form.employee_position),
        position: text(&form.position),
        company_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn company_json() -> serde_json::Value {
        json!({
            "company_name": "Blue Anchor Marine",
            "company_email": "ops@blueanchor.test",
            "company_phone": "+30 210 555 0100",
            "company_add1": "12 Akti Miaouli",
            "company_add2": "",
            "company_city": "Piraeus",
            "company_post_code": "185 38",
            "country": "Greece",
            "company_type": "2"
        })
    }

    #[test]
    fn company_address_is_collapsed() {
        let form: CompanyForm = serde_json::from_value(company_json()).unwrap();
        let draft = validate_company(&form).unwrap();
        assert_eq!(draft.address, "12 Akti Miaouli, Piraeus, 185 38");
        assert_eq!(draft.company_type, CompanyType::Supplier);
    }

    #[rstest]
    #[case("company_phone", json!("12345"), "Must be between 10 and 15 digits")]
    #[case("company_phone", json!("call me maybe"), "Please enter a valid mobile number")]
    #[case("company_email", json!("nobody"), "Must be a valid email")]
    #[case("company_type", json!("9"), "Please select a company type")]
    #[case("company_post_code", json!("1"), "Must be between 2 and 20 chars")]
    #[case("company_name", json!(null), "Company name is required")]
    fn company_field_rules(
        #[case] field: &str,
        #[case] value: serde_json::Value,
        #[case] message: &str,
    ) {
        let mut raw = company_json();
        raw[field] = value;
        let form: CompanyForm = serde_json::from_value(raw).unwrap();

        let errors = validate_company(&form).unwrap_err();

        assert!(errors.contains(field, message), "{:?}", errors);
    }

    #[test]
    fn company_edit_form_splits_address() {
        let form = CompanyForm::from_stored(
            "Blue Anchor Marine",
            "ops@blueanchor.test",
            "+30 210 555 0100",
            "12 Akti Miaouli, Floor 3, Piraeus, 185 38",
            "Greece",
            CompanyType::Client,
        );
        assert_eq!(form.company_add2.as_deref(), Some("Floor 3"));
        assert_eq!(form.company_post_code.as_deref(), Some("185 38"));
        assert_eq!(form.company_type.as_deref(), Some("3"));

        let form = CompanyForm::from_stored(
            "A",
            "a@b.test",
            "",
            "1 Quay, Leith, EH6",
            "UK",
            CompanyType::TwoWay,
        );
        assert_eq!(form.company_add2, None);
        assert_eq!(form.company_city.as_deref(), Some("Leith"));
    }

    #[test]
    fn employee_name_is_joined_and_split() {
        let company = Uuid::new_v4();
        let form: EmployeeForm = serde_json::from_value(json!({
            "employee_firstname": "Maria",
            "employee_lastname": "Papadaki",
            "employee_mobile": "+30 694 123 4567",
            "employee_email": "maria@blueanchor.test",
            "employee_position": "Purchasing",
            "position": "Manager",
            "company_id": company.to_string()
        }))
        .unwrap();

        let draft = validate_employee(&form).unwrap();
        assert_eq!(draft.name, "Maria Papadaki");
        assert_eq!(draft.company_id, company);

        assert_eq!(
            split_name("Maria van der Berg"),
            ("Maria".to_string(), "van der Berg".to_string())
        );
        assert_eq!(split_name("Cher"), ("Cher".to_string(), String::new()));
    }

    #[test]
    fn employee_requires_both_position_fields() {
        let form: EmployeeForm = serde_json::from_value(json!({
            "employee_firstname": "Maria",
            "employee_lastname": "Papadaki",
            "employee_mobile": "+30 694 123 4567",
            "employee_email": "maria@blueanchor.test",
            "company_id": "bogus"
        }))
        .unwrap();

        let errors = validate_employee(&form).unwrap_err();

        assert!(errors.contains("employee_position", "Employee position is required"));
        assert!(errors.contains("position", "Position is required"));
        assert!(errors.contains("company_id", "Invalid selection"));
    }

    #[test]
    fn empty_forms_report_every_required_field() {
        let errors = validate_company(&CompanyForm::default()).unwrap_err();
        assert!(errors.contains("company_email", "Email is required"));
        assert!(errors.contains("company_add1", "Street address is required"));
        assert!(errors.contains("company_type", "Company type is required"));
        assert!(!errors.has("company_add2"));

        let errors = validate_employee(&EmployeeForm::default()).unwrap_err();
        assert!(errors.contains("employee_firstname", "Employee firstname is required"));
        assert!(errors.contains("employee_mobile", "Employee mobile is required"));
        assert!(errors.contains("company_id", "Company ID is required"));
    }

    #[test]
    fn blank_text_counts_as_missing() {
        let mut raw = company_json();
        raw["company_city"] = json!("   ");
        let form: CompanyForm = serde_json::from_value(raw).unwrap();

        let errors = validate_company(&form).unwrap_err();

        assert!(errors.contains("company_city", "City is required"));
    }
}
