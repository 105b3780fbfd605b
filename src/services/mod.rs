//! Application services: each one runs the submission pipeline for one kind
//! of record (decode, validate against stored data, persist, publish) and
//! serves the read models the HTTP layer renders.

pub mod companies;
pub mod employees;
pub mod product_categories;
pub mod products;
pub mod quotations;
pub mod supplier_quotations;

use crate::errors::ServiceError;
use crate::forms::{FieldErrors, SubmissionOutcome, SubmissionReply, MALFORMED_FORM};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

/// Decodes a submitted payload into a typed form, or the reply that tells the
/// client its body was not a form of that shape.
///
/// Only objects are forms; serde would otherwise fill a struct from an array
/// positionally.
pub(crate) fn decode_form<T: DeserializeOwned>(submitted: &Value) -> Result<T, SubmissionReply> {
    if !submitted.is_object() {
        debug!("Submitted form is not an object");
        return Err(SubmissionReply::invalid_form(
            submitted.clone(),
            MALFORMED_FORM,
        ));
    }
    serde_json::from_value(submitted.clone()).map_err(|e| {
        debug!("Submitted form could not be decoded: {}", e);
        SubmissionReply::invalid_form(submitted.clone(), MALFORMED_FORM)
    })
}

/// Rejection for a form that broke one or more rules. Not a fault, so it is
/// only logged at debug level.
pub(crate) fn invalid<T>(form: &str, submitted: Value, errors: FieldErrors) -> SubmissionOutcome<T> {
    debug!(form, fields = ?errors.paths().collect::<Vec<_>>(), "Form rejected by validation");
    SubmissionOutcome::Rejected(SubmissionReply::invalid(submitted, errors))
}

/// Maps a failed write to the outcome the caller sees.
///
/// Storage failures are logged and reported as one generic form error, keeping
/// the submitted values. Anything else, such as a record that vanished, stays
/// an error.
pub(crate) fn write_failed<T>(
    form: &str,
    submitted: Value,
    err: ServiceError,
    message: &str,
) -> Result<SubmissionOutcome<T>, ServiceError> {
    if !err.is_persistence_failure() {
        return Err(err);
    }
    error!(form, error = %err, "Failed to save submitted form");
    Ok(SubmissionOutcome::Rejected(SubmissionReply::not_saved(
        submitted, message,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::RejectionKind;
    use crate::validation::quotation::QuotationForm;
    use serde_json::json;

    #[test]
    fn positional_arrays_are_not_forms() {
        let submitted = json!([
            "RFQ-1",
            "2025-03-01",
            "MV Aegean Star",
            "6f0c7a64-9c53-4f0e-8a8e-2b1f4e0c9d11",
            "0b1e5f8e-3d2a-4c6b-9e7f-5a4d3c2b1a00",
            []
        ]);

        let reply = decode_form::<QuotationForm>(&submitted).unwrap_err();

        assert_eq!(reply.kind, RejectionKind::Validation);
        assert_eq!(reply.form_errors, vec![MALFORMED_FORM.to_string()]);
        assert!(reply.field_errors.is_empty());
        assert_eq!(reply.initial_value, submitted);
    }

    #[test]
    fn objects_decode_into_the_form() {
        let form: QuotationForm =
            decode_form(&json!({"quotation_request_ref": "RFQ-1"})).unwrap();
        assert_eq!(form.quotation_request_ref.as_deref(), Some("RFQ-1"));
    }

    #[test]
    fn only_storage_failures_become_form_errors() {
        let outcome = write_failed::<()>(
            "quotation",
            json!({}),
            ServiceError::db_error("disk I/O error"),
            "Failed to save quotation. Please try again.",
        )
        .unwrap();
        let reply = outcome.rejected().unwrap();
        assert_eq!(reply.kind, RejectionKind::Persistence);

        let err = write_failed::<()>(
            "quotation",
            json!({}),
            ServiceError::not_found("Quotation", "q-1"),
            "Failed to save quotation. Please try again.",
        )
        .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}
