use crate::errors::ApiError;
use crate::forms::{parse_form, SubmissionOutcome};
use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
    Form, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Standard success response
pub fn success_response<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(data)).into_response()
}

/// Standard created response
pub fn created_response<T: Serialize>(data: T) -> Response {
    (StatusCode::CREATED, Json(data)).into_response()
}

/// Body sent back when a form was saved.
#[derive(Debug, Serialize, Deserialize)]
pub struct SavedResponse {
    pub status: String,
    pub id: Uuid,
    pub message: String,
}

/// Renders a form outcome: the saved id with 201 (`created`) or 200, or the
/// rejection reply with 422.
pub fn submission_response(
    outcome: SubmissionOutcome<Uuid>,
    created: bool,
    message: &str,
) -> Response {
    match outcome {
        SubmissionOutcome::Saved(id) => {
            let body = SavedResponse {
                status: "success".to_string(),
                id,
                message: message.to_string(),
            };
            if created {
                created_response(body)
            } else {
                success_response(body)
            }
        }
        SubmissionOutcome::Rejected(reply) => {
            (StatusCode::UNPROCESSABLE_ENTITY, Json(reply)).into_response()
        }
    }
}

/// A submitted form, normalized to a JSON value.
///
/// JSON bodies are taken as they are. Urlencoded bodies are rebuilt into
/// nested objects and arrays from their bracketed field names.
#[derive(Debug, Clone)]
pub struct FormSubmission(pub Value);

#[async_trait]
impl<S> FromRequest<S> for FormSubmission
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("application/json") {
            let Json(value) = Json::<Value>::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            Ok(FormSubmission(value))
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            Ok(FormSubmission(parse_form(&pairs)))
        } else {
            Err(ApiError::UnsupportedMediaType(format!(
                "Expected application/json or application/x-www-form-urlencoded, got '{}'",
                content_type
            )))
        }
    }
}

/// Pagination parameters for list operations
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PaginationParams {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl PaginationParams {
    /// One-based page and clamped page size.
    pub fn resolve(&self, config: &crate::config::AppConfig) -> (u64, u64) {
        (
            self.page.filter(|p| *p > 0).unwrap_or(1),
            config.page_size(self.per_page),
        )
    }
}
