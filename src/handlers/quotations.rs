use super::common::{submission_response, success_response, FormSubmission, PaginationParams};
use crate::{errors::ApiError, AppState};
use axum::{
    extract::{Path, Query, State},
    response::Response,
    routing::get,
    Router,
};
use uuid::Uuid;

pub fn quotation_routes() -> Router<AppState> {
    Router::new()
        .route("/quotations", get(list_quotations).post(create_quotation))
        .route("/quotations/:id", get(get_quotation).put(update_quotation))
        .route("/quotations/:id/edit", get(edit_quotation))
}

/// Creates a quotation request together with its line items and new products.
pub async fn create_quotation(
    State(state): State<AppState>,
    FormSubmission(submitted): FormSubmission,
) -> Result<Response, ApiError> {
    let outcome = state.services.quotations.create(submitted).await?;
    Ok(submission_response(
        outcome,
        true,
        "Quotation request created successfully",
    ))
}

/// Replaces a quotation request's header and line items.
pub async fn update_quotation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    FormSubmission(submitted): FormSubmission,
) -> Result<Response, ApiError> {
    let outcome = state.services.quotations.update(id, submitted).await?;
    Ok(submission_response(
        outcome,
        false,
        "Quotation request updated successfully",
    ))
}

pub async fn get_quotation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let details = state.services.quotations.get(id).await?;
    Ok(success_response(details))
}

/// Values to seed the edit form with.
pub async fn edit_quotation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let form = state.services.quotations.edit_form(id).await?;
    Ok(success_response(form))
}

pub async fn list_quotations(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Response, ApiError> {
    let (page, per_page) = params.resolve(&state.config);
    let quotations = state.services.quotations.list(page, per_page).await?;
    Ok(success_response(quotations))
}
