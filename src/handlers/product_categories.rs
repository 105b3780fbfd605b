use super::common::{submission_response, success_response, FormSubmission, PaginationParams};
use crate::{errors::ApiError, AppState};
use axum::{
    extract::{Path, Query, State},
    response::Response,
    routing::get,
    Router,
};
use uuid::Uuid;

pub fn product_category_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/product-categories",
            get(list_categories).post(create_category),
        )
        .route(
            "/product-categories/:id",
            get(get_category).put(update_category),
        )
        .route("/product-categories/:id/edit", get(edit_category))
}

pub async fn create_category(
    State(state): State<AppState>,
    FormSubmission(submitted): FormSubmission,
) -> Result<Response, ApiError> {
    let outcome = state.services.product_categories.create(submitted).await?;
    Ok(submission_response(
        outcome,
        true,
        "Product category created successfully",
    ))
}

pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    FormSubmission(submitted): FormSubmission,
) -> Result<Response, ApiError> {
    let outcome = state
        .services
        .product_categories
        .update(id, submitted)
        .await?;
    Ok(submission_response(
        outcome,
        false,
        "Product category updated successfully",
    ))
}

pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    Ok(success_response(
        state.services.product_categories.get(id).await?,
    ))
}

pub async fn edit_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    Ok(success_response(
        state.services.product_categories.edit_form(id).await?,
    ))
}

pub async fn list_categories(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Response, ApiError> {
    let (page, per_page) = params.resolve(&state.config);
    let categories = state
        .services
        .product_categories
        .list(page, per_page)
        .await?;
    Ok(success_response(categories))
}
