use super::common::{submission_response, success_response, FormSubmission};
use crate::{errors::ApiError, AppState};
use axum::{
    extract::{Path, Query, State},
    response::Response,
    routing::get,
    Router,
};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize)]
pub struct ProductListQuery {
    pub search: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProductSearchQuery {
    pub search: Option<String>,
}

pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route("/products/options", get(product_options))
        .route("/products/:id", get(get_product).put(update_product))
        .route("/products/:id/edit", get(edit_product))
        .route("/products/:id/attributes", get(product_attributes))
}

pub async fn create_product(
    State(state): State<AppState>,
    FormSubmission(submitted): FormSubmission,
) -> Result<Response, ApiError> {
    let outcome = state.services.products.create(submitted).await?;
    Ok(submission_response(outcome, true, "Product created successfully"))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    FormSubmission(submitted): FormSubmission,
) -> Result<Response, ApiError> {
    let outcome = state.services.products.update(id, submitted).await?;
    Ok(submission_response(outcome, false, "Product updated successfully"))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    Ok(success_response(state.services.products.get(id).await?))
}

pub async fn edit_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    Ok(success_response(state.services.products.edit_form(id).await?))
}

pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> Result<Response, ApiError> {
    let page = query.page.filter(|p| *p > 0).unwrap_or(1);
    let per_page = state.config.page_size(query.per_page);
    let products = state
        .services
        .products
        .list(query.search.as_deref(), page, per_page)
        .await?;
    Ok(success_response(products))
}

/// Product picker entries, filtered by name prefix.
pub async fn product_options(
    State(state): State<AppState>,
    Query(query): Query<ProductSearchQuery>,
) -> Result<Response, ApiError> {
    let options = state
        .services
        .products
        .options(query.search.as_deref())
        .await?;
    Ok(success_response(options))
}

/// Attribute rows a line item starts with when this product is picked.
pub async fn product_attributes(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let pairs = state.services.products.attribute_pairs(id).await?;
    Ok(success_response(pairs))
}
