use super::common::success_response;
use crate::{errors::ApiError, AppState};
use axum::{
    extract::{Query, State},
    response::Response,
    routing::get,
    Router,
};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize)]
pub struct SupplierQuotationListQuery {
    pub line_item_id: Option<Uuid>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

pub fn supplier_quotation_routes() -> Router<AppState> {
    Router::new().route("/supplier-quotations", get(list_supplier_quotations))
}

pub async fn list_supplier_quotations(
    State(state): State<AppState>,
    Query(query): Query<SupplierQuotationListQuery>,
) -> Result<Response, ApiError> {
    let page = query.page.filter(|p| *p > 0).unwrap_or(1);
    let per_page = state.config.page_size(query.per_page);
    let quotes = state
        .services
        .supplier_quotations
        .list(query.line_item_id, page, per_page)
        .await?;
    Ok(success_response(quotes))
}
