use super::common::{submission_response, success_response, FormSubmission};
use crate::{entities::company::CompanyType, errors::ApiError, AppState};
use axum::{
    extract::{Path, Query, State},
    response::Response,
    routing::get,
    Router,
};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize)]
pub struct CompanyListQuery {
    /// 1 two way, 2 supplier, 3 client
    pub company_type: Option<i32>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

pub fn company_routes() -> Router<AppState> {
    Router::new()
        .route("/companies", get(list_companies).post(create_company))
        .route("/companies/:id", get(get_company).put(update_company))
        .route("/companies/:id/edit", get(edit_company))
}

pub async fn create_company(
    State(state): State<AppState>,
    FormSubmission(submitted): FormSubmission,
) -> Result<Response, ApiError> {
    let outcome = state.services.companies.create(submitted).await?;
    Ok(submission_response(outcome, true, "Company created successfully"))
}

pub async fn update_company(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    FormSubmission(submitted): FormSubmission,
) -> Result<Response, ApiError> {
    let outcome = state.services.companies.update(id, submitted).await?;
    Ok(submission_response(outcome, false, "Company updated successfully"))
}

pub async fn get_company(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    Ok(success_response(state.services.companies.get(id).await?))
}

pub async fn edit_company(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    Ok(success_response(state.services.companies.edit_form(id).await?))
}

pub async fn list_companies(
    State(state): State<AppState>,
    Query(query): Query<CompanyListQuery>,
) -> Result<Response, ApiError> {
    let company_type = match query.company_type {
        None => None,
        Some(code) => Some(CompanyType::from_code(code).ok_or_else(|| {
            ApiError::BadRequest(format!("Unknown company type {}", code))
        })?),
    };
    let page = query.page.filter(|p| *p > 0).unwrap_or(1);
    let per_page = state.config.page_size(query.per_page);
    let companies = state
        .services
        .companies
        .list(company_type, page, per_page)
        .await?;
    Ok(success_response(companies))
}
