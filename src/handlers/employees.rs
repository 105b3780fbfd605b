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
pub struct EmployeeListQuery {
    pub company_id: Option<Uuid>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

pub fn employee_routes() -> Router<AppState> {
    Router::new()
        .route("/employees", get(list_employees).post(create_employee))
        .route("/employees/:id", get(get_employee).put(update_employee))
        .route("/employees/:id/edit", get(edit_employee))
}

pub async fn create_employee(
    State(state): State<AppState>,
    FormSubmission(submitted): FormSubmission,
) -> Result<Response, ApiError> {
    let outcome = state.services.employees.create(submitted).await?;
    Ok(submission_response(outcome, true, "Employee created successfully"))
}

pub async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    FormSubmission(submitted): FormSubmission,
) -> Result<Response, ApiError> {
    let outcome = state.services.employees.update(id, submitted).await?;
    Ok(submission_response(outcome, false, "Employee updated successfully"))
}

pub async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    Ok(success_response(state.services.employees.get(id).await?))
}

pub async fn edit_employee(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    Ok(success_response(state.services.employees.edit_form(id).await?))
}

pub async fn list_employees(
    State(state): State<AppState>,
    Query(query): Query<EmployeeListQuery>,
) -> Result<Response, ApiError> {
    let page = query.page.filter(|p| *p > 0).unwrap_or(1);
    let per_page = state.config.page_size(query.per_page);
    let employees = state
        .services
        .employees
        .list(query.company_id, page, per_page)
        .await?;
    Ok(success_response(employees))
}
