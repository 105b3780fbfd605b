use crate::{
    db::DbPool,
    entities::{company, employee},
    errors::ServiceError,
    events::{Event, EventSender},
    forms::{FieldErrors, SubmissionOutcome},
    repositories::Page,
    validation::directory::{validate_employee, EmployeeDraft, EmployeeForm},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;

pub const SAVE_FAILED: &str = "Failed to save employee. Please try again.";
pub const COMPANY_MISSING: &str = "Selected company no longer exists";

#[derive(Debug, Clone, Serialize)]
pub struct EmployeeDetails {
    #[serde(flatten)]
    pub employee: employee::Model,
    pub company_name: Option<String>,
}

#[derive(Clone)]
pub struct EmployeeService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl EmployeeService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self, submitted))]
    pub async fn create(&self, submitted: Value) -> Result<SubmissionOutcome<Uuid>, ServiceError> {
        let draft = match self.check(&submitted).await? {
            Ok(draft) => draft,
            Err(outcome) => return Ok(outcome),
        };

        let inserted = employee::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(draft.name),
            mobile: Set(draft.mobile),
            email: Set(draft.email),
            employee_position: Set(draft.employee_position),
            position: Set(draft.position),
            company_id: Set(draft.company_id),
            ..Default::default()
        }
        .insert(self.db_pool.as_ref())
        .await
        .map_err(|e| {
            error!("Failed to create employee: {}", e);
            ServiceError::db_error(e)
        });

        match inserted {
            Ok(saved) => {
                info!(employee_id = %saved.id, company_id = %saved.company_id, "Employee created");
                self.event_sender
                    .send_or_log(Event::EmployeeCreated(saved.id))
                    .await;
                Ok(SubmissionOutcome::Saved(saved.id))
            }
            Err(e) => super::write_failed("employee", submitted, e, SAVE_FAILED),
        }
    }

    #[instrument(skip(self, submitted))]
    pub async fn update(
        &self,
        id: Uuid,
        submitted: Value,
    ) -> Result<SubmissionOutcome<Uuid>, ServiceError> {
        let existing = self.require(id).await?;
        let draft = match self.check(&submitted).await? {
            Ok(draft) => draft,
            Err(outcome) => return Ok(outcome),
        };

        let mut active = existing.into_active_model();
        active.name = Set(draft.name);
        active.mobile = Set(draft.mobile);
        active.email = Set(draft.email);
        active.employee_position = Set(draft.employee_position);
        active.position = Set(draft.position);
        active.company_id = Set(draft.company_id);
        let updated = active.update(self.db_pool.as_ref()).await.map_err(|e| {
            error!(employee_id = %id, "Failed to update employee: {}", e);
            ServiceError::db_error(e)
        });

        match updated {
            Ok(saved) => {
                info!(employee_id = %saved.id, "Employee updated");
                self.event_sender
                    .send_or_log(Event::EmployeeUpdated(saved.id))
                    .await;
                Ok(SubmissionOutcome::Saved(saved.id))
            }
            Err(e) => super::write_failed("employee", submitted, e, SAVE_FAILED),
        }
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<EmployeeDetails, ServiceError> {
        let employee = self.require(id).await?;
        let company = company::Entity::find_by_id(employee.company_id)
            .one(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::db_error)?;
        Ok(EmployeeDetails {
            company_name: company.map(|c| c.name),
            employee,
        })
    }

    pub async fn edit_form(&self, id: Uuid) -> Result<EmployeeForm, ServiceError> {
        let e = self.require(id).await?;
        Ok(EmployeeForm::from_stored(
            &e.name,
            &e.mobile,
            &e.email,
            &e.employee_position,
            &e.position,
            e.company_id,
        ))
    }

    /// Employees sorted by name, optionally only those of one company.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        company_id: Option<Uuid>,
        page: u64,
        per_page: u64,
    ) -> Result<Page<employee::Model>, ServiceError> {
        let mut query = employee::Entity::find().order_by_asc(employee::Column::Name);
        if let Some(company_id) = company_id {
            query = query.filter(employee::Column::CompanyId.eq(company_id));
        }
        let paginator = query.paginate(self.db_pool.as_ref(), per_page);
        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let items = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::db_error)?;
        Ok(Page::new(items, page, per_page, total))
    }

    /// Form rules, then the one rule that needs the database: the company
    /// must still exist.
    async fn check(
        &self,
        submitted: &Value,
    ) -> Result<Result<EmployeeDraft, SubmissionOutcome<Uuid>>, ServiceError> {
        let form: EmployeeForm = match super::decode_form(submitted) {
            Ok(form) => form,
            Err(reply) => return Ok(Err(SubmissionOutcome::Rejected(reply))),
        };
        let draft = match validate_employee(&form) {
            Ok(draft) => draft,
            Err(errors) => return Ok(Err(super::invalid("employee", submitted.clone(), errors))),
        };

        let company = company::Entity::find_by_id(draft.company_id)
            .one(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::db_error)?;
        if company.is_none() {
            let mut errors = FieldErrors::new();
            errors.add("company_id", COMPANY_MISSING);
            return Ok(Err(super::invalid("employee", submitted.clone(), errors)));
        }
        Ok(Ok(draft))
    }

    async fn require(&self, id: Uuid) -> Result<employee::Model, ServiceError> {
        employee::Entity::find_by_id(id)
            .one(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::not_found("Employee", id))
    }
}
