use crate::{
    db::DbPool,
    entities::company::{self, CompanyType},
    entities::employee,
    errors::ServiceError,
    events::{Event, EventSender},
    forms::SubmissionOutcome,
    repositories::Page,
    validation::directory::{validate_company, CompanyDraft, CompanyForm},
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

pub const SAVE_FAILED: &str = "Failed to save company. Please try again.";

#[derive(Debug, Clone, Serialize)]
pub struct CompanyDetails {
    #[serde(flatten)]
    pub company: company::Model,
    pub company_type_label: &'static str,
    pub employee_count: u64,
}

#[derive(Clone)]
pub struct CompanyService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl CompanyService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self, submitted))]
    pub async fn create(&self, submitted: Value) -> Result<SubmissionOutcome<Uuid>, ServiceError> {
        let draft = match check(&submitted) {
            Ok(draft) => draft,
            Err(outcome) => return Ok(outcome),
        };

        let inserted = company::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(draft.name),
            email: Set(draft.email),
            phone: Set(draft.phone),
            address: Set(draft.address),
            country: Set(draft.country),
            company_type: Set(draft.company_type),
            ..Default::default()
        }
        .insert(self.db_pool.as_ref())
        .await
        .map_err(|e| {
            error!("Failed to create company: {}", e);
            ServiceError::db_error(e)
        });

        match inserted {
            Ok(saved) => {
                info!(company_id = %saved.id, "Company created");
                self.event_sender
                    .send_or_log(Event::CompanyCreated(saved.id))
                    .await;
                Ok(SubmissionOutcome::Saved(saved.id))
            }
            Err(e) => super::write_failed("company", submitted, e, SAVE_FAILED),
        }
    }

    #[instrument(skip(self, submitted))]
    pub async fn update(
        &self,
        id: Uuid,
        submitted: Value,
    ) -> Result<SubmissionOutcome<Uuid>, ServiceError> {
        let existing = self.require(id).await?;
        let draft = match check(&submitted) {
            Ok(draft) => draft,
            Err(outcome) => return Ok(outcome),
        };

        let mut active = existing.into_active_model();
        active.name = Set(draft.name);
        active.email = Set(draft.email);
        active.phone = Set(draft.phone);
        active.address = Set(draft.address);
        active.country = Set(draft.country);
        active.company_type = Set(draft.company_type);
        let updated = active.update(self.db_pool.as_ref()).await.map_err(|e| {
            error!(company_id = %id, "Failed to update company: {}", e);
            ServiceError::db_error(e)
        });

        match updated {
            Ok(saved) => {
                info!(company_id = %saved.id, "Company updated");
                self.event_sender
                    .send_or_log(Event::CompanyUpdated(saved.id))
                    .await;
                Ok(SubmissionOutcome::Saved(saved.id))
            }
            Err(e) => super::write_failed("company", submitted, e, SAVE_FAILED),
        }
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<CompanyDetails, ServiceError> {
        let company = self.require(id).await?;
        let employee_count = employee::Entity::find()
            .filter(employee::Column::CompanyId.eq(id))
            .count(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::db_error)?;

        Ok(CompanyDetails {
            company_type_label: company.company_type.label(),
            company,
            employee_count,
        })
    }

    pub async fn edit_form(&self, id: Uuid) -> Result<CompanyForm, ServiceError> {
        let c = self.require(id).await?;
        Ok(CompanyForm::from_stored(
            &c.name,
            &c.email,
            &c.phone,
            &c.address,
            &c.country,
            c.company_type,
        ))
    }

    /// Companies sorted by name, optionally only those of one type.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        company_type: Option<CompanyType>,
        page: u64,
        per_page: u64,
    ) -> Result<Page<company::Model>, ServiceError> {
        let mut query = company::Entity::find().order_by_asc(company::Column::Name);
        if let Some(kind) = company_type {
            query = query.filter(company::Column::CompanyType.eq(kind));
        }
        let paginator = query.paginate(self.db_pool.as_ref(), per_page);
        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let items = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::db_error)?;
        Ok(Page::new(items, page, per_page, total))
    }

    async fn require(&self, id: Uuid) -> Result<company::Model, ServiceError> {
        company::Entity::find_by_id(id)
            .one(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::not_found("Company", id))
    }
}

fn check(submitted: &Value) -> Result<CompanyDraft, SubmissionOutcome<Uuid>> {
    let form: CompanyForm = super::decode_form(submitted).map_err(SubmissionOutcome::Rejected)?;
    validate_company(&form).map_err(|errors| super::invalid("company", submitted.clone(), errors))
}
