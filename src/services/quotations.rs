use crate::{
    commands::quotations::SaveQuotationCommand,
    commands::Command,
    db::DbPool,
    entities::{company, employee},
    errors::ServiceError,
    events::EventSender,
    forms::attributes::{from_json, to_pairs, AttributeMap},
    forms::SubmissionOutcome,
    repositories::{Page, ProductRepository, QuotationRepository},
    validation::quotation::{validate_quotation, LineItemForm, QuotationForm},
};
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

pub const SAVE_FAILED: &str = "Failed to save quotation. Please try again.";

#[derive(Debug, Clone, Serialize)]
pub struct QuotationSummary {
    pub id: Uuid,
    pub reference: String,
    pub request_date: NaiveDate,
    pub vessel: String,
    pub company_id: Uuid,
    pub company_name: Option<String>,
    pub employee_id: Uuid,
    pub employee_name: Option<String>,
    pub line_item_count: u64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuotationDetails {
    pub id: Uuid,
    pub reference: String,
    pub request_date: NaiveDate,
    pub vessel: String,
    pub company_id: Uuid,
    pub company_name: Option<String>,
    pub employee_id: Uuid,
    pub employee_name: Option<String>,
    pub line_items: Vec<LineItemDetails>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LineItemDetails {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: Option<String>,
    pub quantity: i32,
    pub attributes: AttributeMap,
    pub supplier_quotation_count: u64,
}

/// Quotation requests: submission pipeline plus read models.
#[derive(Clone)]
pub struct QuotationService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
    quotations: QuotationRepository,
    products: ProductRepository,
}

impl QuotationService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            quotations: QuotationRepository::new(db_pool.clone()),
            products: ProductRepository::new(db_pool.clone()),
            db_pool,
            event_sender,
        }
    }

    /// Validates and stores a new quotation.
    #[instrument(skip(self, submitted))]
    pub async fn create(&self, submitted: Value) -> Result<SubmissionOutcome<Uuid>, ServiceError> {
        self.submit(None, submitted).await
    }

    /// Validates and stores an edit, replacing every line item of `id`.
    #[instrument(skip(self, submitted))]
    pub async fn update(
        &self,
        id: Uuid,
        submitted: Value,
    ) -> Result<SubmissionOutcome<Uuid>, ServiceError> {
        if self.quotations.find_by_id(id).await?.is_none() {
            return Err(ServiceError::not_found("Quotation", id));
        }
        self.submit(Some(id), submitted).await
    }

    async fn submit(
        &self,
        id: Option<Uuid>,
        submitted: Value,
    ) -> Result<SubmissionOutcome<Uuid>, ServiceError> {
        let form: QuotationForm = match super::decode_form(&submitted) {
            Ok(form) => form,
            Err(reply) => return Ok(SubmissionOutcome::Rejected(reply)),
        };

        // Read as late as possible; the unique index still guards the window
        // between this read and the commit.
        let snapshot = self.products.snapshot().await?;

        let draft = match validate_quotation(&form, &snapshot) {
            Ok(draft) => draft,
            Err(errors) => return Ok(super::invalid("quotation", submitted, errors)),
        };

        let command = match id {
            Some(id) => SaveQuotationCommand::update(id, draft),
            None => SaveQuotationCommand::create(draft),
        };

        match command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
        {
            Ok(result) => Ok(SubmissionOutcome::Saved(result.id)),
            Err(e) => super::write_failed("quotation", submitted, e, SAVE_FAILED),
        }
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<QuotationDetails, ServiceError> {
        let quotation = self
            .quotations
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Quotation", id))?;

        let rows = self.quotations.find_line_items(id).await?;
        let line_item_ids: Vec<Uuid> = rows.iter().map(|(item, _)| item.id).collect();
        let quote_counts = self
            .quotations
            .count_supplier_quotations(&line_item_ids)
            .await?;

        let (companies, employees) = self
            .party_names(&[quotation.company_id], &[quotation.employee_id])
            .await?;

        let line_items = rows
            .into_iter()
            .map(|(item, product)| LineItemDetails {
                supplier_quotation_count: quote_counts.get(&item.id).copied().unwrap_or(0),
                id: item.id,
                product_id: item.product_id,
                product_name: product.map(|p| p.name),
                quantity: item.quantity,
                attributes: from_json(item.attributes.as_ref()),
            })
            .collect();

        Ok(QuotationDetails {
            company_name: companies.get(&quotation.company_id).cloned(),
            employee_name: employees.get(&quotation.employee_id).cloned(),
            id: quotation.id,
            reference: quotation.reference,
            request_date: quotation.request_date,
            vessel: quotation.vessel,
            company_id: quotation.company_id,
            employee_id: quotation.employee_id,
            line_items,
            created_at: quotation.created_at,
            updated_at: quotation.updated_at,
        })
    }

    /// Form values for the edit screen, seeded from what is stored.
    #[instrument(skip(self))]
    pub async fn edit_form(&self, id: Uuid) -> Result<QuotationForm, ServiceError> {
        let quotation = self
            .quotations
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Quotation", id))?;
        let rows = self.quotations.find_line_items(id).await?;

        Ok(QuotationForm {
            quotation_request_ref: Some(quotation.reference),
            quotation_request_date: Some(quotation.request_date.format("%Y-%m-%d").to_string()),
            quotation_request_vessel: Some(quotation.vessel),
            company_id: Some(quotation.company_id.to_string()),
            employee_id: Some(quotation.employee_id.to_string()),
            quotation_request_line_items: rows
                .into_iter()
                .map(|(item, _)| LineItemForm {
                    quotation_request_line_item_id: Some(item.id.to_string()),
                    product_id: Some(item.product_id.to_string()),
                    quotation_request_line_item_quantity: Some(f64::from(item.quantity)),
                    attributes: to_pairs(&from_json(item.attributes.as_ref())),
                    ..Default::default()
                })
                .collect(),
        })
    }

    #[instrument(skip(self))]
    pub async fn list(&self, page: u64, per_page: u64) -> Result<Page<QuotationSummary>, ServiceError> {
        let quotations = self.quotations.list(page, per_page).await?;

        let ids: Vec<Uuid> = quotations.items.iter().map(|q| q.id).collect();
        let company_ids: Vec<Uuid> = quotations.items.iter().map(|q| q.company_id).collect();
        let employee_ids: Vec<Uuid> = quotations.items.iter().map(|q| q.employee_id).collect();

        let counts = self.quotations.count_line_items(&ids).await?;
        let (companies, employees) = self.party_names(&company_ids, &employee_ids).await?;

        Ok(quotations.map(|q| QuotationSummary {
            line_item_count: counts.get(&q.id).copied().unwrap_or(0),
            company_name: companies.get(&q.company_id).cloned(),
            employee_name: employees.get(&q.employee_id).cloned(),
            id: q.id,
            reference: q.reference,
            request_date: q.request_date,
            vessel: q.vessel,
            company_id: q.company_id,
            employee_id: q.employee_id,
            created_at: q.created_at,
        }))
    }

    async fn party_names(
        &self,
        company_ids: &[Uuid],
        employee_ids: &[Uuid],
    ) -> Result<(HashMap<Uuid, String>, HashMap<Uuid, String>), ServiceError> {
        let db = self.db_pool.as_ref();
        let companies = company::Entity::find()
            .filter(company::Column::Id.is_in(company_ids.to_vec()))
            .all(db)
            .await
            .map_err(ServiceError::db_error)?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();
        let employees = employee::Entity::find()
            .filter(employee::Column::Id.is_in(employee_ids.to_vec()))
            .all(db)
            .await
            .map_err(ServiceError::db_error)?
            .into_iter()
            .map(|e| (e.id, e.name))
            .collect();
        Ok((companies, employees))
    }
}
