use chrono::{NaiveDate, Utc};
use sea_orm::prelude::Json;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error};
use uuid::Uuid;

use super::{BaseRepository, Page, Repository};
use crate::entities::{
    product, quotation_request, quotation_request_line_item as line_item, supplier_quotation,
};
use crate::errors::ServiceError;

/// Scalar columns of a quotation request.
#[derive(Debug, Clone, PartialEq)]
pub struct QuotationHeader {
    pub reference: String,
    pub request_date: NaiveDate,
    pub vessel: String,
    pub company_id: Uuid,
    pub employee_id: Uuid,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineItemRecord {
    pub quotation_request_id: Uuid,
    pub product_id: Uuid,
    pub position: i32,
    pub quantity: i32,
    pub attributes: Option<Json>,
}

#[derive(Debug, Clone)]
pub struct QuotationRepository {
    base: BaseRepository,
}

impl QuotationRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Writes the header under `id`, inserting it when no row exists yet.
    /// Returns the stored row and whether it was inserted.
    pub async fn upsert_quotation<C>(
        conn: &C,
        id: Uuid,
        header: &QuotationHeader,
    ) -> Result<(quotation_request::Model, bool), ServiceError>
    where
        C: ConnectionTrait,
    {
        let existing = quotation_request::Entity::find_by_id(id)
            .one(conn)
            .await
            .map_err(ServiceError::db_error)?;

        let (mut active, inserted) = match existing {
            Some(model) => (model.into_active_model(), false),
            None => (
                quotation_request::ActiveModel {
                    id: Set(id),
                    ..Default::default()
                },
                true,
            ),
        };
        active.reference = Set(header.reference.clone());
        active.request_date = Set(header.request_date);
        active.vessel = Set(header.vessel.clone());
        active.company_id = Set(header.company_id);
        active.employee_id = Set(header.employee_id);

        let saved = if inserted {
            active.insert(conn).await
        } else {
            active.update(conn).await
        }
        .map_err(|e| {
            error!(quotation_id = %id, "Failed to write quotation: {}", e);
            ServiceError::db_error(e)
        })?;

        Ok((saved, inserted))
    }

    pub async fn delete_line_items<C>(conn: &C, quotation_id: Uuid) -> Result<u64, ServiceError>
    where
        C: ConnectionTrait,
    {
        let result = line_item::Entity::delete_many()
            .filter(line_item::Column::QuotationRequestId.eq(quotation_id))
            .exec(conn)
            .await
            .map_err(|e| {
                error!(quotation_id = %quotation_id, "Failed to delete line items: {}", e);
                ServiceError::db_error(e)
            })?;
        debug!(quotation_id = %quotation_id, deleted = result.rows_affected, "Removed previous line items");
        Ok(result.rows_affected)
    }

    pub async fn create_line_item<C>(
        conn: &C,
        record: LineItemRecord,
    ) -> Result<line_item::Model, ServiceError>
    where
        C: ConnectionTrait,
    {
        let quotation_id = record.quotation_request_id;
        line_item::ActiveModel {
            id: Set(Uuid::new_v4()),
            quotation_request_id: Set(record.quotation_request_id),
            product_id: Set(record.product_id),
            position: Set(record.position),
            quantity: Set(record.quantity),
            attributes: Set(record.attributes),
            created_at: Set(Utc::now()),
        }
        .insert(conn)
        .await
        .map_err(|e| {
            error!(quotation_id = %quotation_id, "Failed to create line item: {}", e);
            ServiceError::db_error(e)
        })
    }

    pub async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<quotation_request::Model>, ServiceError> {
        quotation_request::Entity::find_by_id(id)
            .one(self.base.get_db())
            .await
            .map_err(ServiceError::db_error)
    }

    /// Line items of a quotation in submission order, each with its product.
    pub async fn find_line_items(
        &self,
        quotation_id: Uuid,
    ) -> Result<Vec<(line_item::Model, Option<product::Model>)>, ServiceError> {
        line_item::Entity::find()
            .filter(line_item::Column::QuotationRequestId.eq(quotation_id))
            .order_by_asc(line_item::Column::Position)
            .find_also_related(product::Entity)
            .all(self.base.get_db())
            .await
            .map_err(ServiceError::db_error)
    }

    /// Newest first.
    pub async fn list(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<Page<quotation_request::Model>, ServiceError> {
        let paginator = quotation_request::Entity::find()
            .order_by_desc(quotation_request::Column::CreatedAt)
            .paginate(self.base.get_db(), per_page);
        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let items = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::db_error)?;
        Ok(Page::new(items, page, per_page, total))
    }

    /// Number of line items per quotation for the given quotations.
    pub async fn count_line_items(
        &self,
        quotation_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, u64>, ServiceError> {
        let items = line_item::Entity::find()
            .filter(line_item::Column::QuotationRequestId.is_in(quotation_ids.to_vec()))
            .all(self.base.get_db())
            .await
            .map_err(ServiceError::db_error)?;
        let mut counts = HashMap::new();
        for item in items {
            *counts.entry(item.quotation_request_id).or_insert(0) += 1;
        }
        Ok(counts)
    }

    /// Number of supplier quotations per line item for the given line items.
    pub async fn count_supplier_quotations(
        &self,
        line_item_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, u64>, ServiceError> {
        let quotes = supplier_quotation::Entity::find()
            .filter(supplier_quotation::Column::LineItemId.is_in(line_item_ids.to_vec()))
            .all(self.base.get_db())
            .await
            .map_err(ServiceError::db_error)?;
        let mut counts = HashMap::new();
        for quote in quotes {
            *counts.entry(quote.line_item_id).or_insert(0) += 1;
        }
        Ok(counts)
    }
}
