use crate::{db::DbPool, entities::supplier_quotation, errors::ServiceError, repositories::Page};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

/// Supplier answers to line items. Read-only.
#[derive(Clone)]
pub struct SupplierQuotationService {
    db_pool: Arc<DbPool>,
}

impl SupplierQuotationService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        line_item_id: Option<Uuid>,
        page: u64,
        per_page: u64,
    ) -> Result<Page<supplier_quotation::Model>, ServiceError> {
        let mut query =
            supplier_quotation::Entity::find().order_by_desc(supplier_quotation::Column::CreatedAt);
        if let Some(line_item_id) = line_item_id {
            query = query.filter(supplier_quotation::Column::LineItemId.eq(line_item_id));
        }
        let paginator = query.paginate(self.db_pool.as_ref(), per_page);
        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let items = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::db_error)?;
        Ok(Page::new(items, page, per_page, total))
    }
}
