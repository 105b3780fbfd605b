use crate::{
    db::DbPool,
    entities::{product, product_category},
    errors::ServiceError,
    events::{Event, EventSender},
    forms::attributes::{from_json, pairs_to_json, to_pairs, AttributeMap},
    forms::SubmissionOutcome,
    repositories::Page,
    validation::catalog::{validate_category, CategoryDraft, CategoryForm},
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

pub const SAVE_FAILED: &str = "Failed to save product category. Please try again.";

#[derive(Debug, Clone, Serialize)]
pub struct CategoryDetails {
    pub id: Uuid,
    pub name: String,
    pub attributes: AttributeMap,
    pub product_count: u64,
}

#[derive(Clone)]
pub struct ProductCategoryService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl ProductCategoryService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self, submitted))]
    pub async fn create(&self, submitted: Value) -> Result<SubmissionOutcome<Uuid>, ServiceError> {
        let draft = match self.check(&submitted) {
            Ok(draft) => draft,
            Err(outcome) => return Ok(outcome),
        };

        let inserted = product_category::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(draft.name),
            attributes: Set(pairs_to_json(&draft.attributes)),
            ..Default::default()
        }
        .insert(self.db_pool.as_ref())
        .await
        .map_err(|e| {
            error!("Failed to create product category: {}", e);
            ServiceError::db_error(e)
        });

        match inserted {
            Ok(saved) => {
                info!(category_id = %saved.id, "Product category created");
                self.event_sender
                    .send_or_log(Event::ProductCategoryCreated(saved.id))
                    .await;
                Ok(SubmissionOutcome::Saved(saved.id))
            }
            Err(e) => super::write_failed("product_category", submitted, e, SAVE_FAILED),
        }
    }

    #[instrument(skip(self, submitted))]
    pub async fn update(
        &self,
        id: Uuid,
        submitted: Value,
    ) -> Result<SubmissionOutcome<Uuid>, ServiceError> {
        let existing = self.require(id).await?;
        let draft = match self.check(&submitted) {
            Ok(draft) => draft,
            Err(outcome) => return Ok(outcome),
        };

        let mut active = existing.into_active_model();
        active.name = Set(draft.name);
        active.attributes = Set(pairs_to_json(&draft.attributes));
        let updated = active.update(self.db_pool.as_ref()).await.map_err(|e| {
            error!(category_id = %id, "Failed to update product category: {}", e);
            ServiceError::db_error(e)
        });

        match updated {
            Ok(saved) => {
                info!(category_id = %saved.id, "Product category updated");
                self.event_sender
                    .send_or_log(Event::ProductCategoryUpdated(saved.id))
                    .await;
                Ok(SubmissionOutcome::Saved(saved.id))
            }
            Err(e) => super::write_failed("product_category", submitted, e, SAVE_FAILED),
        }
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<CategoryDetails, ServiceError> {
        let category = self.require(id).await?;
        let product_count = product::Entity::find()
            .filter(product::Column::CategoryId.eq(id))
            .count(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::db_error)?;

        Ok(CategoryDetails {
            attributes: from_json(category.attributes.as_ref()),
            id: category.id,
            name: category.name,
            product_count,
        })
    }

    pub async fn edit_form(&self, id: Uuid) -> Result<CategoryForm, ServiceError> {
        let category = self.require(id).await?;
        Ok(CategoryForm {
            product_category_attributes: to_pairs(&from_json(category.attributes.as_ref())),
            product_category_name: Some(category.name),
        })
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<Page<product_category::Model>, ServiceError> {
        let paginator = product_category::Entity::find()
            .order_by_asc(product_category::Column::Name)
            .paginate(self.db_pool.as_ref(), per_page);
        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let items = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::db_error)?;
        Ok(Page::new(items, page, per_page, total))
    }

    fn check(&self, submitted: &Value) -> Result<CategoryDraft, SubmissionOutcome<Uuid>> {
        let form: CategoryForm =
            super::decode_form(submitted).map_err(SubmissionOutcome::Rejected)?;
        validate_category(&form)
            .map_err(|errors| super::invalid("product_category", submitted.clone(), errors))
    }

    async fn require(&self, id: Uuid) -> Result<product_category::Model, ServiceError> {
        product_category::Entity::find_by_id(id)
            .one(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::not_found("Product category", id))
    }
}
