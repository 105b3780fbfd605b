use crate::{
    db::DbPool,
    entities::{product, product_category},
    errors::ServiceError,
    events::{Event, EventSender},
    forms::attributes::{from_json, pairs_to_json, to_pairs, AttributeMap, AttributePair},
    forms::SubmissionOutcome,
    repositories::{
        product_repository::{ProductOption, ProductRecord},
        Page, ProductRepository,
    },
    validation::catalog::{validate_product, ProductDraft, ProductForm},
};
use metrics::counter;
use sea_orm::EntityTrait;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

pub const CREATE_FAILED: &str = "Failed to create product. Please try again.";
pub const UPDATE_FAILED: &str = "Failed to update product. Please try again.";

#[derive(Debug, Clone, Serialize)]
pub struct ProductDetails {
    pub id: Uuid,
    pub name: String,
    pub ref_number: i32,
    pub description: Option<String>,
    pub attributes: AttributeMap,
    pub category_id: Uuid,
    pub category_name: Option<String>,
}

impl From<ProductDraft> for ProductRecord {
    fn from(draft: ProductDraft) -> Self {
        ProductRecord {
            name: draft.name,
            ref_number: draft.ref_number,
            description: draft.description.filter(|d| !d.is_empty()),
            attributes: pairs_to_json(&draft.attributes),
            category_id: draft.category_id,
        }
    }
}

#[derive(Clone)]
pub struct ProductService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
    products: ProductRepository,
}

impl ProductService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            products: ProductRepository::new(db_pool.clone()),
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self, submitted))]
    pub async fn create(&self, submitted: Value) -> Result<SubmissionOutcome<Uuid>, ServiceError> {
        let form: ProductForm = match super::decode_form(&submitted) {
            Ok(form) => form,
            Err(reply) => return Ok(SubmissionOutcome::Rejected(reply)),
        };
        let snapshot = self.products.snapshot().await?;
        let draft = match validate_product(&form, &snapshot, None) {
            Ok(draft) => draft,
            Err(errors) => return Ok(super::invalid("product", submitted, errors)),
        };

        match ProductRepository::create_product(self.db_pool.as_ref(), draft.into()).await {
            Ok(saved) => {
                counter!("quotedesk.products.created", 1);
                info!(product_id = %saved.id, "Product created");
                self.event_sender
                    .send_or_log(Event::ProductCreated(saved.id))
                    .await;
                Ok(SubmissionOutcome::Saved(saved.id))
            }
            Err(e) => super::write_failed("product", submitted, e, CREATE_FAILED),
        }
    }

    #[instrument(skip(self, submitted))]
    pub async fn update(
        &self,
        id: Uuid,
        submitted: Value,
    ) -> Result<SubmissionOutcome<Uuid>, ServiceError> {
        let existing = self.require(id).await?;
        let form: ProductForm = match super::decode_form(&submitted) {
            Ok(form) => form,
            Err(reply) => return Ok(SubmissionOutcome::Rejected(reply)),
        };
        let snapshot = self.products.snapshot().await?;
        let draft = match validate_product(&form, &snapshot, Some(id)) {
            Ok(draft) => draft,
            Err(errors) => return Ok(super::invalid("product", submitted, errors)),
        };

        match self.products.update_product(existing, draft.into()).await {
            Ok(saved) => {
                info!(product_id = %saved.id, "Product updated");
                self.event_sender
                    .send_or_log(Event::ProductUpdated(saved.id))
                    .await;
                Ok(SubmissionOutcome::Saved(saved.id))
            }
            Err(e) => super::write_failed("product", submitted, e, UPDATE_FAILED),
        }
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<ProductDetails, ServiceError> {
        let product = self.require(id).await?;
        let category = product_category::Entity::find_by_id(product.category_id)
            .one(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::db_error)?;

        Ok(ProductDetails {
            attributes: from_json(product.attributes.as_ref()),
            category_name: category.map(|c| c.name),
            id: product.id,
            name: product.name,
            ref_number: product.ref_number,
            description: product.description,
            category_id: product.category_id,
        })
    }

    pub async fn edit_form(&self, id: Uuid) -> Result<ProductForm, ServiceError> {
        let product = self.require(id).await?;
        Ok(ProductForm {
            product_attributes: to_pairs(&from_json(product.attributes.as_ref())),
            product_name: Some(product.name),
            product_ref_number: Some(f64::from(product.ref_number)),
            product_description: product.description,
            product_category_id: Some(product.category_id.to_string()),
        })
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        search: Option<&str>,
        page: u64,
        per_page: u64,
    ) -> Result<Page<product::Model>, ServiceError> {
        self.products.list(search, page, per_page).await
    }

    /// Entries for the product picker of the quotation form.
    #[instrument(skip(self))]
    pub async fn options(&self, search: Option<&str>) -> Result<Vec<ProductOption>, ServiceError> {
        self.products.find_by_name_prefix_or_all(search).await
    }

    /// Attribute rows a line item starts with when this product is picked.
    pub async fn attribute_pairs(&self, id: Uuid) -> Result<Vec<AttributePair>, ServiceError> {
        let product = self.require(id).await?;
        Ok(to_pairs(&from_json(product.attributes.as_ref())))
    }

    async fn require(&self, id: Uuid) -> Result<product::Model, ServiceError> {
        self.products
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Product", id))
    }
}
