use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::error;
use uuid::Uuid;

use super::{BaseRepository, Page, Repository};
use crate::entities::{product, product_category};
use crate::errors::ServiceError;
use crate::validation::ProductSnapshot;
use sea_orm::prelude::Json;

/// Columns needed to write a product row.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub name: String,
    pub ref_number: i32,
    pub description: Option<String>,
    pub attributes: Option<Json>,
    pub category_id: Uuid,
}

/// Entry of the product picker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductOption {
    pub id: Uuid,
    pub name: String,
    pub attributes: Option<Json>,
}

#[derive(Debug, Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Inserts a product on any connection, including an open transaction.
    pub async fn create_product<C>(conn: &C, record: ProductRecord) -> Result<product::Model, ServiceError>
    where
        C: ConnectionTrait,
    {
        let name = record.name.clone();
        product::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(record.name),
            ref_number: Set(record.ref_number),
            description: Set(record.description),
            attributes: Set(record.attributes),
            category_id: Set(record.category_id),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(|e| {
            error!(product_name = %name, "Failed to create product: {}", e);
            ServiceError::db_error(e)
        })
    }

    pub async fn update_product(
        &self,
        existing: product::Model,
        record: ProductRecord,
    ) -> Result<product::Model, ServiceError> {
        let id = existing.id;
        let mut active = existing.into_active_model();
        active.name = Set(record.name);
        active.ref_number = Set(record.ref_number);
        active.description = Set(record.description);
        active.attributes = Set(record.attributes);
        active.category_id = Set(record.category_id);
        active.update(self.base.get_db()).await.map_err(|e| {
            error!(product_id = %id, "Failed to update product: {}", e);
            ServiceError::db_error(e)
        })
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<product::Model>, ServiceError> {
        product::Entity::find_by_id(id)
            .one(self.base.get_db())
            .await
            .map_err(ServiceError::db_error)
    }

    /// Products whose name starts with `prefix` (case-insensitive), or every
    /// product when no prefix is given. Sorted by name.
    pub async fn find_by_name_prefix_or_all(
        &self,
        prefix: Option<&str>,
    ) -> Result<Vec<ProductOption>, ServiceError> {
        let rows = Self::prefix_query(prefix)
            .select_only()
            .column(product::Column::Id)
            .column(product::Column::Name)
            .column(product::Column::Attributes)
            .into_tuple::<(Uuid, String, Option<Json>)>()
            .all(self.base.get_db())
            .await
            .map_err(ServiceError::db_error)?;

        Ok(rows
            .into_iter()
            .map(|(id, name, attributes)| ProductOption {
                id,
                name,
                attributes,
            })
            .collect())
    }

    pub async fn list(
        &self,
        prefix: Option<&str>,
        page: u64,
        per_page: u64,
    ) -> Result<Page<product::Model>, ServiceError> {
        let paginator = Self::prefix_query(prefix).paginate(self.base.get_db(), per_page);
        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let items = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::db_error)?;
        Ok(Page::new(items, page, per_page, total))
    }

    /// Reads what validation needs: every product's id and name plus the
    /// known category ids.
    pub async fn snapshot(&self) -> Result<ProductSnapshot, ServiceError> {
        let db = self.base.get_db();
        let products = product::Entity::find()
            .select_only()
            .column(product::Column::Id)
            .column(product::Column::Name)
            .into_tuple::<(Uuid, String)>()
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;
        let categories = product_category::Entity::find()
            .select_only()
            .column(product_category::Column::Id)
            .into_tuple::<Uuid>()
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;
        Ok(ProductSnapshot::new(products, categories))
    }

    fn prefix_query(prefix: Option<&str>) -> sea_orm::Select<product::Entity> {
        let query = product::Entity::find().order_by_asc(product::Column::Name);
        match prefix.map(str::trim).filter(|p| !p.is_empty()) {
            Some(prefix) => query.filter(
                Expr::expr(Func::lower(Expr::col(product::Column::Name)))
                    .like(format!("{}%", prefix.to_lowercase())),
            ),
            None => query,
        }
    }
}
