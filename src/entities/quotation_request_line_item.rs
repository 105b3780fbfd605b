use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One product + quantity entry. Rows are replaced wholesale when the owning
/// quotation is edited, so there is no `updated_at`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "quotation_request_line_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub quotation_request_id: Uuid,
    pub product_id: Uuid,
    /// Zero-based order within the quotation.
    pub position: i32,
    pub quantity: i32,
    pub attributes: Option<Json>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::quotation_request::Entity",
        from = "Column::QuotationRequestId",
        to = "super::quotation_request::Column::Id",
        on_delete = "Cascade"
    )]
    QuotationRequest,
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
    #[sea_orm(has_many = "super::supplier_quotation::Entity")]
    SupplierQuotations,
}

impl Related<super::quotation_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QuotationRequest.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<super::supplier_quotation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SupplierQuotations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
