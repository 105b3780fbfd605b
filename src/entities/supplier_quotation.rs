use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A supplier's answer to one line item. Read-only through the API.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "supplier_quotations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub line_item_id: Uuid,
    /// Supplier company
    pub company_id: Uuid,
    pub supplier_date: Option<NaiveDate>,
    pub supplier_price: Option<Decimal>,
    pub lead_time: Option<NaiveDate>,
    pub client_date: Option<NaiveDate>,
    pub client_price: Option<Decimal>,
    pub accepted: bool,
    pub status: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::quotation_request_line_item::Entity",
        from = "Column::LineItemId",
        to = "super::quotation_request_line_item::Column::Id",
        on_delete = "Cascade"
    )]
    LineItem,
    #[sea_orm(
        belongs_to = "super::company::Entity",
        from = "Column::CompanyId",
        to = "super::company::Column::Id"
    )]
    Company,
}

impl Related<super::quotation_request_line_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LineItem.def()
    }
}

impl Related<super::company::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Company.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
