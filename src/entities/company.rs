use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::ConnectionTrait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role a company plays towards us. Stored as its numeric code.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
pub enum CompanyType {
    #[sea_orm(num_value = 1)]
    TwoWay,
    #[sea_orm(num_value = 2)]
    Supplier,
    #[sea_orm(num_value = 3)]
    Client,
}

impl CompanyType {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::TwoWay),
            2 => Some(Self::Supplier),
            3 => Some(Self::Client),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            Self::TwoWay => 1,
            Self::Supplier => 2,
            Self::Client => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::TwoWay => "Two way",
            Self::Supplier => "Supplier",
            Self::Client => "Client",
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "companies")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Street lines, city and post code joined for display.
    pub address: String,
    pub country: String,
    pub company_type: CompanyType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::employee::Entity")]
    Employees,
    #[sea_orm(has_many = "super::quotation_request::Entity")]
    QuotationRequests,
    #[sea_orm(has_many = "super::supplier_quotation::Entity")]
    SupplierQuotations,
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employees.def()
    }
}

impl Related<super::quotation_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QuotationRequests.def()
    }
}

impl Related<super::supplier_quotation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SupplierQuotations.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        super::touch_timestamps(&mut self.created_at, &mut self.updated_at, insert);
        Ok(self)
    }
}
