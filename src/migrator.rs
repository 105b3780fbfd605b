use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_directory_tables::Migration),
            Box::new(m20250301_000002_create_catalog_tables::Migration),
            Box::new(m20250301_000003_create_quotation_tables::Migration),
        ]
    }
}

#[derive(DeriveIden)]
enum Companies {
    Table,
    Id,
    Name,
    Email,
    Phone,
    Address,
    Country,
    CompanyType,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Employees {
    Table,
    Id,
    Name,
    Mobile,
    Email,
    EmployeePosition,
    Position,
    CompanyId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ProductCategories {
    Table,
    Id,
    Name,
    Attributes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Products {
    Table,
    Id,
    Name,
    RefNumber,
    Description,
    Attributes,
    CategoryId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum QuotationRequests {
    Table,
    Id,
    Reference,
    RequestDate,
    Vessel,
    CompanyId,
    EmployeeId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum QuotationRequestLineItems {
    Table,
    Id,
    QuotationRequestId,
    ProductId,
    Position,
    Quantity,
    Attributes,
    CreatedAt,
}

#[derive(DeriveIden)]
enum SupplierQuotations {
    Table,
    Id,
    LineItemId,
    CompanyId,
    SupplierDate,
    SupplierPrice,
    LeadTime,
    ClientDate,
    ClientPrice,
    Accepted,
    Status,
    CreatedAt,
}

mod m20250301_000001_create_directory_tables {
    use super::{Companies, Employees};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000001_create_directory_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Companies::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Companies::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Companies::Name).string().not_null())
                        .col(ColumnDef::new(Companies::Email).string().not_null())
                        .col(ColumnDef::new(Companies::Phone).string().not_null())
                        .col(ColumnDef::new(Companies::Address).string().not_null())
                        .col(ColumnDef::new(Companies::Country).string().not_null())
                        .col(ColumnDef::new(Companies::CompanyType).integer().not_null())
                        .col(
                            ColumnDef::new(Companies::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Companies::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Employees::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Employees::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Employees::Name).string().not_null())
                        .col(ColumnDef::new(Employees::Mobile).string().not_null())
                        .col(ColumnDef::new(Employees::Email).string().not_null())
                        .col(ColumnDef::new(Employees::EmployeePosition).string().not_null())
                        .col(ColumnDef::new(Employees::Position).string().not_null())
                        .col(ColumnDef::new(Employees::CompanyId).uuid().not_null())
                        .col(
                            ColumnDef::new(Employees::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Employees::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_employees_company")
                                .from(Employees::Table, Employees::CompanyId)
                                .to(Companies::Table, Companies::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_employees_company_id")
                        .table(Employees::Table)
                        .col(Employees::CompanyId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Employees::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Companies::Table).to_owned())
                .await
        }
    }
}

mod m20250301_000002_create_catalog_tables {
    use super::{ProductCategories, Products};
    use sea_orm_migration::prelude::*;
    use sea_orm_migration::sea_orm::ConnectionTrait;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000002_create_catalog_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ProductCategories::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ProductCategories::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ProductCategories::Name).string().not_null())
                        .col(ColumnDef::new(ProductCategories::Attributes).json().null())
                        .col(
                            ColumnDef::new(ProductCategories::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductCategories::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Products::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Products::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Products::Name).string().not_null())
                        .col(
                            ColumnDef::new(Products::RefNumber)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Products::Description).string().null())
                        .col(ColumnDef::new(Products::Attributes).json().null())
                        .col(ColumnDef::new(Products::CategoryId).uuid().not_null())
                        .col(
                            ColumnDef::new(Products::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Products::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_products_category")
                                .from(Products::Table, Products::CategoryId)
                                .to(ProductCategories::Table, ProductCategories::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await?;

            // Authoritative guard for product-name uniqueness; form validation is only a pre-check.
            // Names are stored trimmed, so folding case is all the index has to do.
            manager
                .get_connection()
                .execute_unprepared(
                    "CREATE UNIQUE INDEX IF NOT EXISTS idx_products_name_unique \
                     ON products (lower(name))",
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_products_category_id")
                        .table(Products::Table)
                        .col(Products::CategoryId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Products::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(ProductCategories::Table).to_owned())
                .await
        }
    }
}

mod m20250301_000003_create_quotation_tables {
    use super::{
        Companies, Employees, Products, QuotationRequestLineItems, QuotationRequests,
        SupplierQuotations,
    };
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000003_create_quotation_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(QuotationRequests::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(QuotationRequests::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(QuotationRequests::Reference).string().not_null())
                        .col(ColumnDef::new(QuotationRequests::RequestDate).date().not_null())
                        .col(ColumnDef::new(QuotationRequests::Vessel).string().not_null())
                        .col(ColumnDef::new(QuotationRequests::CompanyId).uuid().not_null())
                        .col(ColumnDef::new(QuotationRequests::EmployeeId).uuid().not_null())
                        .col(
                            ColumnDef::new(QuotationRequests::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(QuotationRequests::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_quotation_requests_company")
                                .from(QuotationRequests::Table, QuotationRequests::CompanyId)
                                .to(Companies::Table, Companies::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_quotation_requests_employee")
                                .from(QuotationRequests::Table, QuotationRequests::EmployeeId)
                                .to(Employees::Table, Employees::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(QuotationRequestLineItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(QuotationRequestLineItems::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(QuotationRequestLineItems::QuotationRequestId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(QuotationRequestLineItems::ProductId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(QuotationRequestLineItems::Position)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(QuotationRequestLineItems::Quantity)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(QuotationRequestLineItems::Attributes).json().null())
                        .col(
                            ColumnDef::new(QuotationRequestLineItems::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_line_items_quotation_request")
                                .from(
                                    QuotationRequestLineItems::Table,
                                    QuotationRequestLineItems::QuotationRequestId,
                                )
                                .to(QuotationRequests::Table, QuotationRequests::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_line_items_product")
                                .from(
                                    QuotationRequestLineItems::Table,
                                    QuotationRequestLineItems::ProductId,
                                )
                                .to(Products::Table, Products::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_line_items_quotation_request_id")
                        .table(QuotationRequestLineItems::Table)
                        .col(QuotationRequestLineItems::QuotationRequestId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(SupplierQuotations::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(SupplierQuotations::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(SupplierQuotations::LineItemId).uuid().not_null())
                        .col(ColumnDef::new(SupplierQuotations::CompanyId).uuid().not_null())
                        .col(ColumnDef::new(SupplierQuotations::SupplierDate).date().null())
                        .col(ColumnDef::new(SupplierQuotations::SupplierPrice).decimal().null())
                        .col(ColumnDef::new(SupplierQuotations::LeadTime).date().null())
                        .col(ColumnDef::new(SupplierQuotations::ClientDate).date().null())
                        .col(ColumnDef::new(SupplierQuotations::ClientPrice).decimal().null())
                        .col(
                            ColumnDef::new(SupplierQuotations::Accepted)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(SupplierQuotations::Status)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(SupplierQuotations::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        // Line items are replaced wholesale on edit; their supplier quotes go with them.
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_supplier_quotations_line_item")
                                .from(SupplierQuotations::Table, SupplierQuotations::LineItemId)
                                .to(QuotationRequestLineItems::Table, QuotationRequestLineItems::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_supplier_quotations_company")
                                .from(SupplierQuotations::Table, SupplierQuotations::CompanyId)
                                .to(Companies::Table, Companies::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(SupplierQuotations::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(QuotationRequestLineItems::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(QuotationRequests::Table).to_owned())
                .await
        }
    }
}
