use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Leads::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Leads::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Leads::OwnerBrandId).string().not_null())
                    .col(ColumnDef::new(Leads::DispensaryName).string().not_null())
                    .col(ColumnDef::new(Leads::ContactPerson).string())
                    .col(ColumnDef::new(Leads::Email).string())
                    .col(ColumnDef::new(Leads::LicenseNumber).string())
                    .col(ColumnDef::new(Leads::Status).string())
                    .col(ColumnDef::new(Leads::Address).string())
                    .col(ColumnDef::new(Leads::LastSaleDate).date())
                    .col(ColumnDef::new(Leads::MondayItemId).string())
                    .col(ColumnDef::new(Leads::MondaySyncedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Leads::MondayAccountItemId).string())
                    .col(
                        ColumnDef::new(Leads::MondayAccountSyncedAt)
                            .timestamp_with_time_zone(),
                    )
                    .col(
                        ColumnDef::new(Leads::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // A Monday item maps to at most one lead per brand
        manager
            .create_index(
                Index::create()
                    .name("idx_leads_brand_monday_item")
                    .table(Leads::Table)
                    .col(Leads::OwnerBrandId)
                    .col(Leads::MondayItemId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Sales::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Sales::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Sales::BrandId).string().not_null())
                    .col(ColumnDef::new(Sales::DispensaryName).string())
                    .col(ColumnDef::new(Sales::AmountCents).big_integer().not_null().default(0))
                    .col(ColumnDef::new(Sales::Status).string())
                    .col(ColumnDef::new(Sales::OrderDate).date())
                    .col(ColumnDef::new(Sales::MondayItemId).string())
                    .col(ColumnDef::new(Sales::MondaySyncedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Sales::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sales_brand_monday_item")
                    .table(Sales::Table)
                    .col(Sales::BrandId)
                    .col(Sales::MondayItemId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Invoices::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Invoices::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Invoices::BrandId).string().not_null())
                    .col(ColumnDef::new(Invoices::DispensaryName).string())
                    .col(ColumnDef::new(Invoices::AmountCents).big_integer().not_null().default(0))
                    .col(ColumnDef::new(Invoices::Status).string())
                    .col(ColumnDef::new(Invoices::DueDate).date())
                    .col(ColumnDef::new(Invoices::MondayItemId).string())
                    .col(ColumnDef::new(Invoices::MondaySyncedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Invoices::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_invoices_brand")
                    .table(Invoices::Table)
                    .col(Invoices::BrandId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Activations::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Activations::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Activations::BrandId).string().not_null())
                    .col(ColumnDef::new(Activations::StoreName).string())
                    .col(ColumnDef::new(Activations::ActivationType).string())
                    .col(ColumnDef::new(Activations::ActivationDate).date())
                    .col(ColumnDef::new(Activations::MondayItemId).string())
                    .col(ColumnDef::new(Activations::MondaySyncedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Activations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_activations_brand")
                    .table(Activations::Table)
                    .col(Activations::BrandId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Activations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Invoices::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sales::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Leads::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Leads {
    Table,
    Id,
    OwnerBrandId,
    DispensaryName,
    ContactPerson,
    Email,
    LicenseNumber,
    Status,
    Address,
    LastSaleDate,
    MondayItemId,
    MondaySyncedAt,
    MondayAccountItemId,
    MondayAccountSyncedAt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Sales {
    Table,
    Id,
    BrandId,
    DispensaryName,
    AmountCents,
    Status,
    OrderDate,
    MondayItemId,
    MondaySyncedAt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Invoices {
    Table,
    Id,
    BrandId,
    DispensaryName,
    AmountCents,
    Status,
    DueDate,
    MondayItemId,
    MondaySyncedAt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Activations {
    Table,
    Id,
    BrandId,
    StoreName,
    ActivationType,
    ActivationDate,
    MondayItemId,
    MondaySyncedAt,
    CreatedAt,
}
