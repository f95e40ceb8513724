use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Per-brand Monday.com settings, one row per brand
        manager
            .create_table(
                Table::create()
                    .table(BrandIntegrations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BrandIntegrations::BrandId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BrandIntegrations::ApiToken).string())
                    .col(ColumnDef::new(BrandIntegrations::LeadsBoardId).string())
                    .col(ColumnDef::new(BrandIntegrations::OrdersBoardId).string())
                    .col(ColumnDef::new(BrandIntegrations::InvoicesBoardId).string())
                    .col(ColumnDef::new(BrandIntegrations::ActivationsBoardId).string())
                    .col(ColumnDef::new(BrandIntegrations::AccountsBoardId).string())
                    .col(ColumnDef::new(BrandIntegrations::LastSyncAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(BrandIntegrations::LastSyncSuccess).boolean())
                    .col(ColumnDef::new(BrandIntegrations::LastSyncAction).string())
                    .col(ColumnDef::new(BrandIntegrations::WebhookVerifiedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(BrandIntegrations::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ApiKeys::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ApiKeys::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(ApiKeys::Key).string().not_null().unique_key())
                    .col(ColumnDef::new(ApiKeys::Label).string())
                    .col(
                        ColumnDef::new(ApiKeys::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ApiKeys::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BrandIntegrations::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum BrandIntegrations {
    Table,
    BrandId,
    ApiToken,
    LeadsBoardId,
    OrdersBoardId,
    InvoicesBoardId,
    ActivationsBoardId,
    AccountsBoardId,
    LastSyncAt,
    LastSyncSuccess,
    LastSyncAction,
    WebhookVerifiedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ApiKeys {
    Table,
    Id,
    Key,
    Label,
    CreatedAt,
}
