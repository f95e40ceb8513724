use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SyncOutbox::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SyncOutbox::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(SyncOutbox::BrandId).string().not_null())
                    .col(ColumnDef::new(SyncOutbox::EntityType).string().not_null())
                    .col(ColumnDef::new(SyncOutbox::EntityId).uuid().not_null())
                    .col(ColumnDef::new(SyncOutbox::Status).string().not_null())
                    .col(ColumnDef::new(SyncOutbox::AttemptCount).integer().not_null().default(0))
                    .col(ColumnDef::new(SyncOutbox::MaxAttempts).integer().not_null().default(5))
                    .col(ColumnDef::new(SyncOutbox::NextAttemptAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(SyncOutbox::LastError).text())
                    .col(
                        ColumnDef::new(SyncOutbox::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(SyncOutbox::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(SyncOutbox::DeliveredAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sync_outbox_status_next_attempt")
                    .table(SyncOutbox::Table)
                    .col(SyncOutbox::Status)
                    .col(SyncOutbox::NextAttemptAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SyncOutbox::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum SyncOutbox {
    Table,
    Id,
    BrandId,
    EntityType,
    EntityId,
    Status,
    AttemptCount,
    MaxAttempts,
    NextAttemptAt,
    LastError,
    CreatedAt,
    UpdatedAt,
    DeliveredAt,
}
