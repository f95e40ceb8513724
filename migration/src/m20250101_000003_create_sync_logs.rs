use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Append-only audit log, ordered by id
        manager
            .create_table(
                Table::create()
                    .table(SyncLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SyncLogs::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SyncLogs::BrandId).string().not_null())
                    .col(ColumnDef::new(SyncLogs::Direction).string().not_null())
                    .col(ColumnDef::new(SyncLogs::Action).string().not_null())
                    .col(ColumnDef::new(SyncLogs::Success).boolean().not_null())
                    .col(ColumnDef::new(SyncLogs::Details).json().not_null())
                    .col(ColumnDef::new(SyncLogs::Error).text())
                    .col(
                        ColumnDef::new(SyncLogs::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sync_logs_brand_id")
                    .table(SyncLogs::Table)
                    .col(SyncLogs::BrandId)
                    .col(SyncLogs::Id)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SyncLogs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum SyncLogs {
    Table,
    Id,
    BrandId,
    Direction,
    Action,
    Success,
    Details,
    Error,
    Timestamp,
}
