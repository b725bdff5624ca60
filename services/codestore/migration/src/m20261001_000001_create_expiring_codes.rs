use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ExpiringCodes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ExpiringCodes::ZoneId).text().not_null())
                    .col(ColumnDef::new(ExpiringCodes::Code).string_len(255).not_null())
                    .col(ColumnDef::new(ExpiringCodes::ExpiresAt).big_integer().not_null())
                    .col(ColumnDef::new(ExpiringCodes::Data).text().not_null())
                    .col(ColumnDef::new(ExpiringCodes::Intent).text())
                    // (zone_id, code) is the uniqueness constraint generate relies on.
                    .primary_key(
                        Index::create()
                            .col(ExpiringCodes::ZoneId)
                            .col(ExpiringCodes::Code),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(ExpiringCodes::Table)
                    .col(ExpiringCodes::ExpiresAt)
                    .name("idx_expiring_codes_expires_at")
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(ExpiringCodes::Table)
                    .col(ExpiringCodes::ZoneId)
                    .col(ExpiringCodes::Intent)
                    .name("idx_expiring_codes_zone_intent")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ExpiringCodes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ExpiringCodes {
    Table,
    ZoneId,
    Code,
    ExpiresAt,
    Data,
    Intent,
}
