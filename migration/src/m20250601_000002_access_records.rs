//! 访问记录表迁移
//!
//! access_records 只按 token 引用 links，不建外键：
//! 链接过期后记录仍需保留用于审计。

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AccessRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AccessRecords::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AccessRecords::Token)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AccessRecords::AccessedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AccessRecords::CallerAddress)
                            .string_len(64)
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_access_records_token")
                    .table(AccessRecords::Table)
                    .col(AccessRecords::Token)
                    .to_owned(),
            )
            .await?;

        // 单链接按时间顺序读取
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_access_records_token_time")
                    .table(AccessRecords::Table)
                    .col(AccessRecords::Token)
                    .col(AccessRecords::AccessedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_access_records_token_time")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(Index::drop().name("idx_access_records_token").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(AccessRecords::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum AccessRecords {
    #[sea_orm(iden = "access_records")]
    Table,
    Id,
    Token,
    AccessedAt,
    CallerAddress,
}
