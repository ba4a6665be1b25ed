//! 博彩商与联盟代码表迁移

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bookmakers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Bookmakers::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Bookmakers::Name)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Bookmakers::LogoUrl).string_len(500).null())
                    .col(
                        ColumnDef::new(Bookmakers::LogoPublicId)
                            .string_len(255)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Bookmakers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookmakers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AffiliateCodes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AffiliateCodes::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AffiliateCodes::Code)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(ColumnDef::new(AffiliateCodes::UserId).string_len(36).null())
                    .col(
                        ColumnDef::new(AffiliateCodes::BookmakerId)
                            .string_len(36)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(AffiliateCodes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AffiliateCodes::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_affiliate_codes_user")
                            .from(AffiliateCodes::Table, AffiliateCodes::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_affiliate_codes_bookmaker")
                            .from(AffiliateCodes::Table, AffiliateCodes::BookmakerId)
                            .to(Bookmakers::Table, Bookmakers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_affiliate_codes_code")
                    .table(AffiliateCodes::Table)
                    .col(AffiliateCodes::Code)
                    .to_owned(),
            )
            .await?;

        // 用户 + 博彩商组合查询
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_affiliate_codes_user_bookmaker")
                    .table(AffiliateCodes::Table)
                    .col(AffiliateCodes::UserId)
                    .col(AffiliateCodes::BookmakerId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_affiliate_codes_user_bookmaker")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(Index::drop().name("idx_affiliate_codes_code").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(AffiliateCodes::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Bookmakers::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Bookmakers {
    #[sea_orm(iden = "bookmakers")]
    Table,
    Id,
    Name,
    LogoUrl,
    LogoPublicId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum AffiliateCodes {
    #[sea_orm(iden = "affiliate_codes")]
    Table,
    Id,
    Code,
    UserId,
    BookmakerId,
    CreatedAt,
    UpdatedAt,
}
