//! Link tables: original links, generated short links, UTMs and the
//! generated-link/UTM join table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OriginalLinks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OriginalLinks::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OriginalLinks::Url).text().not_null())
                    .col(ColumnDef::new(OriginalLinks::UserId).string_len(36).null())
                    .col(
                        ColumnDef::new(OriginalLinks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OriginalLinks::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_original_links_user")
                            .from(OriginalLinks::Table, OriginalLinks::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(GeneratedLinks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GeneratedLinks::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GeneratedLinks::NewLink).text().not_null())
                    .col(
                        ColumnDef::new(GeneratedLinks::ShortLink)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(GeneratedLinks::Clicks)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(GeneratedLinks::OriginalLinkId)
                            .string_len(36)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GeneratedLinks::UserId)
                            .string_len(36)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GeneratedLinks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GeneratedLinks::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_generated_links_original")
                            .from(GeneratedLinks::Table, GeneratedLinks::OriginalLinkId)
                            .to(OriginalLinks::Table, OriginalLinks::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_generated_links_user")
                            .from(GeneratedLinks::Table, GeneratedLinks::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_generated_links_user")
                    .table(GeneratedLinks::Table)
                    .col(GeneratedLinks::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Utms::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Utms::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Utms::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Utms::Value).string_len(500).not_null())
                    .col(ColumnDef::new(Utms::Source).string_len(100).null())
                    .col(ColumnDef::new(Utms::Medium).string_len(100).null())
                    .col(ColumnDef::new(Utms::Campaign).string_len(200).null())
                    .col(ColumnDef::new(Utms::UserId).string_len(36).null())
                    .col(
                        ColumnDef::new(Utms::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Utms::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_utms_user")
                            .from(Utms::Table, Utms::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_utms_campaign")
                    .table(Utms::Table)
                    .col(Utms::Source)
                    .col(Utms::Medium)
                    .col(Utms::Campaign)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(GeneratedLinkUtms::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GeneratedLinkUtms::GeneratedLinkId)
                            .string_len(36)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GeneratedLinkUtms::UtmId)
                            .string_len(36)
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(GeneratedLinkUtms::GeneratedLinkId)
                            .col(GeneratedLinkUtms::UtmId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_generated_link_utms_link")
                            .from(GeneratedLinkUtms::Table, GeneratedLinkUtms::GeneratedLinkId)
                            .to(GeneratedLinks::Table, GeneratedLinks::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_generated_link_utms_utm")
                            .from(GeneratedLinkUtms::Table, GeneratedLinkUtms::UtmId)
                            .to(Utms::Table, Utms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GeneratedLinkUtms::Table).to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_utms_campaign").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Utms::Table).to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_generated_links_user").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(GeneratedLinks::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(OriginalLinks::Table).to_owned())
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
enum OriginalLinks {
    #[sea_orm(iden = "original_links")]
    Table,
    Id,
    Url,
    UserId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum GeneratedLinks {
    #[sea_orm(iden = "generated_links")]
    Table,
    Id,
    NewLink,
    ShortLink,
    Clicks,
    OriginalLinkId,
    UserId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Utms {
    #[sea_orm(iden = "utms")]
    Table,
    Id,
    Name,
    Value,
    Source,
    Medium,
    Campaign,
    UserId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum GeneratedLinkUtms {
    #[sea_orm(iden = "generated_link_utms")]
    Table,
    GeneratedLinkId,
    UtmId,
}
