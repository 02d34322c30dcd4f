use sea_orm_migration::{prelude::*, schema::*};

use crate::m20250601_101500_create_user_table::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Report::Table)
                    .if_not_exists()
                    .col(pk_auto(Report::Id))
                    .col(integer_null(Report::UserId))
                    .col(string(Report::Url))
                    .col(
                        ColumnDef::new(Report::CreatedAt)
                            .timestamp()
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(string_null(Report::Title))
                    .col(string_null(Report::MetaDescription))
                    .col(integer(Report::H1Count).default(0))
                    .col(integer(Report::H2Count).default(0))
                    .col(integer(Report::ImageCount).default(0))
                    .col(integer(Report::MissingAltCount).default(0))
                    .col(double(Report::LoadTime).default(0.0))
                    .col(integer(Report::SeoScore).default(0))
                    .col(string_null(Report::AiSummary))
                    .col(json_null(Report::AiSuggestions))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_report_user_id")
                            .from(Report::Table, Report::UserId)
                            .to(User::Table, User::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_report_url")
                    .table(Report::Table)
                    .col(Report::Url)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Report::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Report {
    Table,
    Id,
    UserId,
    Url,
    CreatedAt,
    Title,
    MetaDescription,
    H1Count,
    H2Count,
    ImageCount,
    MissingAltCount,
    LoadTime,
    SeoScore,
    AiSummary,
    AiSuggestions,
}
