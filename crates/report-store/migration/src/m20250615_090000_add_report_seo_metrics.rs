use sea_orm_migration::prelude::*;

use crate::m20250601_102200_create_report_table::Report;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // One column per statement; sqlite only supports single-column ALTERs.
        let columns: Vec<ColumnDef> = vec![
            ColumnDef::new(Metrics::WordCount)
                .integer()
                .not_null()
                .default(0)
                .to_owned(),
            ColumnDef::new(Metrics::InternalLinksCount)
                .integer()
                .not_null()
                .default(0)
                .to_owned(),
            ColumnDef::new(Metrics::ExternalLinksCount)
                .integer()
                .not_null()
                .default(0)
                .to_owned(),
            ColumnDef::new(Metrics::CanonicalUrl).string().to_owned(),
            ColumnDef::new(Metrics::OgTagsPresent)
                .boolean()
                .not_null()
                .default(false)
                .to_owned(),
            ColumnDef::new(Metrics::SchemaPresent)
                .boolean()
                .not_null()
                .default(false)
                .to_owned(),
            ColumnDef::new(Metrics::RobotsTxtExists)
                .boolean()
                .not_null()
                .default(false)
                .to_owned(),
            ColumnDef::new(Metrics::SitemapExists)
                .boolean()
                .not_null()
                .default(false)
                .to_owned(),
            ColumnDef::new(Metrics::TopKeywords).json().to_owned(),
        ];

        for mut column in columns {
            manager
                .alter_table(
                    Table::alter()
                        .table(Report::Table)
                        .add_column(&mut column)
                        .to_owned(),
                )
                .await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for column in [
            Metrics::TopKeywords,
            Metrics::SitemapExists,
            Metrics::RobotsTxtExists,
            Metrics::SchemaPresent,
            Metrics::OgTagsPresent,
            Metrics::CanonicalUrl,
            Metrics::ExternalLinksCount,
            Metrics::InternalLinksCount,
            Metrics::WordCount,
        ] {
            manager
                .alter_table(
                    Table::alter()
                        .table(Report::Table)
                        .drop_column(column)
                        .to_owned(),
                )
                .await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden, Clone, Copy)]
pub enum Metrics {
    WordCount,
    InternalLinksCount,
    ExternalLinksCount,
    CanonicalUrl,
    OgTagsPresent,
    SchemaPresent,
    RobotsTxtExists,
    SitemapExists,
    TopKeywords,
}
