use sea_orm_migration::prelude::*;

use crate::m20250601_102200_create_report_table::Report;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let columns: Vec<ColumnDef> = vec![
            ColumnDef::new(Pagespeed::PagespeedPerformance)
                .double()
                .to_owned(),
            ColumnDef::new(Pagespeed::PagespeedAccessibility)
                .double()
                .to_owned(),
            ColumnDef::new(Pagespeed::PagespeedSeo).double().to_owned(),
            ColumnDef::new(Pagespeed::PagespeedBestPractices)
                .double()
                .to_owned(),
            // New reports start out awaiting the background fetch.
            ColumnDef::new(Pagespeed::PagespeedStatus)
                .string()
                .not_null()
                .default("pending")
                .to_owned(),
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
            Pagespeed::PagespeedStatus,
            Pagespeed::PagespeedBestPractices,
            Pagespeed::PagespeedSeo,
            Pagespeed::PagespeedAccessibility,
            Pagespeed::PagespeedPerformance,
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
pub enum Pagespeed {
    PagespeedPerformance,
    PagespeedAccessibility,
    PagespeedSeo,
    PagespeedBestPractices,
    PagespeedStatus,
}
