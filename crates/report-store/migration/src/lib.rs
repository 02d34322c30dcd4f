pub use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_101500_create_user_table::Migration),
            Box::new(m20250601_102200_create_report_table::Migration),
            Box::new(m20250615_090000_add_report_seo_metrics::Migration),
            Box::new(m20250622_110000_add_pagespeed_columns::Migration),
        ]
    }
}
mod m20250601_101500_create_user_table;
mod m20250601_102200_create_report_table;
mod m20250615_090000_add_report_seo_metrics;
mod m20250622_110000_add_pagespeed_columns;
