pub mod entities;
pub mod enums;
pub mod utils;

use chrono::{Duration, Utc};
use migration::{Migrator, MigratorTrait};
use page_audit::PageMetrics;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Database, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::Serialize;

use entities::{StringList, report, user};
use enums::pagespeed_status::PagespeedStatus;
use utils::url_history::UrlHistoryEntry;

pub use sea_orm::{DatabaseConnection as DbConnection, DbErr};

/// Everything needed to persist a freshly analyzed page as a report.
#[derive(Debug, Clone)]
pub struct NewReport {
    pub url: String,
    pub user_id: Option<i32>,
    pub metrics: PageMetrics,
    pub ai_summary: String,
    pub ai_suggestions: Vec<String>,
}

/// Scores written back by the enrichment worker; `None` values are kept
/// as-is (an attempted-but-unavailable category).
#[derive(Debug, Clone, Copy, Default)]
pub struct PagespeedUpdate {
    pub performance: Option<f64>,
    pub accessibility: Option<f64>,
    pub seo: Option<f64>,
    pub best_practices: Option<f64>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct CleanupOutcome {
    pub deleted_count: u64,
    pub retention_hours: i64,
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct GuestReportStats {
    pub total_guest_reports: u64,
    pub oldest_report_age_hours: Option<f64>,
}

#[derive(Clone)]
pub struct ReportStore {
    db: DatabaseConnection,
}

impl ReportStore {
    pub async fn connect(database_url: &str) -> Result<Self, DbErr> {
        let db = Database::connect(database_url).await?;
        Ok(Self { db })
    }

    pub fn from_connection(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn migrate(&self) -> Result<(), DbErr> {
        Migrator::up(&self.db, None).await
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    pub async fn ping(&self) -> Result<(), DbErr> {
        self.db.ping().await
    }

    pub async fn create_report(&self, new: NewReport) -> Result<report::Model, DbErr> {
        let metrics = new.metrics;
        let model = report::ActiveModel {
            user_id: Set(new.user_id),
            url: Set(new.url),
            created_at: Set(Utc::now()),
            title: Set(Some(metrics.title)),
            meta_description: Set(metrics.meta_description),
            h1_count: Set(metrics.h1_count as i32),
            h2_count: Set(metrics.h2_count as i32),
            image_count: Set(metrics.image_count as i32),
            missing_alt_count: Set(metrics.missing_alt_count as i32),
            word_count: Set(metrics.word_count as i32),
            internal_links_count: Set(metrics.internal_links_count as i32),
            external_links_count: Set(metrics.external_links_count as i32),
            canonical_url: Set(metrics.canonical_url),
            og_tags_present: Set(metrics.og_tags_present),
            schema_present: Set(metrics.schema_present),
            robots_txt_exists: Set(metrics.robots_txt_exists),
            sitemap_exists: Set(metrics.sitemap_exists),
            top_keywords: Set(Some(StringList(metrics.top_keywords))),
            load_time: Set(metrics.load_time),
            seo_score: Set(metrics.seo_score as i32),
            ai_summary: Set(Some(new.ai_summary)),
            ai_suggestions: Set(Some(StringList(new.ai_suggestions))),
            pagespeed_status: Set(PagespeedStatus::Pending),
            ..Default::default()
        };
        model.insert(&self.db).await
    }

    pub async fn find_report(&self, id: i32) -> Result<Option<report::Model>, DbErr> {
        report::Entity::find_by_id(id).one(&self.db).await
    }

    pub async fn reports_for_user(
        &self,
        user_id: i32,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<report::Model>, DbErr> {
        report::Entity::find()
            .filter(report::Column::UserId.eq(user_id))
            .order_by_desc(report::Column::CreatedAt)
            .offset(skip)
            .limit(limit)
            .all(&self.db)
            .await
    }

    /// All of a user's reports for one URL, newest first, retrying
    /// with/without a trailing slash when the exact string finds nothing.
    pub async fn reports_for_url(
        &self,
        user_id: i32,
        url: &str,
    ) -> Result<Vec<report::Model>, DbErr> {
        let exact = self.reports_for_exact_url(user_id, url).await?;
        if !exact.is_empty() {
            return Ok(exact);
        }

        let trimmed = url.trim_end_matches('/');
        if trimmed != url {
            let found = self.reports_for_exact_url(user_id, trimmed).await?;
            if !found.is_empty() {
                return Ok(found);
            }
        }
        let with_slash = format!("{trimmed}/");
        if with_slash != url {
            return self.reports_for_exact_url(user_id, &with_slash).await;
        }
        Ok(Vec::new())
    }

    async fn reports_for_exact_url(
        &self,
        user_id: i32,
        url: &str,
    ) -> Result<Vec<report::Model>, DbErr> {
        report::Entity::find()
            .filter(report::Column::UserId.eq(user_id))
            .filter(report::Column::Url.eq(url))
            .order_by_desc(report::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Per-URL aggregation of a user's reports, most recently scanned first.
    pub async fn url_history(&self, user_id: i32) -> Result<Vec<UrlHistoryEntry>, DbErr> {
        report::Entity::find()
            .select_only()
            .column(report::Column::Url)
            .column_as(report::Column::Id.count(), "report_count")
            .column_as(report::Column::CreatedAt.max(), "latest_scan")
            .column_as(report::Column::SeoScore.max(), "latest_seo_score")
            .filter(report::Column::UserId.eq(user_id))
            .group_by(report::Column::Url)
            .order_by_desc(report::Column::CreatedAt.max())
            .into_model::<UrlHistoryEntry>()
            .all(&self.db)
            .await
    }

    /// The single post-creation write a report ever receives: the four
    /// pagespeed scores plus the completed status. Returns false when the
    /// report no longer exists (e.g. swept between enqueue and execution).
    pub async fn complete_enrichment(
        &self,
        report_id: i32,
        update: PagespeedUpdate,
    ) -> Result<bool, DbErr> {
        let Some(model) = report::Entity::find_by_id(report_id).one(&self.db).await? else {
            return Ok(false);
        };

        let mut active: report::ActiveModel = model.into();
        active.pagespeed_performance = Set(update.performance);
        active.pagespeed_accessibility = Set(update.accessibility);
        active.pagespeed_seo = Set(update.seo);
        active.pagespeed_best_practices = Set(update.best_practices);
        active.pagespeed_status = Set(PagespeedStatus::Completed);
        active.update(&self.db).await?;
        Ok(true)
    }

    pub async fn mark_enrichment_failed(&self, report_id: i32) -> Result<(), DbErr> {
        report::Entity::update_many()
            .col_expr(
                report::Column::PagespeedStatus,
                Expr::value(PagespeedStatus::Failed),
            )
            .filter(report::Column::Id.eq(report_id))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    /// Deletes guest reports older than the retention window; owned
    /// reports are never touched. With `dry_run` the eligible rows are
    /// only counted.
    pub async fn cleanup_guest_reports(
        &self,
        retention_hours: i64,
        dry_run: bool,
    ) -> Result<CleanupOutcome, DbErr> {
        let cutoff = Utc::now() - Duration::hours(retention_hours);

        if dry_run {
            let eligible = report::Entity::find()
                .filter(report::Column::UserId.is_null())
                .filter(report::Column::CreatedAt.lt(cutoff))
                .count(&self.db)
                .await?;
            tracing::info!(eligible, retention_hours, "dry-run guest report cleanup");
            return Ok(CleanupOutcome {
                deleted_count: eligible,
                retention_hours,
                dry_run: true,
            });
        }

        let result = report::Entity::delete_many()
            .filter(report::Column::UserId.is_null())
            .filter(report::Column::CreatedAt.lt(cutoff))
            .exec(&self.db)
            .await?;
        tracing::info!(
            deleted = result.rows_affected,
            retention_hours,
            "guest report cleanup"
        );

        Ok(CleanupOutcome {
            deleted_count: result.rows_affected,
            retention_hours,
            dry_run: false,
        })
    }

    pub async fn guest_report_stats(&self) -> Result<GuestReportStats, DbErr> {
        let total_guest_reports = report::Entity::find()
            .filter(report::Column::UserId.is_null())
            .count(&self.db)
            .await?;

        let oldest = report::Entity::find()
            .filter(report::Column::UserId.is_null())
            .order_by_asc(report::Column::CreatedAt)
            .one(&self.db)
            .await?;
        let oldest_report_age_hours = oldest
            .map(|report| (Utc::now() - report.created_at).num_seconds() as f64 / 3600.0);

        Ok(GuestReportStats {
            total_guest_reports,
            oldest_report_age_hours,
        })
    }

    pub async fn find_user_by_token(&self, token: &str) -> Result<Option<user::Model>, DbErr> {
        user::Entity::find()
            .filter(user::Column::Token.eq(token))
            .one(&self.db)
            .await
    }

    pub async fn create_user(&self, email: &str, token: &str) -> Result<user::Model, DbErr> {
        let model = user::ActiveModel {
            email: Set(email.to_string()),
            token: Set(token.to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        model.insert(&self.db).await
    }
}
