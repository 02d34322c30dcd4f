use sea_orm::FromQueryResult;
use sea_orm::entity::prelude::DateTimeUtc;
use serde::Serialize;

/// One row of the per-URL history aggregation: how often a URL was
/// analyzed, when it was last scanned, and the best score it reached.
#[derive(Debug, Clone, PartialEq, FromQueryResult, Serialize)]
pub struct UrlHistoryEntry {
    pub url: String,
    pub report_count: i64,
    pub latest_scan: DateTimeUtc,
    pub latest_seo_score: i32,
}
