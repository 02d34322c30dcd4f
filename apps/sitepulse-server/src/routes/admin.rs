use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CleanupParams {
    pub retention_hours: Option<i64>,
    #[serde(default)]
    pub dry_run: bool,
}

/// Retention sweep over guest reports. With `dry_run` only counts what
/// would be removed.
pub async fn cleanup_guest_reports(
    State(state): State<AppState>,
    Query(params): Query<CleanupParams>,
) -> Result<Json<Value>, ApiError> {
    let retention = params
        .retention_hours
        .unwrap_or(state.config.guest_retention_hours);
    tracing::info!(
        retention_hours = retention,
        dry_run = params.dry_run,
        "guest report cleanup requested"
    );

    let stats_before = state.store.guest_report_stats().await?;
    let cleanup = state
        .store
        .cleanup_guest_reports(retention, params.dry_run)
        .await?;
    let stats_after = state.store.guest_report_stats().await?;

    Ok(Json(json!({
        "success": true,
        "cleanup": cleanup,
        "stats_before": stats_before,
        "stats_after": stats_after,
    })))
}

pub async fn guest_report_stats(
    State(state): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    let stats = state.store.guest_report_stats().await?;
    Ok(Json(json!({ "success": true, "stats": stats })))
}
