use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use report_store::entities::report;
use serde::Deserialize;

use crate::auth;
use crate::config::MAX_PAGE_SIZE;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub url: String,
}

/// Runs the full analysis pipeline for a submitted URL. Every request
/// produces a new report snapshot; guests get an unowned one. The
/// response goes out while the pagespeed enrichment is still pending.
pub async fn analyze(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<AnalyzeRequest>,
) -> Result<(StatusCode, Json<report::Model>), ApiError> {
    let user = auth::authenticate_optional(&state, &headers).await?;
    let user_id = user.as_ref().map(|u| u.id);

    let report = state.pipeline.analyze(&request.url, user_id).await?;
    Ok((StatusCode::CREATED, Json(report)))
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub skip: u64,
    pub limit: Option<u64>,
}

pub async fn list_reports(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<report::Model>>, ApiError> {
    let user = auth::authenticate(&state, &headers).await?;
    let limit = params.limit.unwrap_or(MAX_PAGE_SIZE).min(MAX_PAGE_SIZE);

    let reports = state
        .store
        .reports_for_user(user.id, params.skip, limit)
        .await?;
    Ok(Json(reports))
}

/// Guest reports (no owner) are readable by anyone so unauthenticated
/// callers can poll for the pagespeed enrichment; owned reports only by
/// their owner.
pub async fn get_report(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(report_id): Path<i32>,
) -> Result<Json<report::Model>, ApiError> {
    let user = auth::authenticate_optional(&state, &headers).await?;

    let report = state
        .store
        .find_report(report_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Report with ID {report_id} not found")))?;

    if let Some(owner_id) = report.user_id {
        let Some(user) = user else {
            return Err(ApiError::Unauthorized);
        };
        if user.id != owner_id {
            tracing::warn!(report_id, user_id = user.id, "denied access to foreign report");
            return Err(ApiError::Forbidden(
                "You don't have permission to access this report".to_string(),
            ));
        }
    }

    Ok(Json(report))
}
