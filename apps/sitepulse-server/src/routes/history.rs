use axum::Json;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use report_store::entities::report;
use report_store::utils::url_history::UrlHistoryEntry;
use serde::Deserialize;

use crate::auth;
use crate::error::ApiError;
use crate::state::AppState;

/// The user's analyzed URLs, one row per URL with count/latest-scan/best
/// score aggregates.
pub async fn unique_urls(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<UrlHistoryEntry>>, ApiError> {
    let user = auth::authenticate(&state, &headers).await?;
    let history = state.store.url_history(user.id).await?;
    Ok(Json(history))
}

#[derive(Debug, Deserialize)]
pub struct UrlQuery {
    pub url: String,
}

/// Score progression for one URL, newest first.
pub async fn url_history(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<UrlQuery>,
) -> Result<Json<Vec<report::Model>>, ApiError> {
    let user = auth::authenticate(&state, &headers).await?;

    let reports = state.store.reports_for_url(user.id, &query.url).await?;
    if reports.is_empty() {
        return Err(ApiError::NotFound(format!(
            "No reports found for URL: {}",
            query.url
        )));
    }
    Ok(Json(reports))
}
