use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use report_store::entities::user;

use crate::error::ApiError;
use crate::state::AppState;

pub const INTERNAL_API_KEY_HEADER: &str = "x-internal-api-key";

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
}

/// Resolves the bearer credential to a user or fails with 401.
pub async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<user::Model, ApiError> {
    let token = bearer_token(headers).ok_or(ApiError::Unauthorized)?;
    state
        .store
        .find_user_by_token(token)
        .await?
        .ok_or(ApiError::Unauthorized)
}

/// Guest-tolerant variant: a missing or unknown credential is simply a
/// guest, never an error.
pub async fn authenticate_optional(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Option<user::Model>, ApiError> {
    let Some(token) = bearer_token(headers) else {
        return Ok(None);
    };
    Ok(state.store.find_user_by_token(token).await?)
}

/// Gate for every /api/v1 route: only callers holding the shared
/// internal key (the trusted frontend proxy) get through.
pub async fn require_internal_api_key(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(expected) = state.config.internal_api_key.as_deref() else {
        tracing::error!("internal API key is not configured");
        return Err(ApiError::ApiKeyUnconfigured);
    };

    match req
        .headers()
        .get(INTERNAL_API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
    {
        Some(provided) if provided == expected => Ok(next.run(req).await),
        Some(_) => {
            tracing::warn!("request rejected: invalid internal API key");
            Err(ApiError::Forbidden(
                "Access forbidden: invalid internal API key".to_string(),
            ))
        }
        None => {
            tracing::warn!("request rejected: missing internal API key");
            Err(ApiError::Forbidden(
                "Access forbidden: missing internal API key".to_string(),
            ))
        }
    }
}
