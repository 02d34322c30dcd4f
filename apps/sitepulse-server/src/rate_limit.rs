use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use parking_lot::Mutex;

use crate::error::ApiError;
use crate::state::AppState;

const WINDOW: Duration = Duration::from_secs(60);
const EXEMPT_PATHS: [&str; 2] = ["/", "/health"];

/// In-memory sliding-window limiter keyed by client IP. Single-process
/// only; a shared store would be needed behind multiple replicas.
#[derive(Clone)]
pub struct RateLimiter {
    requests_per_minute: usize,
    hits: Arc<Mutex<HashMap<IpAddr, Vec<Instant>>>>,
}

impl RateLimiter {
    pub fn new(requests_per_minute: usize) -> Self {
        Self {
            requests_per_minute,
            hits: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Records the hit and reports whether the caller is still within
    /// budget for the current window.
    pub fn check(&self, client: IpAddr) -> bool {
        let now = Instant::now();
        let mut hits = self.hits.lock();
        let entry = hits.entry(client).or_default();

        entry.retain(|seen| now.duration_since(*seen) < WINDOW);
        if entry.len() >= self.requests_per_minute {
            return false;
        }
        entry.push(now);
        true
    }
}

pub async fn limit(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if EXEMPT_PATHS.contains(&req.uri().path()) {
        return Ok(next.run(req).await);
    }

    let client = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip())
        .unwrap_or(IpAddr::from([127, 0, 0, 1]));

    if !state.limiter.check(client) {
        tracing::warn!(%client, "rate limit exceeded");
        return Err(ApiError::RateLimited(state.config.rate_limit_per_minute));
    }

    Ok(next.run(req).await)
}
