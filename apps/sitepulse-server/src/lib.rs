pub mod auth;
pub mod config;
pub mod error;
pub mod rate_limit;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::{Router, middleware};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use state::AppState;

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/analyze", post(routes::reports::analyze))
        .route("/reports", get(routes::reports::list_reports))
        .route("/reports/{id}", get(routes::reports::get_report))
        .route("/history/unique", get(routes::history::unique_urls))
        .route("/history/by-url", get(routes::history::url_history))
        .route(
            "/admin/cleanup-guest-reports",
            post(routes::admin::cleanup_guest_reports),
        )
        .route(
            "/admin/guest-report-stats",
            get(routes::admin::guest_report_stats),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_internal_api_key,
        ));

    Router::new()
        .route("/", get(routes::status::root))
        .route("/health", get(routes::status::health))
        .nest("/api/v1", api)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::limit,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
