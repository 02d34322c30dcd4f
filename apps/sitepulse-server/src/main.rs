use analysis_pipeline::{AnalysisPipeline, EnrichmentQueue, PagespeedClient};
use clap::Parser;
use report_store::ReportStore;
use tracing::info;

use sitepulse_server::build_router;
use sitepulse_server::config::{AppConfig, CliArgs};
use sitepulse_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "sitepulse_server=info,analysis_pipeline=info,report_store=info,tower_http=info"
                    .into()
            }),
        )
        .init();

    let args = CliArgs::parse();
    let config = AppConfig::from_args(args);
    info!("Starting sitepulse-server v{}", env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", config.environment);
    if config.internal_api_key.is_none() {
        tracing::warn!("INTERNAL_API_KEY is not set; /api/v1 routes will refuse all requests");
    }

    let store = ReportStore::connect(&config.database_url).await?;
    store.migrate().await?;
    info!("Database ready");

    let queue = EnrichmentQueue::start(store.clone(), PagespeedClient::new(&config.pipeline));
    let pipeline = AnalysisPipeline::new(&config.pipeline, store.clone(), queue)?;

    let port = config.port;
    let state = AppState::new(config, store, pipeline);
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    info!("Listening on http://0.0.0.0:{port}");
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await?;

    Ok(())
}
