use std::sync::Arc;

use analysis_pipeline::AnalysisPipeline;
use report_store::ReportStore;

use crate::config::AppConfig;
use crate::rate_limit::RateLimiter;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: ReportStore,
    pub pipeline: AnalysisPipeline,
    pub limiter: RateLimiter,
}

impl AppState {
    pub fn new(config: AppConfig, store: ReportStore, pipeline: AnalysisPipeline) -> Self {
        let limiter = RateLimiter::new(config.rate_limit_per_minute);
        Self {
            config: Arc::new(config),
            store,
            pipeline,
            limiter,
        }
    }
}
