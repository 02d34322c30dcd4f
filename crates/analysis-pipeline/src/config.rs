use page_audit::FetchConfig;

pub const DEFAULT_INSIGHT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_INSIGHT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_INSIGHT_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_PAGESPEED_ENDPOINT: &str =
    "https://www.googleapis.com/pagespeedonline/v5/runPagespeed";
// Full audits are slow; the upstream API routinely takes most of a minute.
pub const DEFAULT_PAGESPEED_TIMEOUT_SECS: u64 = 60;

/// Configuration for every external call the pipeline makes. Built once at
/// process start and passed by reference; components never read ambient
/// state.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub fetch: FetchConfig,
    pub insight_api_key: Option<String>,
    pub insight_endpoint: String,
    pub insight_model: String,
    pub insight_timeout_secs: u64,
    pub pagespeed_api_key: Option<String>,
    pub pagespeed_endpoint: String,
    pub pagespeed_timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            fetch: FetchConfig::default(),
            insight_api_key: None,
            insight_endpoint: DEFAULT_INSIGHT_ENDPOINT.to_string(),
            insight_model: DEFAULT_INSIGHT_MODEL.to_string(),
            insight_timeout_secs: DEFAULT_INSIGHT_TIMEOUT_SECS,
            pagespeed_api_key: None,
            pagespeed_endpoint: DEFAULT_PAGESPEED_ENDPOINT.to_string(),
            pagespeed_timeout_secs: DEFAULT_PAGESPEED_TIMEOUT_SECS,
        }
    }
}
