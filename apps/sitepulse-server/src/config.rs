use analysis_pipeline::PipelineConfig;
use clap::Parser;
use page_audit::FetchConfig;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_CRAWL_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_GUEST_RETENTION_HOURS: i64 = 24;
pub const DEFAULT_RATE_LIMIT_PER_MINUTE: usize = 30;
pub const MAX_PAGE_SIZE: u64 = 100;

/// SitePulse — SEO snapshot and report backend.
#[derive(Parser, Debug, Clone)]
#[command(name = "sitepulse-server")]
pub struct CliArgs {
    /// HTTP port to listen on
    #[arg(long = "port", env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Database connection string
    #[arg(
        long = "database-url",
        env = "DATABASE_URL",
        default_value = "sqlite://sitepulse.db?mode=rwc"
    )]
    pub database_url: String,

    /// Total timeout for fetching a submitted page, in seconds
    #[arg(long = "crawl-timeout", default_value_t = DEFAULT_CRAWL_TIMEOUT_SECS)]
    pub crawl_timeout: u64,

    /// How long guest reports are kept before the sweep deletes them
    #[arg(
        long = "guest-retention-hours",
        env = "GUEST_REPORT_RETENTION_HOURS",
        default_value_t = DEFAULT_GUEST_RETENTION_HOURS
    )]
    pub guest_retention_hours: i64,

    /// Requests allowed per client IP per minute
    #[arg(
        long = "rate-limit-per-minute",
        env = "RATE_LIMIT_PER_MINUTE",
        default_value_t = DEFAULT_RATE_LIMIT_PER_MINUTE
    )]
    pub rate_limit_per_minute: usize,

    /// API key for the LLM insight service
    #[arg(long = "google-api-key", env = "GOOGLE_API_KEY", hide_env_values = true)]
    pub google_api_key: Option<String>,

    /// API key for the pagespeed service; falls back to the LLM key
    #[arg(
        long = "pagespeed-api-key",
        env = "PAGESPEED_API_KEY",
        hide_env_values = true
    )]
    pub pagespeed_api_key: Option<String>,

    /// Shared secret required in x-internal-api-key on /api/v1 routes
    #[arg(
        long = "internal-api-key",
        env = "INTERNAL_API_KEY",
        hide_env_values = true
    )]
    pub internal_api_key: Option<String>,

    /// Environment label reported by the root endpoint
    #[arg(long = "environment", env = "ENVIRONMENT", default_value = "development")]
    pub environment: String,
}

/// Resolved process configuration, built once in `main` and shared via
/// the application state.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub environment: String,
    pub internal_api_key: Option<String>,
    pub guest_retention_hours: i64,
    pub rate_limit_per_minute: usize,
    pub pipeline: PipelineConfig,
}

impl AppConfig {
    pub fn from_args(args: CliArgs) -> Self {
        let google_api_key = args.google_api_key;
        let pipeline = PipelineConfig {
            fetch: FetchConfig {
                timeout_secs: args.crawl_timeout,
                ..FetchConfig::default()
            },
            insight_api_key: google_api_key.clone(),
            pagespeed_api_key: args.pagespeed_api_key.or(google_api_key),
            ..PipelineConfig::default()
        };

        Self {
            port: args.port,
            database_url: args.database_url,
            environment: args.environment,
            internal_api_key: args.internal_api_key,
            guest_retention_hours: args.guest_retention_hours,
            rate_limit_per_minute: args.rate_limit_per_minute,
            pipeline,
        }
    }
}
