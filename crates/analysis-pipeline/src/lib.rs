pub mod config;
pub mod enrichment;
pub mod insights;
pub mod pagespeed;
pub mod pipeline;

pub use config::PipelineConfig;
pub use enrichment::{EnrichmentJob, EnrichmentQueue};
pub use insights::{InsightClient, InsightError, PageInsights, Suggestion};
pub use pagespeed::{PagespeedClient, PagespeedError, PagespeedScores};
pub use pipeline::{AnalysisPipeline, PipelineError};
