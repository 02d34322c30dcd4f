use page_audit::{ProbeError, SiteProber, extract_metrics};
use report_store::{DbErr, NewReport, ReportStore, entities::report};
use scraper::Html;
use thiserror::Error;

use crate::config::PipelineConfig;
use crate::enrichment::{EnrichmentJob, EnrichmentQueue};
use crate::insights::InsightClient;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid URL: {0}")]
    InvalidTarget(String),
    #[error("Failed to fetch website: {0}")]
    FetchFailed(String),
    #[error("Failed to analyze content: {0}")]
    Analysis(String),
    #[error("Failed to save analysis report: {0}")]
    PersistenceFailed(#[from] DbErr),
}

impl From<ProbeError> for PipelineError {
    fn from(err: ProbeError) -> Self {
        match err {
            ProbeError::InvalidTarget(msg) => Self::InvalidTarget(msg),
            ProbeError::FetchFailed(msg) => Self::FetchFailed(msg),
        }
    }
}

/// Sequences one analysis request: probe, extract + score, augment,
/// persist, then hand the report to the detached enrichment queue.
/// Only the probe and the persist stages can fail the request.
#[derive(Clone)]
pub struct AnalysisPipeline {
    prober: SiteProber,
    insights: InsightClient,
    store: ReportStore,
    queue: EnrichmentQueue,
}

impl AnalysisPipeline {
    pub fn new(
        config: &PipelineConfig,
        store: ReportStore,
        queue: EnrichmentQueue,
    ) -> Result<Self, PipelineError> {
        Ok(Self {
            prober: SiteProber::new(&config.fetch)?,
            insights: InsightClient::new(config),
            store,
            queue,
        })
    }

    pub async fn analyze(
        &self,
        url: &str,
        user_id: Option<i32>,
    ) -> Result<report::Model, PipelineError> {
        tracing::info!(url, user_id, "starting analysis");

        let page = self.prober.fetch(url).await?;
        let probes = self.prober.probe_well_known(&page.url).await;

        // scraper's Html is not Send, so parsing and extraction run on the
        // blocking pool and only the flat metrics cross back.
        let base_url = page.url;
        let body = page.body;
        let load_time = page.load_time;
        let mut metrics = tokio::task::spawn_blocking(move || {
            let document = Html::parse_document(&body);
            extract_metrics(&document, &base_url, load_time)
        })
        .await
        .map_err(|e| PipelineError::Analysis(e.to_string()))?;
        metrics.robots_txt_exists = probes.robots_txt;
        metrics.sitemap_exists = probes.sitemap_xml;
        tracing::info!(url, score = metrics.seo_score, "extraction complete");

        let insights = self.insights.generate_or_placeholder(&metrics).await;

        let report = self
            .store
            .create_report(NewReport {
                url: url.to_string(),
                user_id,
                metrics,
                ai_summary: insights.summary,
                ai_suggestions: insights.suggestions,
            })
            .await?;
        tracing::info!(report_id = report.id, "report persisted");

        // Detached: the response goes out with the report still pending.
        self.queue
            .enqueue(EnrichmentJob {
                report_id: report.id,
                url: report.url.clone(),
            })
            .await;

        Ok(report)
    }
}
