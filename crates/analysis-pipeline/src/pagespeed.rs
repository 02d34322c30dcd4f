use std::time::Duration;

use report_store::PagespeedUpdate;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

use crate::config::PipelineConfig;

const CATEGORIES: [&str; 4] = ["PERFORMANCE", "ACCESSIBILITY", "SEO", "BEST_PRACTICES"];

#[derive(Debug, Error)]
pub enum PagespeedError {
    #[error("Failed to call pagespeed API: {0}")]
    RequestFailed(String),
    #[error("Failed to parse pagespeed response: {0}")]
    MalformedResponse(String),
}

/// The four audit sub-scores on a 0-100 scale. A `None` means the
/// category was attempted but unavailable.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PagespeedScores {
    pub performance: Option<f64>,
    pub accessibility: Option<f64>,
    pub seo: Option<f64>,
    pub best_practices: Option<f64>,
}

impl From<PagespeedScores> for PagespeedUpdate {
    fn from(scores: PagespeedScores) -> Self {
        Self {
            performance: scores.performance,
            accessibility: scores.accessibility,
            seo: scores.seo,
            best_practices: scores.best_practices,
        }
    }
}

#[derive(Clone)]
pub struct PagespeedClient {
    client: Client,
    api_key: Option<String>,
    endpoint: String,
    timeout: Duration,
}

impl PagespeedClient {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: config.pagespeed_api_key.clone(),
            endpoint: config.pagespeed_endpoint.clone(),
            timeout: Duration::from_secs(config.pagespeed_timeout_secs),
        }
    }

    pub async fn fetch_scores(&self, url: &str) -> Result<PagespeedScores, PagespeedError> {
        let mut params: Vec<(&str, &str)> = vec![("url", url), ("strategy", "MOBILE")];
        for category in CATEGORIES {
            params.push(("category", category));
        }
        if let Some(key) = self.api_key.as_deref() {
            params.push(("key", key));
        }

        tracing::info!(url, "fetching pagespeed audit");
        let response = self
            .client
            .get(&self.endpoint)
            .timeout(self.timeout)
            .query(&params)
            .send()
            .await
            .map_err(|e| PagespeedError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PagespeedError::RequestFailed(format!(
                "pagespeed API returned status {}",
                response.status()
            )));
        }

        let data: Value = response
            .json()
            .await
            .map_err(|e| PagespeedError::MalformedResponse(e.to_string()))?;

        Ok(parse_scores(&data))
    }

    /// Safe mode for the detached worker: any failure becomes an all-None
    /// score set instead of an error.
    pub async fn fetch_scores_safe(&self, url: &str) -> PagespeedScores {
        match self.fetch_scores(url).await {
            Ok(scores) => scores,
            Err(e) => {
                tracing::warn!(url, error = %e, "pagespeed fetch failed, recording empty scores");
                PagespeedScores::default()
            }
        }
    }
}

/// Pulls the four category scores out of an audit response. Upstream
/// reports each score as a 0-1 fraction; stored values are 0-100 with two
/// decimals.
pub fn parse_scores(data: &Value) -> PagespeedScores {
    let categories = &data["lighthouseResult"]["categories"];
    PagespeedScores {
        performance: category_score(categories, "performance"),
        accessibility: category_score(categories, "accessibility"),
        seo: category_score(categories, "seo"),
        best_practices: category_score(categories, "best-practices"),
    }
}

fn category_score(categories: &Value, name: &str) -> Option<f64> {
    let score = categories[name]["score"].as_f64()?;
    Some((score * 100.0 * 100.0).round() / 100.0)
}
