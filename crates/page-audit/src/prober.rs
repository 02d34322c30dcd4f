use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tokio::time::Instant;
use url::Url;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; SitePulse/1.0)";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Invalid URL: {0}")]
    InvalidTarget(String),
    #[error("Failed to fetch URL: {0}")]
    FetchFailed(String),
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    pub probe_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            probe_timeout_secs: DEFAULT_PROBE_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Raw document returned by a successful page fetch. `load_time` is the
/// elapsed wall time until response headers arrived, in seconds.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: Url,
    pub body: String,
    pub load_time: f64,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct WellKnownProbes {
    pub robots_txt: bool,
    pub sitemap_xml: bool,
}

#[derive(Debug, Clone)]
pub struct SiteProber {
    page_client: Client,
    probe_client: Client,
}

impl SiteProber {
    pub fn new(config: &FetchConfig) -> Result<Self, ProbeError> {
        let page_client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProbeError::FetchFailed(e.to_string()))?;

        let probe_client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.probe_timeout_secs))
            .build()
            .map_err(|e| ProbeError::FetchFailed(e.to_string()))?;

        Ok(Self {
            page_client,
            probe_client,
        })
    }

    /// Validates that a submitted URL carries both a scheme and a host.
    /// Runs before any network access.
    pub fn parse_target(url: &str) -> Result<Url, ProbeError> {
        let target =
            Url::parse(url).map_err(|e| ProbeError::InvalidTarget(format!("{url}: {e}")))?;
        if target.host_str().is_none() {
            return Err(ProbeError::InvalidTarget(format!("{url}: missing host")));
        }
        Ok(target)
    }

    pub async fn fetch(&self, url: &str) -> Result<FetchedPage, ProbeError> {
        let target = Self::parse_target(url)?;
        let start = Instant::now();

        let response = self
            .page_client
            .get(target.clone())
            .send()
            .await
            .map_err(|e| ProbeError::FetchFailed(e.to_string()))?;
        let load_time = round2(start.elapsed().as_secs_f64());

        if !response.status().is_success() {
            tracing::warn!(url = %target, status = %response.status(), "non-success response");
            return Err(ProbeError::FetchFailed(format!(
                "{} returned status {}",
                target,
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProbeError::FetchFailed(e.to_string()))?;

        Ok(FetchedPage {
            url: target,
            body,
            load_time,
        })
    }

    /// Lightweight existence check: HEAD request, success = any 2xx response.
    /// Never fails; any error counts as absent.
    pub async fn probe_exists(&self, url: &str) -> bool {
        let Ok(target) = Url::parse(url) else {
            return false;
        };
        match self.probe_client.head(target).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    pub async fn probe_well_known(&self, base: &Url) -> WellKnownProbes {
        let robots_url = base.join("/robots.txt").map(String::from);
        let sitemap_url = base.join("/sitemap.xml").map(String::from);

        let (robots_txt, sitemap_xml) = futures::join!(
            async {
                match &robots_url {
                    Ok(url) => self.probe_exists(url).await,
                    Err(_) => false,
                }
            },
            async {
                match &sitemap_url {
                    Ok(url) => self.probe_exists(url).await,
                    Err(_) => false,
                }
            },
        );

        WellKnownProbes {
            robots_txt,
            sitemap_xml,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
