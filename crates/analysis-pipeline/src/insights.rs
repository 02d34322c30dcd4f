use std::time::Duration;

use page_audit::PageMetrics;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::config::PipelineConfig;

const INSIGHT_PROMPT: &str = "You are an expert SEO consultant. Analyze the following website \
metrics:\n{data}\n\nOutput strictly valid JSON with two keys:\n\
1. \"summary\": a two-sentence executive summary of the site's SEO health.\n\
2. \"suggestions\": a list of three specific, actionable technical improvements.\n\n\
Do not wrap the JSON in markdown fencing. Return the raw JSON only.";

#[derive(Debug, Error)]
pub enum InsightError {
    #[error("Insight API key is not configured")]
    MissingApiKey,
    #[error("Failed to call insight API: {0}")]
    RequestFailed(String),
    #[error("Failed to parse insight response: {0}")]
    MalformedResponse(String),
}

/// Natural-language augmentation of a metric set: a short summary plus
/// actionable suggestions, already flattened to display strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageInsights {
    pub summary: String,
    pub suggestions: Vec<String>,
}

impl PageInsights {
    pub fn unavailable() -> Self {
        Self {
            summary: "AI analysis temporarily unavailable".to_string(),
            suggestions: vec!["Please try again later".to_string()],
        }
    }
}

/// The model returns suggestions either as plain strings or as
/// title/description objects; both decode here and flatten at this
/// boundary, never at display time.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Suggestion {
    PlainText(String),
    Structured {
        #[serde(default)]
        title: String,
        #[serde(default)]
        description: String,
    },
}

pub fn flatten_suggestion(suggestion: Suggestion) -> String {
    match suggestion {
        Suggestion::PlainText(text) => text,
        Suggestion::Structured { title, description } => {
            if title.is_empty() {
                description
            } else {
                format!("{title}: {description}")
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawInsights {
    summary: String,
    #[serde(default)]
    suggestions: Vec<Suggestion>,
}

/// Parses the model's text output, tolerating the markdown fencing it was
/// told not to emit.
pub fn parse_insight_payload(text: &str) -> Result<PageInsights, InsightError> {
    let cleaned = text.replace("```json", "").replace("```", "");
    let raw: RawInsights = serde_json::from_str(cleaned.trim())
        .map_err(|e| InsightError::MalformedResponse(e.to_string()))?;

    Ok(PageInsights {
        summary: raw.summary,
        suggestions: raw.suggestions.into_iter().map(flatten_suggestion).collect(),
    })
}

#[derive(Clone)]
pub struct InsightClient {
    client: Client,
    api_key: Option<String>,
    endpoint: String,
    model: String,
    timeout: Duration,
}

impl InsightClient {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: config.insight_api_key.clone(),
            endpoint: config.insight_endpoint.clone(),
            model: config.insight_model.clone(),
            timeout: Duration::from_secs(config.insight_timeout_secs),
        }
    }

    pub async fn generate(&self, metrics: &PageMetrics) -> Result<PageInsights, InsightError> {
        let api_key = self.api_key.as_deref().ok_or(InsightError::MissingApiKey)?;

        let metrics_json = serde_json::to_string_pretty(metrics)
            .map_err(|e| InsightError::MalformedResponse(e.to_string()))?;
        let prompt = INSIGHT_PROMPT.replace("{data}", &metrics_json);

        let request = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": { "temperature": 0.7 }
        });

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.endpoint, self.model, api_key
        );
        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| InsightError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(InsightError::RequestFailed(format!(
                "insight API returned status {}",
                response.status()
            )));
        }

        let data: serde_json::Value = response
            .json()
            .await
            .map_err(|e| InsightError::MalformedResponse(e.to_string()))?;

        let text = data["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| {
                InsightError::MalformedResponse("no text candidate in response".to_string())
            })?;

        parse_insight_payload(text)
    }

    /// Augmentation must never abort report creation: any failure collapses
    /// into the placeholder result.
    pub async fn generate_or_placeholder(&self, metrics: &PageMetrics) -> PageInsights {
        match self.generate(metrics).await {
            Ok(insights) => insights,
            Err(e) => {
                tracing::warn!(error = %e, "insight generation unavailable, using placeholder");
                PageInsights::unavailable()
            }
        }
    }
}
