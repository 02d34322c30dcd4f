use report_store::ReportStore;
use tokio::sync::mpsc;

use crate::pagespeed::PagespeedClient;

const QUEUE_DEPTH: usize = 64;

/// Unit of detached work scheduled after a report has been persisted.
#[derive(Debug, Clone)]
pub struct EnrichmentJob {
    pub report_id: i32,
    pub url: String,
}

/// Handle for enqueuing enrichment jobs. The worker task behind it runs
/// until the process exits; no caller ever awaits a job's outcome.
#[derive(Clone)]
pub struct EnrichmentQueue {
    tx: mpsc::Sender<EnrichmentJob>,
}

impl EnrichmentQueue {
    /// Spawns the worker with its own store handle; the queue only hands
    /// jobs over.
    pub fn start(store: ReportStore, client: PagespeedClient) -> Self {
        let (tx, mut rx) = mpsc::channel::<EnrichmentJob>(QUEUE_DEPTH);

        tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                run_job(&store, &client, job).await;
            }
            tracing::debug!("enrichment queue closed");
        });

        Self { tx }
    }

    pub async fn enqueue(&self, job: EnrichmentJob) {
        tracing::info!(report_id = job.report_id, "scheduling pagespeed enrichment");
        if self.tx.send(job).await.is_err() {
            tracing::error!("enrichment worker is gone, dropping job");
        }
    }
}

/// One enrichment pass: a safe-mode fetch followed by exactly one report
/// update. A fetch that yields no scores still completes the report; only
/// a failing update flips it to failed.
async fn run_job(store: &ReportStore, client: &PagespeedClient, job: EnrichmentJob) {
    let scores = client.fetch_scores_safe(&job.url).await;

    match store.complete_enrichment(job.report_id, scores.into()).await {
        Ok(true) => {
            tracing::info!(report_id = job.report_id, "pagespeed metrics stored");
        }
        Ok(false) => {
            tracing::warn!(report_id = job.report_id, "report gone before enrichment");
        }
        Err(e) => {
            tracing::error!(report_id = job.report_id, error = %e, "failed to store pagespeed metrics");
            if let Err(e) = store.mark_enrichment_failed(job.report_id).await {
                tracing::error!(report_id = job.report_id, error = %e, "failed to record enrichment failure");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use hyper::service::{make_service_fn, service_fn};
    use hyper::{Body, Response, Server};
    use page_audit::PageMetrics;
    use report_store::NewReport;
    use report_store::enums::pagespeed_status::PagespeedStatus;
    use std::convert::Infallible;
    use std::net::SocketAddr;
    use std::time::Duration;

    async fn start_pagespeed_server() -> SocketAddr {
        let addr = SocketAddr::from(([127, 0, 0, 1], 0));
        let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
        let addr = listener.local_addr().unwrap();

        let make_svc = make_service_fn(move |_conn| async move {
            Ok::<_, Infallible>(service_fn(move |_req| async move {
                let body = serde_json::json!({
                    "lighthouseResult": {
                        "categories": {
                            "performance": { "score": 0.9 },
                            "accessibility": { "score": 0.8 },
                            "seo": { "score": 0.7 },
                            "best-practices": { "score": 0.6 }
                        }
                    }
                });
                Ok::<_, Infallible>(Response::new(Body::from(body.to_string())))
            }))
        });

        tokio::spawn(async move {
            Server::from_tcp(listener.into_std().unwrap())
                .unwrap()
                .serve(make_svc)
                .await
                .unwrap();
        });

        addr
    }

    fn bare_metrics(url: &str) -> PageMetrics {
        PageMetrics {
            url: url.to_string(),
            title: "t".to_string(),
            meta_description: None,
            h1_count: 0,
            h2_count: 0,
            image_count: 0,
            missing_alt_count: 0,
            word_count: 0,
            internal_links_count: 0,
            external_links_count: 0,
            canonical_url: None,
            og_tags_present: false,
            schema_present: false,
            has_meta_viewport: false,
            robots_txt_exists: false,
            sitemap_exists: false,
            top_keywords: vec![],
            load_time: 0.0,
            seo_score: 30,
        }
    }

    async fn wait_for_status(
        store: &ReportStore,
        report_id: i32,
        expected: PagespeedStatus,
    ) -> report_store::entities::report::Model {
        for _ in 0..100 {
            let report = store.find_report(report_id).await.unwrap().unwrap();
            if report.pagespeed_status == expected {
                return report;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("report {report_id} never reached {expected:?}");
    }

    #[tokio::test]
    async fn test_worker_completes_report() {
        let store = ReportStore::connect("sqlite::memory:").await.unwrap();
        store.migrate().await.unwrap();

        let addr = start_pagespeed_server().await;
        let config = PipelineConfig {
            pagespeed_endpoint: format!("http://{}/runPagespeed", addr),
            ..PipelineConfig::default()
        };
        let queue = EnrichmentQueue::start(store.clone(), PagespeedClient::new(&config));

        let report = store
            .create_report(NewReport {
                url: "https://example.com/".to_string(),
                user_id: None,
                metrics: bare_metrics("https://example.com/"),
                ai_summary: "s".to_string(),
                ai_suggestions: vec![],
            })
            .await
            .unwrap();
        assert_eq!(report.pagespeed_status, PagespeedStatus::Pending);

        queue
            .enqueue(EnrichmentJob {
                report_id: report.id,
                url: report.url.clone(),
            })
            .await;

        let enriched = wait_for_status(&store, report.id, PagespeedStatus::Completed).await;
        assert_eq!(enriched.pagespeed_performance, Some(90.0));
        assert_eq!(enriched.pagespeed_best_practices, Some(60.0));
    }

    #[tokio::test]
    async fn test_worker_completes_with_empty_scores_on_fetch_failure() {
        let store = ReportStore::connect("sqlite::memory:").await.unwrap();
        store.migrate().await.unwrap();

        // Nothing listens here; the safe-mode fetch yields empty scores.
        let config = PipelineConfig {
            pagespeed_endpoint: "http://127.0.0.1:1/runPagespeed".to_string(),
            pagespeed_timeout_secs: 1,
            ..PipelineConfig::default()
        };
        let queue = EnrichmentQueue::start(store.clone(), PagespeedClient::new(&config));

        let report = store
            .create_report(NewReport {
                url: "https://unreachable.example/".to_string(),
                user_id: None,
                metrics: bare_metrics("https://unreachable.example/"),
                ai_summary: "s".to_string(),
                ai_suggestions: vec![],
            })
            .await
            .unwrap();

        queue
            .enqueue(EnrichmentJob {
                report_id: report.id,
                url: report.url.clone(),
            })
            .await;

        let enriched = wait_for_status(&store, report.id, PagespeedStatus::Completed).await;
        assert_eq!(enriched.pagespeed_performance, None);
        assert_eq!(enriched.pagespeed_accessibility, None);
        assert_eq!(enriched.pagespeed_seo, None);
        assert_eq!(enriched.pagespeed_best_practices, None);
    }
}
