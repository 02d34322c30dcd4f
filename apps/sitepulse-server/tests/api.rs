use std::convert::Infallible;
use std::net::SocketAddr;
use std::time::Duration;

use analysis_pipeline::{AnalysisPipeline, EnrichmentQueue, PagespeedClient, PipelineConfig};
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body as HyperBody, Response, Server};
use report_store::ReportStore;
use serde_json::Value;
use tower::util::ServiceExt;

use sitepulse_server::build_router;
use sitepulse_server::config::AppConfig;
use sitepulse_server::state::AppState;

const TEST_API_KEY: &str = "test-internal-key";

const SITE_HTML: &str = r#"
    <html><head>
        <title>A page with a reasonably descriptive title</title>
        <meta name="description" content="short description">
        <meta name="viewport" content="width=device-width">
    </head><body>
        <h1>Welcome</h1>
        <p>Some page content to score</p>
        <a href="/about">about</a>
    </body></html>
"#;

async fn start_site_server() -> SocketAddr {
    let addr = SocketAddr::from(([127, 0, 0, 1], 0));
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let make_svc = make_service_fn(move |_conn| async move {
        Ok::<_, Infallible>(service_fn(move |req| async move {
            match req.uri().path() {
                "/" => Ok::<_, Infallible>(Response::new(HyperBody::from(SITE_HTML))),
                "/runPagespeed" => {
                    let body = serde_json::json!({
                        "lighthouseResult": {
                            "categories": {
                                "performance": { "score": 0.9 },
                                "accessibility": { "score": 0.9 },
                                "seo": { "score": 0.9 },
                                "best-practices": { "score": 0.9 }
                            }
                        }
                    });
                    Ok(Response::new(HyperBody::from(body.to_string())))
                }
                _ => Ok(Response::builder()
                    .status(hyper::StatusCode::NOT_FOUND)
                    .body(HyperBody::from("404"))
                    .unwrap()),
            }
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

async fn test_state(site_addr: SocketAddr, rate_limit_per_minute: usize) -> AppState {
    let store = ReportStore::connect("sqlite::memory:").await.unwrap();
    store.migrate().await.unwrap();

    let pipeline_config = PipelineConfig {
        pagespeed_endpoint: format!("http://{}/runPagespeed", site_addr),
        ..PipelineConfig::default()
    };
    let config = AppConfig {
        port: 0,
        database_url: "sqlite::memory:".to_string(),
        environment: "test".to_string(),
        internal_api_key: Some(TEST_API_KEY.to_string()),
        guest_retention_hours: 24,
        rate_limit_per_minute,
        pipeline: pipeline_config.clone(),
    };

    let queue = EnrichmentQueue::start(store.clone(), PagespeedClient::new(&pipeline_config));
    let pipeline = AnalysisPipeline::new(&pipeline_config, store.clone(), queue).unwrap();
    AppState::new(config, store, pipeline)
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn get(path: &str) -> Request<Body> {
    Request::builder()
        .uri(path)
        .header("x-internal-api-key", TEST_API_KEY)
        .body(Body::empty())
        .unwrap()
}

fn get_with_token(path: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(path)
        .header("x-internal-api-key", TEST_API_KEY)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

fn post_analyze(url: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/v1/analyze")
        .header("x-internal-api-key", TEST_API_KEY)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(
            serde_json::json!({ "url": url }).to_string(),
        ))
        .unwrap()
}

#[tokio::test]
async fn test_root_and_health() {
    let site = start_site_server().await;
    let router = build_router(test_state(site, 30).await);

    let (status, body) = send(
        &router,
        Request::builder().uri("/").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "SitePulse API");
    assert_eq!(body["status"], "running");

    let (status, body) = send(
        &router,
        Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "healthy");
}

#[tokio::test]
async fn test_api_requires_internal_key() {
    let site = start_site_server().await;
    let router = build_router(test_state(site, 30).await);

    let (status, body) = send(
        &router,
        Request::builder()
            .uri("/api/v1/admin/guest-report-stats")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].as_str().unwrap().contains("internal API key"));

    let (status, _) = send(
        &router,
        Request::builder()
            .uri("/api/v1/admin/guest-report-stats")
            .header("x-internal-api-key", "wrong")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_guest_analysis_and_polling() {
    let site = start_site_server().await;
    let router = build_router(test_state(site, 1000).await);
    let site_url = format!("http://{}/", site);

    let (status, report) = send(&router, post_analyze(&site_url, None)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(report["user_id"], Value::Null);
    assert_eq!(report["pagespeed_status"], "pending");
    assert_eq!(report["pagespeed_performance"], Value::Null);
    assert_eq!(report["url"], site_url.as_str());
    assert!(report["seo_score"].as_i64().unwrap() <= 100);

    // Anyone may poll a guest report by ID until the detached job lands.
    let id = report["id"].as_i64().unwrap();
    let mut completed = None;
    for _ in 0..100 {
        let (status, current) = send(&router, get(&format!("/api/v1/reports/{id}"))).await;
        assert_eq!(status, StatusCode::OK);
        if current["pagespeed_status"] == "completed" {
            completed = Some(current);
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    let completed = completed.expect("enrichment never completed");
    assert_eq!(completed["pagespeed_performance"].as_f64().unwrap(), 90.0);
}

#[tokio::test]
async fn test_analyze_unreachable_url_is_bad_request() {
    let site = start_site_server().await;
    let router = build_router(test_state(site, 1000).await);

    let (status, body) = send(&router, post_analyze("http://127.0.0.1:1/", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Failed to fetch"));

    let (status, _) = send(&router, post_analyze("not-a-url", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_report_access_control() {
    let site = start_site_server().await;
    let state = test_state(site, 1000).await;
    let store = state.store.clone();
    let router = build_router(state);
    let site_url = format!("http://{}/", site);

    store.create_user("a@example.com", "token-a").await.unwrap();
    store.create_user("b@example.com", "token-b").await.unwrap();

    let (status, report) = send(&router, post_analyze(&site_url, Some("token-a"))).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = report["id"].as_i64().unwrap();
    assert!(report["user_id"].as_i64().is_some());

    // Owner reads it back.
    let (status, _) = send(&router, get_with_token(&format!("/api/v1/reports/{id}"), "token-a")).await;
    assert_eq!(status, StatusCode::OK);

    // Anonymous access to an owned report is unauthorized.
    let (status, _) = send(&router, get(&format!("/api/v1/reports/{id}"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // A different principal is forbidden.
    let (status, _) = send(&router, get_with_token(&format!("/api/v1/reports/{id}"), "token-b")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Unknown reports are a 404 for everyone.
    let (status, _) = send(&router, get_with_token("/api/v1/reports/99999", "token-a")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reports_listing_requires_auth() {
    let site = start_site_server().await;
    let router = build_router(test_state(site, 1000).await);

    let (status, _) = send(&router, get("/api/v1/reports")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&router, get_with_token("/api/v1/reports", "unknown-token")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_history_endpoints() {
    let site = start_site_server().await;
    let state = test_state(site, 1000).await;
    let store = state.store.clone();
    let router = build_router(state);
    let site_url = format!("http://{}/", site);

    store.create_user("c@example.com", "token-c").await.unwrap();

    for _ in 0..2 {
        let (status, _) = send(&router, post_analyze(&site_url, Some("token-c"))).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, history) = send(&router, get_with_token("/api/v1/history/unique", "token-c")).await;
    assert_eq!(status, StatusCode::OK);
    let entries = history.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["url"], site_url.as_str());
    assert_eq!(entries[0]["report_count"], 2);

    let (status, reports) = send(
        &router,
        get_with_token(&format!("/api/v1/history/by-url?url={site_url}"), "token-c"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reports.as_array().unwrap().len(), 2);

    let (status, _) = send(
        &router,
        get_with_token("/api/v1/history/by-url?url=http://nowhere.example/", "token-c"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cleanup_dry_run_then_delete() {
    let site = start_site_server().await;
    let router = build_router(test_state(site, 1000).await);
    let site_url = format!("http://{}/", site);

    let (status, report) = send(&router, post_analyze(&site_url, None)).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = report["id"].as_i64().unwrap();

    // Zero retention makes the fresh guest report immediately eligible.
    let dry_run = Request::builder()
        .method("POST")
        .uri("/api/v1/admin/cleanup-guest-reports?retention_hours=0&dry_run=true")
        .header("x-internal-api-key", TEST_API_KEY)
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&router, dry_run).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cleanup"]["deleted_count"], 1);
    assert_eq!(body["cleanup"]["dry_run"], true);

    // Dry run deleted nothing.
    let (status, _) = send(&router, get(&format!("/api/v1/reports/{id}"))).await;
    assert_eq!(status, StatusCode::OK);

    let sweep = Request::builder()
        .method("POST")
        .uri("/api/v1/admin/cleanup-guest-reports?retention_hours=0")
        .header("x-internal-api-key", TEST_API_KEY)
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&router, sweep).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cleanup"]["deleted_count"], 1);
    assert_eq!(body["stats_after"]["total_guest_reports"], 0);

    let (status, _) = send(&router, get(&format!("/api/v1/reports/{id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_rate_limit() {
    let site = start_site_server().await;
    let router = build_router(test_state(site, 2).await);

    for _ in 0..2 {
        let (status, _) = send(&router, get("/api/v1/admin/guest-report-stats")).await;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, body) = send(&router, get("/api/v1/admin/guest-report-stats")).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert!(body["error"].as_str().unwrap().contains("Rate limit"));

    // Exempt paths keep responding.
    let (status, _) = send(
        &router,
        Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}
