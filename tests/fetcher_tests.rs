// HttpFetcher against a mock report API

use httpmock::prelude::*;
use serverdash::config::ApiConfig;
use serverdash::error::FetchError;
use serverdash::fetcher::{Fetcher, HttpFetcher};

const OVERVIEW_BODY: &str = r#"{
  "Server": [
    {"id": 1, "serverName": "web-01", "ipAddresses": ["10.0.0.1", "10.0.1.1"], "osType": "Ubuntu 22.04"},
    {"id": 2, "serverName": "db-01", "ipAddresses": [], "osType": "Rocky 9"}
  ],
  "Health": [
    {"serverTime": "2024-10-01T08:00:00.000Z", "serverId": 1, "cpuUsage": 12.345, "ramUsage": 67.8,
     "partitions": [{"partition": "/", "usage": 40.25}, {"partition": "/data", "usage": 91}]}
  ]
}"#;

fn fetcher_for(server: &MockServer) -> HttpFetcher {
    HttpFetcher::new(&ApiConfig {
        base_url: server.base_url(),
        request_timeout_ms: 2000,
    })
    .unwrap()
}

#[tokio::test]
async fn fetch_overview_parses_servers_and_health() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/data/cloudeka");
            then.status(200)
                .header("content-type", "application/json")
                .body(OVERVIEW_BODY);
        })
        .await;

    let overview = fetcher_for(&server).fetch_overview("cloudeka").await.unwrap();
    mock.assert_async().await;

    assert_eq!(overview.servers.len(), 2);
    assert_eq!(overview.servers[0].name, "web-01");
    assert_eq!(overview.servers[0].ip_addresses, ["10.0.0.1", "10.0.1.1"]);
    let h = &overview.healths[0];
    assert_eq!(h.server_id, 1);
    assert_eq!(h.cpu_usage_percent, 12.345);
    assert_eq!(h.ram_usage_percent, 67.8);
    let names: Vec<_> = h.partitions.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["/", "/data"]);
    assert_eq!(h.partitions[1].usage_percent, 91.0);
}

#[tokio::test]
async fn fetch_history_hits_per_server_path() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/health/server-7/health");
            then.status(200)
                .header("content-type", "application/json")
                .body(
                    r#"[
                      {"serverTime": "2024-10-01T08:00:00Z", "serverId": 7, "cpuUsage": 1.5, "ramUsage": 2.5, "partitions": []},
                      {"serverTime": "2024-10-01T09:00:00Z", "serverId": 7, "cpuUsage": 3.5, "ramUsage": 4.5, "partitions": []}
                    ]"#,
                );
        })
        .await;

    let history = fetcher_for(&server).fetch_history(7).await.unwrap();
    mock.assert_async().await;
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].cpu_usage_percent, 3.5);
    assert!(history[0].observed_at < history[1].observed_at);
}

#[tokio::test]
async fn non_success_status_is_transport_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/data/samrat");
            then.status(503);
        })
        .await;

    let err = fetcher_for(&server).fetch_overview("samrat").await.unwrap_err();
    assert!(err.is_transport());
    match err {
        FetchError::Transport { status } => assert_eq!(status.as_u16(), 503),
        other => panic!("expected Transport, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_parse_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/data/samrat");
            then.status(200).body("<html>oops</html>");
        })
        .await;

    let err = fetcher_for(&server).fetch_overview("samrat").await.unwrap_err();
    assert!(matches!(err, FetchError::Parse(_)));
    assert!(!err.is_transport());
}

#[tokio::test]
async fn unreachable_api_is_request_error() {
    let fetcher = HttpFetcher::new(&ApiConfig {
        base_url: "http://127.0.0.1:1".into(),
        request_timeout_ms: 500,
    })
    .unwrap();
    let err = fetcher.fetch_overview("cloudeka").await.unwrap_err();
    assert!(matches!(err, FetchError::Request(_)));
}
