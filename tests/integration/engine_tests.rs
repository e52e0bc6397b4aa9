use crate::common::{create_test_config, mount_robots, refused_origin};
use robots_warden::{ComplianceCache, ComplianceEngine, HttpPolicyFetcher};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn engine() -> ComplianceEngine {
    ComplianceEngine::from_config(&create_test_config(2000)).expect("Failed to build engine")
}

fn robots(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_string(body)
}

#[tokio::test]
async fn test_allow_and_disallow_over_http() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_robots(
        &mock_server,
        robots("User-agent: *\nAllow: /allowed\nDisallow: /disallowed"),
        1,
    )
    .await;

    let engine = engine();

    assert!(engine.is_url_allowed(&format!("{}/allowed", base_url)).await);
    assert!(!engine.is_url_allowed(&format!("{}/disallowed", base_url)).await);
    assert!(engine.is_url_allowed(&format!("{}/elsewhere", base_url)).await);
}

#[tokio::test]
async fn test_crawl_delay_over_http() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, robots("User-agent: *\nCrawl-delay: 5"), 1).await;

    let engine = engine();

    assert_eq!(
        engine.crawl_delay(&format!("{}/page", mock_server.uri())).await,
        Duration::from_millis(5000)
    );
}

#[tokio::test]
async fn test_missing_robots_allows_all() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, ResponseTemplate::new(404), 1).await;

    let engine = engine();
    let url = format!("{}/anything/at/all", mock_server.uri());

    assert!(engine.is_url_allowed(&url).await);
    assert_eq!(engine.crawl_delay(&url).await, Duration::from_millis(1000));
}

#[tokio::test]
async fn test_server_error_blocks_all() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, ResponseTemplate::new(500), 1).await;

    let engine = engine();
    let base_url = mock_server.uri();

    assert!(!engine.is_url_allowed(&format!("{}/", base_url)).await);
    assert!(!engine.is_url_allowed(&format!("{}/public", base_url)).await);
    assert_eq!(
        engine.crawl_delay(&format!("{}/", base_url)).await,
        Duration::from_millis(1000)
    );
}

#[tokio::test]
async fn test_unreachable_host_blocks_all() {
    let engine = engine();
    let url = format!("{}/page", refused_origin());

    assert!(!engine.is_url_allowed(&url).await);
    assert_eq!(engine.crawl_delay(&url).await, Duration::from_millis(1000));
    assert_eq!(engine.cache_size(), 1);
}

#[tokio::test]
async fn test_one_fetch_per_host() {
    let mock_server = MockServer::start().await;
    // Verified when the mock server is dropped
    mount_robots(&mock_server, robots("User-agent: *\nCrawl-delay: 2"), 1).await;

    let engine = engine();
    let url = format!("{}/page", mock_server.uri());

    engine.crawl_delay(&url).await;
    engine.crawl_delay(&url).await;
    engine.is_url_allowed(&url).await;

    assert_eq!(engine.cache_size(), 1);
    let received = mock_server.received_requests().await.unwrap_or_default();
    assert_eq!(received.len(), 1);
}

#[tokio::test]
async fn test_clear_cache_refetches() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, robots("User-agent: *\nDisallow: /private"), 2).await;

    let engine = engine();
    let url = format!("{}/private/page", mock_server.uri());

    assert!(!engine.is_url_allowed(&url).await);
    assert_eq!(engine.cache_size(), 1);

    engine.clear_cache();
    assert_eq!(engine.cache_size(), 0);

    assert!(!engine.is_url_allowed(&url).await);
    assert_eq!(engine.cache_size(), 1);
}

#[tokio::test]
async fn test_two_hosts_two_entries() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;
    mount_robots(&first, robots("User-agent: *\nDisallow: /"), 1).await;
    mount_robots(&second, ResponseTemplate::new(404), 1).await;

    let engine = engine();

    assert!(!engine.is_url_allowed(&format!("{}/page", first.uri())).await);
    assert!(engine.is_url_allowed(&format!("{}/page", second.uri())).await);
    assert_eq!(engine.cache_size(), 2);
}

#[tokio::test]
async fn test_concurrent_workers_share_cache() {
    let mock_server = MockServer::start().await;
    // Racing misses may fetch more than once
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(robots("User-agent: *\nDisallow: /private\nCrawl-delay: 1"))
        .expect(1u64..)
        .mount(&mock_server)
        .await;

    let engine = Arc::new(engine());
    let base_url = mock_server.uri();

    let mut workers = tokio::task::JoinSet::new();
    for i in 0..16 {
        let engine = Arc::clone(&engine);
        let base_url = base_url.clone();
        workers.spawn(async move {
            let public = engine.is_url_allowed(&format!("{}/item/{}", base_url, i)).await;
            let private = engine.is_url_allowed(&format!("{}/private/{}", base_url, i)).await;
            (public, private)
        });
    }

    while let Some(result) = workers.join_next().await {
        let (public, private) = result.expect("Worker panicked");
        assert!(public);
        assert!(!private);
    }

    assert_eq!(engine.cache_size(), 1);
}

#[tokio::test]
async fn test_engines_share_injected_cache() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, robots("User-agent: *\nDisallow: /x"), 1).await;

    let config = create_test_config(2000);
    let cache = Arc::new(ComplianceCache::new());
    let first = ComplianceEngine::with_cache(
        HttpPolicyFetcher::new(&config).expect("Failed to build fetcher"),
        Arc::clone(&cache),
    );
    let second = ComplianceEngine::with_cache(
        HttpPolicyFetcher::new(&config).expect("Failed to build fetcher"),
        Arc::clone(&cache),
    );

    let url = format!("{}/x/y", mock_server.uri());
    assert!(!first.is_url_allowed(&url).await);
    assert!(!second.is_url_allowed(&url).await);

    assert_eq!(cache.len(), 1);
    assert!(cache.age(&mock_server.uri()).is_some());
}
