//! Integration tests for the site crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use company_harvester::crawler::{
    CrawlOptions, Fetcher, FetcherOptions, PageFetcher, RetryPolicy, RetryingFetcher, SiteCrawler,
};
use company_harvester::output::SiteLayout;
use company_harvester::url::page_filename;
use company_harvester::{FetchError, HarvestError};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><head><title>Test</title></head><body>{}</body></html>", body))
        .insert_header("content-type", "text/html")
}

async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .mount(server)
        .await;
}

fn fast_retry_fetcher() -> Arc<dyn PageFetcher> {
    let fetcher = Fetcher::new(&FetcherOptions::default()).expect("Failed to build client");
    let policy = RetryPolicy::new(3, Duration::from_millis(10), Duration::from_millis(50));
    Arc::new(RetryingFetcher::new(fetcher, policy))
}

fn crawl_options(max_depth: u32) -> CrawlOptions {
    CrawlOptions {
        max_depth,
        concurrency: 4,
        exclusion_selectors: vec!["header".to_string(), "footer".to_string()],
        deadline: None,
    }
}

fn crawler(max_depth: u32) -> SiteCrawler {
    SiteCrawler::new(fast_retry_fetcher(), crawl_options(max_depth))
}

fn redirect_to(location: &str) -> ResponseTemplate {
    ResponseTemplate::new(302).insert_header("location", location)
}

fn layout(dir: &TempDir) -> SiteLayout {
    SiteLayout::new(dir.path().join("site_scraped_data"), "site")
}

fn start_url(server: &MockServer) -> Url {
    Url::parse(&format!("{}/", server.uri())).expect("Failed to parse base URL")
}

fn saved_files(dir: PathBuf) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

#[tokio::test]
async fn test_cycle_terminates_with_each_page_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(r#"<a href="/a">A</a>"#))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html(r#"<a href="/b">B</a><a href="/a#again">Self</a>"#))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(html(r#"<a href="/a">A</a><a href="/">Home</a>"#))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let layout = layout(&dir);
    let report = crawler(5).crawl(&start_url(&server), &layout).await.unwrap();

    assert_eq!(report.pages.len(), 3);
    assert_eq!(report.visited, 3);
    assert!(report.failures.is_empty());
    assert_eq!(saved_files(layout.htmls_dir()).len(), 3);
}

#[tokio::test]
async fn test_max_depth_zero_fetches_only_start() {
    let server = MockServer::start().await;
    mount_page(&server, "/", r#"<a href="/about">About</a>"#).await;

    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(html("<p>About</p>"))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let report = crawler(0).crawl(&start_url(&server), &layout(&dir)).await.unwrap();

    assert_eq!(report.pages.len(), 1);
    assert_eq!(report.skipped_over_depth, 1);
}

#[tokio::test]
async fn test_cross_origin_links_not_fetched() {
    let server = MockServer::start().await;
    let port = start_url(&server).port().unwrap();

    // Same server, different host: a different origin
    mount_page(
        &server,
        "/",
        &format!(r#"<a href="http://localhost:{}/elsewhere">Elsewhere</a>"#, port),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/elsewhere"))
        .respond_with(html("<p>Nope</p>"))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let report = crawler(3).crawl(&start_url(&server), &layout(&dir)).await.unwrap();

    assert_eq!(report.pages.len(), 1);
    assert_eq!(report.skipped_cross_origin, 1);
}

#[tokio::test]
async fn test_documents_downloaded_not_parsed() {
    let server = MockServer::start().await;
    mount_page(&server, "/", r#"<a href="/files/Annual%20Report.PDF">Report</a>"#).await;

    // A document body that looks like HTML must not be traversed
    Mock::given(method("GET"))
        .and(path("/files/Annual%20Report.PDF"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(br#"<a href="/hidden">hidden</a>"#.to_vec())
                .insert_header("content-type", "application/pdf"),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/hidden"))
        .respond_with(html("<p>Hidden</p>"))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let layout = layout(&dir);
    let report = crawler(0).crawl(&start_url(&server), &layout).await.unwrap();

    assert_eq!(report.documents.len(), 1);
    assert_eq!(saved_files(layout.documents_dir()), vec!["Annual20Report.PDF"]);
}

#[tokio::test]
async fn test_recrawl_produces_identical_filenames() {
    let server = MockServer::start().await;
    mount_page(&server, "/", r#"<a href="/one">1</a><a href="/two">2</a>"#).await;
    mount_page(&server, "/one", "<p>One</p>").await;
    mount_page(&server, "/two", "<p>Two</p>").await;

    let first_dir = tempfile::tempdir().unwrap();
    let second_dir = tempfile::tempdir().unwrap();
    let first_layout = layout(&first_dir);
    let second_layout = layout(&second_dir);

    crawler(2).crawl(&start_url(&server), &first_layout).await.unwrap();
    crawler(2).crawl(&start_url(&server), &second_layout).await.unwrap();

    let first = saved_files(first_layout.htmls_dir());
    assert_eq!(first.len(), 3);
    assert_eq!(first, saved_files(second_layout.htmls_dir()));
    assert!(first.contains(&page_filename(&start_url(&server))));
}

#[tokio::test]
async fn test_broken_link_does_not_abort_crawl() {
    let server = MockServer::start().await;
    mount_page(&server, "/", r#"<a href="/missing">M</a><a href="/ok">OK</a>"#).await;
    mount_page(&server, "/ok", "<p>Fine</p>").await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let report = crawler(1).crawl(&start_url(&server), &layout(&dir)).await.unwrap();

    assert_eq!(report.pages.len(), 2);
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].url.ends_with("/missing"));
    assert!(report.failures[0].message.contains("404"));
}

#[tokio::test]
async fn test_exclusion_selectors_removed_from_saved_page() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<header>Brand banner</header><main>Main content</main><footer><a href="/legal">Legal</a></footer>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/legal"))
        .respond_with(html("<p>Legal</p>"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let layout = layout(&dir);
    let start = start_url(&server);
    crawler(1).crawl(&start, &layout).await.unwrap();

    let saved = std::fs::read_to_string(layout.htmls_dir().join(page_filename(&start))).unwrap();
    assert!(saved.contains("Main content"));
    assert!(!saved.contains("Brand banner"));
    assert!(!saved.contains("Legal"));
}

#[tokio::test]
async fn test_redirect_onto_visited_page_not_saved_twice() {
    let server = MockServer::start().await;
    mount_page(&server, "/", r#"<a href="/b">B</a><a href="/a">A</a>"#).await;
    mount_page(&server, "/b", "<p>B</p>").await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(redirect_to("/b"))
        .mount(&server)
        .await;

    let options = CrawlOptions {
        concurrency: 1,
        ..crawl_options(3)
    };
    let dir = tempfile::tempdir().unwrap();
    let layout = layout(&dir);
    let report = SiteCrawler::new(fast_retry_fetcher(), options)
        .crawl(&start_url(&server), &layout)
        .await
        .unwrap();

    assert_eq!(report.pages.len(), 2);
    assert_eq!(report.skipped_already_visited, 1);
    assert_eq!(saved_files(layout.htmls_dir()).len(), 2);
}

#[tokio::test]
async fn test_cross_origin_redirect_not_claimed() {
    let server = MockServer::start().await;
    let port = start_url(&server).port().unwrap();
    mount_page(&server, "/", r#"<a href="/r">R</a>"#).await;
    mount_page(&server, "/x", "<p>Elsewhere</p>").await;
    Mock::given(method("GET"))
        .and(path("/r"))
        .respond_with(redirect_to(&format!("http://localhost:{}/x", port)))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let layout = layout(&dir);
    let report = crawler(3).crawl(&start_url(&server), &layout).await.unwrap();

    assert_eq!(report.pages.len(), 1);
    assert_eq!(report.skipped_cross_origin, 1);
    // Only "/" and "/r" were ever in origin
    assert_eq!(report.visited, 2);
    assert_eq!(saved_files(layout.htmls_dir()).len(), 1);
}

#[tokio::test]
async fn test_start_redirect_becomes_crawl_origin() {
    let server = MockServer::start().await;
    let port = start_url(&server).port().unwrap();
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(redirect_to(&format!("http://localhost:{}/home", port)))
        .mount(&server)
        .await;
    mount_page(
        &server,
        "/home",
        &format!(
            r#"<a href="/about">About</a><a href="http://127.0.0.1:{}/legacy">Legacy</a>"#,
            port
        ),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(html("<p>About</p>"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/legacy"))
        .respond_with(html("<p>Legacy</p>"))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let layout = layout(&dir);
    let start = start_url(&server);
    let report = crawler(2).crawl(&start, &layout).await.unwrap();

    assert_eq!(report.pages.len(), 2);
    assert_eq!(report.skipped_cross_origin, 1);
    assert!(report.pages[1].url.as_str().starts_with("http://localhost:"));
    assert!(layout.htmls_dir().join(page_filename(&start)).is_file());
}

#[tokio::test]
async fn test_deadline_returns_partial_report() {
    let server = MockServer::start().await;
    mount_page(&server, "/", r#"<a href="/slow">Slow</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html("<p>Slow</p>").set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let options = CrawlOptions {
        deadline: Some(Duration::from_millis(300)),
        ..crawl_options(3)
    };
    let dir = tempfile::tempdir().unwrap();
    let started = std::time::Instant::now();
    let report = SiteCrawler::new(fast_retry_fetcher(), options)
        .crawl(&start_url(&server), &layout(&dir))
        .await
        .unwrap();

    assert!(report.cancelled);
    assert_eq!(report.pages.len(), 1);
    assert!(report.finished_at.is_some());
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_unwritable_output_is_fatal() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "<p>Home</p>").await;

    let dir = tempfile::tempdir().unwrap();
    let layout = layout(&dir);
    // A file where the output root directory should be
    std::fs::write(layout.root(), "not a directory").unwrap();

    let result = crawler(1).crawl(&start_url(&server), &layout).await;

    assert!(matches!(result, Err(HarvestError::Filesystem { .. })));
}

#[tokio::test]
async fn test_transient_error_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_page(&server, "/", "<p>Recovered</p>").await;

    let resource = fast_retry_fetcher().fetch(&start_url(&server)).await.unwrap();
    assert_eq!(resource.status, 200);
    assert!(resource.text().contains("Recovered"));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn test_not_found_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let url = start_url(&server).join("/gone").unwrap();
    let err = fast_retry_fetcher().fetch(&url).await.unwrap_err();

    assert!(matches!(err, FetchError::Status { status: 404, .. }));
}

#[tokio::test]
async fn test_retry_exhausted_after_three_attempts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/busy"))
        .respond_with(ResponseTemplate::new(429))
        .expect(3)
        .mount(&server)
        .await;

    let url = start_url(&server).join("/busy").unwrap();
    let err = fast_retry_fetcher().fetch(&url).await.unwrap_err();

    match err {
        FetchError::RetryExhausted { attempts, .. } => assert_eq!(attempts, 3),
        other => panic!("Expected RetryExhausted, got {:?}", other),
    }
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_plain_fetcher_reports_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/error"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let fetcher = Fetcher::new(&FetcherOptions::default()).unwrap();
    let url = start_url(&server).join("/error").unwrap();
    let err = fetcher.fetch(&url).await.unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert!(err.url().ends_with("/error"));
}
