//! Integration tests for normalization and the end-to-end harvest

use company_harvester::config::Config;
use company_harvester::normalize::{Normalizer, TextPipeline, HTML_EXTENSIONS, PDF_EXTENSIONS};
use company_harvester::output::SiteLayout;
use company_harvester::pipeline::{run_harvest, CareersOutcome, HarvestOptions};
use company_harvester::CareersReport;
use tokio_util::sync::CancellationToken;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn test_html_directory_normalized() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("page.html"),
        r#"<html><head><script>track()</script></head>
           <body><h1>The Welding Robots</h1><p>We are hiring engineers.</p></body></html>"#,
    )
    .unwrap();

    let pipeline = TextPipeline::new();
    let result = Normalizer::new(&pipeline, HTML_EXTENSIONS)
        .normalize_dir(dir.path())
        .unwrap();

    let words: Vec<&str> = result.text.split(' ').collect();
    assert!(words.contains(&"weld"));
    assert!(words.contains(&"robot"));
    assert!(words.contains(&"engin"));
    assert!(!words.contains(&"the"));
    assert!(!words.contains(&"we"));
    assert!(!result.text.contains("track"));
}

#[test]
fn test_unreadable_pdf_skipped() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("broken.pdf"), b"%PDF-1.4 truncated").unwrap();
    std::fs::write(dir.path().join("page.html"), "<p>not a pdf target</p>").unwrap();

    let pipeline = TextPipeline::new();
    let result = Normalizer::new(&pipeline, PDF_EXTENSIONS)
        .normalize_dir(dir.path())
        .unwrap();

    assert!(result.text.is_empty());
    assert!(result.files.is_empty());
    assert_eq!(result.failures.len(), 1);
}

#[test]
fn test_missing_directory_yields_empty_text() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = TextPipeline::new();
    let result = Normalizer::new(&pipeline, HTML_EXTENSIONS)
        .normalize_dir(&dir.path().join("htmls"))
        .unwrap();

    assert!(result.is_empty());
}

#[tokio::test]
async fn test_full_harvest_writes_every_output() {
    let server = MockServer::start().await;
    let page = |body: &str| {
        ResponseTemplate::new(200)
            .set_body_string(format!("<html><body>{}</body></html>", body))
            .insert_header("content-type", "text/html")
    };

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(page(r#"<p>Industrial robotics</p><a href="/careers">Careers</a>"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/careers"))
        .respond_with(page(r#"<p>Open positions</p><a href="/careers/dev">Developer</a>"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/careers/dev"))
        .respond_with(page("<p>Developers writing software</p>"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.output.root = dir.path().display().to_string();

    let seed = Url::parse(&format!("{}/", server.uri())).unwrap();
    let summary = run_harvest(
        &config,
        &seed,
        HarvestOptions::default(),
        None,
        CancellationToken::new(),
    )
    .await
    .unwrap();

    let layout = SiteLayout::for_seed(dir.path(), &seed);
    assert_eq!(summary.layout, layout);
    assert_eq!(summary.crawl.pages.len(), 3);
    assert!(matches!(
        summary.careers,
        CareersOutcome::Report(CareersReport::Found(_))
    ));

    let all_html = std::fs::read_to_string(layout.all_html_text()).unwrap();
    assert!(all_html.contains("robot"));
    assert!(all_html.contains("develop"));

    let careers = std::fs::read_to_string(layout.careers_text()).unwrap();
    assert!(careers.contains("softwar"));

    assert!(layout.documents_text().is_file());
    assert!(std::fs::read_to_string(layout.summary_path())
        .unwrap()
        .contains("## Site Crawl"));
}

#[tokio::test]
async fn test_harvest_without_careers_or_normalize() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>Home</p>"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.output.root = dir.path().display().to_string();

    let seed = Url::parse(&format!("{}/", server.uri())).unwrap();
    let options = HarvestOptions {
        skip_careers: true,
        skip_normalize: true,
    };
    let summary = run_harvest(&config, &seed, options, None, CancellationToken::new())
        .await
        .unwrap();

    assert!(matches!(summary.careers, CareersOutcome::Skipped));
    assert!(summary.normalized.is_empty());
    assert!(!summary.layout.all_html_text().exists());
    assert!(summary.layout.summary_path().is_file());
}

#[tokio::test]
async fn test_harvest_normalizes_downloaded_documents() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<p>Turbines</p><a href="/files/brochure.pdf">Brochure</a>"#),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/files/brochure.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.4 truncated".to_vec()))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.output.root = dir.path().display().to_string();

    let seed = Url::parse(&format!("{}/", server.uri())).unwrap();
    let options = HarvestOptions {
        skip_careers: true,
        skip_normalize: false,
    };
    let summary = run_harvest(&config, &seed, options, None, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(summary.crawl.documents.len(), 1);
    assert_eq!(summary.normalized.len(), 2);

    let documents = &summary.normalized[0];
    assert_eq!(documents.path, summary.layout.documents_text());
    assert_eq!(documents.files, 0);
    assert_eq!(documents.failures, 1);

    let pages = &summary.normalized[1];
    assert_eq!(pages.files, 1);
    assert!(std::fs::read_to_string(&pages.path).unwrap().contains("turbin"));
}
