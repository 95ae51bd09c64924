//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! fetch, extract, scope and emit cycle end-to-end over real HTTP.

use gossamer::config::{parse_headers, CrawlSettings};
use gossamer::crawler::{CrawlSupervisor, HtmlLinkExtractor, HttpFetcher};
use gossamer::output::{Deduplicator, MemorySink, OutputOptions};
use std::sync::Arc;
use std::time::{Duration, Instant};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds a supervisor that talks HTTP and records output in memory
fn create_supervisor(settings: CrawlSettings) -> (CrawlSupervisor, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let fetcher = HttpFetcher::new(&settings).expect("Failed to build fetcher");
    let supervisor = CrawlSupervisor::new(
        settings,
        Arc::new(fetcher),
        Arc::new(HtmlLinkExtractor::new()),
        Arc::new(Deduplicator::new(sink.clone())),
    );
    (supervisor, sink)
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body.to_string())
        .insert_header("content-type", "text/html")
}

fn sorted(mut lines: Vec<String>) -> Vec<String> {
    lines.sort();
    lines
}

#[tokio::test]
async fn test_full_crawl_single_domain() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(&format!(
            r#"<html><body>
            <a href="/page1">Page 1</a>
            <a href="{}/page2">Page 2</a>
            <a href="https://elsewhere.test/">Away</a>
            </body></html>"#,
            base_url
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page1"))
        .respond_with(html(r#"<script src="/app.js"></script><a href="/">Home</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(html(r#"<form action="/login"></form>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    let settings = CrawlSettings {
        max_depth: 1,
        ..Default::default()
    };
    let (supervisor, sink) = create_supervisor(settings);

    let summary = supervisor
        .run(vec![format!("{}/", base_url)])
        .await
        .expect("Crawl failed");

    assert_eq!(
        sorted(sink.lines()),
        sorted(vec![
            format!("{}/", base_url),
            format!("{}/app.js", base_url),
            format!("{}/login", base_url),
            format!("{}/page1", base_url),
            format!("{}/page2", base_url),
        ])
    );
    assert_eq!(summary.seeds_crawled, 1);
    assert_eq!(summary.results_emitted, 5);
    assert_eq!(summary.out_of_scope, 1);
}

#[tokio::test]
async fn test_depth_limit_stops_fetching() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(r#"<a href="/deep">Deep</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Emitted from the seed page but never requested
    Mock::given(method("GET"))
        .and(path("/deep"))
        .respond_with(html(r#"<a href="/deeper">Deeper</a>"#))
        .expect(0)
        .mount(&mock_server)
        .await;

    let settings = CrawlSettings {
        max_depth: 0,
        ..Default::default()
    };
    let (supervisor, sink) = create_supervisor(settings);

    supervisor
        .run(vec![format!("{}/", mock_server.uri())])
        .await
        .expect("Crawl failed");

    assert_eq!(sink.lines(), vec![format!("{}/deep", mock_server.uri())]);
}

#[tokio::test]
async fn test_server_error_page_is_not_parsed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500).set_body_string(r#"<a href="/hidden">x</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (supervisor, sink) = create_supervisor(CrawlSettings::default());

    let summary = supervisor
        .run(vec![format!("{}/", mock_server.uri())])
        .await
        .expect("Crawl failed");

    assert!(sink.lines().is_empty());
    assert_eq!(summary.fetch_failures, 1);
    assert_eq!(summary.non_ok_responses, 1);
    assert_eq!(summary.transport_failures, 0);
}

#[tokio::test]
async fn test_redirect_is_not_followed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(301)
                .insert_header("location", "/target")
                .set_body_string(r#"<a href="/from-redirect">x</a>"#),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/target"))
        .respond_with(html(r#"<a href="/after">x</a>"#))
        .expect(0)
        .mount(&mock_server)
        .await;

    let (supervisor, sink) = create_supervisor(CrawlSettings::default());

    supervisor
        .run(vec![format!("{}/", mock_server.uri())])
        .await
        .expect("Crawl failed");

    assert!(sink.lines().is_empty());
}

#[tokio::test]
async fn test_custom_headers_are_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("x-token", "secret"))
        .and(header("cookie", "session=1"))
        .respond_with(html(r#"<a href="/private">Private</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    let settings = CrawlSettings {
        max_depth: 0,
        headers: parse_headers("X-Token: secret;;Cookie: session=1"),
        ..Default::default()
    };
    let (supervisor, sink) = create_supervisor(settings);

    supervisor
        .run(vec![format!("{}/", mock_server.uri())])
        .await
        .expect("Crawl failed");

    assert_eq!(sink.lines(), vec![format!("{}/private", mock_server.uri())]);
}

#[tokio::test]
async fn test_json_output_with_where() {
    let mock_server = MockServer::start().await;
    let seed = format!("{}/", mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(r#"<script src="/main.js"></script>"#))
        .mount(&mock_server)
        .await;

    let settings = CrawlSettings {
        max_depth: 0,
        output: OutputOptions {
            json: true,
            show_source: false,
            show_where: true,
        },
        ..Default::default()
    };
    let (supervisor, sink) = create_supervisor(settings);

    supervisor.run(vec![seed.clone()]).await.expect("Crawl failed");

    assert_eq!(
        sink.lines(),
        vec![format!(
            r#"{{"Source": "script", "URL": "{}/main.js", "Where": "{}"}}"#,
            mock_server.uri(),
            seed
        )]
    );
}

#[tokio::test]
async fn test_two_seeds_share_deduplication() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/one"))
        .respond_with(html(r#"<a href="/shared">Shared</a><a href="/only-one">1</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/two"))
        .respond_with(html(r#"<a href="/shared">Shared</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    let settings = CrawlSettings {
        max_depth: 0,
        ..Default::default()
    };
    let (supervisor, sink) = create_supervisor(settings);

    supervisor
        .run(vec![format!("{}/one", base_url), format!("{}/two", base_url)])
        .await
        .expect("Crawl failed");

    assert_eq!(
        sorted(sink.lines()),
        vec![format!("{}/only-one", base_url), format!("{}/shared", base_url)]
    );
}

#[tokio::test]
async fn test_malformed_seed_reported_after_siblings_finish() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(r#"<a href="/ok">Ok</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    let settings = CrawlSettings {
        max_depth: 0,
        ..Default::default()
    };
    let (supervisor, sink) = create_supervisor(settings);

    let result = supervisor
        .run(vec!["/relative/only".to_string(), format!("{}/", mock_server.uri())])
        .await;

    assert!(result.is_err());
    assert_eq!(sink.lines(), vec![format!("{}/ok", mock_server.uri())]);
}

#[tokio::test]
async fn test_thread_limit_is_shared_across_seeds() {
    let mock_server = MockServer::start().await;
    let delay = Duration::from_millis(300);

    for page in ["/one", "/two", "/three"] {
        Mock::given(method("GET"))
            .and(path(page))
            .respond_with(html("<p>no links</p>").set_delay(delay))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let settings = CrawlSettings {
        threads: 1,
        max_depth: 0,
        ..Default::default()
    };
    let (supervisor, _sink) = create_supervisor(settings);

    let started = Instant::now();
    let summary = supervisor
        .run(vec![
            format!("{}/one", mock_server.uri()),
            format!("{}/two", mock_server.uri()),
            format!("{}/three", mock_server.uri()),
        ])
        .await
        .expect("Crawl failed");

    // One permit means the three delayed fetches run one after another
    assert!(started.elapsed() >= delay * 3, "took {:?}", started.elapsed());
    assert_eq!(summary.pages_fetched, 3);
}

#[tokio::test]
async fn test_timeout_is_a_soft_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(r#"<a href="/late">Late</a>"#).set_delay(Duration::from_secs(2)))
        .mount(&mock_server)
        .await;

    let settings = CrawlSettings {
        timeout: Some(Duration::from_millis(200)),
        ..Default::default()
    };
    let (supervisor, sink) = create_supervisor(settings);

    let summary = supervisor
        .run(vec![format!("{}/", mock_server.uri())])
        .await
        .expect("A timeout must not fail the crawl");

    assert!(sink.lines().is_empty());
    assert_eq!(summary.fetch_failures, 1);
    assert_eq!(summary.transport_failures, 1);
    assert_eq!(summary.non_ok_responses, 0);
}
