//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test the fetcher
//! and full crawl passes end-to-end.

use company_harvester::config::{FetcherConfig, SiteConfig};
use company_harvester::crawler::{
    Coordinator, CrawlSettings, FetchError, PageFetcher, RetryPolicy, SessionFetcher,
};
use company_harvester::extract::Markers;
use company_harvester::output::{load_snapshot, JsonFileSink};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher_config(timeout_ms: u64) -> FetcherConfig {
    FetcherConfig {
        request_timeout_ms: timeout_ms,
        user_agent: "TestHarvester/1.0".to_string(),
    }
}

/// Creates crawl settings pointing at the mock server
fn create_test_settings(base_url: &str) -> CrawlSettings {
    CrawlSettings {
        site: SiteConfig {
            listing_url: format!("{}/company/list?page={{page}}", base_url),
            organization_url: format!("{}/companies/{{id}}", base_url),
            organization_jobs_url: format!("{}/companies/{{id}}/jobs", base_url),
            first_page: 1,
        },
        retry: RetryPolicy {
            timeout_cooldown: Duration::from_millis(20),
            error_delay: Duration::from_millis(5),
            ..RetryPolicy::default()
        },
        markers: Markers::default(),
    }
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html; charset=utf-8")
}

fn overview(href: &str, title: &str) -> String {
    format!(
        r#"<a class="c-companyOverview" href="{}">
            <div class="c-companyOverview__meta">
                <div class="c-companyOverview__logo">
                    <img class="c-companyOverview__logoImage" src="/logos/{}.png">
                </div>
                <h2 class="c-companyOverview__title">
                    {}
                </h2>
                <div class="c-companyOverview__tags">
                    <span>تهران</span>
                    <span>فناوری اطلاعات</span>
                    <span>در حال استخدام</span>
                </div>
            </div>
        </a>"#,
        href, title, title
    )
}

fn posting(id: u32, elapsed: &str, kind: &str) -> String {
    format!(
        r#"<div class="o-listView__itemInfo">
            <h3 class="c-jobListView__title">
                <a class="c-jobListView__titleLink" href="/jobs/{id}">Developer {id}</a>
                <span class="c-jobListView__passedDays">
                    {elapsed}
                </span>
            </h3>
            <ul class="c-jobListView__meta">
                <li class="c-jobListView__metaItem">تهران</li>
                <li class="c-jobListView__metaItem">{kind}</li>
            </ul>
        </div>"#
    )
}

async fn mount_listing_page(server: &MockServer, page: &str, body: String) {
    Mock::given(method("GET"))
        .and(path("/company/list"))
        .and(query_param("page", page))
        .respond_with(html(&body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_fetcher_returns_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(html("<p>Hello</p>"))
        .mount(&mock_server)
        .await;

    let fetcher = SessionFetcher::new(&fetcher_config(2_000));
    let page = fetcher
        .open(&format!("{}/page", mock_server.uri()))
        .await
        .expect("Fetch failed");

    assert_eq!(page.status_code, 200);
    assert!(page.body.contains("<p>Hello</p>"));
    assert_eq!(page.final_url, format!("{}/page", mock_server.uri()));
}

#[tokio::test]
async fn test_fetcher_reports_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html("<p>Late</p>").set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    let fetcher = SessionFetcher::new(&fetcher_config(200));
    let err = fetcher
        .open(&format!("{}/slow", mock_server.uri()))
        .await
        .expect_err("Fetch should time out");

    assert!(err.is_timeout(), "Expected timeout, got {}", err);
}

#[tokio::test]
async fn test_fetcher_reports_status_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let fetcher = SessionFetcher::new(&fetcher_config(2_000));
    let err = fetcher
        .open(&format!("{}/missing", mock_server.uri()))
        .await
        .expect_err("Fetch should fail");

    assert!(!err.is_timeout());
    assert!(matches!(err, FetchError::Status { status: 404, .. }));
}

#[tokio::test]
async fn test_full_pass_writes_snapshot() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Page 1: one incomplete profile, one complete company
    mount_listing_page(
        &mock_server,
        "1",
        format!(
            "{}{}",
            overview(&format!("{}/companies/alpha/jobs", base_url), "Alpha"),
            overview(&format!("{}/companies/beta", base_url), "Beta"),
        ),
    )
    .await;

    // Page 2: end of the listing
    mount_listing_page(&mock_server, "2", "<p>No more companies</p>".to_string()).await;

    Mock::given(method("GET"))
        .and(path("/companies/beta/jobs"))
        .respond_with(html(&format!(
            "{}{}{}{}",
            posting(1, "(امروز)", "قرارداد تمام وقت"),
            posting(2, "(دیروز)", "دورکاری"),
            posting(3, "(منقضی شده)", "پاره وقت"),
            posting(4, "(۳ روز پیش)", "حقوق توافقی"),
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/companies/beta"))
        .respond_with(html(
            r#"<a class="c-companyMap__mapLink" href="https://maps.example.com/?q=35.7,51.4">Map</a>"#,
        ))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let snapshot_path = dir.path().join("static").join("data.json");

    let fetcher = SessionFetcher::new(&fetcher_config(2_000));
    let sink = JsonFileSink::new(&snapshot_path, false);
    let mut coordinator = Coordinator::new(create_test_settings(&base_url), fetcher, sink)
        .expect("Failed to create coordinator");
    let stats = coordinator.run().await.expect("Crawl failed");

    assert!(stats.persisted);
    assert_eq!(stats.pages_fetched, 2);
    assert_eq!(stats.skipped_incomplete, 1);

    let snapshot = load_snapshot(&snapshot_path).expect("Failed to read snapshot");
    assert_eq!(snapshot.len(), 1);

    let beta = &snapshot.organizations()[0];
    assert_eq!(beta.source_url, format!("{}/companies/beta", base_url));
    assert_eq!(beta.title, "Beta");
    assert_eq!(beta.logo_url, "/logos/Beta.png");
    assert_eq!(beta.location, "تهران");
    assert_eq!(beta.category, "فناوری اطلاعات");
    assert!(beta.is_hiring);
    assert_eq!(beta.map_token, "35.7,51.4");

    let titles: Vec<&str> = beta.postings.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Developer 1", "Developer 2", "Developer 4"]);
    assert_eq!(beta.postings[0].source_url, format!("{}/jobs/1", base_url));

    let types: Vec<&str> = beta
        .postings
        .iter()
        .map(|p| p.employment_type.as_tag())
        .collect();
    assert_eq!(types, vec!["is_fulltime", "remote", ""]);

    // The incomplete profile never had its detail pages requested
    let requests = mock_server
        .received_requests()
        .await
        .expect("Request recording disabled");
    assert!(requests
        .iter()
        .all(|r| !r.url.path().starts_with("/companies/jobs")));

    // The file is the plain array the landing page reads
    let raw: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&snapshot_path).unwrap()).unwrap();
    assert_eq!(raw[0]["Jobs"][0]["PassedDays"], "(امروز)");
}

#[tokio::test]
async fn test_listing_timeout_is_retried_on_same_page() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // First request for page 1 hangs past the fetch timeout
    Mock::given(method("GET"))
        .and(path("/company/list"))
        .and(query_param("page", "1"))
        .respond_with(html("<p>Too late</p>").set_delay(Duration::from_secs(3)))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    mount_listing_page(&mock_server, "1", "<p>No companies</p>".to_string()).await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let snapshot_path = dir.path().join("data.json");

    let fetcher = SessionFetcher::new(&fetcher_config(300));
    let sink = JsonFileSink::new(&snapshot_path, true);
    let mut coordinator = Coordinator::new(create_test_settings(&base_url), fetcher, sink)
        .expect("Failed to create coordinator");
    let stats = coordinator.run().await.expect("Crawl failed");

    assert_eq!(stats.timeouts, 1);
    assert_eq!(stats.pages_fetched, 1);

    let requests = mock_server
        .received_requests()
        .await
        .expect("Request recording disabled");
    let pages: Vec<String> = requests
        .iter()
        .filter(|r| r.url.path() == "/company/list")
        .filter_map(|r| {
            r.url
                .query_pairs()
                .find(|(k, _)| k == "page")
                .map(|(_, v)| v.into_owned())
        })
        .collect();
    assert_eq!(pages, vec!["1", "1"]);

    // Empty snapshot written because write_empty is set
    assert!(load_snapshot(&snapshot_path).unwrap().is_empty());
}

#[tokio::test]
async fn test_company_without_open_postings_is_dropped() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_listing_page(
        &mock_server,
        "1",
        overview(&format!("{}/companies/gamma", base_url), "Gamma"),
    )
    .await;
    mount_listing_page(&mock_server, "2", String::new()).await;

    Mock::given(method("GET"))
        .and(path("/companies/gamma/jobs"))
        .respond_with(html(&posting(1, "(منقضی شده)", "تمام وقت")))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let snapshot_path = dir.path().join("data.json");

    let fetcher = SessionFetcher::new(&fetcher_config(2_000));
    let sink = JsonFileSink::new(&snapshot_path, false);
    let stats = Coordinator::new(create_test_settings(&base_url), fetcher, sink)
        .expect("Failed to create coordinator")
        .run()
        .await
        .expect("Crawl failed");

    assert_eq!(stats.organizations_kept, 0);
    assert_eq!(stats.skipped_no_postings, 1);
    // Pass is complete, but an empty snapshot does not create the file
    assert!(!stats.persisted);
    assert!(stats.kept_previous);
    assert!(!snapshot_path.exists());
}
