//! Integration tests for the page link extractor
//!
//! These tests use wiremock to create mock HTTP servers and exercise the
//! whole fetch-parse-report pipeline end-to-end.

use std::time::Duration;
use sumi_links::config::FetcherConfig;
use sumi_links::{render_json, ErrorKind, PageLinkExtractor};
use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn html_response(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html; charset=utf-8")
}

fn redirect_to(location: &str) -> ResponseTemplate {
    ResponseTemplate::new(302).insert_header("location", location)
}

fn default_extractor() -> PageLinkExtractor {
    PageLinkExtractor::new(&FetcherConfig::default()).expect("Failed to build extractor")
}

#[tokio::test]
async fn test_extracts_sorted_distinct_links() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/dir/page"))
        .respond_with(html_response(
            r#"<html><head><title>  Home  </title></head><body>
                <a href="/about">About</a>
                <a href="https://example.com/x#section">X section</a>
                <a href="https://example.com/x">X</a>
                <a href="mailto:a@b.com">Mail</a>
                <a href="javascript:void(0)">Nothing</a>
                <a href="">Empty</a>
                <a href="sibling?page=2">Sibling</a>
            </body></html>"#,
        ))
        .mount(&mock_server)
        .await;

    let requested = format!("{}/dir/page", base_url);
    let result = default_extractor()
        .extract(&requested)
        .await
        .expect("Extraction failed");

    assert_eq!(result.requested_url, requested);
    assert_eq!(result.final_url, requested);
    assert_eq!(result.page_title, "Home");
    assert_eq!(
        result.links,
        vec![
            format!("{}/about", base_url),
            format!("{}/dir/sibling?page=2", base_url),
            "https://example.com/x".to_string(),
        ]
    );
    assert_eq!(result.link_count, 3);
}

#[tokio::test]
async fn test_page_without_title_uses_sentinel() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response("<html><body><p>No links here</p></body></html>"))
        .mount(&mock_server)
        .await;

    let result = default_extractor()
        .extract(&format!("{}/", mock_server.uri()))
        .await
        .expect("Extraction failed");

    assert_eq!(result.page_title, "N/A");
    assert_eq!(result.link_count, 0);
    assert!(result.links.is_empty());
}

#[tokio::test]
async fn test_sends_browser_like_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", "TestAgent/1.0"))
        .and(header("dnt", "1"))
        .and(header("upgrade-insecure-requests", "1"))
        .and(header_exists("accept"))
        .and(header_exists("accept-language"))
        .and(header_exists("accept-encoding"))
        .respond_with(html_response("<html><head><title>Headers</title></head></html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = FetcherConfig {
        user_agents: vec!["TestAgent/1.0".to_string()],
        ..FetcherConfig::default()
    };
    let extractor = PageLinkExtractor::new(&config).expect("Failed to build extractor");

    let result = extractor
        .extract(&format!("{}/", mock_server.uri()))
        .await
        .expect("Headers did not match");
    assert_eq!(result.page_title, "Headers");
}

#[tokio::test]
async fn test_follows_redirects_and_resolves_against_final_url() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/start"))
        .respond_with(redirect_to(&format!("{}/docs/landing", base_url)))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/docs/landing"))
        .respond_with(html_response(
            r##"<html><head><title>Landing</title></head><body>
                <a href="next">Next</a>
                <a href="#top">Top</a>
            </body></html>"##,
        ))
        .mount(&mock_server)
        .await;

    let requested = format!("{}/start", base_url);
    let result = default_extractor()
        .extract(&requested)
        .await
        .expect("Extraction failed");

    assert_eq!(result.requested_url, requested);
    assert_eq!(result.final_url, format!("{}/docs/landing", base_url));
    assert_eq!(
        result.links,
        vec![
            format!("{}/docs/landing", base_url),
            format!("{}/docs/next", base_url),
        ]
    );
}

#[tokio::test]
async fn test_not_found_is_http_status_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let requested = format!("{}/missing", mock_server.uri());
    let error = default_extractor()
        .extract(&requested)
        .await
        .expect_err("404 should fail");

    assert_eq!(error.kind, ErrorKind::HttpStatus);
    assert_eq!(error.requested_url, requested);
    assert_eq!(error.final_url_attempted, requested);
    assert!(error.message.starts_with("HTTP error occurred: 404 Not Found"));
    assert!(error.message.contains(&requested));
}

#[tokio::test]
async fn test_not_found_after_redirect_reports_redirect_target() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(redirect_to(&format!("{}/gone", base_url)))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let requested = format!("{}/old", base_url);
    let error = default_extractor()
        .extract(&requested)
        .await
        .expect_err("404 should fail");

    assert_eq!(error.kind, ErrorKind::HttpStatus);
    assert_eq!(error.requested_url, requested);
    assert_eq!(error.final_url_attempted, format!("{}/gone", base_url));
}

#[tokio::test]
async fn test_server_error_is_http_status_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let error = default_extractor()
        .extract(&format!("{}/", mock_server.uri()))
        .await
        .expect_err("503 should fail");

    assert_eq!(error.kind, ErrorKind::HttpStatus);
    assert!(error.message.contains("503"));
}

#[tokio::test]
async fn test_refused_connection_is_connection_error() {
    // Reserve a port, then free it so nothing is listening there
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let port = listener.local_addr().expect("No local addr").port();
    drop(listener);

    let requested = format!("http://127.0.0.1:{}/page", port);
    let error = default_extractor()
        .extract(&requested)
        .await
        .expect_err("Connection should be refused");

    assert_eq!(error.kind, ErrorKind::Connection);
    assert_eq!(error.requested_url, requested);
    assert_eq!(error.final_url_attempted, requested);
    assert!(error.message.starts_with("Connection error occurred:"));
}

#[tokio::test]
async fn test_slow_response_is_timeout_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(html_response("<html></html>").set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let config = FetcherConfig {
        timeout_secs: 1,
        ..FetcherConfig::default()
    };
    let extractor = PageLinkExtractor::new(&config).expect("Failed to build extractor");

    let requested = format!("{}/slow", mock_server.uri());
    let error = extractor
        .extract(&requested)
        .await
        .expect_err("Request should time out");

    assert_eq!(error.kind, ErrorKind::Timeout);
    assert_eq!(error.final_url_attempted, requested);
    assert!(error
        .message
        .starts_with(&format!("Timeout occurred while fetching {}", requested)));
}

#[tokio::test]
async fn test_redirect_limit_is_request_error() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    for (from, to) in [("/r1", "/r2"), ("/r2", "/r3"), ("/r3", "/r4"), ("/r4", "/r5")] {
        Mock::given(method("GET"))
            .and(path(from))
            .respond_with(redirect_to(&format!("{}{}", base_url, to)))
            .mount(&mock_server)
            .await;
    }

    let config = FetcherConfig {
        max_redirects: 2,
        ..FetcherConfig::default()
    };
    let extractor = PageLinkExtractor::new(&config).expect("Failed to build extractor");

    let requested = format!("{}/r1", base_url);
    let error = extractor
        .extract(&requested)
        .await
        .expect_err("Redirect chain should be cut off");

    assert_eq!(error.kind, ErrorKind::Request);
    assert_eq!(error.requested_url, requested);
    // Second hop is where the limit is hit
    assert_eq!(error.final_url_attempted, format!("{}/r2", base_url));
}

#[tokio::test]
async fn test_timeout_after_redirect_reports_redirect_target() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(redirect_to(&format!("{}/b", base_url)))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(html_response("<html></html>").set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let config = FetcherConfig {
        timeout_secs: 1,
        ..FetcherConfig::default()
    };
    let extractor = PageLinkExtractor::new(&config).expect("Failed to build extractor");

    let requested = format!("{}/a", base_url);
    let error = extractor
        .extract(&requested)
        .await
        .expect_err("Request should time out");

    assert_eq!(error.kind, ErrorKind::Timeout);
    assert_eq!(error.requested_url, requested);
    assert_eq!(error.final_url_attempted, format!("{}/b", base_url));
    assert!(error
        .message
        .starts_with(&format!("Timeout occurred while fetching {}:", requested)));
}

#[tokio::test]
async fn test_timeout_message_uses_requested_url_verbatim() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(html_response("<html></html>").set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let config = FetcherConfig {
        timeout_secs: 1,
        ..FetcherConfig::default()
    };
    let extractor = PageLinkExtractor::new(&config).expect("Failed to build extractor");

    // No trailing slash: the parsed URL would add one
    let requested = mock_server.uri();
    let error = extractor
        .extract(&requested)
        .await
        .expect_err("Request should time out");

    assert_eq!(error.kind, ErrorKind::Timeout);
    assert!(error
        .message
        .starts_with(&format!("Timeout occurred while fetching {}:", requested)));
}

#[tokio::test]
async fn test_corrupt_gzip_body_is_request_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/packed"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"definitely not gzip".to_vec())
                .insert_header("content-type", "text/html")
                .insert_header("content-encoding", "gzip"),
        )
        .mount(&mock_server)
        .await;

    let requested = format!("{}/packed", mock_server.uri());
    let error = default_extractor()
        .extract(&requested)
        .await
        .expect_err("Corrupt body should fail");

    assert_eq!(error.kind, ErrorKind::Request);
    assert_eq!(error.final_url_attempted, requested);
    assert!(error.message.starts_with("An error occurred during request:"));
}

#[tokio::test]
async fn test_meta_charset_page_decoded() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let mut body = b"<html><head><meta charset=\"windows-1252\"><title>Caf".to_vec();
    body.push(0xE9);
    body.extend_from_slice(b"</title></head><body><a href=\"/caf");
    body.push(0xE9);
    body.extend_from_slice(b"\">Menu</a></body></html>");

    Mock::given(method("GET"))
        .and(path("/menu"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(&mock_server)
        .await;

    let result = default_extractor()
        .extract(&format!("{}/menu", base_url))
        .await
        .expect("Extraction failed");

    assert_eq!(result.page_title, "Café");
    assert_eq!(result.links, vec![format!("{}/caf%C3%A9", base_url)]);
}

#[tokio::test]
async fn test_report_json_has_exactly_one_shape() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(html_response(r#"<a href="/a">A</a>"#))
        .mount(&mock_server)
        .await;

    let extractor = default_extractor();

    let success = extractor.extract(&format!("{}/ok", mock_server.uri())).await;
    let json: serde_json::Value =
        serde_json::from_str(&render_json(&success).expect("Render failed")).expect("Bad JSON");
    assert_eq!(json["links_count"], 1);
    assert_eq!(json["page_title"], "N/A");
    assert!(json.get("error").is_none());

    let failure = extractor
        .extract(&format!("{}/missing", mock_server.uri()))
        .await;
    let json: serde_json::Value =
        serde_json::from_str(&render_json(&failure).expect("Render failed")).expect("Bad JSON");
    assert!(json["error"].is_string());
    assert!(json.get("extracted_links").is_none());
    assert!(json.get("final_url_crawled").is_none());
}

#[tokio::test]
async fn test_concurrent_extractions_share_one_extractor() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/one"))
        .respond_with(html_response(r#"<title>One</title><a href="/a">A</a>"#))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/two"))
        .respond_with(html_response(r#"<title>Two</title><a href="/b">B</a><a href="/c">C</a>"#))
        .mount(&mock_server)
        .await;

    let extractor = default_extractor();
    let one_url = format!("{}/one", mock_server.uri());
    let two_url = format!("{}/two", mock_server.uri());

    let (one, two) = tokio::join!(extractor.extract(&one_url), extractor.extract(&two_url));

    let one = one.expect("First extraction failed");
    let two = two.expect("Second extraction failed");
    assert_eq!(one.page_title, "One");
    assert_eq!(one.link_count, 1);
    assert_eq!(two.page_title, "Two");
    assert_eq!(two.link_count, 2);
}
