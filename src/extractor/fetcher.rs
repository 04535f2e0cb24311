//! HTTP fetcher implementation
//!
//! This module handles the single GET request of an extraction, including:
//! - Building an HTTP client that presents itself like a browser
//! - Following redirects while tracking the last URL reached
//! - Decoding the body by header charset, `<meta>` charset or UTF-8
//! - Mapping status codes and transport failures onto [`ExtractError`]

use crate::config::FetcherConfig;
use crate::ExtractError;
use encoding_rs::{Encoding, UTF_8};
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// How far into the body a `<meta>` charset declaration is looked for
const META_PRESCAN_BYTES: usize = 1024;

/// A successfully fetched page body and the URL it came from
#[derive(Debug)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub url: Url,
    /// Decoded response body
    pub body: String,
}

/// Builds an HTTP client with browser-like defaults
///
/// Every request carries `Accept`, `Accept-Language`, `Connection: keep-alive`,
/// `Upgrade-Insecure-Requests: 1` and `DNT: 1`. `Accept-Encoding` is set by the
/// client itself (gzip, deflate, br) so bodies are decompressed transparently.
/// The User-Agent is attached per request by [`fetch_page`].
///
/// # Example
///
/// ```
/// use sumi_links::config::FetcherConfig;
/// use sumi_links::extractor::build_http_client;
///
/// let client = build_http_client(&FetcherConfig::default());
/// assert!(client.is_ok());
/// ```
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .default_headers(browser_headers(config))
        .timeout(Duration::from_secs(config.timeout_secs))
        .redirect(Policy::limited(config.max_redirects))
        .gzip(true)
        .brotli(true)
        .deflate(true)
        .build()
}

/// Assembles the fixed set of browser-like request headers
fn browser_headers(config: &FetcherConfig) -> HeaderMap {
    let mut headers = HeaderMap::new();

    insert_header(&mut headers, header::ACCEPT, &config.accept);
    insert_header(&mut headers, header::ACCEPT_LANGUAGE, &config.accept_language);
    headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(header::UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
    headers.insert(header::DNT, HeaderValue::from_static("1"));

    headers
}

fn insert_header(headers: &mut HeaderMap, name: HeaderName, value: &str) {
    match HeaderValue::from_str(value) {
        Ok(value) => {
            headers.insert(name, value);
        }
        Err(_) => tracing::warn!("Ignoring invalid {} header value: {:?}", name.as_str(), value),
    }
}

/// Fetches a page with a single GET request
///
/// `final_url` is overwritten with the last URL reached as soon as it is
/// known: the response URL once a response arrives, or the URL a redirect
/// led to when the transport fails mid-chain. It is left untouched when the
/// failure happens on the first hop.
///
/// # Errors
///
/// | Condition | Error |
/// |-----------|-------|
/// | Status >= 400 | `HttpStatus` |
/// | Connection refused, DNS, TLS | `Connection` |
/// | No response within the timeout | `Timeout` |
/// | Anything else (too many redirects, body read failure, ...) | `Request` |
pub async fn fetch_page(
    client: &Client,
    requested_url: &str,
    target: &Url,
    user_agent: &str,
    final_url: &mut String,
) -> Result<FetchedPage, ExtractError> {
    let response = match client
        .get(target.clone())
        .header(header::USER_AGENT, user_agent)
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => {
            record_redirect_target(target, &e, final_url);
            return Err(classify_error(requested_url, &e));
        }
    };

    let url = response.url().clone();
    *final_url = url.to_string();

    let status = response.status();
    if status.as_u16() >= 400 {
        return Err(ExtractError::HttpStatus {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            url: url.to_string(),
        });
    }

    tracing::debug!("Received {} from {}", status, url);

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let bytes = response
        .bytes()
        .await
        .map_err(|e| classify_error(requested_url, &e))?;

    let body = decode_body(&bytes, content_type.as_deref());

    Ok(FetchedPage { url, body })
}

/// Decodes a response body into text
///
/// A byte order mark wins, then the `charset` parameter of the Content-Type
/// header, then a `<meta>` declaration near the top of the document, then UTF-8.
/// Undecodable sequences become U+FFFD.
pub fn decode_body(bytes: &[u8], content_type: Option<&str>) -> String {
    let encoding = content_type
        .and_then(header_charset)
        .or_else(|| meta_charset(bytes))
        .unwrap_or(UTF_8);

    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        tracing::debug!("Body contained bytes invalid in {}", used.name());
    }

    text.into_owned()
}

/// Reads the `charset` parameter of a Content-Type value
fn header_charset(content_type: &str) -> Option<&'static Encoding> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if !name.trim().eq_ignore_ascii_case("charset") {
            return None;
        }
        Encoding::for_label(value.trim().trim_matches(|c| c == '"' || c == '\'').as_bytes())
    })
}

/// Finds a `<meta charset=...>` or `<meta http-equiv content="...; charset=...">`
/// declaration in the first bytes of the document
fn meta_charset(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(META_PRESCAN_BYTES)];
    let head = String::from_utf8_lossy(head).to_ascii_lowercase();

    head.match_indices("<meta").find_map(|(start, _)| {
        let tag = &head[start..];
        let tag = &tag[..tag.find('>').unwrap_or(tag.len())];

        let value_start = tag.find("charset=")? + "charset=".len();
        let value = tag[value_start..].trim_start_matches(|c| c == '"' || c == '\'' || c == ' ');
        let end = value
            .find(|c: char| matches!(c, '"' | '\'' | ';' | ' ' | '/' | '>'))
            .unwrap_or(value.len());

        // A document that can declare its charset in ASCII is not UTF-16
        Encoding::for_label(value[..end].as_bytes()).map(Encoding::output_encoding)
    })
}

/// Records the URL a failed request was visiting if a redirect got it there
fn record_redirect_target(target: &Url, error: &reqwest::Error, final_url: &mut String) {
    if let Some(url) = error.url() {
        if url != target {
            *final_url = url.to_string();
        }
    }
}

/// Maps a transport error onto an extraction error category
///
/// Connection failures are checked before timeouts, so a connect timeout is
/// reported as a connection error.
pub fn classify_error(url: &str, error: &reqwest::Error) -> ExtractError {
    if error.is_connect() {
        ExtractError::Connection(error.to_string())
    } else if error.is_timeout() {
        ExtractError::Timeout {
            url: url.to_string(),
            cause: error.to_string(),
        }
    } else {
        ExtractError::Request(error.to_string())
    }
}
