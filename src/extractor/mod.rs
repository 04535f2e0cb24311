//! Page link extraction
//!
//! This module contains the single fetch-parse-report pipeline:
//! - HTTP fetching with browser-like headers
//! - HTML parsing and link resolution
//! - Conversion of every failure into a [`FetchError`] report

mod fetcher;
mod parser;

pub use fetcher::{build_http_client, classify_error, decode_body, fetch_page, FetchedPage};
pub use parser::{parse_html, ParsedPage};

use crate::config::{FetcherConfig, DEFAULT_USER_AGENTS};
use crate::output::{ExtractOutcome, FetchError, FetchResult};
use crate::url::is_web_scheme;
use crate::ExtractError;
use rand::seq::IndexedRandom;
use reqwest::Client;
use url::Url;

/// Fetches one page and reports the links found on it
///
/// The extractor holds an immutable HTTP client and User-Agent pool, so a
/// single instance can serve concurrent calls.
#[derive(Debug, Clone)]
pub struct PageLinkExtractor {
    client: Client,
    user_agents: Vec<String>,
}

impl PageLinkExtractor {
    /// Creates an extractor from fetcher settings
    ///
    /// An empty User-Agent pool falls back to the built-in browser signatures.
    pub fn new(config: &FetcherConfig) -> Result<Self, reqwest::Error> {
        let client = build_http_client(config)?;

        let user_agents = if config.user_agents.is_empty() {
            DEFAULT_USER_AGENTS.iter().map(|ua| ua.to_string()).collect()
        } else {
            config.user_agents.clone()
        };

        Ok(Self {
            client,
            user_agents,
        })
    }

    /// Picks a User-Agent uniformly at random from the pool
    pub fn user_agent(&self) -> &str {
        self.user_agents
            .choose(&mut rand::rng())
            .map(String::as_str)
            .unwrap_or(DEFAULT_USER_AGENTS[0])
    }

    /// Extracts the links of the page at `url`
    ///
    /// Performs exactly one GET (redirects are followed automatically). Every
    /// failure is logged and returned as a [`FetchError`]; no partial link set
    /// is ever reported.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use sumi_links::config::FetcherConfig;
    /// use sumi_links::extractor::PageLinkExtractor;
    ///
    /// # async fn example() {
    /// let extractor = PageLinkExtractor::new(&FetcherConfig::default()).unwrap();
    /// match extractor.extract("https://example.com").await {
    ///     Ok(result) => println!("{} links", result.link_count),
    ///     Err(error) => eprintln!("{}", error.message),
    /// }
    /// # }
    /// ```
    pub async fn extract(&self, url: &str) -> ExtractOutcome {
        let mut final_url = url.to_string();

        match self.try_extract(url, &mut final_url).await {
            Ok(page) => {
                tracing::info!("Extracted {} links from {}", page.links.len(), final_url);
                Ok(FetchResult::new(url, final_url, page.title, page.links))
            }
            Err(e) => {
                tracing::error!("Error fetching {}: {}", url, e);
                Err(FetchError::new(url, final_url, &e))
            }
        }
    }

    async fn try_extract(&self, url: &str, final_url: &mut String) -> Result<ParsedPage, ExtractError> {
        let target = Url::parse(url)
            .map_err(|e| ExtractError::Request(format!("Invalid URL '{}': {}", url, e)))?;

        if !is_web_scheme(target.scheme()) {
            return Err(ExtractError::Request(format!(
                "Unsupported URL scheme '{}' in '{}'",
                target.scheme(),
                url
            )));
        }

        let user_agent = self.user_agent();
        tracing::debug!("Fetching {} as {:?}", target, user_agent);

        let page = fetch_page(&self.client, url, &target, user_agent, final_url).await?;

        // html5ever trees are not Send; parse on the blocking pool
        let FetchedPage { url: base_url, body } = page;
        tokio::task::spawn_blocking(move || parse_html(&body, &base_url))
            .await
            .map_err(|e| ExtractError::Unexpected(format!("HTML parser task failed: {}", e)))?
    }
}
