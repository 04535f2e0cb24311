//! HTML parser for extracting links and the page title

use crate::url::resolve_href;
use crate::ExtractError;
use scraper::{Html, Selector};
use std::collections::BTreeSet;
use url::Url;

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// The page title (from the first <title> tag), if non-empty
    pub title: Option<String>,

    /// Distinct absolute links found on the page, in sorted order
    pub links: BTreeSet<String>,
}

/// Parses HTML content and extracts links and the title
///
/// # Link Extraction Rules
///
/// Every `<a>` element with a non-empty `href` is resolved against
/// `base_url` by [`resolve_href`]: the fragment is dropped and only `http` and
/// `https` links are kept. Duplicates after resolution collapse into one entry.
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `base_url` - The final response URL, used to resolve relative links
///
/// # Example
///
/// ```
/// use sumi_links::extractor::parse_html;
/// use url::Url;
///
/// let html = r#"<html><head><title>Test</title></head><body><a href="/page">Link</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let parsed = parse_html(html, &base_url).unwrap();
/// assert_eq!(parsed.title, Some("Test".to_string()));
/// assert!(parsed.links.contains("https://example.com/page"));
/// ```
pub fn parse_html(html: &str, base_url: &Url) -> Result<ParsedPage, ExtractError> {
    let document = Html::parse_document(html);

    let title = extract_title(&document)?;
    let links = extract_links(&document, base_url)?;

    Ok(ParsedPage { title, links })
}

fn selector(css: &str) -> Result<Selector, ExtractError> {
    Selector::parse(css)
        .map_err(|e| ExtractError::Unexpected(format!("invalid selector {:?}: {:?}", css, e)))
}

/// Extracts the trimmed page title from the HTML document
fn extract_title(document: &Html) -> Result<Option<String>, ExtractError> {
    let title_selector = selector("title")?;

    Ok(document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty()))
}

/// Extracts all web links from anchors in the HTML document
fn extract_links(document: &Html, base_url: &Url) -> Result<BTreeSet<String>, ExtractError> {
    let a_selector = selector("a[href]")?;
    let mut links = BTreeSet::new();

    for element in document.select(&a_selector) {
        if let Some(href) = element.value().attr("href") {
            if let Some(absolute_url) = resolve_href(base_url, href) {
                links.insert(String::from(absolute_url));
            }
        }
    }

    Ok(links)
}
