use crate::{ErrorKind, ExtractError};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::collections::BTreeSet;

/// Title reported when a page has no non-empty `<title>`
pub const NO_TITLE: &str = "N/A";

/// Outcome of one extraction: exactly one of the two report shapes
pub type ExtractOutcome = Result<FetchResult, FetchError>;

/// Successful extraction of a page's links
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchResult {
    /// The URL as the caller supplied it
    pub requested_url: String,

    /// The URL the response finally came from, after redirects
    #[serde(rename = "final_url_crawled")]
    pub final_url: String,

    /// Trimmed page title, or [`NO_TITLE`]
    pub page_title: String,

    /// Number of distinct links
    #[serde(rename = "links_count")]
    pub link_count: usize,

    /// Distinct absolute links, sorted ascending
    #[serde(rename = "extracted_links")]
    pub links: Vec<String>,
}

impl FetchResult {
    /// Builds a result from the parsed title and link set
    pub fn new(
        requested_url: impl Into<String>,
        final_url: impl Into<String>,
        title: Option<String>,
        links: BTreeSet<String>,
    ) -> Self {
        let links: Vec<String> = links.into_iter().collect();
        Self {
            requested_url: requested_url.into(),
            final_url: final_url.into(),
            page_title: title.unwrap_or_else(|| NO_TITLE.to_string()),
            link_count: links.len(),
            links,
        }
    }
}

/// Failed extraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchError {
    /// Human-readable description, category included
    #[serde(rename = "error")]
    pub message: String,

    /// The URL as the caller supplied it
    pub requested_url: String,

    /// Best-known URL when the failure happened
    pub final_url_attempted: String,

    /// Category of the failure
    #[serde(skip)]
    pub kind: ErrorKind,
}

impl FetchError {
    /// Builds a failure report from the error that ended the extraction
    pub fn new(
        requested_url: impl Into<String>,
        final_url_attempted: impl Into<String>,
        error: &ExtractError,
    ) -> Self {
        Self {
            message: error.to_string(),
            requested_url: requested_url.into(),
            final_url_attempted: final_url_attempted.into(),
            kind: error.kind(),
        }
    }
}

/// Renders an outcome as JSON indented with four spaces
///
/// # Example
///
/// ```
/// use std::collections::BTreeSet;
/// use sumi_links::output::{render_json, FetchResult};
///
/// let result = FetchResult::new("https://example.com", "https://example.com/", None, BTreeSet::new());
/// let json = render_json(&Ok(result)).unwrap();
/// assert!(json.contains("\n    \"page_title\": \"N/A\""));
/// ```
pub fn render_json(outcome: &ExtractOutcome) -> Result<String, serde_json::Error> {
    let mut buffer = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));

    match outcome {
        Ok(result) => result.serialize(&mut serializer)?,
        Err(error) => error.serialize(&mut serializer)?,
    }

    String::from_utf8(buffer).map_err(<serde_json::Error as serde::ser::Error>::custom)
}
