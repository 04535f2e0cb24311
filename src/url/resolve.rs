use super::scheme::is_web_scheme;
use url::Url;

/// Resolves an anchor's href into an absolute, fragment-free web URL
///
/// # Resolution Steps
///
/// 1. Trim surrounding ASCII whitespace; skip if nothing is left
/// 2. Join against `base` using standard URI resolution (relative paths,
///    protocol-relative, query-only and fragment-only references)
/// 3. Reject anything whose resolved scheme is not `http` or `https`
///    (`mailto:`, `javascript:`, `tel:`, `data:`, ...)
/// 4. Remove the fragment
///
/// The function is pure: the same `base` and `href` always give the same result.
///
/// # Examples
///
/// ```
/// use sumi_links::url::resolve_href;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/dir/page").unwrap();
/// let url = resolve_href(&base, "/about#team").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/about");
/// assert!(resolve_href(&base, "mailto:a@b.com").is_none());
/// ```
pub fn resolve_href(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim_matches(|c: char| c.is_ascii_whitespace());

    if href.is_empty() {
        return None;
    }

    let mut url = match base.join(href) {
        Ok(url) => url,
        Err(e) => {
            tracing::debug!("Skipping unresolvable href {:?}: {}", href, e);
            return None;
        }
    };

    if !is_web_scheme(url.scheme()) {
        tracing::trace!("Skipping non-web link: {}", url);
        return None;
    }

    url.set_fragment(None);
    Some(url)
}
