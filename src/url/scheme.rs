use std::borrow::Cow;

/// Scheme assumed for targets typed without one
const DEFAULT_PREFIX: &str = "https://";

/// Returns true for the schemes links are collected for
pub fn is_web_scheme(scheme: &str) -> bool {
    scheme == "http" || scheme == "https"
}

/// Prepends `https://` to a target that does not start with `http://` or `https://`
///
/// Surrounding whitespace is trimmed first. The check ignores ASCII case.
///
/// # Examples
///
/// ```
/// use sumi_links::url::ensure_scheme;
///
/// assert_eq!(ensure_scheme("example.com"), "https://example.com");
/// assert_eq!(ensure_scheme("http://example.com"), "http://example.com");
/// ```
pub fn ensure_scheme(input: &str) -> Cow<'_, str> {
    let trimmed = input.trim();

    if has_prefix_ignore_case(trimmed, "http://") || has_prefix_ignore_case(trimmed, DEFAULT_PREFIX) {
        Cow::Borrowed(trimmed)
    } else {
        Cow::Owned(format!("{}{}", DEFAULT_PREFIX, trimmed))
    }
}

fn has_prefix_ignore_case(value: &str, prefix: &str) -> bool {
    value
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}
