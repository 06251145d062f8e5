//! URL normalisation for content-type classification.
//!
//! Reduces any URL form the search index may hand back (absolute,
//! root-relative, document-relative, empty, or garbage) to a
//! lower-cased path that rule patterns can be matched against.

use url::Url;

/// Base used to resolve relative URLs. The host is discarded afterwards.
const RELATIVE_BASE: &str = "http://docsite.invalid/";

/// Normalise a URL into the path form used for rule matching.
///
/// Applies the following transformations:
///
/// 1. Strip scheme, credentials, host and port.
/// 2. Resolve relative paths (including `.` and `..` segments).
/// 3. Drop the query string and fragment.
/// 4. Lower-case the path.
/// 5. Ensure a trailing slash, so `/docs/cms` matches the `/cms/` marker.
///
/// Empty input yields an empty string. Input the URL parser rejects is
/// still reduced on a best-effort basis and never causes an error.
///
/// # Examples
///
/// ```
/// use docsite_search::classifier::normalize::classification_path;
///
/// assert_eq!(
///     classification_path("https://Docs.Example.com/CMS/Intro?q=1#top"),
///     "/cms/intro/"
/// );
/// assert_eq!(classification_path("/docs/cloud"), "/docs/cloud/");
/// assert_eq!(classification_path(""), "");
/// ```
pub fn classification_path(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let parsed = match Url::parse(trimmed) {
        Ok(url) => Some(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(RELATIVE_BASE)
            .ok()
            .and_then(|base| base.join(trimmed).ok()),
        Err(_) => None,
    };

    let path = match parsed {
        Some(url) => url.path().to_lowercase(),
        None => fallback_path(trimmed),
    };

    with_trailing_slash(path)
}

/// Best-effort reduction for input the URL parser rejects.
fn fallback_path(raw: &str) -> String {
    let end = raw.find(['?', '#']).unwrap_or(raw.len());
    let without_query = &raw[..end];
    let without_scheme = without_query
        .split_once("://")
        .map_or(without_query, |(_, rest)| rest.find('/').map_or("", |i| &rest[i..]));
    without_scheme.to_lowercase()
}

fn with_trailing_slash(mut path: String) -> String {
    if !path.ends_with('/') {
        path.push('/');
    }
    path
}
