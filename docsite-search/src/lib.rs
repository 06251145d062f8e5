//! # docsite-search
//!
//! Content-type classification and filtering for documentation search hits.
//!
//! The hosted search widget returns hits identified by URL. This crate tags
//! each hit with a coarse [`ContentType`] (CMS docs, Cloud docs, API
//! reference, ...) and restricts a result list to the category the reader
//! picked.
//!
//! ## Design
//!
//! - Classification is a pure function of the URL: normalise to a lower-cased
//!   path, then test an ordered rule table; the first match wins, and
//!   anything unmatched is [`ContentType::Other`]
//! - The rule table is immutable data, built once per process or loaded from
//!   configuration and validated up front
//! - Filtering is a stable, idempotent selection; the active selection is
//!   passed in explicitly, never held in global state
//! - Neither operation can fail

pub mod classifier;
pub mod error;
pub mod filter;
pub mod selection;
pub mod types;

pub use classifier::{ClassificationRule, Classified, RuleSet};
pub use error::{FilterError, Result};
pub use filter::{filter_by_value, ContentTyped};
pub use selection::Selection;
pub use types::{ContentType, HasUrl, SearchHit};

/// Classify a hit with the built-in rule table.
///
/// # Examples
///
/// ```
/// use docsite_search::{classify, ContentType};
///
/// assert_eq!(classify("/docs/cms/pages"), ContentType::Cms);
/// assert_eq!(classify("https://example.com/docs/cloud/deploy"), ContentType::Cloud);
/// assert_eq!(classify("/blog/post"), ContentType::Other);
/// assert_eq!(classify(""), ContentType::Other);
/// ```
pub fn classify<T: HasUrl + ?Sized>(hit: &T) -> ContentType {
    RuleSet::builtin().classify(hit)
}

/// Restrict classified results to the selected content type.
///
/// See [`filter::filter`] for the exact semantics.
///
/// # Examples
///
/// ```
/// use docsite_search::{filter, RuleSet, SearchHit, Selection};
///
/// let results = RuleSet::builtin().annotate([
///     SearchHit::from_url("/docs/cms/pages"),
///     SearchHit::from_url("/docs/cloud/deploy"),
/// ]);
/// let cloud = filter(&results, &Selection::parse("cloud"));
/// assert_eq!(cloud.len(), 1);
/// assert_eq!(cloud[0].hit.url, "/docs/cloud/deploy");
/// ```
pub fn filter<T: ContentTyped + Clone>(results: &[T], selected: &Selection) -> Vec<T> {
    filter::filter(results, selected)
}
