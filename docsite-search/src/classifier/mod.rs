//! Content-type classification of search hits.
//!
//! Classification is a total, deterministic function of a hit's URL:
//! the URL is normalised to a lower-cased path, then tested against an
//! ordered [`RuleSet`]. The first matching rule wins; hits no rule
//! matches are [`ContentType::Other`].

pub mod normalize;
pub mod rules;

use serde::{Deserialize, Serialize};

use crate::types::{ContentType, HasUrl};

pub use normalize::classification_path;
pub use rules::{builtin_rules, ClassificationRule, RuleSet};

/// A hit paired with its derived content type.
///
/// Serialises as the hit's own fields plus `contentType`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classified<T> {
    /// The original hit, unchanged.
    #[serde(flatten)]
    pub hit: T,
    /// Content type derived from the hit's URL.
    #[serde(rename = "contentType")]
    pub content_type: ContentType,
}

impl<T: HasUrl> HasUrl for Classified<T> {
    fn url(&self) -> &str {
        self.hit.url()
    }
}

impl RuleSet {
    /// Classify a raw URL string.
    pub fn classify_url(&self, url: &str) -> ContentType {
        let path = classification_path(url);
        let content_type = self.first_match(&path).unwrap_or(ContentType::Other);
        tracing::trace!(%path, %content_type, "classified url");
        content_type
    }

    /// Classify any record exposing a URL.
    pub fn classify<T: HasUrl + ?Sized>(&self, hit: &T) -> ContentType {
        self.classify_url(hit.url())
    }

    /// Attach a content type to every hit, preserving order.
    pub fn annotate<T, I>(&self, hits: I) -> Vec<Classified<T>>
    where
        T: HasUrl,
        I: IntoIterator<Item = T>,
    {
        hits.into_iter()
            .map(|hit| {
                let content_type = self.classify(&hit);
                Classified { hit, content_type }
            })
            .collect()
    }
}
