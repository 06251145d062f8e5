//! Core types for search hits and content-type labels.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FilterError;

/// Anything that exposes a destination URL can be classified.
///
/// The URL may be absolute, relative, or empty.
pub trait HasUrl {
    /// The destination URL of this record.
    fn url(&self) -> &str;
}

impl HasUrl for str {
    fn url(&self) -> &str {
        self
    }
}

impl HasUrl for String {
    fn url(&self) -> &str {
        self.as_str()
    }
}

impl<T: HasUrl + ?Sized> HasUrl for &T {
    fn url(&self) -> &str {
        (**self).url()
    }
}

/// A single hit returned by the hosted documentation search index.
///
/// Only `url` takes part in classification; the remaining fields are
/// carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Destination URL of the hit.
    #[serde(default)]
    pub url: String,
    /// Page or heading title.
    #[serde(default)]
    pub title: String,
    /// Highlighted text snippet.
    #[serde(default)]
    pub snippet: String,
    /// Heading hierarchy leading to the hit (`lvl0`, `lvl1`, ...).
    #[serde(default)]
    pub hierarchy: Vec<String>,
    /// Result section the hit is grouped under in the search modal.
    #[serde(default)]
    pub section: Option<String>,
}

impl SearchHit {
    /// Build a hit carrying only a URL.
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }
}

impl HasUrl for SearchHit {
    fn url(&self) -> &str {
        &self.url
    }
}

/// Coarse category a search hit is classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// CMS documentation.
    Cms,
    /// Cloud hosting documentation.
    Cloud,
    /// CMS feature guides.
    Features,
    /// Development guides.
    Development,
    /// API reference.
    Api,
    /// Configuration reference.
    Configuration,
    /// Anything no rule matched.
    Other,
}

impl ContentType {
    /// Returns the selector value used for this type (`"cms"`, `"cloud"`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cms => "cms",
            Self::Cloud => "cloud",
            Self::Features => "features",
            Self::Development => "development",
            Self::Api => "api",
            Self::Configuration => "configuration",
            Self::Other => "other",
        }
    }

    /// Returns the human-readable label shown on filter buttons.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Cms => "CMS Docs",
            Self::Cloud => "Cloud Docs",
            Self::Features => "CMS Features",
            Self::Development => "Development",
            Self::Api => "APIs",
            Self::Configuration => "Configuration",
            Self::Other => "Other",
        }
    }

    /// Returns the icon shown next to the label.
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Cms => "⚙️",
            Self::Cloud => "☁️",
            Self::Features => "✨",
            Self::Development => "🔧",
            Self::Api => "🔌",
            Self::Configuration => "🛠️",
            Self::Other => "📄",
        }
    }

    /// Returns all variants, in classification priority order, `Other` last.
    pub fn all() -> &'static [ContentType] {
        &[
            Self::Cms,
            Self::Cloud,
            Self::Features,
            Self::Development,
            Self::Api,
            Self::Configuration,
            Self::Other,
        ]
    }

    /// Returns the types offered as filter choices (everything but `Other`).
    pub fn filterable() -> &'static [ContentType] {
        &Self::all()[..6]
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|ct| ct.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| FilterError::Parse(format!("unknown content type `{wanted}`")))
    }
}
