//! The user's active content-type selector.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{FilterError, Result};
use crate::types::ContentType;

/// What the category selector is currently set to.
///
/// The empty selector value means "no filter". Values outside the closed
/// set of content types are kept as [`Selection::Unrecognized`] and match
/// nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Selection {
    /// No filter; every hit is visible.
    #[default]
    All,
    /// Only hits of this content type are visible.
    Only(ContentType),
    /// A selector value outside the known set.
    Unrecognized(String),
}

impl Selection {
    /// Interpret a raw selector value. Never fails.
    ///
    /// Matching is exact: only `""` means no filter, and only the lowercase
    /// content-type values select a type. Anything else is unrecognized.
    ///
    /// ```
    /// use docsite_search::{ContentType, Selection};
    ///
    /// assert_eq!(Selection::parse(""), Selection::All);
    /// assert_eq!(Selection::parse("api"), Selection::Only(ContentType::Api));
    /// assert!(matches!(Selection::parse("blog"), Selection::Unrecognized(_)));
    /// assert!(matches!(Selection::parse("API"), Selection::Unrecognized(_)));
    /// ```
    pub fn parse(raw: &str) -> Self {
        if raw.is_empty() {
            return Self::All;
        }
        match ContentType::all().iter().find(|ct| ct.as_str() == raw) {
            Some(content_type) => Self::Only(*content_type),
            None => Self::Unrecognized(raw.to_string()),
        }
    }

    /// Interpret a raw selector value, rejecting unknown values.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::Parse`] if the value is neither empty nor a
    /// known content type.
    pub fn parse_strict(raw: &str) -> Result<Self> {
        match Self::parse(raw) {
            Self::Unrecognized(value) => Err(FilterError::Parse(format!(
                "unknown content-type selector `{value}`"
            ))),
            selection => Ok(selection),
        }
    }

    /// The selector value (`""` for [`Selection::All`]).
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => "",
            Self::Only(content_type) => content_type.as_str(),
            Self::Unrecognized(value) => value,
        }
    }

    /// Returns true when no filter is applied.
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Whether a hit of `content_type` passes this selection.
    pub fn admits(&self, content_type: ContentType) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => *wanted == content_type,
            Self::Unrecognized(_) => false,
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Selection {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_strict(s)
    }
}

impl From<ContentType> for Selection {
    fn from(content_type: ContentType) -> Self {
        Self::Only(content_type)
    }
}

impl Serialize for Selection {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Selection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_empty_means_all() {
        assert_eq!(Selection::parse(""), Selection::All);
        assert_eq!(Selection::default(), Selection::All);
        assert_eq!(Selection::parse("  "), Selection::Unrecognized("  ".into()));
    }

    #[test]
    fn matching_is_exact() {
        assert_eq!(Selection::parse("CMS"), Selection::Unrecognized("CMS".into()));
        assert_eq!(
            Selection::parse(" cloud "),
            Selection::Unrecognized(" cloud ".into())
        );
        assert!(!Selection::parse("Api").admits(ContentType::Api));
    }

    #[test]
    fn known_values_select_a_type() {
        assert_eq!(Selection::parse("cloud"), Selection::Only(ContentType::Cloud));
        assert_eq!(Selection::parse("other"), Selection::Only(ContentType::Other));
    }

    #[test]
    fn unknown_values_are_kept() {
        assert_eq!(
            Selection::parse("unknown-category"),
            Selection::Unrecognized("unknown-category".into())
        );
    }

    #[test]
    fn strict_parse_rejects_unknown() {
        let err = "unknown-category".parse::<Selection>().unwrap_err();
        assert!(err.to_string().contains("unknown-category"));
        assert_eq!("".parse::<Selection>().ok(), Some(Selection::All));
    }

    #[test]
    fn admits() {
        assert!(Selection::All.admits(ContentType::Other));
        assert!(Selection::Only(ContentType::Api).admits(ContentType::Api));
        assert!(!Selection::Only(ContentType::Api).admits(ContentType::Cms));
        assert!(!Selection::Unrecognized("x".into()).admits(ContentType::Cms));
    }

    #[test]
    fn display_round_trips_selector_value() {
        for raw in ["", "cms", "configuration", "whatever", "CMS", " api "] {
            assert_eq!(Selection::parse(raw).to_string(), raw);
        }
    }

    #[test]
    fn serde_uses_plain_string() {
        let json = serde_json::to_string(&Selection::Only(ContentType::Features)).expect("ser");
        assert_eq!(json, "\"features\"");
        let decoded: Selection = serde_json::from_str("\"\"").expect("de");
        assert_eq!(decoded, Selection::All);
    }
}
