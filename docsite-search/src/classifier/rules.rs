//! Ordered classification rule table.
//!
//! A [`RuleSet`] is an ordered list of `(ContentType, patterns)` pairs.
//! Patterns are plain substrings tested against the normalised path;
//! the first rule with a matching pattern wins.

use std::collections::HashSet;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::{FilterError, Result};
use crate::types::ContentType;

/// Built-in markers, in priority order.
const BUILTIN_RULES: &[(ContentType, &[&str])] = &[
    (ContentType::Cms, &["/cms/"]),
    (ContentType::Cloud, &["/cloud/"]),
    (ContentType::Features, &["/features/"]),
    (ContentType::Development, &["/development/"]),
    (ContentType::Api, &["/api/"]),
    (ContentType::Configuration, &["/configuration/"]),
];

/// Process-wide built-in rule table, built on first use.
static BUILTIN: OnceLock<RuleSet> = OnceLock::new();

/// One entry of the rule table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRule {
    /// Content type assigned when any pattern matches.
    pub content_type: ContentType,
    /// Path substrings, matched against the lower-cased normalised path.
    pub patterns: Vec<String>,
}

impl ClassificationRule {
    /// Build a rule from a content type and its patterns.
    pub fn new<I, S>(content_type: ContentType, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            content_type,
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }

    fn matches(&self, path: &str) -> bool {
        self.patterns.iter().any(|p| path.contains(p.as_str()))
    }
}

/// Validated, immutable, ordered rule table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RuleSet {
    rules: Vec<ClassificationRule>,
}

impl RuleSet {
    /// Validate and build a rule table.
    ///
    /// Patterns are trimmed and lower-cased; blank patterns are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::Config`] if:
    /// - the table is empty
    /// - a rule targets [`ContentType::Other`] (it is the fallback, not a rule)
    /// - a content type appears in more than one rule
    /// - a rule has no non-blank pattern
    pub fn new(rules: Vec<ClassificationRule>) -> Result<Self> {
        if rules.is_empty() {
            return Err(FilterError::Config(
                "rule table must contain at least one rule".into(),
            ));
        }

        let mut seen = HashSet::new();
        let mut normalised = Vec::with_capacity(rules.len());
        for rule in rules {
            if rule.content_type == ContentType::Other {
                return Err(FilterError::Config(
                    "`other` is the fallback and cannot have a rule".into(),
                ));
            }
            if !seen.insert(rule.content_type) {
                return Err(FilterError::Config(format!(
                    "content type `{}` has more than one rule",
                    rule.content_type
                )));
            }
            let patterns: Vec<String> = rule
                .patterns
                .iter()
                .map(|p| p.trim().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect();
            if patterns.is_empty() {
                return Err(FilterError::Config(format!(
                    "rule for `{}` has no patterns",
                    rule.content_type
                )));
            }
            normalised.push(ClassificationRule {
                content_type: rule.content_type,
                patterns,
            });
        }

        Ok(Self { rules: normalised })
    }

    /// The built-in rule table.
    pub fn builtin() -> &'static RuleSet {
        BUILTIN.get_or_init(|| Self {
            rules: builtin_rules(),
        })
    }

    /// Rules in priority order.
    pub fn rules(&self) -> &[ClassificationRule] {
        &self.rules
    }

    /// First rule matching an already-normalised path, if any.
    pub fn first_match(&self, path: &str) -> Option<ContentType> {
        if path.is_empty() {
            return None;
        }
        self.rules
            .iter()
            .find(|rule| rule.matches(path))
            .map(|rule| rule.content_type)
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::builtin().clone()
    }
}

impl<'de> Deserialize<'de> for RuleSet {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let rules = Vec::<ClassificationRule>::deserialize(deserializer)?;
        Self::new(rules).map_err(serde::de::Error::custom)
    }
}

/// The built-in rules as an owned list, e.g. to seed a config file.
pub fn builtin_rules() -> Vec<ClassificationRule> {
    BUILTIN_RULES
        .iter()
        .map(|(content_type, patterns)| {
            ClassificationRule::new(*content_type, patterns.iter().copied())
        })
        .collect()
}
