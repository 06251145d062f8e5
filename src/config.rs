//! Configuration types for the site components.

use std::path::{Path, PathBuf};
use std::time::Duration;

use docsite_search::classifier::builtin_rules;
use docsite_search::{ClassificationRule, RuleSet};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SiteError};
use crate::readiness::PollOptions;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Search-bar filter settings.
    pub search: SearchBarConfig,
    /// Diagram fallback settings.
    pub diagram: DiagramConfig,
}

/// Search-bar filter configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchBarConfig {
    /// Classification rules in priority order. The first match wins.
    pub rules: Vec<ClassificationRule>,
    /// Delay before applying a filter after a selector click, so freshly
    /// rendered hits are included.
    pub settle_delay_ms: u64,
    /// How often the search modal is checked for open/close and new hits.
    pub poll_interval_ms: u64,
}

impl Default for SearchBarConfig {
    fn default() -> Self {
        Self {
            rules: builtin_rules(),
            settle_delay_ms: 100,
            poll_interval_ms: 200,
        }
    }
}

impl SearchBarConfig {
    /// Build the validated rule table.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Search`] if the rules are invalid.
    pub fn rule_set(&self) -> Result<RuleSet> {
        Ok(RuleSet::new(self.rules.clone())?)
    }

    /// Delay applied before a filter click takes effect.
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Cadence of search-modal checks.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Diagram fallback configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramConfig {
    /// How long the renderer gets before the static image is shown.
    pub render_timeout_ms: u64,
    /// How often the rendered markup is inspected.
    pub poll_interval_ms: u64,
    /// HTTP timeout for fetching chart files.
    pub http_timeout_secs: u64,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            render_timeout_ms: 1_000,
            poll_interval_ms: 100,
            http_timeout_secs: 10,
        }
    }
}

impl DiagramConfig {
    /// Polling parameters for render detection.
    pub fn poll_options(&self) -> PollOptions {
        PollOptions {
            interval: Duration::from_millis(self.poll_interval_ms),
            timeout: Duration::from_millis(self.render_timeout_ms),
        }
    }

    /// HTTP timeout for chart fetches.
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

impl SiteConfig {
    /// Load configuration from a TOML file, falling back to defaults for
    /// missing fields, and validate it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&content).map_err(|e| SiteError::Config(e.to_string()))?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded site config");
        Ok(config)
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| SiteError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `~/.config/docsite/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config).join("docsite").join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("docsite")
                .join("config.toml")
        } else {
            PathBuf::from("/tmp/docsite-config/config.toml")
        }
    }

    /// Validates this configuration.
    ///
    /// Checks:
    /// - the classification rules form a valid rule table
    /// - `search.poll_interval_ms` is greater than 0
    /// - diagram polling interval and timeout are greater than 0
    /// - diagram polling interval does not exceed the timeout
    /// - `diagram.http_timeout_secs` is greater than 0
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Config`] or [`SiteError::Search`] for the first
    /// invalid field.
    pub fn validate(&self) -> Result<()> {
        self.search.rule_set()?;
        if self.search.poll_interval_ms == 0 {
            return Err(SiteError::Config(
                "search.poll_interval_ms must be greater than 0".into(),
            ));
        }
        self.diagram.poll_options().validate()?;
        if self.diagram.http_timeout_secs == 0 {
            return Err(SiteError::Config(
                "diagram.http_timeout_secs must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}
