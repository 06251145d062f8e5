//! Diagram with static-image fallback.
//!
//! A diagram is described by a chart source file rendered client-side by a
//! third-party renderer, plus a pre-rendered image. When the source cannot
//! be loaded, or the renderer does not produce a diagram in time, the image
//! is shown instead.
//!
//! # Lifecycle
//!
//! ```text
//! ┌─────────┐  load ok   ┌───────┐  svg seen    ┌──────────┐
//! │ Loading ├───────────►│ Chart ├─────────────►│ rendered │
//! └────┬────┘            └───┬───┘              └──────────┘
//!      │ load error          │ error marker / timeout
//!      ▼                     ▼
//! ┌──────────────────────────────┐
//! │           Fallback           │
//! └──────────────────────────────┘
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::DiagramConfig;
use crate::error::{Result, SiteError};
use crate::readiness::{PollOptions, poll_until};
use crate::theme::ColorMode;

/// Alt text used when none is configured.
pub const DEFAULT_ALT: &str = "Diagram (fallback image)";

/// Notice shown under the fallback image.
pub const FALLBACK_NOTICE: &str = "Please note that the original, clickable diagram couldn't be \
rendered, probably due to a Mermaid.js issue. A static image is displayed instead; you can click \
on it to zoom in, and even right click and choose \"Save as…\" to download it and view it offline.";

/// Text the renderer emits into the container when the source is invalid.
const SYNTAX_ERROR_MARKER: &str = "Syntax error";
/// Class of the error glyph the renderer draws on failure.
const ERROR_ICON_MARKER: &str = "error-icon";
/// Prefix of the per-diagram container class.
const CONTAINER_CLASS_PREFIX: &str = "mermaid-container-";

/// A diagram declaration as written in a documentation page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagramFallback {
    /// Location of the chart source (`http(s)://` URL or file path).
    pub chart_file: String,
    /// Image shown on failure in light mode (and in dark mode without a dark image).
    pub fallback_image: String,
    /// Image shown on failure in dark mode.
    #[serde(default)]
    pub fallback_image_dark: Option<String>,
    /// Alt text for the fallback image.
    #[serde(default)]
    pub alt: Option<String>,
    /// Class overriding the default wrapper class.
    #[serde(default)]
    pub class_name: Option<String>,
}

/// What should currently be displayed for a diagram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagramView {
    /// The chart source is still being fetched.
    Loading {
        /// Wrapper class.
        class_name: String,
    },
    /// The chart source is handed to the renderer.
    Chart {
        /// Wrapper classes, including the per-diagram container class.
        class_name: String,
        /// Trimmed chart source.
        source: String,
    },
    /// The static image is shown.
    Fallback {
        /// Wrapper class.
        class_name: String,
        /// Image URL for the active colour mode.
        image: String,
        /// Alt text.
        alt: String,
        /// Whether the image is zoomable on click.
        zoomable: bool,
        /// Notice explaining why an image is shown.
        notice: String,
    },
}

impl DiagramView {
    /// Returns true for [`DiagramView::Fallback`].
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

/// Render state derived from the markup inside the diagram container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStatus {
    /// Nothing conclusive yet.
    Pending,
    /// An SVG diagram is present.
    Rendered,
    /// The renderer reported an error.
    Failed,
}

impl RenderStatus {
    /// Inspect container markup. `None` means the container is not in the page.
    pub fn inspect(markup: Option<&str>) -> Self {
        let Some(markup) = markup else {
            return Self::Pending;
        };
        if markup.contains(SYNTAX_ERROR_MARKER) || markup.contains(ERROR_ICON_MARKER) {
            Self::Failed
        } else if markup.contains("<svg") {
            Self::Rendered
        } else {
            Self::Pending
        }
    }
}

/// Fetches chart sources over HTTP or from disk.
#[derive(Debug, Clone)]
pub struct ChartLoader {
    client: reqwest::Client,
}

impl ChartLoader {
    /// Build a loader whose HTTP requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Http`] if the client cannot be constructed.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SiteError::Http(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Build a loader from diagram configuration.
    ///
    /// # Errors
    ///
    /// Same as [`ChartLoader::new`].
    pub fn from_config(config: &DiagramConfig) -> Result<Self> {
        Self::new(config.http_timeout())
    }

    /// Load a chart source and trim surrounding whitespace.
    ///
    /// # Errors
    ///
    /// - [`SiteError::Http`] if the request fails or returns a non-success status
    /// - [`SiteError::Chart`] if the file cannot be read or the source is empty
    pub async fn load(&self, source: &str) -> Result<String> {
        let content = if is_remote(source) {
            self.fetch(source).await?
        } else {
            tokio::fs::read_to_string(source)
                .await
                .map_err(|e| SiteError::Chart(format!("failed to read chart file {source}: {e}")))?
        };

        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(SiteError::Chart(format!("chart file {source} is empty")));
        }
        tracing::debug!(source, bytes = trimmed.len(), "chart file loaded");
        Ok(trimmed.to_string())
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SiteError::Http(format!("failed to load chart file: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(SiteError::Http(format!("failed to load chart file: {status}")));
        }
        response
            .text()
            .await
            .map_err(|e| SiteError::Http(format!("failed to read chart body: {e}")))
    }
}

fn is_remote(source: &str) -> bool {
    let lower = source.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

impl DiagramFallback {
    /// Declare a diagram with its chart source and light-mode image.
    pub fn new(chart_file: impl Into<String>, fallback_image: impl Into<String>) -> Self {
        Self {
            chart_file: chart_file.into(),
            fallback_image: fallback_image.into(),
            fallback_image_dark: None,
            alt: None,
            class_name: None,
        }
    }

    /// Per-diagram container class: the chart path with every
    /// non-alphanumeric character removed.
    pub fn container_class(&self) -> String {
        let id: String = self
            .chart_file
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .collect();
        format!("{CONTAINER_CLASS_PREFIX}{id}")
    }

    /// Fallback image for the given colour mode.
    pub fn image_for(&self, mode: ColorMode) -> &str {
        match (&self.fallback_image_dark, mode) {
            (Some(dark), ColorMode::Dark) => dark,
            _ => &self.fallback_image,
        }
    }

    /// Configured alt text or [`DEFAULT_ALT`].
    pub fn alt_text(&self) -> &str {
        self.alt.as_deref().unwrap_or(DEFAULT_ALT)
    }

    fn wrapper_class(&self, default: &str) -> String {
        self.class_name.clone().unwrap_or_else(|| default.to_string())
    }

    /// View shown while the chart source is loading.
    pub fn loading_view(&self) -> DiagramView {
        DiagramView::Loading {
            class_name: self.wrapper_class("mermaid-loading-container"),
        }
    }

    /// View handing the source to the renderer.
    pub fn chart_view(&self, source: String) -> DiagramView {
        DiagramView::Chart {
            class_name: format!(
                "{} {}",
                self.wrapper_class("mermaid-container"),
                self.container_class()
            ),
            source,
        }
    }

    /// View showing the static image.
    pub fn fallback_view(&self, mode: ColorMode) -> DiagramView {
        DiagramView::Fallback {
            class_name: self.wrapper_class("mermaid-fallback-container"),
            image: self.image_for(mode).to_string(),
            alt: self.alt_text().to_string(),
            zoomable: true,
            notice: FALLBACK_NOTICE.to_string(),
        }
    }

    /// Load the chart source: [`DiagramView::Chart`] on success, the
    /// fallback otherwise.
    pub async fn load(&self, loader: &ChartLoader, mode: ColorMode) -> DiagramView {
        match loader.load(&self.chart_file).await {
            Ok(source) => self.chart_view(source),
            Err(e) => {
                tracing::warn!(
                    chart = %self.chart_file,
                    error = %e,
                    "chart load failed, using fallback image"
                );
                self.fallback_view(mode)
            }
        }
    }

    /// Wait for the renderer to turn a [`DiagramView::Chart`] into a diagram.
    ///
    /// `read_markup` returns the current markup of the container (see
    /// [`container_class`](Self::container_class)), or `None` while it is
    /// absent. The chart view is kept once an SVG appears; an error marker
    /// or running out of time switches to the fallback. Other views are
    /// returned unchanged.
    pub async fn confirm_render<P>(
        &self,
        view: DiagramView,
        mode: ColorMode,
        mut read_markup: P,
        options: PollOptions,
    ) -> DiagramView
    where
        P: FnMut() -> Option<String>,
    {
        if !matches!(view, DiagramView::Chart { .. }) {
            return view;
        }

        let mut status = RenderStatus::Pending;
        let readiness = poll_until(
            || {
                status = RenderStatus::inspect(read_markup().as_deref());
                status != RenderStatus::Pending
            },
            options,
        )
        .await;

        match status {
            RenderStatus::Rendered => view,
            RenderStatus::Failed => {
                tracing::warn!(
                    chart = %self.chart_file,
                    "diagram renderer reported an error, using fallback image"
                );
                self.fallback_view(mode)
            }
            RenderStatus::Pending => {
                if let Err(e) = readiness.into_result("diagram render") {
                    tracing::warn!(chart = %self.chart_file, error = %e, "using fallback image");
                }
                self.fallback_view(mode)
            }
        }
    }

    /// [`load`](Self::load) followed by [`confirm_render`](Self::confirm_render).
    pub async fn resolve<P>(
        &self,
        loader: &ChartLoader,
        mode: ColorMode,
        read_markup: P,
        options: PollOptions,
    ) -> DiagramView
    where
        P: FnMut() -> Option<String>,
    {
        let view = self.load(loader, mode).await;
        self.confirm_render(view, mode, read_markup, options).await
    }
}
