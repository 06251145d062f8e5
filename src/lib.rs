//! docsite: presentation logic for a documentation site.
//!
//! The site embeds two third-party widgets whose output it adjusts:
//! a hosted search modal and a client-side diagram renderer.
//!
//! # Architecture
//!
//! - **Search core** (`docsite-search`): classifies hits by URL into
//!   content types and filters them by the reader's selection
//! - **Search bar**: filter buttons, visible hits and sections, result
//!   count footer and empty state for the open modal
//! - **Diagram fallback**: loads chart sources and swaps in a static image
//!   when the renderer fails or stalls
//! - **Readiness**: poll-with-timeout checks for widget output that arrives
//!   without a completion signal

pub mod config;
pub mod diagram;
pub mod error;
pub mod readiness;
pub mod search_bar;
pub mod theme;

pub use config::SiteConfig;
pub use diagram::{ChartLoader, DiagramFallback, DiagramView, RenderStatus};
pub use error::{Result, SiteError};
pub use readiness::{PollOptions, Readiness, poll_until, poll_until_async};
pub use search_bar::{FilterView, ModalEvent, ModalWatch, SearchBarState, filter_buttons};
pub use theme::ColorMode;

pub use docsite_search::{ContentType, RuleSet, SearchHit, Selection, classify, filter};
