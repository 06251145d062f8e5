//! Error types for the docsite crate.

use docsite_search::FilterError;

/// Top-level error type for the site components.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request error.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Chart source could not be used.
    #[error("chart error: {0}")]
    Chart(String),

    /// A readiness check did not succeed in time.
    #[error("timed out: {0}")]
    Timeout(String),

    /// Rule table or selector error from the search core.
    #[error(transparent)]
    Search(#[from] FilterError),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, SiteError>;
