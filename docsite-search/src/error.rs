//! Error types for the docsite-search crate.
//!
//! Classification and filtering never fail. Errors only arise when a
//! rule table is built from configuration or a selector is parsed
//! strictly.

/// Errors raised while building rule tables or parsing selectors.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    /// Invalid classification rule table.
    #[error("config error: {0}")]
    Config(String),

    /// A content-type or selector string could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Convenience type alias for docsite-search results.
pub type Result<T> = std::result::Result<T, FilterError>;
