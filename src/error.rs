use thiserror::Error;

/// Errors that abort a whole stage: unreadable input, unwritable output,
/// a browser that cannot be started.
#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Browser error: {0}")]
    Browser(String),
}

pub type Result<T> = std::result::Result<T, ScraperError>;

/// Why a single record came back without a value.
///
/// These never halt a batch. The stage writer records `code()` next to the
/// (empty) cell so "looked and found nothing" stays distinguishable from
/// "could not look".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupFailure {
    #[error("fetch failed: {0}")]
    Fetch(String),

    #[error("no value on page")]
    NotFound,

    #[error("page title '{page_title}' does not match the requested name")]
    TitleMismatch { page_title: String },

    #[error("'{0}' is not a CAS registry number")]
    Validation(String),

    #[error("timed out waiting for rendered content")]
    Timeout,

    #[error("element disappeared after render wait")]
    ElementMissing,

    #[error("no URL provided")]
    NoUrl,
}

impl LookupFailure {
    /// Stable identifier written into status columns.
    pub fn code(&self) -> &'static str {
        match self {
            LookupFailure::Fetch(_) => "fetch_failed",
            LookupFailure::NotFound => "not_found",
            LookupFailure::TitleMismatch { .. } => "title_mismatch",
            LookupFailure::Validation(_) => "validation_failed",
            LookupFailure::Timeout => "timeout",
            LookupFailure::ElementMissing => "element_missing",
            LookupFailure::NoUrl => "no_url",
        }
    }
}
