//! Error types for the ratescan-core library.

use thiserror::Error;

/// Main error type for the ratescan library.
#[derive(Error, Debug)]
pub enum RatescanError {
    /// Extraction cascade error.
    #[error("extraction error: {0}")]
    Extract(#[from] ExtractError),

    /// Catalog persistence error.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Error passed through from the content fetch collaborator.
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised inside the extraction cascade.
///
/// `UnknownUnit` and `MalformedNumber` are token-level: collectors recover
/// from them by skipping the offending token, so they only surface from the
/// normalizer functions themselves.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Duration unit word not recognized.
    #[error("unknown duration unit: {0}")]
    UnknownUnit(String),

    /// A matched token carries no usable digits.
    #[error("malformed number: {0}")]
    MalformedNumber(String),

    /// A configured CSS selector does not parse.
    #[error("invalid selector: {0}")]
    Selector(String),

    /// Every strategy in the chain came back empty.
    #[error("no strategy produced a candidate")]
    NoMatch,
}

/// Errors related to catalog persistence.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The catalog file exists but could not be read.
    #[error("failed to read catalog: {0}")]
    Read(#[source] std::io::Error),

    /// The catalog file is not valid JSON.
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// Writing the merged catalog failed. The previous file is left intact.
    #[error("failed to write catalog: {0}")]
    Write(#[source] std::io::Error),
}

/// Errors from the content fetch collaborator.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport-level failure.
    #[error("http error: {0}")]
    Http(String),

    /// The origin answered with a non-success status.
    #[error("unexpected status {status} for {url}")]
    Status { url: String, status: u16 },

    /// The body arrived but could not be decoded into text.
    #[error("failed to decode body: {0}")]
    Decode(String),

    /// The origin answered with an empty body.
    #[error("empty body from {0}")]
    EmptyBody(String),

    /// No saved page exists for the product (file fetcher).
    #[error("no saved page for product {0}")]
    Missing(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the ratescan library.
pub type Result<T> = std::result::Result<T, RatescanError>;
