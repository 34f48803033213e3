//! Bike feed error types.

/// Errors from fetching or decoding the GBFS feeds.
///
/// Either feed failing fails the whole aggregation; there are no partial
/// results.
#[derive(Debug, thiserror::Error)]
pub enum BikeError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Feed returned an error status
    #[error("feed error {status} from {url}")]
    Feed { status: u16, url: String },

    /// Failed to parse a feed document
    #[error("JSON parse error: {message}")]
    Json { message: String },
}
