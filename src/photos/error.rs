use thiserror::Error;

/// Listing-call failures. Unlike per-item download errors these are not
/// isolated — they propagate out of the page loop and terminate the run.
#[derive(Debug, Error)]
pub enum ListingError {
    #[error("listing request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("listing request returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
}
