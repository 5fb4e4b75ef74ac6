use thiserror::Error;

/// Per-item failure taxonomy.
///
/// Every variant is isolated inside the fetch task boundary and degrades to
/// a failed [`DownloadOutcome`](super::DownloadOutcome); none of them abort
/// sibling tasks or the page loop. Listing failures are a different animal
/// ([`ListingError`](crate::photos::ListingError)) and deliberately do not
/// convert into this type.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("malformed creation timestamp {0:?}")]
    MalformedTimestamp(String),

    #[error("HTTP error {status} downloading {filename}")]
    HttpStatus { status: u16, filename: String },

    #[error("network error downloading {filename}: {source}")]
    Http {
        filename: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("disk error writing {filename}: {source}")]
    Persistence {
        filename: String,
        #[source]
        source: std::io::Error,
    },

    #[error("item is missing required field {0}")]
    MissingField(&'static str),
}
