//! Errors raised while retrieving the catalog resource.

use std::path::PathBuf;
use std::time::Duration;

/// Result type alias using [`CatalogError`].
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Ways a catalog fetch can fail. All of them are a LoadFailure to the store.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Connection or transport error.
    #[error("HTTP error fetching {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The catalog resource answered with a non-success status.
    #[error("catalog resource {url} responded with {status}")]
    Status { url: String, status: u16 },

    /// The document is not a JSON array of records.
    #[error("catalog document could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),

    /// Local catalog file could not be read.
    #[error("could not read catalog file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Fetch did not complete within the configured timeout.
    #[error("catalog fetch timed out after {0:?}")]
    Timeout(Duration),
}
