//! Error types for the movie search library.

use thiserror::Error;

/// Result type alias for cinesearch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to the movie API or driving a search.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP error! status: {0}")]
    Status(u16),

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Transport failure, normalized into a message fit for the user.
    #[error("{0}")]
    Network(String),

    /// The remote source has no item with the requested id.
    #[error("{0}")]
    NotFound(String),

    /// Invalid query.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// URL parsing error.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl Error {
    /// Returns true for failures of the transport rather than of the data.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::Http(_) | Error::Status(_) | Error::Parse(_) | Error::Network(_)
        )
    }
}
