//! Transport abstraction for retrieving API response bodies.

use async_trait::async_trait;
use url::Url;

use crate::Result;

/// Trait for fetching the body of a GET request.
///
/// Implementations report a non-success status as
/// [`Error::Status`](crate::Error::Status). All configuration (user-agent,
/// timeout) is set at construction time; `fetch` is a simple URL-in,
/// body-out interface.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches the response body of the given URL.
    async fn fetch(&self, url: &Url) -> Result<String>;
}
