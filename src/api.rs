//! Movie API trait and client configuration.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{MovieDetails, Result, SearchQuery, SearchResponsePage};

/// Default endpoint of the OMDb API.
pub const DEFAULT_BASE_URL: &str = "https://www.omdbapi.com/";

/// Configuration for a movie API client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API credential sent with every request.
    pub api_key: String,
    /// Endpoint the requests go to.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    10
}

impl ClientConfig {
    /// Creates a configuration for the public endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
            timeout: default_timeout(),
        }
    }

    /// Points the client at another endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the request timeout in seconds.
    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Remote source of movie metadata.
///
/// A search that matches nothing is data (`success == false`), while a
/// details lookup that matches nothing is an error
/// ([`Error::NotFound`](crate::Error::NotFound)). Neither call caches or
/// retries.
#[async_trait]
pub trait MovieApi: Send + Sync {
    /// Searches one page of titles.
    async fn search(&self, query: &SearchQuery) -> Result<SearchResponsePage>;

    /// Fetches the full record for one id.
    async fn details(&self, imdb_id: &str) -> Result<MovieDetails>;
}
