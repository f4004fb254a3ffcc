//! Search result types.

use serde::{Deserialize, Serialize};

/// Kind of media a result describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum MediaType {
    #[default]
    Movie,
    Series,
    Episode,
}

impl MediaType {
    /// Returns the lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Series => "series",
            MediaType::Episode => "episode",
        }
    }

    /// Returns the capitalized badge text.
    pub fn badge(&self) -> &'static str {
        match self {
            MediaType::Movie => "Movie",
            MediaType::Series => "Series",
            MediaType::Episode => "Episode",
        }
    }
}

impl From<&str> for MediaType {
    /// Unrecognized kinds are treated as movies.
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "series" => MediaType::Series,
            "episode" => MediaType::Episode,
            _ => MediaType::Movie,
        }
    }
}

impl From<String> for MediaType {
    fn from(value: String) -> Self {
        MediaType::from(value.as_str())
    }
}

/// A single search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Opaque identifier (an IMDb id for OMDb).
    pub imdb_id: String,
    /// Display title.
    pub title: String,
    /// Release year; may be a range such as `2005–2013`.
    pub year: String,
    /// Kind of media.
    pub media_type: MediaType,
    /// Poster URL as supplied upstream; may be the "N/A" sentinel.
    pub poster: Option<String>,
}

impl SearchResult {
    /// Creates a new movie result with no poster.
    pub fn new(
        imdb_id: impl Into<String>,
        title: impl Into<String>,
        year: impl Into<String>,
    ) -> Self {
        Self {
            imdb_id: imdb_id.into(),
            title: title.into(),
            year: year.into(),
            media_type: MediaType::Movie,
            poster: None,
        }
    }

    /// Sets the media type.
    pub fn with_type(mut self, media_type: MediaType) -> Self {
        self.media_type = media_type;
        self
    }

    /// Sets the poster URL.
    pub fn with_poster(mut self, poster: impl Into<String>) -> Self {
        self.poster = Some(poster.into());
        self
    }
}

/// One page of search results as answered by the remote source.
///
/// `success == false` is the explicit "no results" outcome, not a
/// transport failure: `results` is empty, `total_results` is zero and
/// `error` carries the remote text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponsePage {
    /// Hits in remote order.
    pub results: Vec<SearchResult>,
    /// Total hits across every page.
    pub total_results: u32,
    /// Whether the remote source reported a match.
    pub success: bool,
    /// Remote explanation when `success` is false.
    pub error: Option<String>,
}

impl SearchResponsePage {
    /// Creates a successful page.
    pub fn found(results: Vec<SearchResult>, total_results: u32) -> Self {
        Self {
            results,
            total_results,
            success: true,
            error: None,
        }
    }

    /// Creates the "no results" page.
    pub fn no_results(message: impl Into<String>) -> Self {
        Self {
            results: Vec::new(),
            total_results: 0,
            success: false,
            error: Some(message.into()),
        }
    }
}
