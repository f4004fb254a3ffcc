//! Search query representation and its location form.
//!
//! A location is the query string a browser would carry in its address bar
//! (`q=batman&type=movie&page=2`). Encoding it is how a search view is
//! shared or reloaded.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::{form_urlencoded, Url};

use crate::Error;

/// Location parameter holding the search text.
pub const PARAM_QUERY: &str = "q";
/// Location parameter holding the type filter, omitted for [`TypeFilter::All`].
pub const PARAM_TYPE: &str = "type";
/// Location parameter holding the page number, omitted for page 1.
pub const PARAM_PAGE: &str = "page";

/// Media-kind discriminator narrowing search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeFilter {
    /// No filtering.
    #[default]
    All,
    Movie,
    Series,
    Episode,
}

impl TypeFilter {
    /// Every filter, in the order the search bar offers them.
    pub const VARIANTS: [TypeFilter; 4] = [
        TypeFilter::All,
        TypeFilter::Movie,
        TypeFilter::Series,
        TypeFilter::Episode,
    ];

    /// Returns the parameter value for this filter.
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeFilter::All => "all",
            TypeFilter::Movie => "movie",
            TypeFilter::Series => "series",
            TypeFilter::Episode => "episode",
        }
    }

    /// Returns the human label shown next to the search bar.
    pub fn label(&self) -> &'static str {
        match self {
            TypeFilter::All => "All Types",
            TypeFilter::Movie => "Movies",
            TypeFilter::Series => "TV Series",
            TypeFilter::Episode => "Episodes",
        }
    }

    /// Returns the value to send upstream, or `None` when the request
    /// must stay unfiltered.
    pub fn api_value(&self) -> Option<&'static str> {
        match self {
            TypeFilter::All => None,
            other => Some(other.as_str()),
        }
    }

    /// Parses a location parameter, treating anything unknown as `All`.
    pub fn from_param(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(TypeFilter::All),
            "movie" => Ok(TypeFilter::Movie),
            "series" => Ok(TypeFilter::Series),
            "episode" => Ok(TypeFilter::Episode),
            other => Err(Error::InvalidQuery(format!(
                "unknown type filter '{}' (expected all, movie, series or episode)",
                other
            ))),
        }
    }
}

/// A search request: text, type filter and 1-based page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// The search text.
    pub query: String,
    /// Media-kind filter.
    pub type_filter: TypeFilter,
    /// Page number (1-indexed).
    pub page: u32,
}

impl SearchQuery {
    /// Creates a query for the first page with no type filter.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            type_filter: TypeFilter::All,
            page: 1,
        }
    }

    /// Sets the type filter.
    pub fn with_type(mut self, type_filter: TypeFilter) -> Self {
        self.type_filter = type_filter;
        self
    }

    /// Sets the page number. Page 0 is raised to 1.
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    /// Returns true when the text is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.query.trim().is_empty()
    }

    /// Encodes the query as a location string.
    pub fn to_location(&self) -> String {
        let mut params = form_urlencoded::Serializer::new(String::new());
        params.append_pair(PARAM_QUERY, &self.query);
        if let Some(kind) = self.type_filter.api_value() {
            params.append_pair(PARAM_TYPE, kind);
        }
        if self.page > 1 {
            params.append_pair(PARAM_PAGE, &self.page.to_string());
        }
        params.finish()
    }

    /// Decodes a location.
    ///
    /// Accepts a bare query string, one with a leading `?`, or a full URL.
    /// Missing or malformed parameters fall back to their defaults, so the
    /// result may carry a blank query.
    pub fn from_location(location: &str) -> Self {
        let location = location.trim();
        let raw = match Url::parse(location) {
            Ok(url) => url.query().unwrap_or_default().to_string(),
            Err(_) => location.trim_start_matches('?').to_string(),
        };

        let mut query = SearchQuery::new(String::new());
        for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
            match key.as_ref() {
                PARAM_QUERY => query.query = value.into_owned(),
                PARAM_TYPE => query.type_filter = TypeFilter::from_param(&value),
                PARAM_PAGE => {
                    query.page = value
                        .trim()
                        .parse::<u32>()
                        .ok()
                        .filter(|page| *page >= 1)
                        .unwrap_or(1)
                }
                _ => {}
            }
        }
        query
    }
}
