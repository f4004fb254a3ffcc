//! OMDb API client.
//!
//! Search and details lookups against the OMDb JSON API. Wire shapes stay
//! private to this module; callers only see [`SearchResponsePage`] and
//! [`MovieDetails`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::details::{present, Rating};
use crate::fetcher::Fetcher;
use crate::fetcher_http::HttpFetcher;
use crate::{
    ClientConfig, Error, MediaType, MovieApi, MovieDetails, Result, SearchQuery,
    SearchResponsePage, SearchResult,
};

/// Message for any transport failure during a search.
pub const SEARCH_FAILED: &str =
    "Failed to search movies. Please check your connection and try again.";

/// Message for any transport failure during a details lookup.
pub const DETAILS_FAILED: &str = "Failed to load movie details. Please try again.";

const DEFAULT_NO_RESULTS: &str = "No results found";
const DEFAULT_NOT_FOUND: &str = "Movie not found";

/// Client for the OMDb API.
pub struct OmdbClient {
    config: ClientConfig,
    base_url: Url,
    fetcher: Arc<dyn Fetcher>,
}

impl OmdbClient {
    /// Creates a client that talks HTTP to `config.base_url`.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(Duration::from_secs(config.timeout))?;
        Self::with_fetcher(config, Arc::new(fetcher))
    }

    /// Creates a client over a custom transport.
    pub fn with_fetcher(config: ClientConfig, fetcher: Arc<dyn Fetcher>) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)?;
        Ok(Self {
            config,
            base_url,
            fetcher,
        })
    }

    /// Builds the search request URL. `type` is only sent when filtering.
    pub fn search_url(&self, query: &SearchQuery) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut params = url.query_pairs_mut();
            params
                .append_pair("apikey", &self.config.api_key)
                .append_pair("s", query.query.trim())
                .append_pair("page", &query.page.to_string());
            if let Some(kind) = query.type_filter.api_value() {
                params.append_pair("type", kind);
            }
        }
        url
    }

    /// Builds the details request URL.
    pub fn details_url(&self, imdb_id: &str) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("apikey", &self.config.api_key)
            .append_pair("i", imdb_id.trim())
            .append_pair("plot", "full");
        url
    }
}

#[async_trait]
impl MovieApi for OmdbClient {
    async fn search(&self, query: &SearchQuery) -> Result<SearchResponsePage> {
        if query.is_blank() {
            return Err(Error::InvalidQuery("Query cannot be empty".into()));
        }

        let url = self.search_url(query);
        debug!(
            "OMDb search '{}' page {} type {}",
            query.query.trim(),
            query.page,
            query.type_filter
        );

        let body = self
            .fetcher
            .fetch(&url)
            .await
            .map_err(|e| network_error(SEARCH_FAILED, e))?;

        let page = parse_search(&body).map_err(|e| network_error(SEARCH_FAILED, e))?;
        debug!(
            "OMDb search returned {} of {} results",
            page.results.len(),
            page.total_results
        );
        Ok(page)
    }

    async fn details(&self, imdb_id: &str) -> Result<MovieDetails> {
        if imdb_id.trim().is_empty() {
            return Err(Error::InvalidQuery("Movie ID not provided".into()));
        }

        let url = self.details_url(imdb_id);
        debug!("OMDb details {}", imdb_id.trim());

        let body = self
            .fetcher
            .fetch(&url)
            .await
            .map_err(|e| network_error(DETAILS_FAILED, e))?;

        match parse_details(&body) {
            Ok(details) => Ok(details),
            Err(Error::NotFound(message)) => Err(Error::NotFound(message)),
            Err(e) => Err(network_error(DETAILS_FAILED, e)),
        }
    }
}

/// Logs the cause and replaces it with the user-facing message.
fn network_error(message: &str, cause: Error) -> Error {
    // reqwest errors carry the request URL, which carries the api key.
    let cause = match cause {
        Error::Http(e) => Error::Http(e.without_url()),
        other => other,
    };
    warn!("{}: {}", message, cause);
    Error::Network(message.to_string())
}

fn is_true(flag: &str) -> bool {
    flag.trim().eq_ignore_ascii_case("true")
}

#[derive(Deserialize)]
struct OmdbSearchResponse {
    #[serde(rename = "Search")]
    search: Option<Vec<OmdbSearchItem>>,
    #[serde(rename = "totalResults")]
    total_results: Option<String>,
    #[serde(rename = "Response", default)]
    response: String,
    #[serde(rename = "Error")]
    error: Option<String>,
}

#[derive(Deserialize)]
struct OmdbSearchItem {
    #[serde(rename = "imdbID", default)]
    imdb_id: String,
    #[serde(rename = "Title", default)]
    title: String,
    #[serde(rename = "Year", default)]
    year: String,
    #[serde(rename = "Type")]
    kind: Option<String>,
    #[serde(rename = "Poster")]
    poster: Option<String>,
}

impl From<OmdbSearchItem> for SearchResult {
    fn from(item: OmdbSearchItem) -> Self {
        SearchResult {
            imdb_id: item.imdb_id,
            title: item.title,
            year: item.year,
            media_type: item.kind.map(MediaType::from).unwrap_or_default(),
            poster: item.poster,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OmdbDetails {
    #[serde(rename = "imdbID", default)]
    imdb_id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    year: String,
    #[serde(rename = "Type")]
    kind: Option<String>,
    poster: Option<String>,
    rated: Option<String>,
    released: Option<String>,
    runtime: Option<String>,
    genre: Option<String>,
    director: Option<String>,
    writer: Option<String>,
    actors: Option<String>,
    plot: Option<String>,
    language: Option<String>,
    country: Option<String>,
    awards: Option<String>,
    ratings: Option<Vec<OmdbRating>>,
    metascore: Option<String>,
    #[serde(rename = "imdbRating")]
    imdb_rating: Option<String>,
    #[serde(rename = "imdbVotes")]
    imdb_votes: Option<String>,
    #[serde(rename = "DVD")]
    dvd: Option<String>,
    box_office: Option<String>,
    production: Option<String>,
    website: Option<String>,
    #[serde(default)]
    response: String,
    error: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OmdbRating {
    source: String,
    value: String,
}

impl From<OmdbDetails> for MovieDetails {
    fn from(raw: OmdbDetails) -> Self {
        MovieDetails {
            imdb_id: raw.imdb_id,
            title: raw.title,
            year: raw.year,
            media_type: raw.kind.map(MediaType::from).unwrap_or_default(),
            poster: present(raw.poster),
            rated: present(raw.rated),
            released: present(raw.released),
            runtime: present(raw.runtime),
            genre: present(raw.genre),
            director: present(raw.director),
            writer: present(raw.writer),
            actors: present(raw.actors),
            plot: present(raw.plot),
            language: present(raw.language),
            country: present(raw.country),
            awards: present(raw.awards),
            ratings: raw
                .ratings
                .unwrap_or_default()
                .into_iter()
                .filter_map(|r| {
                    present(Some(r.value)).map(|value| Rating {
                        source: r.source,
                        value,
                    })
                })
                .collect(),
            metascore: present(raw.metascore),
            imdb_rating: present(raw.imdb_rating),
            imdb_votes: present(raw.imdb_votes),
            dvd: present(raw.dvd),
            box_office: present(raw.box_office),
            production: present(raw.production),
            website: present(raw.website),
        }
    }
}

/// Decodes a search response body.
fn parse_search(body: &str) -> Result<SearchResponsePage> {
    let raw: OmdbSearchResponse =
        serde_json::from_str(body).map_err(|e| Error::Parse(e.to_string()))?;

    if !is_true(&raw.response) {
        let message = raw
            .error
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_NO_RESULTS.to_string());
        return Ok(SearchResponsePage::no_results(message));
    }

    let results: Vec<SearchResult> = raw
        .search
        .unwrap_or_default()
        .into_iter()
        .map(SearchResult::from)
        .collect();
    let total_results = raw
        .total_results
        .and_then(|total| total.trim().parse::<u32>().ok())
        .unwrap_or(results.len() as u32);

    Ok(SearchResponsePage::found(results, total_results))
}

/// Decodes a details response body. "Not found" is an error here.
fn parse_details(body: &str) -> Result<MovieDetails> {
    let raw: OmdbDetails = serde_json::from_str(body).map_err(|e| Error::Parse(e.to_string()))?;

    if !is_true(&raw.response) {
        let message = raw
            .error
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_NOT_FOUND.to_string());
        return Err(Error::NotFound(message));
    }

    Ok(MovieDetails::from(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TypeFilter;
    use std::sync::Mutex;
    use tokio_test::{assert_err, assert_ok};

    enum Reply {
        Body(&'static str),
        Status(u16),
    }

    struct MockFetcher {
        reply: Reply,
        urls: Mutex<Vec<Url>>,
    }

    impl MockFetcher {
        fn new(reply: Reply) -> Arc<Self> {
            Arc::new(Self {
                reply,
                urls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.urls.lock().unwrap().len()
        }

        fn last_param(&self, key: &str) -> Option<String> {
            let urls = self.urls.lock().unwrap();
            let value = urls
                .last()?
                .query_pairs()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.into_owned());
            value
        }
    }

    #[async_trait]
    impl Fetcher for MockFetcher {
        async fn fetch(&self, url: &Url) -> Result<String> {
            self.urls.lock().unwrap().push(url.clone());
            match self.reply {
                Reply::Body(body) => Ok(body.to_string()),
                Reply::Status(code) => Err(Error::Status(code)),
            }
        }
    }

    fn client(fetcher: Arc<MockFetcher>) -> OmdbClient {
        OmdbClient::with_fetcher(ClientConfig::new("test-key"), fetcher).unwrap()
    }

    const BATMAN_PAGE: &str = r#"{
        "Search": [
            {"Title": "Batman Begins", "Year": "2005", "imdbID": "tt0372784", "Type": "movie",
             "Poster": "https://m.media-amazon.com/images/M/begins.jpg"},
            {"Title": "Batman: The Animated Series", "Year": "1992–1995", "imdbID": "tt0103359",
             "Type": "series", "Poster": "N/A"},
            {"Title": "Batman: Arkham City", "Year": "2011", "imdbID": "tt1568322", "Type": "game",
             "Poster": "https://m.media-amazon.com/images/M/arkham.jpg"}
        ],
        "totalResults": "568",
        "Response": "True"
    }"#;

    const NOT_FOUND_SEARCH: &str = r#"{"Response":"False","Error":"Movie not found!"}"#;

    const DETAILS: &str = r#"{
        "Title": "The Dark Knight", "Year": "2008", "Rated": "PG-13", "Released": "18 Jul 2008",
        "Runtime": "152 min", "Genre": "Action, Crime, Drama", "Director": "Christopher Nolan",
        "Writer": "Jonathan Nolan, Christopher Nolan", "Actors": "Christian Bale, Heath Ledger",
        "Plot": "When the menace known as the Joker wreaks havoc...",
        "Language": "English, Mandarin",
        "Country": "United States, United Kingdom", "Awards": "Won 2 Oscars.",
        "Poster": "https://m.media-amazon.com/images/M/tdk.jpg",
        "Ratings": [
            {"Source": "Internet Movie Database", "Value": "9.0/10"},
            {"Source": "Rotten Tomatoes", "Value": "94%"},
            {"Source": "Metacritic", "Value": "N/A"}
        ],
        "Metascore": "84", "imdbRating": "9.0", "imdbVotes": "2,900,000", "imdbID": "tt0468569",
        "Type": "movie", "DVD": "N/A", "BoxOffice": "$534,987,076", "Production": "N/A",
        "Website": "N/A", "Response": "True"
    }"#;

    #[test]
    fn test_search_url_without_type() {
        let client = client(MockFetcher::new(Reply::Body("{}")));
        let url = client.search_url(&SearchQuery::new("star wars").with_page(2));
        assert_eq!(
            url.as_str(),
            "https://www.omdbapi.com/?apikey=test-key&s=star+wars&page=2"
        );
    }

    #[test]
    fn test_search_url_with_type() {
        let client = client(MockFetcher::new(Reply::Body("{}")));
        let url = client.search_url(&SearchQuery::new("batman").with_type(TypeFilter::Series));
        assert!(url.as_str().ends_with("&s=batman&page=1&type=series"));
    }

    #[test]
    fn test_details_url() {
        let client = client(MockFetcher::new(Reply::Body("{}")));
        let url = client.details_url("tt0468569");
        assert_eq!(
            url.as_str(),
            "https://www.omdbapi.com/?apikey=test-key&i=tt0468569&plot=full"
        );
    }

    #[test]
    fn test_with_fetcher_rejects_bad_base_url() {
        let config = ClientConfig::new("k").with_base_url("not a url");
        let result = OmdbClient::with_fetcher(config, MockFetcher::new(Reply::Body("{}")));
        assert!(matches!(result, Err(Error::UrlParse(_))));
    }

    #[test]
    fn test_parse_search_keeps_remote_order() {
        let page = parse_search(BATMAN_PAGE).unwrap();
        assert!(page.success);
        assert_eq!(page.total_results, 568);
        let ids: Vec<_> = page.results.iter().map(|r| r.imdb_id.as_str()).collect();
        assert_eq!(ids, vec!["tt0372784", "tt0103359", "tt1568322"]);
    }

    #[test]
    fn test_parse_search_media_types() {
        let page = parse_search(BATMAN_PAGE).unwrap();
        assert_eq!(page.results[0].media_type, MediaType::Movie);
        assert_eq!(page.results[1].media_type, MediaType::Series);
        // "game" is not a kind the app knows
        assert_eq!(page.results[2].media_type, MediaType::Movie);
        assert_eq!(page.results[1].poster.as_deref(), Some("N/A"));
    }

    #[test]
    fn test_parse_search_no_results_is_data() {
        let page = parse_search(NOT_FOUND_SEARCH).unwrap();
        assert!(!page.success);
        assert!(page.results.is_empty());
        assert_eq!(page.total_results, 0);
        assert_eq!(page.error.as_deref(), Some("Movie not found!"));
    }

    #[test]
    fn test_parse_search_no_results_default_message() {
        let page = parse_search(r#"{"Response":"False"}"#).unwrap();
        assert_eq!(page.error.as_deref(), Some("No results found"));
    }

    #[test]
    fn test_parse_search_bad_total_falls_back_to_page_length() {
        let body = r#"{"Search":[{"Title":"A","Year":"2000","imdbID":"tt1","Type":"movie"}],
                       "totalResults":"lots","Response":"True"}"#;
        let page = parse_search(body).unwrap();
        assert_eq!(page.total_results, 1);
        assert!(page.results[0].poster.is_none());
    }

    #[test]
    fn test_parse_search_invalid_json() {
        assert!(matches!(parse_search("<html>"), Err(Error::Parse(_))));
    }

    #[test]
    fn test_parse_details_filters_sentinel() {
        let details = parse_details(DETAILS).unwrap();
        assert_eq!(details.imdb_id, "tt0468569");
        assert_eq!(details.title, "The Dark Knight");
        assert_eq!(details.rated.as_deref(), Some("PG-13"));
        assert_eq!(details.box_office.as_deref(), Some("$534,987,076"));
        assert!(details.dvd.is_none());
        assert!(details.production.is_none());
        assert!(details.website.is_none());
        assert_eq!(details.genres(), vec!["Action", "Crime", "Drama"]);
    }

    #[test]
    fn test_parse_details_ratings_drop_absent_values() {
        let details = parse_details(DETAILS).unwrap();
        assert_eq!(details.ratings.len(), 2);
        assert_eq!(details.ratings[1].source, "Rotten Tomatoes");
        assert_eq!(details.ratings[1].value, "94%");
    }

    #[test]
    fn test_parse_details_not_found_is_error() {
        let body = r#"{"Response":"False","Error":"Incorrect IMDb ID."}"#;
        let err = parse_details(body).unwrap_err();
        assert!(matches!(err, Error::NotFound(ref m) if m == "Incorrect IMDb ID."));

        let err = parse_details(r#"{"Response":"False"}"#).unwrap_err();
        assert!(matches!(err, Error::NotFound(ref m) if m == "Movie not found"));
    }

    #[tokio::test]
    async fn test_search_sends_expected_parameters() {
        let fetcher = MockFetcher::new(Reply::Body(BATMAN_PAGE));
        let client = client(fetcher.clone());
        let query = SearchQuery::new("  batman ")
            .with_type(TypeFilter::Movie)
            .with_page(4);
        assert_ok!(client.search(&query).await);
        assert_eq!(fetcher.last_param("s").as_deref(), Some("batman"));
        assert_eq!(fetcher.last_param("page").as_deref(), Some("4"));
        assert_eq!(fetcher.last_param("type").as_deref(), Some("movie"));
        assert_eq!(fetcher.last_param("apikey").as_deref(), Some("test-key"));
    }

    #[tokio::test]
    async fn test_search_all_omits_type() {
        let fetcher = MockFetcher::new(Reply::Body(BATMAN_PAGE));
        let client = client(fetcher.clone());
        assert_ok!(client.search(&SearchQuery::new("batman")).await);
        assert_eq!(fetcher.last_param("type"), None);
    }

    #[tokio::test]
    async fn test_search_no_results_is_ok() {
        let client = client(MockFetcher::new(Reply::Body(NOT_FOUND_SEARCH)));
        let page = client.search(&SearchQuery::new("zzzzqx")).await.unwrap();
        assert!(!page.success);
        assert_eq!(page.error.as_deref(), Some("Movie not found!"));
    }

    #[tokio::test]
    async fn test_search_http_status_is_network_error() {
        let client = client(MockFetcher::new(Reply::Status(500)));
        let err = client.search(&SearchQuery::new("batman")).await.unwrap_err();
        assert!(matches!(err, Error::Network(ref m) if m == SEARCH_FAILED));
    }

    #[tokio::test]
    async fn test_search_garbage_body_is_network_error() {
        let client = client(MockFetcher::new(Reply::Body("<html>bad gateway</html>")));
        let err = client.search(&SearchQuery::new("batman")).await.unwrap_err();
        assert!(matches!(err, Error::Network(_)));
    }

    #[tokio::test]
    async fn test_search_blank_query_skips_network() {
        let fetcher = MockFetcher::new(Reply::Body(BATMAN_PAGE));
        let client = client(fetcher.clone());
        let result = client.search(&SearchQuery::new("   ")).await;
        assert!(matches!(result, Err(Error::InvalidQuery(_))));
        assert_eq!(fetcher.calls(), 0);
    }

    #[tokio::test]
    async fn test_search_does_not_cache() {
        let fetcher = MockFetcher::new(Reply::Body(BATMAN_PAGE));
        let client = client(fetcher.clone());
        let query = SearchQuery::new("batman");
        assert_ok!(client.search(&query).await);
        assert_ok!(client.search(&query).await);
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn test_details_success() {
        let fetcher = MockFetcher::new(Reply::Body(DETAILS));
        let client = client(fetcher.clone());
        let details = client.details("tt0468569").await.unwrap();
        assert_eq!(details.director.as_deref(), Some("Christopher Nolan"));
        assert_eq!(fetcher.last_param("plot").as_deref(), Some("full"));
        assert_eq!(fetcher.last_param("i").as_deref(), Some("tt0468569"));
    }

    #[tokio::test]
    async fn test_details_not_found_is_error() {
        let client = client(MockFetcher::new(Reply::Body(
            r#"{"Response":"False","Error":"Incorrect IMDb ID."}"#,
        )));
        let err = client.details("tt0000000").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert!(!err.is_transport());
    }

    #[tokio::test]
    async fn test_details_transport_failure() {
        let client = client(MockFetcher::new(Reply::Status(503)));
        let err = client.details("tt0468569").await.unwrap_err();
        assert!(matches!(err, Error::Network(ref m) if m == DETAILS_FAILED));
    }

    #[tokio::test]
    async fn test_details_blank_id() {
        let fetcher = MockFetcher::new(Reply::Body(DETAILS));
        let client = client(fetcher.clone());
        assert_err!(client.details(" ").await);
        assert_eq!(fetcher.calls(), 0);
    }
}
