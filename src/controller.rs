//! Search and details view state.
//!
//! [`SearchController`] owns everything the search page shows: the search
//! bar draft, the selected type filter, the location mirrored into the
//! address bar, and one [`SearchState`]. Every request is tagged with a
//! generation number so an answer that arrives after a newer request was
//! issued is dropped instead of overwriting fresher state.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::pagination::Pagination;
use crate::{
    Error, MovieApi, MovieDetails, Result, SearchQuery, SearchResponsePage, SearchResult,
    TypeFilter,
};

const DEFAULT_NO_RESULTS: &str = "No results found";

/// A settled, non-empty page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchOutcome {
    pub results: Vec<SearchResult>,
    pub total_results: u32,
    pub page: u32,
}

impl SearchOutcome {
    /// Pagination for this page.
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.total_results)
    }
}

/// What the search page is currently showing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SearchState {
    /// Nothing searched yet.
    #[default]
    Idle,
    /// A request is in flight.
    Loading,
    /// Results are available.
    Success(SearchOutcome),
    /// The remote source found nothing; holds its explanation.
    Empty(String),
    /// The request failed; holds a message for the user.
    Error(String),
}

impl SearchState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SearchState::Loading)
    }

    /// The settled results, if any.
    pub fn outcome(&self) -> Option<&SearchOutcome> {
        match self {
            SearchState::Success(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// The empty-result or error text, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            SearchState::Empty(message) | SearchState::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Handle for one issued search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    generation: u64,
    query: SearchQuery,
}

impl SearchTicket {
    /// The query this ticket was issued for.
    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Drives searches and keeps the search page state.
pub struct SearchController {
    api: Arc<dyn MovieApi>,
    draft: String,
    selected_type: TypeFilter,
    location: SearchQuery,
    state: SearchState,
    generation: u64,
    has_searched: bool,
}

impl SearchController {
    /// Creates an idle controller.
    pub fn new(api: Arc<dyn MovieApi>) -> Self {
        Self {
            api,
            draft: String::new(),
            selected_type: TypeFilter::All,
            location: SearchQuery::new(String::new()),
            state: SearchState::Idle,
            generation: 0,
            has_searched: false,
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// Text currently in the search bar.
    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn selected_type(&self) -> TypeFilter {
        self.selected_type
    }

    /// The query mirrored into the location.
    pub fn location(&self) -> &SearchQuery {
        &self.location
    }

    /// The location as a shareable query string; empty before any search.
    pub fn location_string(&self) -> String {
        if self.location.is_blank() {
            String::new()
        } else {
            self.location.to_location()
        }
    }

    /// Whether any search has produced results.
    pub fn has_searched(&self) -> bool {
        self.has_searched
    }

    /// Restores a view from a location and searches it if it names a query.
    pub async fn mount(&mut self, location: &str) -> bool {
        let query = SearchQuery::from_location(location);
        self.draft = query.query.clone();
        self.selected_type = query.type_filter;
        if query.is_blank() {
            return false;
        }
        self.search(query).await
    }

    /// Edits the search bar text without searching.
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Searches the draft from page 1. A blank draft is ignored.
    pub async fn submit(&mut self) -> bool {
        let text = self.draft.trim();
        if text.is_empty() {
            debug!("ignoring blank search");
            return false;
        }
        let query = SearchQuery::new(text).with_type(self.selected_type);
        self.search(query).await
    }

    /// Replaces the draft and submits it with the selected filter, as a
    /// suggestion chip does.
    pub async fn search_for(&mut self, text: impl Into<String>) -> bool {
        self.set_draft(text);
        self.submit().await
    }

    /// Searches a popular term across every type, clearing the filter.
    pub async fn search_popular(&mut self, term: impl Into<String>) -> bool {
        self.selected_type = TypeFilter::All;
        self.search_for(term).await
    }

    /// Changes the type filter. Takes effect at once when the draft is not blank.
    pub async fn select_type(&mut self, filter: TypeFilter) -> bool {
        self.selected_type = filter;
        self.submit().await
    }

    /// Moves to another page of the current results.
    ///
    /// Ignored unless results are showing and `page` is within them. The
    /// query and filter come from the location, not the draft.
    pub async fn change_page(&mut self, page: u32) -> bool {
        let in_range = self
            .state
            .outcome()
            .map(|outcome| outcome.pagination().contains(page))
            .unwrap_or(false);
        if !in_range {
            debug!("ignoring page {} outside current results", page);
            return false;
        }
        let query = self.location.clone().with_page(page);
        self.search(query).await
    }

    /// Re-issues the search named by the location.
    pub async fn retry(&mut self) -> bool {
        let query = self.location.clone();
        self.search(query).await
    }

    /// Issues `query` and applies the answer.
    pub async fn search(&mut self, query: SearchQuery) -> bool {
        let Some(ticket) = self.begin(query) else {
            return false;
        };
        let outcome = self.api.search(ticket.query()).await;
        self.complete(ticket, outcome)
    }

    /// Marks a search as in flight and returns its ticket.
    ///
    /// Returns `None` for a blank query. Any ticket issued earlier becomes
    /// stale.
    pub fn begin(&mut self, query: SearchQuery) -> Option<SearchTicket> {
        if query.is_blank() {
            return None;
        }
        self.generation += 1;
        self.state = SearchState::Loading;

        let query = SearchQuery {
            query: query.query.trim().to_string(),
            ..query
        };
        debug!("search #{}: {}", self.generation, query.to_location());
        Some(SearchTicket {
            generation: self.generation,
            query,
        })
    }

    /// Applies the answer for `ticket`.
    ///
    /// Returns false and leaves the state alone when a newer search has been
    /// issued since. Otherwise settles the state and rewrites the location
    /// to the ticket's query.
    pub fn complete(&mut self, ticket: SearchTicket, outcome: Result<SearchResponsePage>) -> bool {
        if ticket.generation != self.generation {
            warn!(
                "discarding stale response #{} (latest is #{})",
                ticket.generation, self.generation
            );
            return false;
        }

        self.state = match outcome {
            Ok(page) if page.success && !page.results.is_empty() => {
                self.has_searched = true;
                SearchState::Success(SearchOutcome {
                    results: page.results,
                    total_results: page.total_results,
                    page: ticket.query.page,
                })
            }
            Ok(page) => {
                SearchState::Empty(page.error.unwrap_or_else(|| DEFAULT_NO_RESULTS.to_string()))
            }
            Err(e) => SearchState::Error(e.to_string()),
        };
        debug!("search #{} settled: {}", ticket.generation, state_name(&self.state));

        self.location = ticket.query;
        true
    }
}

fn state_name(state: &SearchState) -> &'static str {
    match state {
        SearchState::Idle => "idle",
        SearchState::Loading => "loading",
        SearchState::Success(_) => "success",
        SearchState::Empty(_) => "empty",
        SearchState::Error(_) => "error",
    }
}

/// What the details page is currently showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailsState {
    Loading,
    Loaded(Box<MovieDetails>),
    Failed(String),
}

/// Loads the details page for one id.
pub async fn load_details(api: &dyn MovieApi, imdb_id: &str) -> DetailsState {
    if imdb_id.trim().is_empty() {
        return DetailsState::Failed("Movie ID not provided".to_string());
    }
    match api.details(imdb_id.trim()).await {
        Ok(details) => DetailsState::Loaded(Box::new(details)),
        Err(Error::NotFound(message)) => {
            debug!("details {} not found: {}", imdb_id, message);
            DetailsState::Failed(message)
        }
        Err(e) => DetailsState::Failed(e.to_string()),
    }
}
