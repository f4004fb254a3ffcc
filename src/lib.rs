//! # cinesearch
//!
//! Movie search over the OMDb API, with the state handling of a search page:
//!
//! - A typed API client where "no results" is data and "not found" is an error
//! - Page arithmetic and an ellipsis-abbreviated page window
//! - A search controller with an explicit state enum, a shareable location
//!   (`q=batman&type=movie&page=2`) and stale-response protection
//! - Plain text rendering of result grids, pagination and details
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use cinesearch::{render, ClientConfig, OmdbClient, SearchController};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = OmdbClient::new(ClientConfig::new("your-api-key"))?;
//!     let mut controller = SearchController::new(Arc::new(client));
//!
//!     controller.mount("q=batman&type=movie").await;
//!     print!("{}", render::render_search_view(&controller));
//!
//!     controller.change_page(2).await;
//!     println!("share: ?{}", controller.location_string());
//!     Ok(())
//! }
//! ```

mod api;
mod error;
mod fetcher;
mod fetcher_http;
mod query;
mod result;

pub mod controller;
pub mod details;
pub mod omdb;
pub mod pagination;
pub mod render;

pub use api::{ClientConfig, MovieApi, DEFAULT_BASE_URL};
pub use controller::{
    load_details, DetailsState, SearchController, SearchOutcome, SearchState, SearchTicket,
};
pub use details::{MovieDetails, Rating, RatingTier};
pub use error::{Error, Result};
pub use fetcher::Fetcher;
pub use fetcher_http::HttpFetcher;
pub use omdb::OmdbClient;
pub use pagination::{PageToken, Pagination, PAGE_SIZE, WINDOW_RADIUS};
pub use query::{SearchQuery, TypeFilter};
pub use result::{MediaType, SearchResponsePage, SearchResult};
