//! Text rendering of search and details views.

use crate::controller::{DetailsState, SearchController, SearchState};
use crate::details::{RatingTier, NOT_AVAILABLE};
use crate::pagination::{group_thousands, PageToken, Pagination, PAGE_SIZE};
use crate::{MovieDetails, SearchResult, TypeFilter};

/// Placeholder shown when a poster is missing or fails to load.
pub const FALLBACK_POSTER: &str = "data:image/svg+xml;utf8,<svg xmlns='http://www.w3.org/2000/svg' width='300' height='450'><rect width='100%' height='100%' fill='%23333'/><text x='50%' y='50%' fill='%23999' font-family='sans-serif' font-size='18' text-anchor='middle'>No Image</text></svg>";

/// Quick searches offered under the search bar.
pub const SUGGESTIONS: [&str; 5] = [
    "avengers",
    "inception",
    "breaking bad",
    "friends",
    "batman",
];

/// Searches offered before anything has been found.
pub const POPULAR_SEARCHES: [&str; 4] = [
    "Marvel Movies",
    "Christopher Nolan",
    "Breaking Bad",
    "The Office",
];

const REFINEMENT_TIPS: [&str; 4] = [
    "Check your spelling",
    "Try different keywords",
    "Use fewer or more general terms",
    "Try changing the type filter",
];

/// Whether a poster URL can be shown: not blank, not "N/A", and http(s).
pub fn is_valid_poster_url(url: &str) -> bool {
    let url = url.trim();
    if url.is_empty() || url == NOT_AVAILABLE {
        return false;
    }
    let lower = url.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// A poster slot that falls back to [`FALLBACK_POSTER`].
///
/// The fallback applies both to unusable URLs and, after
/// [`mark_failed`](PosterImage::mark_failed), to URLs that failed to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PosterImage<'a> {
    url: Option<&'a str>,
    failed: bool,
}

impl<'a> PosterImage<'a> {
    pub fn new(url: Option<&'a str>) -> Self {
        Self { url, failed: false }
    }

    /// Records that loading the image failed.
    pub fn mark_failed(&mut self) {
        self.failed = true;
    }

    /// The image source to display.
    pub fn source(&self) -> &'a str {
        match self.url {
            Some(url) if !self.failed && is_valid_poster_url(url) => url.trim(),
            _ => FALLBACK_POSTER,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source() == FALLBACK_POSTER
    }
}

/// One result card.
pub fn render_card(position: usize, result: &SearchResult) -> String {
    let poster = PosterImage::new(result.poster.as_deref());
    let poster = if poster.is_fallback() {
        "none"
    } else {
        poster.source()
    };
    format!(
        "{:>3}. {} ({})\n     [{}] {}\n     Poster: {}\n",
        position,
        result.title,
        result.year,
        result.media_type.badge(),
        result.imdb_id,
        poster
    )
}

/// The pagination control, or an empty string when there is one page.
pub fn render_pagination(pagination: &Pagination) -> String {
    if !pagination.is_visible() {
        return String::new();
    }

    let mut bar = vec![nav_button("‹ Prev", pagination.previous())];
    for token in pagination.window() {
        bar.push(match token {
            PageToken::Page(page) if page == pagination.current_page => format!("[{}]", page),
            PageToken::Page(page) => page.to_string(),
            PageToken::Ellipsis => "…".to_string(),
        });
    }
    bar.push(nav_button("Next ›", pagination.next()));

    format!(
        "{}\n{}\n{} {}\n",
        pagination.summary(),
        bar.join(" "),
        nav_button("First", pagination.first()),
        nav_button("Last", pagination.last())
    )
}

fn nav_button(label: &str, target: Option<u32>) -> String {
    match target {
        Some(_) => label.to_string(),
        None => format!("({})", label),
    }
}

/// The search bar: draft text plus the type options, selected one marked.
pub fn render_search_bar(controller: &SearchController) -> String {
    let selected = controller.selected_type();
    let options: Vec<String> = TypeFilter::VARIANTS
        .iter()
        .map(|filter| {
            if *filter == selected {
                format!("[{}]", filter.label())
            } else {
                filter.label().to_string()
            }
        })
        .collect();
    format!(
        "Search: {}\nType: {}\n",
        controller.draft(),
        options.join(" ")
    )
}

/// The whole search page for the controller's current state.
pub fn render_search_view(controller: &SearchController) -> String {
    let query = controller.location().query.as_str();
    let mut lines = vec![render_search_bar(controller)];

    match controller.state() {
        SearchState::Idle => {
            lines.push("Start Your Movie Search".to_string());
            lines.push(
                "Enter a movie title, TV show, or keyword to get started.".to_string(),
            );
        }
        SearchState::Loading => lines.push("Searching...".to_string()),
        SearchState::Error(message) => {
            lines.push(format!("! {}", message));
            lines.push("  Try again with :retry".to_string());
        }
        SearchState::Empty(message) => {
            lines.push("No Results Found".to_string());
            lines.push(format!(
                "We couldn't find any movies matching \"{}\" ({}).",
                query, message
            ));
            lines.push("Search tips:".to_string());
            lines.extend(REFINEMENT_TIPS.iter().map(|tip| format!("  • {}", tip)));
        }
        SearchState::Success(outcome) => {
            let pagination = outcome.pagination();
            let mut summary = format!(
                "Showing {} of {} results",
                outcome.results.len(),
                group_thousands(outcome.total_results)
            );
            if !query.is_empty() {
                summary.push_str(&format!(" for \"{}\"", query));
            }
            lines.push(summary);
            if pagination.is_visible() {
                lines.push(format!(
                    "Page {} of {}",
                    pagination.current_page, pagination.total_pages
                ));
            }
            lines.push(String::new());

            let offset = (outcome.page.saturating_sub(1) as usize) * PAGE_SIZE as usize;
            let mut cards = String::new();
            for (i, result) in outcome.results.iter().enumerate() {
                cards.push_str(&render_card(offset + i + 1, result));
            }
            lines.push(cards);

            let bar = render_pagination(&pagination);
            if !bar.is_empty() {
                lines.push(String::new());
                lines.push(bar);
            }
        }
    }

    if !controller.has_searched() && !controller.state().is_loading() {
        lines.push(String::new());
        lines.push(format!(
            "Popular Searches (:popular N): {}",
            numbered(&POPULAR_SEARCHES)
        ));
    }
    join_lines(lines)
}

fn numbered(items: &[&str]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Joins blocks into text. Blocks that already end in a newline are kept
/// as they are.
fn join_lines(lines: Vec<String>) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(&line);
        if !line.ends_with('\n') {
            out.push('\n');
        }
    }
    out
}

/// Results as tab-separated lines: id, title, year, type.
pub fn render_compact(results: &[SearchResult]) -> String {
    results
        .iter()
        .map(|r| {
            format!(
                "{}\t{}\t{}\t{}\n",
                r.imdb_id,
                r.title,
                r.year,
                r.media_type.as_str()
            )
        })
        .collect()
}

/// The details page.
pub fn render_details(details: &MovieDetails) -> String {
    let mut lines = vec![details.title.clone()];

    let mut facts = vec![details.year.clone()];
    facts.extend(details.runtime.clone());
    facts.extend(details.rated.clone());
    facts.push(details.media_type.badge().to_string());
    lines.push(facts.join(" · "));

    let genres = details.genres();
    if !genres.is_empty() {
        lines.push(format!("Genres: {}", genres.join(" | ")));
    }
    let poster = PosterImage::new(details.poster.as_deref());
    if !poster.is_fallback() {
        lines.push(format!("Poster: {}", poster.source()));
    }

    if let Some(plot) = &details.plot {
        lines.push(format!("\nPlot\n  {}", plot));
    }

    if !details.ratings.is_empty() {
        lines.push("\nRatings".to_string());
        if let Some(rating) = &details.imdb_rating {
            lines.push(format!(
                "  IMDb: {}/10{}",
                rating,
                tier_marker(details.rating_tier())
            ));
        }
        for rating in &details.ratings {
            lines.push(format!("  {}: {}", rating.source, rating.value));
        }
    }

    if let Some(director) = &details.director {
        lines.push(format!("\nDirector\n  {}", director));
    }
    if let Some(actors) = &details.actors {
        lines.push(format!("\nCast\n  {}", actors));
    }

    let extra = [
        ("Released", &details.released),
        ("Language", &details.language),
        ("Country", &details.country),
        ("Box Office", &details.box_office),
        ("Awards", &details.awards),
    ];
    lines.push("\nAdditional Information".to_string());
    for (label, value) in extra {
        if let Some(value) = value {
            lines.push(format!("  {}: {}", label, value));
        }
    }
    join_lines(lines)
}

fn tier_marker(tier: RatingTier) -> &'static str {
    match tier {
        RatingTier::High => " (great)",
        RatingTier::Medium => " (good)",
        RatingTier::Low => " (poor)",
        RatingTier::Unknown => "",
    }
}

/// The details page for any load state.
pub fn render_details_state(state: &DetailsState) -> String {
    match state {
        DetailsState::Loading => "Loading details...\n".to_string(),
        DetailsState::Loaded(details) => render_details(details),
        DetailsState::Failed(message) => {
            format!("! {}\n  Try again by reloading this title.\n", message)
        }
    }
}
