//! Page arithmetic and the ellipsis-abbreviated page window.

use serde::Serialize;

/// Number of results the remote source returns per page.
pub const PAGE_SIZE: u32 = 10;

/// Pages shown on each side of the current page.
pub const WINDOW_RADIUS: u32 = 2;

/// One entry of the page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageToken {
    /// A selectable page number.
    Page(u32),
    /// A gap of one or more omitted pages.
    Ellipsis,
}

/// Number of pages needed for `total_results` at `page_size` per page.
pub fn total_pages(total_results: u32, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    total_results.div_ceil(page_size)
}

/// Builds the page window around `current_page`.
///
/// The window always opens with page 1 and closes with `total_pages`, keeps
/// `radius` pages on each side of the current one, and marks skipped runs
/// with [`PageToken::Ellipsis`]. One page or fewer yields an empty window.
pub fn page_window(current_page: u32, total_pages: u32, radius: u32) -> Vec<PageToken> {
    if total_pages <= 1 {
        return Vec::new();
    }

    let current = current_page.clamp(1, total_pages);
    let start = current.saturating_sub(radius).max(2);
    let end = current.saturating_add(radius).min(total_pages - 1);

    let mut tokens = vec![PageToken::Page(1)];
    if start > 2 {
        tokens.push(PageToken::Ellipsis);
    }
    tokens.extend((start..=end).map(PageToken::Page));
    if end < total_pages - 1 {
        tokens.push(PageToken::Ellipsis);
    }
    tokens.push(PageToken::Page(total_pages));
    tokens
}

/// Pagination state for one rendered result page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_results: u32,
}

impl Pagination {
    /// Derives pagination from a page number and the total hit count.
    pub fn new(current_page: u32, total_results: u32) -> Self {
        Self {
            current_page: current_page.max(1),
            total_pages: total_pages(total_results, PAGE_SIZE),
            total_results,
        }
    }

    /// Whether the control should be shown at all.
    pub fn is_visible(&self) -> bool {
        self.total_pages > 1
    }

    /// Whether `page` is a valid navigation target.
    pub fn contains(&self, page: u32) -> bool {
        (1..=self.total_pages).contains(&page)
    }

    /// The window of page tokens to display.
    pub fn window(&self) -> Vec<PageToken> {
        page_window(self.current_page, self.total_pages, WINDOW_RADIUS)
    }

    pub fn previous(&self) -> Option<u32> {
        (self.current_page > 1).then(|| self.current_page - 1)
    }

    pub fn next(&self) -> Option<u32> {
        (self.current_page < self.total_pages).then(|| self.current_page + 1)
    }

    pub fn first(&self) -> Option<u32> {
        (self.current_page != 1).then_some(1)
    }

    pub fn last(&self) -> Option<u32> {
        if self.total_pages == 0 || self.current_page == self.total_pages {
            None
        } else {
            Some(self.total_pages)
        }
    }

    /// Summary line, e.g. `Showing page 2 of 45 (448 total results)`.
    pub fn summary(&self) -> String {
        format!(
            "Showing page {} of {} ({} total results)",
            self.current_page,
            self.total_pages,
            group_thousands(self.total_results)
        )
    }
}

/// Formats a count with comma thousands separators.
pub fn group_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
