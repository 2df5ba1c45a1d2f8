//! Search session state machine.

use moviex_api::omdb::{DetailParams, Movie, MovieDetails, SearchFilters, SearchParams};

use crate::status::{FetchStatus, SessionError};

/// Results per page reported by the API.
pub const PAGE_SIZE: u32 = 10;

/// Number of pages needed to show `total_results` (`ceil(total / 10)`).
#[must_use]
pub const fn total_pages(total_results: u32) -> u32 {
    total_results.div_ceil(PAGE_SIZE)
}

/// A search to issue, tagged with the sequence number it was issued under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Sequence number; only the latest one is applied on completion.
    pub seq: u64,
    /// Request parameters.
    pub params: SearchParams,
}

/// A detail lookup to issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRequest {
    /// Sequence number; only the latest one is applied on completion.
    pub seq: u64,
    /// Request parameters.
    pub params: DetailParams,
}

/// One page of search results plus the server-reported total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPage {
    /// Titles on this page.
    pub results: Vec<Movie>,
    /// Total matches across all pages.
    pub total_results: u32,
}

/// Result of a finished search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCompletion {
    /// Sequence number of the originating request.
    pub seq: u64,
    /// Normalized result.
    pub result: Result<SearchPage, SessionError>,
}

/// Result of a finished detail request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailCompletion {
    /// Sequence number of the originating request.
    pub seq: u64,
    /// Normalized result.
    pub result: Result<Box<MovieDetails>, SessionError>,
}

/// Session-scoped search state.
///
/// The result list and total count are only ever replaced together.
/// Search and detail lookups keep independent status and sequence
/// counters, so one never masks or invalidates the other.
#[derive(Debug, Clone)]
pub struct SearchSession {
    query: String,
    filters: SearchFilters,
    page: u32,
    total_results: u32,
    results: Vec<Movie>,
    search_status: FetchStatus,
    has_searched: bool,
    details: Option<Box<MovieDetails>>,
    detail_status: FetchStatus,
    search_seq: u64,
    detail_seq: u64,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new(SearchFilters::default())
    }
}

impl SearchSession {
    /// Creates an empty session with initial filters.
    #[must_use]
    pub const fn new(filters: SearchFilters) -> Self {
        Self {
            query: String::new(),
            filters,
            page: 1,
            total_results: 0,
            results: Vec::new(),
            search_status: FetchStatus::Idle,
            has_searched: false,
            details: None,
            detail_status: FetchStatus::Idle,
            search_seq: 0,
            detail_seq: 0,
        }
    }

    /// Current (trimmed) query; empty when no search is active.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Active filters.
    #[must_use]
    pub const fn filters(&self) -> SearchFilters {
        self.filters
    }

    /// Current 1-based page.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Server-reported total for the current query.
    #[must_use]
    pub const fn total_results(&self) -> u32 {
        self.total_results
    }

    /// Number of pages for the current query.
    #[must_use]
    pub const fn total_pages(&self) -> u32 {
        total_pages(self.total_results)
    }

    /// Titles on the current page.
    #[must_use]
    pub fn results(&self) -> &[Movie] {
        &self.results
    }

    /// Status of the latest search.
    #[must_use]
    pub const fn search_status(&self) -> &FetchStatus {
        &self.search_status
    }

    /// Whether a search has been attempted since the last clear.
    #[must_use]
    pub const fn has_searched(&self) -> bool {
        self.has_searched
    }

    /// The open detail record, if any.
    #[must_use]
    pub fn details(&self) -> Option<&MovieDetails> {
        self.details.as_deref()
    }

    /// Status of the latest detail lookup.
    #[must_use]
    pub const fn detail_status(&self) -> &FetchStatus {
        &self.detail_status
    }

    /// Whether the detail view is open.
    #[must_use]
    pub const fn is_detail_open(&self) -> bool {
        self.details.is_some()
    }

    /// Whether any request is in flight.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.search_status.is_loading() || self.detail_status.is_loading()
    }

    /// Submits a new query, starting again from page 1.
    ///
    /// A blank query clears the result state and issues nothing.
    pub fn submit_query(&mut self, query: &str) -> Option<SearchRequest> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            self.clear();
            return None;
        }
        self.query = String::from(trimmed);
        self.page = 1;
        Some(self.issue_search())
    }

    /// Replaces the filters and returns to page 1.
    ///
    /// Re-issues the search only when a query is active.
    pub fn change_filters(&mut self, filters: SearchFilters) -> Option<SearchRequest> {
        self.filters = filters;
        self.page = 1;
        if self.query.is_empty() {
            return None;
        }
        Some(self.issue_search())
    }

    /// Moves to `page` with the same query and filters.
    ///
    /// Issues nothing unless a query is active and `1 <= page <= total_pages`.
    pub fn change_page(&mut self, page: u32) -> Option<SearchRequest> {
        if self.query.is_empty() || page == 0 || page > self.total_pages() {
            tracing::debug!(page, total_pages = self.total_pages(), "page change ignored");
            return None;
        }
        self.page = page;
        Some(self.issue_search())
    }

    /// Moves to the next page, if there is one.
    pub fn next_page(&mut self) -> Option<SearchRequest> {
        self.change_page(self.page.saturating_add(1))
    }

    /// Moves to the previous page, if there is one.
    pub fn previous_page(&mut self) -> Option<SearchRequest> {
        self.change_page(self.page.saturating_sub(1))
    }

    /// Requests the detail record for a title. Search state is untouched.
    pub fn select_item(&mut self, imdb_id: &str) -> DetailRequest {
        self.detail_seq = self.detail_seq.wrapping_add(1);
        self.details = None;
        self.detail_status = FetchStatus::Loading;
        DetailRequest {
            seq: self.detail_seq,
            params: DetailParams::new(imdb_id),
        }
    }

    /// Closes the detail view and drops any lookup still in flight.
    pub fn close_details(&mut self) {
        self.detail_seq = self.detail_seq.wrapping_add(1);
        self.details = None;
        self.detail_status = FetchStatus::Idle;
    }

    /// Applies a finished search. Returns `false` if it was superseded.
    pub fn finish_search(&mut self, completion: SearchCompletion) -> bool {
        if completion.seq != self.search_seq {
            tracing::debug!(
                seq = completion.seq,
                latest = self.search_seq,
                "discarding stale search response"
            );
            return false;
        }
        match completion.result {
            Ok(page) => {
                self.results = page.results;
                self.total_results = page.total_results;
                self.search_status = FetchStatus::Loaded;
            }
            Err(e) => {
                self.results.clear();
                self.total_results = 0;
                self.search_status = FetchStatus::Failed(e);
            }
        }
        true
    }

    /// Applies a finished detail lookup. Returns `false` if it was superseded.
    pub fn finish_details(&mut self, completion: DetailCompletion) -> bool {
        if completion.seq != self.detail_seq {
            tracing::debug!(
                seq = completion.seq,
                latest = self.detail_seq,
                "discarding stale detail response"
            );
            return false;
        }
        match completion.result {
            Ok(details) => {
                self.details = Some(details);
                self.detail_status = FetchStatus::Loaded;
            }
            Err(e) => {
                self.details = None;
                self.detail_status = FetchStatus::Failed(e);
            }
        }
        true
    }

    /// Resets list state for a blank query and invalidates in-flight searches.
    fn clear(&mut self) {
        self.search_seq = self.search_seq.wrapping_add(1);
        self.query.clear();
        self.page = 1;
        self.results.clear();
        self.total_results = 0;
        self.has_searched = false;
        self.search_status = FetchStatus::Idle;
    }

    /// Marks a search as in flight and builds its request.
    fn issue_search(&mut self) -> SearchRequest {
        self.search_seq = self.search_seq.wrapping_add(1);
        self.has_searched = true;
        self.search_status = FetchStatus::Loading;
        SearchRequest {
            seq: self.search_seq,
            params: SearchParams::new(self.query.clone())
                .page(self.page)
                .filters(self.filters),
        }
    }
}
