//! Request execution: runs session requests against an OMDb API.
#![allow(clippy::future_not_send)]

use moviex_api::omdb::{
    DetailOutcome, DetailParams, LocalOmdbApi, MovieDetails, SearchFilters, SearchOutcome,
    SearchParams,
};
use tracing::instrument;

use crate::session::{
    DetailCompletion, DetailRequest, SearchCompletion, SearchPage, SearchRequest, SearchSession,
};
use crate::status::SessionError;

/// Performs one search and normalizes the outcome.
///
/// API-reported failures keep their message; anything that prevented a
/// usable response becomes [`SessionError::Transport`].
///
/// # Errors
///
/// Returns a [`SessionError`] describing the failure to display.
#[instrument(skip_all, fields(query = %params.query, page = params.page))]
pub async fn fetch_page(
    api: &impl LocalOmdbApi,
    params: &SearchParams,
) -> Result<SearchPage, SessionError> {
    match api.search(params).await {
        Ok(SearchOutcome::Found {
            results,
            total_results,
        }) => {
            tracing::debug!(count = results.len(), total_results, "search succeeded");
            Ok(SearchPage {
                results,
                total_results,
            })
        }
        Ok(SearchOutcome::Failed { message }) => {
            tracing::debug!(%message, "search rejected by API");
            Err(SessionError::Api(message))
        }
        Err(e) => {
            tracing::debug!(error = format!("{e:#}"), "search transport failure");
            Err(SessionError::Transport)
        }
    }
}

/// Performs one detail lookup and normalizes the outcome.
///
/// # Errors
///
/// Returns [`SessionError::Details`] on any failure.
#[instrument(skip_all, fields(imdb_id = %params.imdb_id))]
pub async fn fetch_details(
    api: &impl LocalOmdbApi,
    params: &DetailParams,
) -> Result<Box<MovieDetails>, SessionError> {
    match api.details(params).await {
        Ok(DetailOutcome::Found(details)) => Ok(details),
        Ok(DetailOutcome::Failed { message }) => {
            tracing::debug!(%message, "detail lookup rejected by API");
            Err(SessionError::Details)
        }
        Err(e) => {
            tracing::debug!(error = format!("{e:#}"), "detail lookup transport failure");
            Err(SessionError::Details)
        }
    }
}

/// Executes a session search request.
pub async fn run_search(api: &impl LocalOmdbApi, request: SearchRequest) -> SearchCompletion {
    SearchCompletion {
        seq: request.seq,
        result: fetch_page(api, &request.params).await,
    }
}

/// Executes a session detail request.
pub async fn run_details(api: &impl LocalOmdbApi, request: DetailRequest) -> DetailCompletion {
    DetailCompletion {
        seq: request.seq,
        result: fetch_details(api, &request.params).await,
    }
}

/// Drives a [`SearchSession`] by awaiting each request in turn.
#[derive(Debug)]
pub struct Orchestrator<A> {
    api: A,
    session: SearchSession,
}

impl<A: LocalOmdbApi> Orchestrator<A> {
    /// Creates an orchestrator with initial filters.
    #[must_use]
    pub const fn new(api: A, filters: SearchFilters) -> Self {
        Self {
            api,
            session: SearchSession::new(filters),
        }
    }

    /// Returns the session state.
    #[must_use]
    pub const fn session(&self) -> &SearchSession {
        &self.session
    }

    /// Submits a query and waits for its first page.
    pub async fn submit_query(&mut self, query: &str) {
        let request = self.session.submit_query(query);
        self.execute_search(request).await;
    }

    /// Replaces the filters, re-searching if a query is active.
    pub async fn change_filters(&mut self, filters: SearchFilters) {
        let request = self.session.change_filters(filters);
        self.execute_search(request).await;
    }

    /// Moves to another page of the current query.
    pub async fn change_page(&mut self, page: u32) {
        let request = self.session.change_page(page);
        self.execute_search(request).await;
    }

    /// Opens the detail view for a title.
    pub async fn open_details(&mut self, imdb_id: &str) {
        let request = self.session.select_item(imdb_id);
        let completion = run_details(&self.api, request).await;
        self.session.finish_details(completion);
    }

    /// Closes the detail view.
    pub fn close_details(&mut self) {
        self.session.close_details();
    }

    async fn execute_search(&mut self, request: Option<SearchRequest>) {
        if let Some(request) = request {
            let completion = run_search(&self.api, request).await;
            self.session.finish_search(completion);
        }
    }
}
