//! Browser TUI state management.

use anyhow::{Result, bail};
use moviex_api::omdb::{MediaType, Movie, ReleaseYear, SearchFilters, imdb_title_url};
use moviex_search::{
    DetailCompletion, DetailRequest, SearchCompletion, SearchRequest, SearchSession,
};
use ratatui::widgets::TableState;

/// Oldest year accepted by the year filter.
pub const MIN_YEAR: u16 = 1900;

/// Input mode for the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Normal navigation mode.
    Normal,
    /// Editing the search query.
    Query,
    /// Editing the year filter.
    Year,
}

/// Parses the year filter input. Blank means all years.
///
/// # Errors
///
/// Returns an error if the input is not a year in `1900..=current_year`.
pub fn parse_year_input(input: &str, current_year: u16) -> Result<Option<ReleaseYear>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let year: ReleaseYear = trimmed.parse()?;
    if !(MIN_YEAR..=current_year).contains(&year.get()) {
        bail!("year must be between {MIN_YEAR} and {current_year}");
    }
    Ok(Some(year))
}

/// State for the browser TUI.
#[derive(Debug)]
pub struct BrowserState {
    /// Search session driven by key presses and completions.
    pub session: SearchSession,
    /// Current input mode.
    pub input_mode: InputMode,
    /// Edit buffer for the query or year input.
    pub input: String,
    /// Table state for the result list.
    pub table_state: TableState,
    /// Scroll offset of the detail popup.
    pub detail_scroll: u16,
    /// Input validation message shown in the footer.
    pub notice: Option<String>,
    current_year: u16,
}

impl BrowserState {
    /// Creates a browser with initial filters.
    #[must_use]
    pub fn new(filters: SearchFilters, current_year: u16) -> Self {
        Self {
            session: SearchSession::new(filters),
            input_mode: InputMode::Normal,
            input: String::new(),
            table_state: TableState::default(),
            detail_scroll: 0,
            notice: None,
            current_year,
        }
    }

    /// Latest year the year filter accepts.
    #[must_use]
    pub const fn current_year(&self) -> u16 {
        self.current_year
    }

    /// Returns the result cursor position.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.table_state.selected().unwrap_or(0)
    }

    /// Returns the highlighted title.
    #[must_use]
    pub fn selected_movie(&self) -> Option<&Movie> {
        self.table_state
            .selected()
            .and_then(|idx| self.session.results().get(idx))
    }

    /// Whether the detail popup is showing (loaded or loading).
    #[must_use]
    pub const fn is_detail_visible(&self) -> bool {
        self.session.is_detail_open() || self.session.detail_status().is_loading()
    }

    /// Starts editing the query, prefilled with the current one.
    pub fn begin_query_edit(&mut self) {
        self.input = String::from(self.session.query());
        self.input_mode = InputMode::Query;
        self.notice = None;
    }

    /// Starts editing the year filter, prefilled with the current one.
    pub fn begin_year_edit(&mut self) {
        self.input = self
            .session
            .filters()
            .year
            .map(|y| y.to_string())
            .unwrap_or_default();
        self.input_mode = InputMode::Year;
        self.notice = None;
    }

    /// Appends a character to the edit buffer.
    pub fn input_push(&mut self, c: char) {
        if self.input_mode == InputMode::Year && (!c.is_ascii_digit() || self.input.len() >= 4) {
            return;
        }
        self.input.push(c);
    }

    /// Removes the last character from the edit buffer.
    pub fn input_pop(&mut self) {
        self.input.pop();
    }

    /// Leaves the edit mode without applying anything.
    pub fn cancel_input(&mut self) {
        self.input.clear();
        self.input_mode = InputMode::Normal;
        self.notice = None;
    }

    /// Applies the edit buffer.
    ///
    /// An invalid year keeps the editor open and sets a notice.
    pub fn commit_input(&mut self) -> Option<SearchRequest> {
        match self.input_mode {
            InputMode::Normal => None,
            InputMode::Query => {
                let query = std::mem::take(&mut self.input);
                self.input_mode = InputMode::Normal;
                let request = self.session.submit_query(&query);
                if request.is_none() {
                    self.table_state.select(None);
                }
                request
            }
            InputMode::Year => match parse_year_input(&self.input, self.current_year) {
                Ok(year) => {
                    self.input.clear();
                    self.input_mode = InputMode::Normal;
                    self.notice = None;
                    let filters = SearchFilters {
                        year,
                        ..self.session.filters()
                    };
                    self.session.change_filters(filters)
                }
                Err(e) => {
                    self.notice = Some(e.to_string());
                    None
                }
            },
        }
    }

    /// Advances the type filter: all, movie, series, episode, all.
    pub fn cycle_media_type(&mut self) -> Option<SearchRequest> {
        let filters = SearchFilters {
            media_type: MediaType::cycle(self.session.filters().media_type),
            ..self.session.filters()
        };
        self.session.change_filters(filters)
    }

    /// Moves to the next page.
    pub fn next_page(&mut self) -> Option<SearchRequest> {
        self.session.next_page()
    }

    /// Moves to the previous page.
    pub fn previous_page(&mut self) -> Option<SearchRequest> {
        self.session.previous_page()
    }

    /// Moves the cursor up.
    pub fn move_up(&mut self) {
        let pos = self.cursor();
        if pos > 0 {
            self.table_state.select(Some(pos.saturating_sub(1)));
        }
    }

    /// Moves the cursor down.
    pub fn move_down(&mut self) {
        let len = self.session.results().len();
        if len == 0 {
            return;
        }
        let pos = self.cursor();
        if pos.saturating_add(1) < len {
            self.table_state.select(Some(pos.saturating_add(1)));
        }
    }

    /// Requests details for the highlighted title.
    pub fn open_selected(&mut self) -> Option<DetailRequest> {
        let imdb_id = self.selected_movie()?.imdb_id.clone();
        self.detail_scroll = 0;
        Some(self.session.select_item(&imdb_id))
    }

    /// Closes the detail popup.
    pub fn close_details(&mut self) {
        self.detail_scroll = 0;
        self.session.close_details();
    }

    /// Scrolls the detail popup up.
    pub const fn scroll_detail_up(&mut self) {
        self.detail_scroll = self.detail_scroll.saturating_sub(1);
    }

    /// Scrolls the detail popup down.
    pub const fn scroll_detail_down(&mut self) {
        self.detail_scroll = self.detail_scroll.saturating_add(1);
    }

    /// Applies a finished search and resets the cursor to the first row.
    pub fn apply_search(&mut self, completion: SearchCompletion) {
        if self.session.finish_search(completion) {
            let first = (!self.session.results().is_empty()).then_some(0);
            self.table_state.select(first);
        }
    }

    /// Applies a finished detail lookup.
    pub fn apply_details(&mut self, completion: DetailCompletion) {
        self.session.finish_details(completion);
    }

    /// IMDb page of the open detail record, or else the highlighted title.
    #[must_use]
    pub fn imdb_url(&self) -> Option<String> {
        self.session
            .details()
            .map(|d| d.imdb_id.as_str())
            .or_else(|| self.selected_movie().map(|m| m.imdb_id.as_str()))
            .map(imdb_title_url)
    }
}
