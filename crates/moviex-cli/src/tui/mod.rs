//! Interactive OMDb browser.
//!
//! Uses `ratatui` + `crossterm` for rendering. Requests run as local
//! tasks and report back over a channel, so the screen keeps redrawing
//! while the network is slow.

/// Browser state types.
pub mod state;
mod ui;

use std::io;
use std::rc::Rc;

use anyhow::{Context, Result};
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use futures::StreamExt;
use moviex_api::omdb::{LocalOmdbApi, SearchFilters};
use moviex_search::{DetailCompletion, DetailRequest, SearchCompletion, SearchRequest};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;
use tokio::task::LocalSet;

use self::state::{BrowserState, InputMode};

pub use ui::filter_label;

/// A finished request on its way back to the event loop.
enum Completion {
    Search(SearchCompletion),
    Details(DetailCompletion),
}

/// Spawns requests on the local set and routes completions back.
struct Dispatcher<A> {
    api: Rc<A>,
    tx: mpsc::UnboundedSender<Completion>,
}

impl<A: LocalOmdbApi + 'static> Dispatcher<A> {
    fn search(&self, request: Option<SearchRequest>) {
        let Some(request) = request else {
            return;
        };
        let api = Rc::clone(&self.api);
        let tx = self.tx.clone();
        tokio::task::spawn_local(async move {
            let completion = moviex_search::run_search(api.as_ref(), request).await;
            if tx.send(Completion::Search(completion)).is_err() {
                tracing::debug!("browser closed before search finished");
            }
        });
    }

    fn details(&self, request: Option<DetailRequest>) {
        let Some(request) = request else {
            return;
        };
        let api = Rc::clone(&self.api);
        let tx = self.tx.clone();
        tokio::task::spawn_local(async move {
            let completion = moviex_search::run_details(api.as_ref(), request).await;
            if tx.send(Completion::Details(completion)).is_err() {
                tracing::debug!("browser closed before detail lookup finished");
            }
        });
    }
}

/// Runs the browser TUI.
///
/// # Errors
///
/// Returns an error if terminal setup or event handling fails.
pub async fn run_browser<A: LocalOmdbApi + 'static>(
    api: A,
    filters: SearchFilters,
    initial_query: Option<String>,
    current_year: u16,
) -> Result<()> {
    LocalSet::new()
        .run_until(browse(api, filters, initial_query, current_year))
        .await
}

/// Sets up the terminal, runs the loop, and always restores the terminal.
async fn browse<A: LocalOmdbApi + 'static>(
    api: A,
    filters: SearchFilters,
    initial_query: Option<String>,
    current_year: u16,
) -> Result<()> {
    let mut state = BrowserState::new(filters, current_year);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let dispatcher = Dispatcher {
        api: Rc::new(api),
        tx,
    };

    if let Some(query) = initial_query {
        dispatcher.search(state.session.submit_query(&query));
    }

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let result = run_event_loop(&mut terminal, &mut state, &dispatcher, &mut rx).await;

    // Cleanup (always attempt even if event loop failed)
    disable_raw_mode().context("failed to disable raw mode")?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;

    result
}

/// Main event loop: redraws, then waits for a key or a completion.
async fn run_event_loop<A: LocalOmdbApi + 'static>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut BrowserState,
    dispatcher: &Dispatcher<A>,
    rx: &mut mpsc::UnboundedReceiver<Completion>,
) -> Result<()> {
    let mut events = EventStream::new();

    loop {
        terminal
            .draw(|frame| ui::draw(frame, state))
            .context("failed to draw TUI")?;

        tokio::select! {
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    if handle_key(state, key, dispatcher) {
                        return Ok(());
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e).context("failed to read event"),
                None => return Ok(()),
            },
            Some(completion) = rx.recv() => match completion {
                Completion::Search(c) => state.apply_search(c),
                Completion::Details(c) => state.apply_details(c),
            },
        }
    }
}

/// Routes a key press by input mode. Returns `true` to exit.
fn handle_key<A: LocalOmdbApi + 'static>(
    state: &mut BrowserState,
    key: KeyEvent,
    dispatcher: &Dispatcher<A>,
) -> bool {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }
    match state.input_mode {
        InputMode::Query | InputMode::Year => {
            handle_edit_input(state, key.code, dispatcher);
            false
        }
        InputMode::Normal if state.is_detail_visible() => handle_detail_input(state, key.code),
        InputMode::Normal => handle_normal_input(state, key.code, dispatcher),
    }
}

/// Handles key input while editing the query or year.
fn handle_edit_input<A: LocalOmdbApi + 'static>(
    state: &mut BrowserState,
    key: KeyCode,
    dispatcher: &Dispatcher<A>,
) {
    match key {
        KeyCode::Esc => state.cancel_input(),
        KeyCode::Enter => dispatcher.search(state.commit_input()),
        KeyCode::Backspace => state.input_pop(),
        KeyCode::Char(c) => state.input_push(c),
        _ => {}
    }
}

/// Handles key input while the detail popup is showing. Returns `true` to exit.
fn handle_detail_input(state: &mut BrowserState, key: KeyCode) -> bool {
    match key {
        KeyCode::Char('q') => return true,
        KeyCode::Esc | KeyCode::Backspace => state.close_details(),
        KeyCode::Up | KeyCode::Char('k') => state.scroll_detail_up(),
        KeyCode::Down | KeyCode::Char('j') => state.scroll_detail_down(),
        KeyCode::Char('o') => open_imdb_url(state),
        _ => {}
    }
    false
}

/// Handles key input in normal mode. Returns `true` to exit.
fn handle_normal_input<A: LocalOmdbApi + 'static>(
    state: &mut BrowserState,
    key: KeyCode,
    dispatcher: &Dispatcher<A>,
) -> bool {
    match key {
        KeyCode::Char('q') => return true,
        KeyCode::Char('/') => state.begin_query_edit(),
        KeyCode::Char('y') => state.begin_year_edit(),
        KeyCode::Char('t') => dispatcher.search(state.cycle_media_type()),
        KeyCode::Char('n') | KeyCode::Right => dispatcher.search(state.next_page()),
        KeyCode::Char('p') | KeyCode::Left => dispatcher.search(state.previous_page()),
        KeyCode::Up | KeyCode::Char('k') => state.move_up(),
        KeyCode::Down | KeyCode::Char('j') => state.move_down(),
        KeyCode::Enter => dispatcher.details(state.open_selected()),
        KeyCode::Char('o') => open_imdb_url(state),
        _ => {}
    }
    false
}

/// Opens the IMDb page for the open or highlighted title.
fn open_imdb_url(state: &BrowserState) {
    let Some(url) = state.imdb_url() else {
        return;
    };
    let _ = open::that(&url);
}
