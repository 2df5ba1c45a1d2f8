//! TUI rendering logic for the browser.

use moviex_api::omdb::{MediaType, MovieDetails, SearchFilters, available};
use moviex_search::FetchStatus;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Row, Table, Wrap};

use super::state::{BrowserState, InputMode, MIN_YEAR};

/// Color for an IMDb rating: green from 8, yellow from 6, red below.
#[must_use]
pub fn rating_color(rating: f32) -> Color {
    if rating >= 8.0 {
        Color::Green
    } else if rating >= 6.0 {
        Color::Yellow
    } else {
        Color::Red
    }
}

/// Short description of the active filters.
#[must_use]
pub fn filter_label(filters: SearchFilters) -> String {
    let kind = filters.media_type.map_or("all types", MediaType::as_str);
    let year = filters
        .year
        .map_or_else(|| String::from("all years"), |y| y.to_string());
    format!("{kind}, {year}")
}

/// Draws the browser UI.
#[allow(clippy::indexing_slicing)]
pub fn draw(frame: &mut Frame, state: &mut BrowserState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // search + filters
            Constraint::Min(5),    // results
            Constraint::Length(3), // footer
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], state);
    draw_results(frame, chunks[1], state);
    draw_footer(frame, chunks[2], state);

    if state.is_detail_visible() {
        draw_details(frame, chunks[1], state);
    }
}

/// Draws the query input and the filter summary.
#[allow(clippy::indexing_slicing)]
fn draw_header(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let editing = |mode| state.input_mode == mode;

    let (query_text, query_style) = if editing(InputMode::Query) {
        (format!("{}_", state.input), Style::default().fg(Color::Yellow))
    } else if state.session.query().is_empty() {
        (
            String::from("Search for movies, series, episodes..."),
            Style::default().fg(Color::DarkGray),
        )
    } else {
        (String::from(state.session.query()), Style::default())
    };
    let query = Paragraph::new(query_text)
        .style(query_style)
        .block(Block::default().borders(Borders::ALL).title(" Search: / "));
    frame.render_widget(query, header_chunks[0]);

    let (filter_text, filter_style) = if editing(InputMode::Year) {
        (
            format!("year: {}_", state.input),
            Style::default().fg(Color::Yellow),
        )
    } else {
        (filter_label(state.session.filters()), Style::default())
    };
    let filters = Paragraph::new(filter_text)
        .style(filter_style)
        .block(Block::default().borders(Borders::ALL).title(" Filters: t/y "));
    frame.render_widget(filters, header_chunks[1]);
}

/// Draws the result list or its placeholder.
fn draw_results(frame: &mut Frame, area: Rect, state: &mut BrowserState) {
    let session = &state.session;
    let block = Block::default().borders(Borders::ALL);

    let placeholder = match session.search_status() {
        FetchStatus::Loading => Some((
            vec![Line::from("Searching...")],
            Style::default().fg(Color::Cyan),
        )),
        FetchStatus::Failed(e) => Some((
            vec![Line::from(String::from(e.message()))],
            Style::default().fg(Color::Red),
        )),
        FetchStatus::Idle if !session.has_searched() => Some((
            vec![
                Line::from("Ready to explore?"),
                Line::from(""),
                Line::from("Press / and search for your favorite movies, series, or episodes."),
            ],
            Style::default(),
        )),
        _ if session.results().is_empty() => Some((
            vec![
                Line::from("No results"),
                Line::from(""),
                Line::from("Try a different title or loosen the filters."),
            ],
            Style::default().fg(Color::DarkGray),
        )),
        _ => None,
    };

    if let Some((lines, style)) = placeholder {
        let paragraph = Paragraph::new(lines)
            .style(style)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block.title(" Results "));
        frame.render_widget(paragraph, area);
        return;
    }

    let title = format!(
        " Showing {} of {} results  (page {}/{}) ",
        session.results().len(),
        session.total_results(),
        session.page(),
        session.total_pages(),
    );

    let header = Row::new(vec!["IMDb ID", "Title", "Year", "Type"])
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .bottom_margin(1);

    let rows: Vec<Row> = session
        .results()
        .iter()
        .map(|m| {
            Row::new(vec![
                m.imdb_id.clone(),
                m.title.clone(),
                m.year.clone(),
                m.media_type.clone(),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(11),
        Constraint::Min(20),
        Constraint::Length(10),
        Constraint::Length(8),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block.title(title))
        .row_highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_stateful_widget(table, area, &mut state.table_state);
}

/// Returns a rectangle centered in `area` with the given percentages.
#[allow(clippy::indexing_slicing)]
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let margin_y = (100_u16.saturating_sub(percent_y)) / 2;
    let margin_x = (100_u16.saturating_sub(percent_x)) / 2;
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(margin_y),
            Constraint::Percentage(percent_y),
            Constraint::Percentage(margin_y),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(margin_x),
            Constraint::Percentage(percent_x),
            Constraint::Percentage(margin_x),
        ])
        .split(vertical[1])[1]
}

/// Draws the detail popup over the result list.
fn draw_details(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let popup = centered_rect(90, 90, area);
    frame.render_widget(Clear, popup);

    let (title, lines) = state.session.details().map_or_else(
        || {
            (
                String::from(" Details "),
                vec![Line::from(Span::styled(
                    "Loading details...",
                    Style::default().fg(Color::Cyan),
                ))],
            )
        },
        |d| (format!(" {} ({}) ", d.title, d.year), detail_lines(d)),
    );

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((state.detail_scroll, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(Color::Cyan)),
        );
    frame.render_widget(paragraph, popup);
}

/// Builds a labelled line, skipping unavailable values.
fn field<'a>(label: &'a str, value: &'a str) -> Option<Line<'a>> {
    available(value).map(|v| labelled(label, v))
}

/// Builds the detail popup body.
fn detail_lines(d: &MovieDetails) -> Vec<Line<'_>> {
    let mut lines = Vec::new();

    let mut summary: Vec<Span> = Vec::new();
    if let Some(rating) = d.imdb_rating_value() {
        summary.push(Span::styled(
            format!("\u{2605} {}/10", d.imdb_rating),
            Style::default()
                .fg(rating_color(rating))
                .add_modifier(Modifier::BOLD),
        ));
    }
    for value in [&d.rated, &d.runtime, &d.media_type] {
        if let Some(v) = available(value) {
            if !summary.is_empty() {
                summary.push(Span::raw("  \u{b7}  "));
            }
            summary.push(Span::raw(v));
        }
    }
    if !summary.is_empty() {
        lines.push(Line::from(summary));
    }

    let genres = d.genres();
    if !genres.is_empty() {
        lines.push(Line::from(Span::styled(
            genres.join(" | "),
            Style::default().fg(Color::Magenta),
        )));
    }
    lines.push(Line::from(""));

    if let Some(plot) = available(&d.plot) {
        lines.push(Line::from(plot));
        lines.push(Line::from(""));
    }

    lines.extend(
        [
            field("Director", &d.director),
            field("Writer", &d.writer),
            field("Actors", &d.actors),
            field("Released", &d.released),
            d.primary_language().map(|l| labelled("Language", l)),
            d.primary_country().map(|c| labelled("Country", c)),
            field("Awards", &d.awards),
            field("Box Office", &d.box_office),
            field("Seasons", &d.total_seasons),
            field("Metascore", &d.metascore),
            field("IMDb Votes", &d.imdb_votes),
        ]
        .into_iter()
        .flatten(),
    );

    if !d.ratings.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Ratings",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for r in &d.ratings {
            lines.push(Line::from(format!("  {}: {}", r.source, r.value)));
        }
    }

    lines
}

/// Builds a `Label: value` line.
fn labelled<'a>(label: &'a str, value: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(
            format!("{label}: "),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(value),
    ])
}

/// Draws the footer with key hints, notices, and detail errors.
fn draw_footer(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let help_text = if let Some(notice) = &state.notice {
        Line::from(Span::styled(
            notice.as_str(),
            Style::default().fg(Color::Red),
        ))
    } else if let Some(e) = state.session.detail_status().error() {
        Line::from(vec![
            Span::styled(e.message(), Style::default().fg(Color::Red)),
            Span::raw("  Enter: retry  q: quit"),
        ])
    } else {
        match state.input_mode {
            InputMode::Query => {
                Line::from("Type a title | Enter: search (blank clears) | Esc: cancel")
            }
            InputMode::Year => Line::from(format!(
                "Year {}-{} | blank: all years | Enter: apply | Esc: cancel",
                MIN_YEAR,
                state.current_year(),
            )),
            InputMode::Normal if state.is_detail_visible() => Line::from(
                "\u{2191}\u{2193}/j/k: scroll  Esc/Backspace: close  o: open IMDb  q: quit",
            ),
            InputMode::Normal => Line::from(vec![Span::raw(
                "/: search  t: type  y: year  \u{2190}\u{2192}/p/n: page  \u{2191}\u{2193}/j/k: move  Enter: details  o: open  q: quit",
            )]),
        }
    };

    let footer = Paragraph::new(help_text).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use moviex_api::omdb::ReleaseYear;

    use super::*;

    #[test]
    fn test_rating_color_thresholds() {
        // Arrange & Act & Assert
        assert_eq!(rating_color(9.0), Color::Green);
        assert_eq!(rating_color(8.0), Color::Green);
        assert_eq!(rating_color(7.9), Color::Yellow);
        assert_eq!(rating_color(6.0), Color::Yellow);
        assert_eq!(rating_color(5.9), Color::Red);
    }

    #[test]
    fn test_filter_label() {
        // Arrange
        let filters = SearchFilters {
            media_type: Some(MediaType::Series),
            year: Some(ReleaseYear::new(2008).unwrap()),
        };

        // Act & Assert
        assert_eq!(filter_label(SearchFilters::default()), "all types, all years");
        assert_eq!(filter_label(filters), "series, 2008");
    }

    #[test]
    fn test_detail_lines_skip_unavailable_fields() {
        // Arrange
        let details: MovieDetails = serde_json::from_str(
            r#"{"imdbID":"tt1","Title":"X","Director":"Jane Doe","Writer":"N/A","imdbRating":"8.5"}"#,
        )
        .unwrap();

        // Act
        let text: Vec<String> = detail_lines(&details)
            .iter()
            .map(ToString::to_string)
            .collect();

        // Assert
        assert!(text.iter().any(|l| l == "Director: Jane Doe"));
        assert!(!text.iter().any(|l| l.starts_with("Writer")));
        assert!(text.iter().any(|l| l.contains("8.5/10")));
    }
}
