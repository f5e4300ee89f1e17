// Header widget: app title and the search box.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::tui::ViewState;

const PLACEHOLDER: &str = "press / to search titles, names, places and tags";

/// Render the header into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let border = if state.search_mode {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(Span::styled(
            " cfpwatch: conference deadlines ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))
        .title_bottom(Line::from(" Search ").right_aligned());

    frame.render_widget(Paragraph::new(search_line(state)).block(block), area);
}

/// Search box content: the query with a cursor while editing.
pub fn search_line(state: &ViewState) -> Line<'static> {
    let query = &state.filter.search;
    if query.is_empty() && !state.search_mode {
        return Line::from(Span::styled(
            format!(" {PLACEHOLDER}"),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let mut spans = vec![
        Span::styled(" / ", Style::default().fg(Color::Yellow)),
        Span::raw(query.clone()),
    ];
    if state.search_mode {
        spans.push(Span::styled(
            "_",
            Style::default().add_modifier(Modifier::SLOW_BLINK),
        ));
    }
    Line::from(spans)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
