// Help: the one-line key hints at the bottom and the full key reference
// overlay.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::tui::layout::centered_rect;
use crate::tui::{Overlay, ViewState};

/// Key reference shown by `?`.
pub const KEYS: &[(&str, &str)] = &[
    ("j/k, Up/Down", "move selection"),
    ("PgUp/PgDn, g/G", "page / jump to first or last"),
    ("/", "search (Enter keeps, Esc clears)"),
    ("h/l, Space", "move in category bar / toggle category"),
    ("t", "tag picker"),
    ("c", "country picker"),
    ("p", "show or hide past conferences"),
    ("x", "clear tag and country filters"),
    ("Enter", "conference details (1-9 toggle its tags)"),
    ("r", "reload records from disk"),
    ("S", "sync records from upstream"),
    ("?", "this help"),
    ("q", "quit (asks first), Ctrl+C quits at once"),
];

/// Hints for the current mode.
pub fn hint_text(state: &ViewState) -> &'static str {
    if state.search_mode {
        return " Type to search | Enter: keep | Esc: clear | Backspace: delete";
    }
    match state.overlay {
        Some(Overlay::TagPicker { .. } | Overlay::CountryPicker { .. }) => {
            " j/k: move | Space: toggle | Esc: close"
        }
        Some(Overlay::Detail { .. }) => " 1-9: toggle tag filter | Esc: close",
        Some(Overlay::Help) => " Esc/?: close help",
        Some(Overlay::ConfirmQuit) => " y: quit | n: stay",
        None => " q:Quit | /:Search | Space:Category | t:Tags | c:Countries | p:Past | x:Clear | Enter:Details | ?:Help",
    }
}

pub fn render_bar(frame: &mut Frame, area: Rect, state: &ViewState) {
    let paragraph = Paragraph::new(Line::from(Span::styled(
        hint_text(state),
        Style::default().fg(Color::White).add_modifier(Modifier::DIM),
    )))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

pub fn render_overlay(frame: &mut Frame, area: Rect) {
    let height = KEYS.len() as u16 + 2;
    let dialog_area = centered_rect(64, height, area);
    frame.render_widget(Clear, dialog_area);

    let lines: Vec<Line> = KEYS
        .iter()
        .map(|(keys, action)| {
            Line::from(vec![
                Span::styled(
                    format!(" {keys:<16}"),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ),
                Span::raw(*action),
            ])
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Keys ");
    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, dialog_area);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
