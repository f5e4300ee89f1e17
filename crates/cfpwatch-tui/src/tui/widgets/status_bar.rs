// Status bar: visible/total counts, the latest orchestrator message and the
// clock the countdowns run against.

use chrono::Local;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::protocol::StatusLevel;
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let paragraph = Paragraph::new(status_line(state)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

pub fn status_line(state: &ViewState) -> Line<'static> {
    let shown = state.visible().len();
    let mut spans = vec![Span::styled(
        format!(" {shown}/{} shown", state.conferences.len()),
        Style::default().fg(Color::White),
    )];

    if state.filter.is_filtered() {
        spans.push(Span::styled(
            format!(
                " | {} tag(s), {} country filter(s)",
                state.filter.tags.len(),
                state.filter.countries.len()
            ),
            Style::default().fg(Color::Gray),
        ));
    }

    if let Some(status) = &state.status {
        let color = match status.level {
            StatusLevel::Info => Color::Green,
            StatusLevel::Error => Color::Red,
        };
        spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
        spans.push(Span::styled(status.text.clone(), Style::default().fg(color)));
    }

    spans.push(Span::styled(
        format!(
            " | {}",
            state.now.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S")
        ),
        Style::default().fg(Color::DarkGray),
    ));
    Line::from(spans)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
