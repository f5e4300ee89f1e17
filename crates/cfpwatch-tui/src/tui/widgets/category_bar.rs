// Category bar: the configured quick-toggle tags.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let paragraph = Paragraph::new(Line::from(category_spans(state)));
    frame.render_widget(paragraph, area);
}

/// One `[x] Label` chip per category; the chip under the cursor is reversed.
pub fn category_spans(state: &ViewState) -> Vec<Span<'static>> {
    let mut spans = vec![Span::raw(" ")];
    for (i, category) in state.categories.iter().enumerate() {
        let active = state.filter.tags.contains(&category.id);
        let mark = if active { "x" } else { " " };

        let mut style = if active {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        if i == state.category_cursor {
            style = style.add_modifier(Modifier::REVERSED);
        }

        spans.push(Span::styled(format!("[{mark}] {}", category.label), style));
        spans.push(Span::raw(" "));
    }
    spans
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
