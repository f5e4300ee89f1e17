// Controls row: show-past switch, selected countries and the share query.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    frame.render_widget(Paragraph::new(controls_line(state)), area);
}

pub fn controls_line(state: &ViewState) -> Line<'static> {
    let label = Style::default().fg(Color::Gray);
    let (switch, switch_style) = if state.filter.show_past {
        ("on", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
    } else {
        ("off", Style::default().fg(Color::DarkGray))
    };

    let countries = if state.filter.countries.is_empty() {
        "all".to_string()
    } else {
        state
            .filter
            .countries
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    };

    let share = state.share.to_query_string();
    let share = if share.is_empty() {
        "-".to_string()
    } else {
        format!("?{share}")
    };

    Line::from(vec![
        Span::styled(" Show past conferences: ", label),
        Span::styled(switch, switch_style),
        Span::styled("  |  Countries: ", label),
        Span::raw(countries),
        Span::styled("  |  Share: ", label),
        Span::styled(share, Style::default().fg(Color::Cyan)),
    ])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
