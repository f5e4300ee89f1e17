// Quit confirmation dialog, drawn while the overlay is `ConfirmQuit`.

use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::tui::layout::centered_rect;

pub fn render(frame: &mut Frame, area: Rect) {
    let dialog = centered_rect(34, 6, area);
    frame.render_widget(Clear, dialog);

    let key = |k: &'static str, color: Color| {
        Span::styled(k, Style::default().fg(color).add_modifier(Modifier::BOLD))
    };
    let lines = vec![
        Line::from("Leave cfpwatch?"),
        Line::default(),
        Line::from(vec![
            key("y", Color::Green),
            Span::raw(" quit    "),
            key("n", Color::Red),
            Span::raw(" keep browsing"),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Quit ");
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block)
            .style(Style::default().bg(Color::Black)),
        dialog,
    );
}
