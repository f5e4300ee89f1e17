// Conference table: the filtered, deadline-sorted records with live
// countdowns coloured by urgency.

use chrono::{DateTime, Utc};
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;

use cfpwatch_core::deadline::{
    countdown_label, deadline_display, urgency, DeadlineStatus, Urgency, UrgencyThresholds,
};
use cfpwatch_core::tags::tag_label;

use crate::list::EMPTY_MESSAGE;
use crate::tui::ViewState;

/// Render the conference table into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let visible = state.visible();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(build_title(state, visible.len()));

    if visible.is_empty() {
        let paragraph = Paragraph::new(EMPTY_MESSAGE)
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("Conference"),
        Cell::from("Deadline"),
        Cell::from("Countdown"),
        Cell::from("Dates"),
        Cell::from("Location"),
        Cell::from("Tags"),
    ])
    .style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = visible
        .iter()
        .map(|conf| {
            let status = conf.deadline_status();
            let deadline = match conf.timezone.as_deref() {
                Some(tz) if status.instant().is_some() => {
                    format!("{} {}", deadline_display(conf.deadline.as_deref()), tz)
                }
                _ => deadline_display(conf.deadline.as_deref()),
            };
            let tags = conf
                .tags
                .iter()
                .map(|t| tag_label(t))
                .collect::<Vec<_>>()
                .join(", ");

            Row::new(vec![
                Cell::from(conf.display_title())
                    .style(Style::default().add_modifier(Modifier::BOLD)),
                Cell::from(deadline),
                Cell::from(countdown_label(status, state.now))
                    .style(countdown_style(status, state.now, state.thresholds)),
                Cell::from(conf.date.clone().unwrap_or_default()),
                Cell::from(conf.location()),
                Cell::from(tags).style(Style::default().fg(Color::Gray)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(16),
        Constraint::Length(26),
        Constraint::Length(18),
        Constraint::Length(26),
        Constraint::Min(16),
        Constraint::Min(20),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");

    let mut table_state = TableState::default().with_selected(Some(state.selected));
    frame.render_stateful_widget(table, area, &mut table_state);
}

/// Countdown colour: red when urgent, yellow when soon, green otherwise;
/// grey for passed or unknown deadlines.
pub fn countdown_style(status: DeadlineStatus, now: DateTime<Utc>, thresholds: UrgencyThresholds) -> Style {
    if status.is_past(now) {
        return Style::default().fg(Color::DarkGray);
    }
    match urgency(status, now, thresholds) {
        Urgency::Urgent => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        Urgency::Soon => Style::default().fg(Color::Yellow),
        Urgency::Comfortable => Style::default().fg(Color::Green),
        Urgency::Unknown => Style::default().fg(Color::DarkGray),
    }
}

fn build_title(state: &ViewState, shown: usize) -> Line<'static> {
    let mut title = format!(" Conferences ({shown} of {}) ", state.conferences.len());
    if state.filter.show_past {
        title.push_str("[incl. past] ");
    }
    Line::from(title)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
