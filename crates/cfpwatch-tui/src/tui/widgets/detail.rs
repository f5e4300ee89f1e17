// Detail dialog: every field of one record, the deadline in local time and
// numbered tags that can be toggled as filters.

use chrono::{DateTime, Local, Utc};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use cfpwatch_core::conference::Conference;
use cfpwatch_core::deadline::{countdown_label, deadline_display, DeadlineStatus};
use cfpwatch_core::tags::tag_label;

use super::conference_table::countdown_style;
use crate::tui::layout::centered_rect;
use crate::tui::ViewState;

const DIALOG_WIDTH: u16 = 84;
const DIALOG_HEIGHT: u16 = 24;

/// Render the dialog for `conf` centered in `area`.
pub fn render(frame: &mut Frame, area: Rect, conf: &Conference, state: &ViewState) {
    let dialog_area = centered_rect(DIALOG_WIDTH, DIALOG_HEIGHT, area);
    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            format!(" {} ", conf.display_title()),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))
        .title_bottom(Line::from(" 1-9: toggle tag filter | Esc: close ").right_aligned());

    let paragraph = Paragraph::new(detail_lines(conf, state))
        .block(block)
        .wrap(Wrap { trim: false })
        .style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, dialog_area);
}

fn field(label: &str, value: impl Into<String>) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:<18}"), Style::default().fg(Color::Gray)),
        Span::raw(value.into()),
    ])
}

fn local_time(t: DateTime<Utc>) -> String {
    t.with_timezone(&Local).format("%a %d %b %Y %H:%M (%:z)").to_string()
}

fn deadline_lines(label: &str, raw: Option<&str>, tz: Option<&str>, status: DeadlineStatus) -> Vec<Line<'static>> {
    let mut written = deadline_display(raw);
    if let (Some(tz), Some(_)) = (tz, status.instant()) {
        written = format!("{written} ({tz})");
    }
    let mut lines = vec![field(label, written)];
    match status {
        DeadlineStatus::At(t) => lines.push(field("  your time", local_time(t))),
        DeadlineStatus::Invalid => lines.push(field("  your time", "Invalid date")),
        DeadlineStatus::Tbd => {}
    }
    lines
}

/// Body text of the dialog.
pub fn detail_lines(conf: &Conference, state: &ViewState) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    if let Some(full_name) = &conf.full_name {
        lines.push(Line::from(Span::styled(
            full_name.clone(),
            Style::default().add_modifier(Modifier::ITALIC),
        )));
        lines.push(Line::default());
    }

    let status = conf.deadline_status();
    lines.extend(deadline_lines(
        "Deadline",
        conf.deadline.as_deref(),
        conf.timezone.as_deref(),
        status,
    ));
    lines.push(Line::from(vec![
        Span::styled(format!("{:<18}", "Countdown"), Style::default().fg(Color::Gray)),
        Span::styled(
            countdown_label(status, state.now),
            countdown_style(status, state.now, state.thresholds),
        ),
    ]));
    if conf.abstract_deadline.is_some() {
        lines.extend(deadline_lines(
            "Abstract deadline",
            conf.abstract_deadline.as_deref(),
            conf.timezone.as_deref(),
            conf.abstract_deadline_status(),
        ));
    }

    lines.push(Line::default());
    if let Some(date) = &conf.date {
        lines.push(field("Dates", date.clone()));
    }
    let location = conf.location();
    if !location.is_empty() {
        lines.push(field("Location", location));
    }
    if let Some(venue) = &conf.venue {
        lines.push(field("Venue", venue.clone()));
    }
    if let Some(rankings) = &conf.rankings {
        lines.push(field("Rankings", rankings.clone()));
    }
    if let Some(link) = &conf.link {
        lines.push(field("Link", link.clone()));
    }
    if let Some(note) = &conf.note {
        lines.push(field("Note", note.clone()));
    }

    if !conf.tags.is_empty() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled("Tags", Style::default().fg(Color::Gray))));
        for (i, tag) in conf.tags.iter().enumerate() {
            let active = state.filter.tags.contains(tag);
            let number = if i < 9 {
                format!("{}", i + 1)
            } else {
                " ".to_string()
            };
            let style = if active {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            lines.push(Line::from(vec![
                Span::styled(format!("  {number} "), Style::default().fg(Color::Yellow)),
                Span::styled(
                    format!("[{}] {}", if active { "x" } else { " " }, tag_label(tag)),
                    style,
                ),
            ]));
        }
    }

    lines
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::tests::sample_state;

    fn text(lines: &[Line]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    fn full_record() -> Conference {
        Conference {
            title: "ACL".into(),
            year: Some(2025),
            full_name: Some("Annual Meeting of the ACL".into()),
            deadline: Some("2025-03-11 23:59:59".into()),
            abstract_deadline: Some("2025-03-04".into()),
            timezone: Some("AoE".into()),
            date: Some("July 27 - August 1, 2025".into()),
            city: Some("Vienna".into()),
            country: Some("Austria".into()),
            link: Some("https://2025.aclweb.org/".into()),
            note: Some("ARR commitment".into()),
            tags: vec!["natural-language-processing".into(), "multimodal".into()],
            ..Conference::default()
        }
    }

    #[test]
    fn shows_all_fields() {
        let state = sample_state();
        let lines = text(&detail_lines(&full_record(), &state));
        let joined = lines.join("\n");
        assert!(joined.contains("Annual Meeting of the ACL"));
        assert!(joined.contains("2025-03-11 23:59:59 (AoE)"));
        assert!(joined.contains("Abstract deadline"));
        assert!(joined.contains("Vienna, Austria"));
        assert!(joined.contains("https://2025.aclweb.org/"));
        assert!(joined.contains("ARR commitment"));
        assert_eq!(lines.iter().filter(|l| l.contains("your time")).count(), 2);
    }

    #[test]
    fn tags_are_numbered_and_marked() {
        let mut state = sample_state();
        state.filter.toggle_tag("multimodal");
        let lines = text(&detail_lines(&full_record(), &state));
        assert!(lines.contains(&"  1 [ ] Natural Language Processing".to_string()));
        assert!(lines.contains(&"  2 [x] Multimodal".to_string()));
    }

    #[test]
    fn tbd_deadline_has_no_local_time() {
        let state = sample_state();
        let conf = Conference {
            title: "WMT".into(),
            deadline: Some("TBD".into()),
            ..Conference::default()
        };
        let lines = text(&detail_lines(&conf, &state));
        assert!(lines.iter().any(|l| l.contains("TBD")));
        assert!(!lines.iter().any(|l| l.contains("your time")));
    }

    #[test]
    fn render_does_not_panic() {
        let backend = ratatui::backend::TestBackend::new(100, 30);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = sample_state();
        terminal
            .draw(|frame| render(frame, frame.area(), &full_record(), &state))
            .unwrap();
    }
}
