// Tag and country pickers: a checklist overlay over the dashboard.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState};
use ratatui::Frame;

use crate::tui::layout::centered_rect;
use crate::tui::ViewState;

const DIALOG_WIDTH: u16 = 48;
const DIALOG_HEIGHT: u16 = 20;

/// One picker row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerItem {
    pub label: String,
    pub checked: bool,
    /// Drawn in the accent colour.
    pub priority: bool,
}

pub fn tag_items(state: &ViewState) -> Vec<PickerItem> {
    state
        .tag_catalog
        .iter()
        .map(|tag| PickerItem {
            label: tag.label.clone(),
            checked: state.filter.tags.contains(&tag.id),
            priority: tag.priority,
        })
        .collect()
}

pub fn country_items(state: &ViewState) -> Vec<PickerItem> {
    state
        .countries
        .iter()
        .map(|country| PickerItem {
            label: country.clone(),
            checked: state.filter.countries.contains(country),
            priority: false,
        })
        .collect()
}

pub fn render_tags(frame: &mut Frame, area: Rect, state: &ViewState, cursor: usize) {
    render(frame, area, " Tags (t/Esc to close) ", &tag_items(state), cursor);
}

pub fn render_countries(frame: &mut Frame, area: Rect, state: &ViewState, cursor: usize) {
    render(frame, area, " Countries (c/Esc to close) ", &country_items(state), cursor);
}

fn render(frame: &mut Frame, area: Rect, title: &str, items: &[PickerItem], cursor: usize) {
    let dialog_area = centered_rect(DIALOG_WIDTH, DIALOG_HEIGHT, area);
    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            title.to_string(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))
        .title_bottom(Line::from(" j/k: move | Space: toggle ").right_aligned());

    if items.is_empty() {
        let empty = List::new(vec![ListItem::new("  (nothing to pick)")])
            .block(block)
            .style(Style::default().bg(Color::Black).fg(Color::DarkGray));
        frame.render_widget(empty, dialog_area);
        return;
    }

    let rows: Vec<ListItem> = items
        .iter()
        .map(|item| {
            let mark = if item.checked { "[x]" } else { "[ ]" };
            let style = match (item.checked, item.priority) {
                (true, _) => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                (false, true) => Style::default().fg(Color::Yellow),
                (false, false) => Style::default(),
            };
            ListItem::new(Line::from(Span::styled(format!("{mark} {}", item.label), style)))
        })
        .collect();

    let list = List::new(rows)
        .block(block)
        .style(Style::default().bg(Color::Black))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

    let mut list_state = ListState::default().with_selected(Some(cursor.min(items.len() - 1)));
    frame.render_stateful_widget(list, dialog_area, &mut list_state);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
