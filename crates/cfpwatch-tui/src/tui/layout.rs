// Screen layout: panel arrangement and sizing.
//
// +--------------------------------------------------+
// | Header: title + search box (3 rows)               |
// +--------------------------------------------------+
// | Category bar (1 row)                              |
// | Controls: show-past, countries, share (1 row)     |
// +--------------------------------------------------+
// | Conference table (fill)                           |
// +--------------------------------------------------+
// | Status bar (1 row)                                |
// | Help bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Flex, Layout, Rect};

/// Resolved screen areas for each dashboard zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    pub header: Rect,
    pub category_bar: Rect,
    pub controls: Rect,
    pub table: Rect,
    /// Counts and the latest orchestrator message.
    pub status_bar: Rect,
    /// Keyboard shortcut hints.
    pub help_bar: Rect,
}

/// Build the dashboard layout from the available terminal area.
pub fn build_layout(area: Rect) -> AppLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Length(1), // category bar
            Constraint::Length(1), // controls
            Constraint::Min(5),    // table
            Constraint::Length(1), // status bar
            Constraint::Length(1), // help bar
        ])
        .split(area);

    AppLayout {
        header: vertical[0],
        category_bar: vertical[1],
        controls: vertical[2],
        table: vertical[3],
        status_bar: vertical[4],
        help_bar: vertical[5],
    }
}

/// Area of a `width` x `height` dialog centred in `area`, shrunk to fit.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [dialog] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    dialog
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn test_area() -> Rect {
        Rect::new(0, 0, 120, 40)
    }

    #[test]
    fn layout_all_rects_nonzero() {
        let layout = build_layout(test_area());
        let rects = [
            ("header", layout.header),
            ("category_bar", layout.category_bar),
            ("controls", layout.controls),
            ("table", layout.table),
            ("status_bar", layout.status_bar),
            ("help_bar", layout.help_bar),
        ];
        for (name, rect) in &rects {
            assert!(
                rect.width > 0 && rect.height > 0,
                "{} has zero area: {:?}",
                name,
                rect
            );
        }
    }

    #[test]
    fn fixed_rows_have_fixed_heights() {
        let layout = build_layout(test_area());
        assert_eq!(layout.header.height, 3);
        assert_eq!(layout.category_bar.height, 1);
        assert_eq!(layout.controls.height, 1);
        assert_eq!(layout.status_bar.height, 1);
        assert_eq!(layout.help_bar.height, 1);
    }

    #[test]
    fn table_takes_the_remaining_rows() {
        let layout = build_layout(test_area());
        assert_eq!(layout.table.height, 40 - 3 - 1 - 1 - 1 - 1);
        assert_eq!(layout.table.width, 120);
    }

    #[test]
    fn help_bar_is_last_row() {
        let layout = build_layout(test_area());
        assert_eq!(layout.help_bar.y, 39);
    }

    #[test]
    fn centered_rect_sits_in_the_middle() {
        let rect = centered_rect(40, 10, test_area());
        assert_eq!(rect, Rect::new(40, 15, 40, 10));
    }

    #[test]
    fn centered_rect_shrinks_to_small_areas() {
        let area = Rect::new(5, 2, 10, 3);
        let rect = centered_rect(40, 10, area);
        assert_eq!(rect, area);
    }
}
