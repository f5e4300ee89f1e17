// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into local ViewState mutations (moving,
// filtering, opening dialogs) or into UserCommand messages for the app
// orchestrator (reload, sync, quit).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use cfpwatch_core::filter::FilterState;

use super::{Overlay, ViewState};
use crate::protocol::UserCommand;

/// Rows moved by PageUp/PageDown.
const PAGE_SIZE: usize = 10;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to the
/// orchestrator, `None` when it was handled locally.
pub fn handle_key(key_event: KeyEvent, state: &mut ViewState) -> Option<UserCommand> {
    // crossterm reports releases too on some platforms.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    if key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char('c') {
        return Some(UserCommand::Quit);
    }

    if let Some(overlay) = state.overlay {
        return handle_overlay(key_event, state, overlay);
    }

    if state.search_mode {
        handle_search_mode(key_event, state);
        return None;
    }

    match key_event.code {
        KeyCode::Up | KeyCode::Char('k') => move_selection(state, -1),
        KeyCode::Down | KeyCode::Char('j') => move_selection(state, 1),
        KeyCode::PageUp => move_selection(state, -(PAGE_SIZE as isize)),
        KeyCode::PageDown => move_selection(state, PAGE_SIZE as isize),
        KeyCode::Home | KeyCode::Char('g') => state.selected = 0,
        KeyCode::End | KeyCode::Char('G') => {
            state.selected = state.visible().len().saturating_sub(1);
        }

        KeyCode::Char('/') => state.search_mode = true,
        KeyCode::Esc => {
            if !state.filter.search.is_empty() {
                state.filter.search.clear();
                state.filter_changed();
            }
        }

        KeyCode::Left | KeyCode::Char('h') => {
            state.category_cursor = state.category_cursor.saturating_sub(1);
        }
        KeyCode::Right | KeyCode::Char('l') => {
            if state.category_cursor + 1 < state.categories.len() {
                state.category_cursor += 1;
            }
        }
        KeyCode::Char(' ') => {
            if let Some(category) = state.categories.get(state.category_cursor) {
                let id = category.id.clone();
                state.filter.toggle_tag(&id);
                state.filter_changed();
            }
        }

        KeyCode::Char('t') => state.overlay = Some(Overlay::TagPicker { cursor: 0 }),
        KeyCode::Char('c') => state.overlay = Some(Overlay::CountryPicker { cursor: 0 }),
        KeyCode::Char('p') => {
            state.filter.show_past = !state.filter.show_past;
            state.filter_changed();
        }
        KeyCode::Char('x') => {
            state.filter.clear();
            state.filter_changed();
        }
        KeyCode::Enter => {
            if let Some(index) = state.selected_index() {
                state.overlay = Some(Overlay::Detail { index });
            }
        }
        KeyCode::Char('?') => state.overlay = Some(Overlay::Help),
        KeyCode::Char('q') => state.overlay = Some(Overlay::ConfirmQuit),

        KeyCode::Char('r') => return Some(UserCommand::Reload),
        KeyCode::Char('S') => return Some(UserCommand::Sync),

        _ => {}
    }
    None
}

fn move_selection(state: &mut ViewState, delta: isize) {
    let len = state.visible().len();
    if len == 0 {
        state.selected = 0;
        return;
    }
    state.selected = state.selected.saturating_add_signed(delta).min(len - 1);
}

/// Search box editing. Enter keeps the query, Esc clears it.
fn handle_search_mode(key_event: KeyEvent, state: &mut ViewState) {
    match key_event.code {
        KeyCode::Esc => {
            state.search_mode = false;
            state.filter.search.clear();
        }
        KeyCode::Enter => state.search_mode = false,
        KeyCode::Backspace => {
            state.filter.search.pop();
        }
        KeyCode::Char(c) => state.filter.search.push(c),
        _ => return,
    }
    state.filter_changed();
}

fn handle_overlay(key_event: KeyEvent, state: &mut ViewState, overlay: Overlay) -> Option<UserCommand> {
    match overlay {
        Overlay::ConfirmQuit => match key_event.code {
            KeyCode::Char('y' | 'Y' | 'q' | 'Q') => return Some(UserCommand::Quit),
            KeyCode::Char('n' | 'N') | KeyCode::Esc => state.overlay = None,
            _ => {}
        },
        Overlay::Help => {
            if matches!(key_event.code, KeyCode::Esc | KeyCode::Char('?' | 'q') | KeyCode::Enter) {
                state.overlay = None;
            }
        }
        Overlay::Detail { index } => handle_detail(key_event, state, index),
        Overlay::TagPicker { cursor } => {
            let items: Vec<String> = state.tag_catalog.iter().map(|t| t.id.clone()).collect();
            state.overlay = handle_picker(key_event, state, &items, cursor, PickerKind::Tags)
                .map(|cursor| Overlay::TagPicker { cursor });
        }
        Overlay::CountryPicker { cursor } => {
            let items = state.countries.clone();
            state.overlay = handle_picker(key_event, state, &items, cursor, PickerKind::Countries)
                .map(|cursor| Overlay::CountryPicker { cursor });
        }
    }
    None
}

/// Digits toggle the record's tags as filters; the dialog stays open.
fn handle_detail(key_event: KeyEvent, state: &mut ViewState, index: usize) {
    match key_event.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => state.overlay = None,
        KeyCode::Char(c @ '1'..='9') => {
            let position = c as usize - '1' as usize;
            let tag = state
                .conferences
                .get(index)
                .and_then(|conf| conf.tags.get(position))
                .cloned();
            if let Some(tag) = tag {
                state.filter.toggle_tag(&tag);
                state.filter_changed();
            }
        }
        _ => {}
    }
}

/// Which filter set a picker edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PickerKind {
    Tags,
    Countries,
}

impl PickerKind {
    /// The key that opened the picker also closes it.
    fn close_key(self) -> char {
        match self {
            PickerKind::Tags => 't',
            PickerKind::Countries => 'c',
        }
    }

    fn toggle(self, filter: &mut FilterState, item: &str) {
        match self {
            PickerKind::Tags => filter.toggle_tag(item),
            PickerKind::Countries => filter.toggle_country(item),
        }
    }
}

/// Shared tag/country picker keys. Returns the new cursor, or `None` when
/// the picker closes.
fn handle_picker(
    key_event: KeyEvent,
    state: &mut ViewState,
    items: &[String],
    cursor: usize,
    kind: PickerKind,
) -> Option<usize> {
    let last = items.len().saturating_sub(1);
    match key_event.code {
        KeyCode::Esc => None,
        KeyCode::Char(c) if c == kind.close_key() => None,
        KeyCode::Up | KeyCode::Char('k') => Some(cursor.saturating_sub(1)),
        KeyCode::Down | KeyCode::Char('j') => Some((cursor + 1).min(last)),
        KeyCode::Char(' ') | KeyCode::Enter => {
            if let Some(item) = items.get(cursor) {
                kind.toggle(&mut state.filter, item);
                state.filter_changed();
            }
            Some(cursor)
        }
        _ => Some(cursor),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::tests::{sample_state, titles};
    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn ctrl_key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn press(state: &mut ViewState, keys: &[KeyCode]) {
        for code in keys {
            handle_key(key(*code), state);
        }
    }

    // -- Movement --

    #[test]
    fn j_and_k_move_within_bounds() {
        let mut state = sample_state();
        press(&mut state, &[KeyCode::Char('j'), KeyCode::Char('j'), KeyCode::Char('j')]);
        assert_eq!(state.selected, 2);
        press(&mut state, &[KeyCode::Char('k'), KeyCode::Up, KeyCode::Up]);
        assert_eq!(state.selected, 0);
    }

    #[test]
    fn page_and_jump_keys() {
        let mut state = sample_state();
        press(&mut state, &[KeyCode::PageDown]);
        assert_eq!(state.selected, 2);
        press(&mut state, &[KeyCode::Char('g')]);
        assert_eq!(state.selected, 0);
        press(&mut state, &[KeyCode::Char('G')]);
        assert_eq!(state.selected, 2);
    }

    #[test]
    fn release_events_are_ignored() {
        let mut state = sample_state();
        let mut release = key(KeyCode::Char('j'));
        release.kind = KeyEventKind::Release;
        assert!(handle_key(release, &mut state).is_none());
        assert_eq!(state.selected, 0);
    }

    // -- Search --

    #[test]
    fn search_mode_edits_query() {
        let mut state = sample_state();
        press(
            &mut state,
            &[KeyCode::Char('/'), KeyCode::Char('m'), KeyCode::Char('i'), KeyCode::Char('x')],
        );
        assert!(state.search_mode);
        assert_eq!(state.filter.search, "mix");
        assert!(titles(&state).is_empty());

        press(&mut state, &[KeyCode::Backspace, KeyCode::Backspace, KeyCode::Enter]);
        assert!(!state.search_mode);
        assert_eq!(state.filter.search, "m");
        assert_eq!(titles(&state), vec!["Sooner", "Middle", "Later"]);
    }

    #[test]
    fn q_in_search_mode_is_text() {
        let mut state = sample_state();
        press(&mut state, &[KeyCode::Char('/')]);
        let result = handle_key(key(KeyCode::Char('q')), &mut state);
        assert!(result.is_none());
        assert_eq!(state.filter.search, "q");
        assert!(state.overlay.is_none());
    }

    #[test]
    fn esc_in_search_mode_clears_query() {
        let mut state = sample_state();
        press(&mut state, &[KeyCode::Char('/'), KeyCode::Char('z'), KeyCode::Esc]);
        assert!(!state.search_mode);
        assert!(state.filter.search.is_empty());
    }

    // -- Categories and switches --

    #[test]
    fn space_toggles_category_under_cursor() {
        let mut state = sample_state();
        press(&mut state, &[KeyCode::Char('l'), KeyCode::Char(' ')]);
        assert!(state.filter.tags.contains("machine-translation"));
        assert_eq!(titles(&state), vec!["Sooner", "Middle"]);
        assert_eq!(state.share.to_query_string(), "tags=machine-translation");

        press(&mut state, &[KeyCode::Char(' ')]);
        assert!(state.filter.tags.is_empty());
        assert!(state.share.is_empty());
    }

    #[test]
    fn category_cursor_stays_in_range() {
        let mut state = sample_state();
        press(&mut state, &[KeyCode::Char('h'), KeyCode::Char('l'), KeyCode::Char('l'), KeyCode::Char('l')]);
        assert_eq!(state.category_cursor, 1);
    }

    #[test]
    fn p_toggles_show_past() {
        let mut state = sample_state();
        press(&mut state, &[KeyCode::Char('p')]);
        assert!(state.filter.show_past);
        assert_eq!(titles(&state), vec!["Past", "Sooner", "Middle", "Later"]);
    }

    #[test]
    fn x_clears_tags_and_countries() {
        let mut state = sample_state();
        state.filter.toggle_tag("multimodal");
        state.filter.toggle_country("UK");
        state.filter_changed();
        press(&mut state, &[KeyCode::Char('x')]);
        assert!(!state.filter.is_filtered());
        assert!(state.share.is_empty());
    }

    // -- Pickers --

    #[test]
    fn country_picker_toggles_and_closes() {
        let mut state = sample_state();
        // Countries: Austria, UK, USA
        press(&mut state, &[KeyCode::Char('c'), KeyCode::Char('j'), KeyCode::Char(' ')]);
        assert_eq!(state.overlay, Some(Overlay::CountryPicker { cursor: 1 }));
        assert!(state.filter.countries.contains("UK"));
        assert_eq!(titles(&state), vec!["Sooner"]);

        press(&mut state, &[KeyCode::Esc]);
        assert!(state.overlay.is_none());
    }

    #[test]
    fn tag_picker_cursor_clamps() {
        let mut state = sample_state();
        press(&mut state, &[KeyCode::Char('t')]);
        for _ in 0..10 {
            press(&mut state, &[KeyCode::Down]);
        }
        let last = state.tag_catalog.len() - 1;
        assert_eq!(state.overlay, Some(Overlay::TagPicker { cursor: last }));
        press(&mut state, &[KeyCode::Char('t')]);
        assert!(state.overlay.is_none());
    }

    #[test]
    fn tag_picker_toggles_tags_not_countries() {
        let mut state = sample_state();
        // Tags by label: Data Mining, Machine Translation, Multimodal
        press(&mut state, &[KeyCode::Char('t'), KeyCode::Char('j'), KeyCode::Enter]);
        assert!(state.filter.tags.contains("machine-translation"));
        assert!(state.filter.countries.is_empty());

        // 'c' does not close the tag picker.
        press(&mut state, &[KeyCode::Char('c')]);
        assert_eq!(state.overlay, Some(Overlay::TagPicker { cursor: 1 }));
    }

    #[test]
    fn picker_kinds_edit_their_own_set() {
        let mut filter = FilterState::default();
        PickerKind::Tags.toggle(&mut filter, "UK");
        PickerKind::Countries.toggle(&mut filter, "UK");
        assert!(filter.tags.contains("UK"));
        assert!(filter.countries.contains("UK"));
        assert_eq!(PickerKind::Tags.close_key(), 't');
        assert_eq!(PickerKind::Countries.close_key(), 'c');
    }

    // -- Detail --

    #[test]
    fn enter_opens_detail_for_selected_row() {
        let mut state = sample_state();
        press(&mut state, &[KeyCode::Char('j'), KeyCode::Enter]);
        assert_eq!(state.overlay, Some(Overlay::Detail { index: 3 }));
    }

    #[test]
    fn digits_in_detail_toggle_record_tags() {
        let mut state = sample_state();
        press(&mut state, &[KeyCode::Enter]);
        // "Sooner" carries multimodal, machine-translation.
        press(&mut state, &[KeyCode::Char('2')]);
        assert!(state.filter.tags.contains("machine-translation"));
        press(&mut state, &[KeyCode::Char('9')]);
        assert_eq!(state.filter.tags.len(), 1);
        press(&mut state, &[KeyCode::Esc]);
        assert!(state.overlay.is_none());
    }

    #[test]
    fn enter_on_empty_view_does_nothing() {
        let mut state = sample_state();
        state.filter.search = "nothing matches this".into();
        state.filter_changed();
        press(&mut state, &[KeyCode::Enter]);
        assert!(state.overlay.is_none());
    }

    // -- Commands and quitting --

    #[test]
    fn r_and_shift_s_go_to_the_orchestrator() {
        let mut state = sample_state();
        assert_eq!(handle_key(key(KeyCode::Char('r')), &mut state), Some(UserCommand::Reload));
        assert_eq!(handle_key(key(KeyCode::Char('S')), &mut state), Some(UserCommand::Sync));
    }

    #[test]
    fn q_asks_for_confirmation() {
        let mut state = sample_state();
        assert!(handle_key(key(KeyCode::Char('q')), &mut state).is_none());
        assert_eq!(state.overlay, Some(Overlay::ConfirmQuit));

        assert!(handle_key(key(KeyCode::Char('j')), &mut state).is_none());
        assert_eq!(state.selected, 0);

        assert!(handle_key(key(KeyCode::Char('n')), &mut state).is_none());
        assert!(state.overlay.is_none());

        handle_key(key(KeyCode::Char('q')), &mut state);
        assert_eq!(handle_key(key(KeyCode::Char('y')), &mut state), Some(UserCommand::Quit));
    }

    #[test]
    fn ctrl_c_quits_from_anywhere() {
        let mut state = sample_state();
        state.search_mode = true;
        state.overlay = Some(Overlay::Help);
        assert_eq!(
            handle_key(ctrl_key(KeyCode::Char('c')), &mut state),
            Some(UserCommand::Quit)
        );
    }

    #[test]
    fn help_closes_on_question_mark() {
        let mut state = sample_state();
        press(&mut state, &[KeyCode::Char('?')]);
        assert_eq!(state.overlay, Some(Overlay::Help));
        press(&mut state, &[KeyCode::Char('?')]);
        assert!(state.overlay.is_none());
    }
}
