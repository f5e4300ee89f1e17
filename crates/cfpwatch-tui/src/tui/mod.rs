// TUI dashboard: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` holding the loaded records and the user's
// filter. The app orchestrator pushes `UiUpdate` messages over an mpsc
// channel; the TUI applies them to `ViewState` and re-renders at ~30 fps so
// countdowns stay current.

pub mod input;
pub mod layout;
pub mod widgets;

use std::time::Duration;

use chrono::{DateTime, Utc};
use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::Frame;
use tokio::sync::mpsc;
use tracing::warn;

use cfpwatch_core::conference::Conference;
use cfpwatch_core::config::Config;
use cfpwatch_core::deadline::UrgencyThresholds;
use cfpwatch_core::filter::{self, FilterState, Focus};
use cfpwatch_core::tags::{Category, TagInfo};

use crate::protocol::{Catalog, StatusMessage, UiUpdate, UserCommand};
use crate::share::ShareQuery;

use layout::build_layout;

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// Modal dialog drawn over the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    /// Full record view; the index points into `ViewState::conferences`.
    Detail { index: usize },
    TagPicker { cursor: usize },
    CountryPicker { cursor: usize },
    Help,
    ConfirmQuit,
}

/// TUI-local state rendered by `render_frame`.
#[derive(Debug, Default)]
pub struct ViewState {
    pub conferences: Vec<Conference>,
    pub tag_catalog: Vec<TagInfo>,
    pub countries: Vec<String>,
    pub categories: Vec<Category>,
    pub focus: Focus,
    pub thresholds: UrgencyThresholds,
    pub filter: FilterState,
    /// Kept in step with `filter` after every change.
    pub share: ShareQuery,
    /// Row selected in the visible list.
    pub selected: usize,
    /// Position in the category bar.
    pub category_cursor: usize,
    /// Whether typed characters go to the search box.
    pub search_mode: bool,
    pub overlay: Option<Overlay>,
    pub status: Option<StatusMessage>,
    /// Clock used for countdowns and the recency clause.
    pub now: DateTime<Utc>,
}

impl ViewState {
    pub fn new(config: &Config, catalog: Catalog, filter: FilterState, share: ShareQuery) -> Self {
        let mut state = ViewState {
            categories: config.categories.clone(),
            focus: config.focus.clone(),
            thresholds: config.display.thresholds(),
            filter,
            share,
            now: Utc::now(),
            ..ViewState::default()
        };
        state.apply_catalog(catalog);
        state.filter_changed();
        state
    }

    /// Records passing the filter, earliest deadline first.
    pub fn visible(&self) -> Vec<&Conference> {
        filter::apply(&self.conferences, &self.filter, &self.focus, self.now)
    }

    /// Index into `conferences` of the selected visible row.
    pub fn selected_index(&self) -> Option<usize> {
        let visible = self.visible();
        let conf = visible.get(self.selected)?;
        self.conferences.iter().position(|c| std::ptr::eq(c, *conf))
    }

    /// Call after any change to `filter`: re-syncs the share query and
    /// keeps the selection in range.
    pub fn filter_changed(&mut self) {
        self.share.sync_from(&self.filter);
        self.clamp_selection();
    }

    pub fn clamp_selection(&mut self) {
        let len = self.visible().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    pub fn apply_catalog(&mut self, catalog: Catalog) {
        self.conferences = catalog.conferences;
        self.tag_catalog = catalog.tags;
        self.countries = catalog.countries;
        // Indices and cursors may no longer point at the same entries.
        if matches!(
            self.overlay,
            Some(Overlay::Detail { .. } | Overlay::TagPicker { .. } | Overlay::CountryPicker { .. })
        ) {
            self.overlay = None;
        }
        self.clamp_selection();
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
pub fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::Catalog(catalog) => state.apply_catalog(*catalog),
        UiUpdate::Status(status) => state.status = Some(status),
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete dashboard frame.
pub fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::header::render(frame, layout.header, state);
    widgets::category_bar::render(frame, layout.category_bar, state);
    widgets::controls::render(frame, layout.controls, state);
    widgets::conference_table::render(frame, layout.table, state);
    widgets::status_bar::render(frame, layout.status_bar, state);
    widgets::help::render_bar(frame, layout.help_bar, state);

    match state.overlay {
        Some(Overlay::Detail { index }) => {
            if let Some(conf) = state.conferences.get(index) {
                widgets::detail::render(frame, frame.area(), conf, state);
            }
        }
        Some(Overlay::TagPicker { cursor }) => widgets::picker::render_tags(frame, frame.area(), state, cursor),
        Some(Overlay::CountryPicker { cursor }) => {
            widgets::picker::render_countries(frame, frame.area(), state, cursor)
        }
        Some(Overlay::Help) => widgets::help::render_overlay(frame, frame.area()),
        Some(Overlay::ConfirmQuit) => widgets::quit_confirm::render(frame, frame.area()),
        None => {}
    }
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop until the user quits.
///
/// Initializes the terminal, installs a panic hook that restores it, then
/// selects over UI updates, keyboard input and render ticks. Returns the
/// final view state so the caller can report the share query.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
    mut view_state: ViewState,
) -> anyhow::Result<ViewState> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let result = loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => apply_ui_update(&mut view_state, ui_update),
                    // Orchestrator gone: nothing left to drive the dashboard.
                    None => break Ok(()),
                }
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = cmd == UserCommand::Quit;
                            if cmd_tx.send(cmd).await.is_err() {
                                warn!("orchestrator channel closed");
                            }
                            if quit {
                                break Ok(());
                            }
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => break Err(anyhow::Error::new(e).context("terminal input error")),
                    None => break Ok(()),
                }
            }

            _ = render_tick.tick() => {
                view_state.now = Utc::now();
                view_state.clamp_selection();
                if let Err(e) = terminal.draw(|frame| render_frame(frame, &view_state)) {
                    break Err(anyhow::Error::new(e).context("failed to draw frame"));
                }
            }
        }
    };

    ratatui::restore();
    result.map(|()| view_state)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
