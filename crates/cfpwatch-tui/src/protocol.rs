// Messages between the dashboard and the app orchestrator.

use cfpwatch_core::conference::Conference;
use cfpwatch_core::tags::TagInfo;

/// Requests from the dashboard to the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserCommand {
    /// Re-read the record directory.
    Reload,
    /// Refresh records from upstream, then reload.
    Sync,
    Quit,
}

/// Everything the dashboard needs from the record directory.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub conferences: Vec<Conference>,
    pub tags: Vec<TagInfo>,
    pub countries: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Error,
}

/// One line of feedback shown in the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub level: StatusLevel,
    pub text: String,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        StatusMessage {
            level: StatusLevel::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        StatusMessage {
            level: StatusLevel::Error,
            text: text.into(),
        }
    }
}

/// Updates pushed from the orchestrator to the dashboard.
#[derive(Debug, Clone)]
pub enum UiUpdate {
    Catalog(Box<Catalog>),
    Status(StatusMessage),
}
