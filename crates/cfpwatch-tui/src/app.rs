// App orchestrator: owns the record directory and serves the dashboard's
// reload and sync requests.
//
// The dashboard sends `UserCommand`s; the orchestrator answers with
// `UiUpdate`s. Nothing else touches the data directory while the dashboard
// is running.

use std::sync::Arc;

use anyhow::Context;
use chrono::{Datelike, Utc};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use cfpwatch_core::config::Config;
use cfpwatch_core::country::all_countries;
use cfpwatch_core::loader;
use cfpwatch_core::tags::tag_catalog;
use cfpwatch_sync::pipeline;
use cfpwatch_sync::upstream::UpstreamSource;

use crate::protocol::{Catalog, StatusMessage, UiUpdate, UserCommand};

/// Load the record directory and derive the picker option lists.
pub fn build_catalog(config: &Config) -> anyhow::Result<Catalog> {
    let dir = config.conferences_dir();
    let conferences = loader::load_dir(&dir)
        .with_context(|| format!("failed to load conferences from {}", dir.display()))?;
    let tags = tag_catalog(&conferences, &config.display.priority_tags);
    let countries = all_countries(&conferences);
    Ok(Catalog {
        conferences,
        tags,
        countries,
    })
}

pub struct AppState {
    pub config: Config,
    source: Arc<dyn UpstreamSource>,
}

impl AppState {
    pub fn new(config: Config, source: Arc<dyn UpstreamSource>) -> Self {
        AppState { config, source }
    }
}

async fn send_status(ui_tx: &mpsc::Sender<UiUpdate>, status: StatusMessage) {
    let _ = ui_tx.send(UiUpdate::Status(status)).await;
}

async fn reload(state: &AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    match build_catalog(&state.config) {
        Ok(catalog) => {
            let count = catalog.conferences.len();
            info!("Reloaded {} conferences", count);
            let _ = ui_tx.send(UiUpdate::Catalog(Box::new(catalog))).await;
            send_status(ui_tx, StatusMessage::info(format!("Loaded {count} conferences"))).await;
        }
        Err(e) => {
            warn!("Reload failed: {:#}", e);
            send_status(ui_tx, StatusMessage::error(format!("Reload failed: {e:#}"))).await;
        }
    }
}

async fn sync(state: &AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    send_status(ui_tx, StatusMessage::info("Syncing from upstream...")).await;

    let dir = state.config.conferences_dir();
    let year = Utc::now().year();
    match pipeline::run(state.source.as_ref(), &dir, year, false).await {
        Ok(report) => {
            info!("Sync finished: {}", report.summary());
            reload(state, ui_tx).await;
            send_status(ui_tx, StatusMessage::info(format!("Sync: {}", report.summary()))).await;
        }
        Err(e) => {
            error!("Sync failed: {}", e);
            send_status(ui_tx, StatusMessage::error(format!("Sync failed: {e}"))).await;
        }
    }
}

/// Run the orchestrator until the dashboard quits or drops its sender.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    ui_tx: mpsc::Sender<UiUpdate>,
    state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    while let Some(cmd) = cmd_rx.recv().await {
        match cmd {
            UserCommand::Reload => reload(&state, &ui_tx).await,
            UserCommand::Sync => sync(&state, &ui_tx).await,
            UserCommand::Quit => {
                info!("Quit requested");
                break;
            }
        }
    }

    info!("Application event loop stopped");
    Ok(())
}
