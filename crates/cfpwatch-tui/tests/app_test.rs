// Orchestrator round trips over the same channels the dashboard uses.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use cfpwatch_core::config::{load_config_from, Config};
use cfpwatch_sync::upstream::{parse_upstream_file, UpstreamConference, UpstreamSource};
use cfpwatch_sync::SyncError;
use cfpwatch_tui::app::{self, AppState};
use cfpwatch_tui::protocol::{StatusLevel, UiUpdate, UserCommand};

const CONFIG: &str = r#"
[data]
conferences_dir = "data/conferences"
monolithic_file = "data/conferences.yml"

[display]
urgent_days = 7
soon_days = 30

[sync]
api_url = "http://127.0.0.1:9/unused"
user_agent = "cfpwatch-test"
timeout_secs = 1
concurrency = 1
"#;

const FUTURE_VENUE: &str = r#"
- title: FUTR
  description: Conference of the Far Future
  confs:
    - year: 2999
      id: futr2999
      link: https://futr.example.org/
      timeline:
        - deadline: '2999-01-10 23:59:59'
      timezone: UTC
      date: March 3-5, 2999
      place: Vienna, Austria
"#;

struct FakeSource {
    result: Result<Vec<UpstreamConference>, String>,
}

#[async_trait]
impl UpstreamSource for FakeSource {
    async fn fetch(&self) -> Result<Vec<UpstreamConference>, SyncError> {
        match &self.result {
            Ok(confs) => Ok(confs.clone()),
            Err(reason) => Err(SyncError::DateRange {
                date: "fetch".into(),
                reason: reason.clone(),
            }),
        }
    }
}

fn scratch_root(name: &str) -> (PathBuf, Config) {
    let root = std::env::temp_dir().join(format!("cfpwatch_app_{name}"));
    let _ = fs::remove_dir_all(&root);
    fs::create_dir_all(root.join("config")).unwrap();
    fs::create_dir_all(root.join("data/conferences")).unwrap();
    fs::write(root.join("config/cfpwatch.toml"), CONFIG).unwrap();
    fs::write(
        root.join("data/conferences/wmt26.yml"),
        "title: WMT\nyear: 2026\nid: wmt26\ndeadline: TBD\ntags:\n- machine-translation\ncountry: China\n",
    )
    .unwrap();
    let config = load_config_from(&root).unwrap();
    (root, config)
}

fn future_source() -> FakeSource {
    let venue = parse_upstream_file("FUTR.yml", FUTURE_VENUE).unwrap().unwrap();
    FakeSource {
        result: Ok(vec![venue]),
    }
}

async fn next_update(rx: &mut mpsc::Receiver<UiUpdate>) -> UiUpdate {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for update")
        .expect("orchestrator hung up")
}

#[tokio::test]
async fn build_catalog_derives_option_lists() {
    let (root, config) = scratch_root("catalog");
    let catalog = app::build_catalog(&config).unwrap();
    assert_eq!(catalog.conferences.len(), 1);
    assert_eq!(catalog.countries, vec!["China"]);
    assert_eq!(catalog.tags[0].label, "Machine Translation");
    let _ = fs::remove_dir_all(&root);
}

#[tokio::test]
async fn reload_sends_catalog_then_status() {
    let (root, config) = scratch_root("reload");
    let (cmd_tx, cmd_rx) = mpsc::channel(8);
    let (ui_tx, mut ui_rx) = mpsc::channel(8);
    let state = AppState::new(config, Arc::new(future_source()));
    let handle = tokio::spawn(app::run(cmd_rx, ui_tx, state));

    cmd_tx.send(UserCommand::Reload).await.unwrap();
    match next_update(&mut ui_rx).await {
        UiUpdate::Catalog(catalog) => assert_eq!(catalog.conferences[0].title, "WMT"),
        other => panic!("expected catalog, got {other:?}"),
    }
    match next_update(&mut ui_rx).await {
        UiUpdate::Status(status) => {
            assert_eq!(status.level, StatusLevel::Info);
            assert_eq!(status.text, "Loaded 1 conferences");
        }
        other => panic!("expected status, got {other:?}"),
    }

    cmd_tx.send(UserCommand::Quit).await.unwrap();
    handle.await.unwrap().unwrap();
    let _ = fs::remove_dir_all(&root);
}

#[tokio::test]
async fn sync_writes_new_records_and_reloads() {
    let (root, config) = scratch_root("sync");
    let dir = config.conferences_dir();
    let (cmd_tx, cmd_rx) = mpsc::channel(8);
    let (ui_tx, mut ui_rx) = mpsc::channel(16);
    let state = AppState::new(config, Arc::new(future_source()));
    let handle = tokio::spawn(app::run(cmd_rx, ui_tx, state));

    cmd_tx.send(UserCommand::Sync).await.unwrap();

    let UiUpdate::Status(first) = next_update(&mut ui_rx).await else {
        panic!("expected a progress status first");
    };
    assert_eq!(first.text, "Syncing from upstream...");

    let UiUpdate::Catalog(catalog) = next_update(&mut ui_rx).await else {
        panic!("expected the reloaded catalog");
    };
    let mut titles: Vec<&str> = catalog.conferences.iter().map(|c| c.title.as_str()).collect();
    titles.sort();
    assert_eq!(titles, vec!["FUTR", "WMT"]);
    assert!(catalog.countries.contains(&"Austria".to_string()));

    // Reload status, then the sync summary.
    let _ = next_update(&mut ui_rx).await;
    let UiUpdate::Status(summary) = next_update(&mut ui_rx).await else {
        panic!("expected the sync summary");
    };
    assert!(summary.text.starts_with("Sync: fetched 1"), "{}", summary.text);
    assert!(dir.join("futr2999.yml").is_file());

    drop(cmd_tx);
    handle.await.unwrap().unwrap();
    let _ = fs::remove_dir_all(&root);
}

#[tokio::test]
async fn failed_sync_reports_an_error_status() {
    let (root, config) = scratch_root("sync_error");
    let (cmd_tx, cmd_rx) = mpsc::channel(8);
    let (ui_tx, mut ui_rx) = mpsc::channel(8);
    let source = FakeSource {
        result: Err("offline".into()),
    };
    let state = AppState::new(config, Arc::new(source));
    let handle = tokio::spawn(app::run(cmd_rx, ui_tx, state));

    cmd_tx.send(UserCommand::Sync).await.unwrap();
    let _ = next_update(&mut ui_rx).await;
    let UiUpdate::Status(status) = next_update(&mut ui_rx).await else {
        panic!("expected an error status");
    };
    assert_eq!(status.level, StatusLevel::Error);
    assert!(status.text.starts_with("Sync failed"));

    cmd_tx.send(UserCommand::Quit).await.unwrap();
    handle.await.unwrap().unwrap();
    let _ = fs::remove_dir_all(&root);
}
