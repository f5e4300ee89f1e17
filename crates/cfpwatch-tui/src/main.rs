// cfpwatch entry point.
//
// Startup sequence:
// 1. Parse the command line
// 2. Initialize tracing (log file for the dashboard, stderr otherwise)
// 3. Load config from the project root
// 4. Run the requested subcommand, or the dashboard:
//    load records, build the initial filter, spawn the orchestrator,
//    run the TUI until the user quits, print the share query

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::fmt::MakeWriter;

use cfpwatch_tui::app;
use cfpwatch_tui::cli::{self, BrowseArgs, Cli, Command};
use cfpwatch_tui::tui;
use cfpwatch_core::config::{self, Config};
use cfpwatch_sync::upstream::GithubSource;

const DEFAULT_LOG_FILTER: &str = "cfpwatch=info,cfpwatch_tui=info,cfpwatch_core=info,cfpwatch_sync=info,warn";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let base_dir = cli.base_dir()?;
    let command = cli.command.unwrap_or(Command::Browse(BrowseArgs::default()));

    let interactive = matches!(command, Command::Browse(_));
    init_tracing(&base_dir, interactive)?;
    info!("cfpwatch starting in {}", base_dir.display());

    let config = config::load_config_in(&base_dir).context("failed to load configuration")?;
    info!(
        "Config loaded: records in {}, {} focus tag(s)",
        config.conferences_dir().display(),
        config.focus.tags.len()
    );

    let mut out = io::stdout().lock();
    match command {
        Command::Browse(args) => {
            drop(out);
            browse(config, &args).await
        }
        Command::List(args) => cli::run_list(&config, &args, Utc::now(), &mut out),
        Command::Countries => cli::run_countries(&config, &mut out),
        Command::Tags => cli::run_tags(&config, &mut out),
        Command::Split(args) => cli::run_split(&config, &args, &mut out),
        Command::Sync(args) => {
            let source = GithubSource::from_config(&config.sync).context("failed to build HTTP client")?;
            cli::run_sync(&config, &source, &args, &mut out).await
        }
    }
}

async fn browse(config: Config, args: &BrowseArgs) -> anyhow::Result<()> {
    let catalog = app::build_catalog(&config)?;
    info!("Loaded {} conferences", catalog.conferences.len());

    let (filter, share) = cli::initial_filter(&config, args);
    let view_state = tui::ViewState::new(&config, catalog, filter, share);

    let source = GithubSource::from_config(&config.sync).context("failed to build HTTP client")?;
    let app_state = app::AppState::new(config, Arc::new(source));

    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(64);

    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(cmd_rx, ui_tx, app_state).await {
            error!("Application loop error: {}", e);
        }
    });

    // Blocks until the user quits.
    let result = tui::run(ui_rx, cmd_tx, view_state).await;

    let _ = tokio::time::timeout(Duration::from_secs(5), async {
        let _ = app_handle.await;
    })
    .await;

    let final_state = result?;
    if !final_state.share.is_empty() {
        println!("?{}", final_state.share.to_query_string());
    }
    info!("cfpwatch shut down cleanly");
    Ok(())
}

/// Initialize tracing. The dashboard owns the terminal, so it logs to
/// `logs/cfpwatch.log` under the project root; other commands log to stderr.
fn init_tracing(base_dir: &Path, interactive: bool) -> anyhow::Result<()> {
    if interactive {
        let log_dir = base_dir.join("logs");
        std::fs::create_dir_all(&log_dir)
            .with_context(|| format!("failed to create {}", log_dir.display()))?;
        let log_file = std::fs::File::create(log_dir.join("cfpwatch.log"))?;
        install_subscriber(log_file, false)
    } else {
        install_subscriber(io::stderr, true)
    }
}

fn install_subscriber<W>(writer: W, ansi: bool) -> anyhow::Result<()>
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
