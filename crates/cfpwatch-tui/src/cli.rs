// Command-line surface and the non-interactive subcommands.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use chrono::{DateTime, Datelike, Utc};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use cfpwatch_core::config::Config;
use cfpwatch_core::filter::{self, FilterState};
use cfpwatch_core::loader;
use cfpwatch_sync::pipeline;
use cfpwatch_sync::upstream::UpstreamSource;

use crate::app;
use crate::list::{self, OutputFormat};
use crate::share::ShareQuery;

#[derive(Debug, Parser)]
#[command(name = "cfpwatch", version, about = "Browse upcoming conference deadlines")]
pub struct Cli {
    /// Project root holding defaults/, config/ and data/ (default: current directory).
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive dashboard (the default).
    Browse(BrowseArgs),
    /// Print the filtered, sorted view.
    List(ListArgs),
    /// Print every country that appears in the records.
    Countries,
    /// Print every tag with its label.
    Tags,
    /// Split the single-file record list into one file per record.
    Split(SplitArgs),
    /// Refresh records from upstream.
    Sync(SyncArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct BrowseArgs {
    /// Start from a share query such as `tags=multimodal&countries=UK`.
    #[arg(long)]
    pub query: Option<String>,

    /// Include conferences whose deadline has passed.
    #[arg(long)]
    pub past: bool,
}

#[derive(Debug, Clone, Default, Args)]
pub struct ListArgs {
    #[arg(long, value_delimiter = ',')]
    pub tags: Vec<String>,

    #[arg(long, value_delimiter = ',')]
    pub countries: Vec<String>,

    /// Case-insensitive text search.
    #[arg(long)]
    pub search: Option<String>,

    #[arg(long)]
    pub past: bool,

    /// Start from a share query; --tags and --countries add to it.
    #[arg(long)]
    pub query: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Default, Args)]
pub struct SplitArgs {
    /// Record list to split (default: data.monolithic_file).
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Directory for the per-record files (default: data.conferences_dir).
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct SyncArgs {
    /// Report what would change without writing.
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    pub fn base_dir(&self) -> anyhow::Result<PathBuf> {
        match &self.root {
            Some(root) => Ok(root.clone()),
            None => std::env::current_dir().context("failed to read current directory"),
        }
    }
}

/// Initial filter for the dashboard: the share query, plus show-past from
/// the flag or the config.
pub fn initial_filter(config: &Config, args: &BrowseArgs) -> (FilterState, ShareQuery) {
    let share = ShareQuery::parse(args.query.as_deref().unwrap_or_default());
    let mut filter = FilterState {
        show_past: args.past || config.display.show_past,
        ..FilterState::default()
    };
    share.apply_to(&mut filter);
    (filter, share)
}

impl ListArgs {
    pub fn filter_state(&self, config: &Config) -> FilterState {
        let mut filter = FilterState {
            show_past: self.past || config.display.show_past,
            search: self.search.clone().unwrap_or_default(),
            ..FilterState::default()
        };
        if let Some(query) = &self.query {
            ShareQuery::parse(query).apply_to(&mut filter);
        }
        filter.tags.extend(self.tags.iter().cloned());
        filter.countries.extend(self.countries.iter().cloned());
        filter
    }
}

// ---------------------------------------------------------------------------
// Subcommands
// ---------------------------------------------------------------------------

pub fn run_list<W: Write>(
    config: &Config,
    args: &ListArgs,
    now: DateTime<Utc>,
    out: &mut W,
) -> anyhow::Result<()> {
    let catalog = app::build_catalog(config)?;
    let filter = args.filter_state(config);
    let visible = filter::apply(&catalog.conferences, &filter, &config.focus, now);
    info!(
        "Listing {} of {} conferences",
        visible.len(),
        catalog.conferences.len()
    );
    list::write(out, args.format, &list::rows(&visible, now))
}

pub fn run_countries<W: Write>(config: &Config, out: &mut W) -> anyhow::Result<()> {
    let catalog = app::build_catalog(config)?;
    for country in &catalog.countries {
        writeln!(out, "{country}")?;
    }
    Ok(())
}

pub fn run_tags<W: Write>(config: &Config, out: &mut W) -> anyhow::Result<()> {
    let catalog = app::build_catalog(config)?;
    for tag in &catalog.tags {
        let marker = if tag.priority { "*" } else { " " };
        writeln!(out, "{marker} {:<32} {}", tag.id, tag.label)?;
    }
    Ok(())
}

pub fn run_split<W: Write>(config: &Config, args: &SplitArgs, out: &mut W) -> anyhow::Result<()> {
    let input = args.input.clone().unwrap_or_else(|| config.monolithic_file());
    let output = args.output.clone().unwrap_or_else(|| config.conferences_dir());

    let records = loader::load_monolithic(&input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let report = loader::split(&records, &output)?;

    writeln!(
        out,
        "Wrote {} conference files to {}",
        report.written.len(),
        output.display()
    )?;
    if !report.skipped.is_empty() {
        writeln!(
            out,
            "Skipped {} record(s) without a usable ID: {}",
            report.skipped.len(),
            report.skipped.join(", ")
        )?;
    }
    Ok(())
}

pub async fn run_sync<W: Write>(
    config: &Config,
    source: &dyn UpstreamSource,
    args: &SyncArgs,
    out: &mut W,
) -> anyhow::Result<()> {
    let year = Utc::now().year();
    let report = pipeline::run(source, &config.conferences_dir(), year, args.dry_run)
        .await
        .context("sync failed")?;

    writeln!(out, "Sync: {}", report.summary())?;
    let verb = if args.dry_run { "would add" } else { "added" };
    for id in &report.added {
        writeln!(out, "  {verb} {id}")?;
    }
    let verb = if args.dry_run { "would update" } else { "updated" };
    for id in &report.updated {
        writeln!(out, "  {verb} {id}")?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
