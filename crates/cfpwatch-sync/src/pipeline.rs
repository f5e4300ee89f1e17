// One sync pass: load what is on disk, fetch upstream, transform, merge,
// and write back whatever changed.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use cfpwatch_core::conference::Conference;
use cfpwatch_core::loader;

use crate::error::SyncError;
use crate::merge::merge;
use crate::transform::transform;
use crate::upstream::UpstreamSource;

#[derive(Debug, Default)]
pub struct SyncReport {
    pub fetched: usize,
    pub transformed: usize,
    pub added: Vec<String>,
    pub updated: Vec<String>,
    pub skipped_duplicates: Vec<String>,
    /// Files written; empty on a dry run.
    pub written: Vec<PathBuf>,
}

impl SyncReport {
    pub fn summary(&self) -> String {
        format!(
            "fetched {}, transformed {}, added {}, updated {}, skipped {} duplicate(s)",
            self.fetched,
            self.transformed,
            self.added.len(),
            self.updated.len(),
            self.skipped_duplicates.len()
        )
    }
}

/// Records currently in `dir`, keyed by id. A missing directory is created.
fn load_existing(dir: &Path) -> Result<BTreeMap<String, Conference>, SyncError> {
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|source| SyncError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        return Ok(BTreeMap::new());
    }
    let records = loader::load_dir(dir)?;
    Ok(records
        .into_iter()
        .filter_map(|c| c.id.clone().map(|id| (id, c)))
        .collect())
}

/// Run one sync pass against `dir`.
///
/// `current_year` picks which upstream instance is used. With `dry_run` the
/// merge is computed and reported but nothing is written.
pub async fn run(
    source: &dyn UpstreamSource,
    dir: &Path,
    current_year: i32,
    dry_run: bool,
) -> Result<SyncReport, SyncError> {
    let existing = load_existing(dir)?;
    info!("Loaded {} existing conferences", existing.len());

    let upstream = source.fetch().await?;
    let mut report = SyncReport {
        fetched: upstream.len(),
        ..SyncReport::default()
    };
    if upstream.is_empty() {
        warn!("No conferences fetched from upstream");
        return Ok(report);
    }

    let incoming = transform(&upstream, current_year);
    report.transformed = incoming.len();
    if incoming.is_empty() {
        warn!("No conferences transformed");
        return Ok(report);
    }

    let outcome = merge(existing, incoming)?;
    report.skipped_duplicates = outcome.skipped_duplicates.clone();
    report.added = outcome.added.clone();
    report.updated = outcome.updated.clone();

    if !outcome.changed() {
        info!("No changes needed.");
        return Ok(report);
    }

    if dry_run {
        info!("Dry run: {} conference files would change", report.added.len() + report.updated.len());
        return Ok(report);
    }

    for conf in outcome.changed_records() {
        report.written.push(loader::save_record(dir, conf)?);
    }
    info!("Updated {} conference files.", report.written.len());
    Ok(report)
}
