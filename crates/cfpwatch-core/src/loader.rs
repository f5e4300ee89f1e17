// Record files: loading the per-record YAML directory, reading the legacy
// single-file list, and splitting that list into one file per record.
//
// Loading is forgiving. A file that cannot be read or parsed is skipped with
// a warning, and so is a record whose id repeats an earlier one; only a
// missing directory is an error.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::conference::Conference;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("conference directory not found: {path}")]
    DirNotFound { path: PathBuf },

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("failed to serialize conference {id}: {source}")]
    Serialize {
        id: String,
        source: serde_yaml::Error,
    },

    #[error("conference {title} has no usable id")]
    MissingId { title: String },
}

/// Outcome of splitting a record list into per-record files.
#[derive(Debug, Default)]
pub struct SplitReport {
    pub written: Vec<PathBuf>,
    /// Titles of records that were skipped.
    pub skipped: Vec<String>,
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

fn is_record_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("yml") || e.eq_ignore_ascii_case("yaml"))
}

/// Parse one record file's text. A one-element list is accepted as well as
/// a bare mapping.
pub fn parse_record(text: &str) -> Result<Conference, serde_yaml::Error> {
    let value: serde_yaml::Value = serde_yaml::from_str(text)?;
    let value = match value {
        serde_yaml::Value::Sequence(mut items) => {
            if items.is_empty() {
                return Err(serde::de::Error::custom("empty record list"));
            }
            items.swap_remove(0)
        }
        other => other,
    };
    serde_yaml::from_value(value)
}

/// Read a single record file.
pub fn load_file(path: &Path) -> Result<Conference, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_record(&text).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load every `*.yml`/`*.yaml` record in `dir`, in file-name order.
pub fn load_dir(dir: &Path) -> Result<Vec<Conference>, LoadError> {
    if !dir.is_dir() {
        return Err(LoadError::DirNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = fs::read_dir(dir).map_err(|source| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(e) => Some(e.path()),
            Err(e) => {
                warn!("skipping unreadable directory entry in {}: {}", dir.display(), e);
                None
            }
        })
        .filter(|p| is_record_file(p))
        .collect();
    paths.sort();

    let mut seen_ids = HashSet::new();
    let mut conferences = Vec::with_capacity(paths.len());

    for path in paths {
        let conf = match load_file(&path) {
            Ok(conf) => conf,
            Err(e) => {
                warn!("skipping record file: {}", e);
                continue;
            }
        };
        if let Some(id) = &conf.id {
            if !seen_ids.insert(id.clone()) {
                warn!(
                    "skipping {}: duplicate conference id {}",
                    path.display(),
                    id
                );
                continue;
            }
        }
        conferences.push(conf);
    }

    debug!("loaded {} conference records from {}", conferences.len(), dir.display());
    Ok(conferences)
}

/// Read the legacy single-file list of records.
pub fn load_monolithic(path: &Path) -> Result<Vec<Conference>, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&text).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

/// Whether an id can be used as a file stem without escaping `dir`.
pub fn is_safe_id(id: &str) -> bool {
    !id.is_empty()
        && !id.starts_with('.')
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// Write one record to `<dir>/<id>.yml`, returning the path.
pub fn save_record(dir: &Path, conf: &Conference) -> Result<PathBuf, LoadError> {
    let id = match conf.id.as_deref() {
        Some(id) if is_safe_id(id) => id,
        _ => {
            return Err(LoadError::MissingId {
                title: conf.log_name().to_string(),
            })
        }
    };

    let yaml = serde_yaml::to_string(conf).map_err(|source| LoadError::Serialize {
        id: id.to_string(),
        source,
    })?;

    let path = dir.join(format!("{id}.yml"));
    fs::write(&path, yaml).map_err(|source| LoadError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

/// Split a record list into one file per record under `out_dir`.
///
/// Records without an id, or with an id unfit for a file name, are skipped
/// with a warning.
pub fn split(records: &[Conference], out_dir: &Path) -> Result<SplitReport, LoadError> {
    fs::create_dir_all(out_dir).map_err(|source| LoadError::Io {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let mut report = SplitReport::default();
    for conf in records {
        match conf.id.as_deref() {
            None => {
                warn!("Conference {} has no ID, skipping", conf.log_name());
                report.skipped.push(conf.log_name().to_string());
            }
            Some(id) if !is_safe_id(id) => {
                warn!("Conference {} has unusable ID {:?}, skipping", conf.log_name(), id);
                report.skipped.push(conf.log_name().to_string());
            }
            Some(_) => {
                let path = save_record(out_dir, conf)?;
                info!("Created {}", path.display());
                report.written.push(path);
            }
        }
    }

    info!("Split {} conferences into individual files.", records.len());
    Ok(report)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
