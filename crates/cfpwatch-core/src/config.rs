// Configuration loading and parsing (config/cfpwatch.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::deadline::UrgencyThresholds;
use crate::filter::Focus;
use crate::tags::Category;

/// File name of the configuration, under `config/` and `defaults/`.
pub const CONFIG_FILE: &str = "cfpwatch.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("neither config/cfpwatch.toml nor defaults/cfpwatch.toml found in {base_dir}; run from the project root or pass --root")]
    NoProjectRoot { base_dir: PathBuf },

    #[error("failed to seed config at {path}: {source}")]
    Seed {
        path: PathBuf,
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory the relative data paths are resolved against.
    pub base_dir: PathBuf,
    pub data: DataPaths,
    pub focus: Focus,
    pub display: DisplayConfig,
    pub categories: Vec<Category>,
    pub sync: SyncConfig,
}

impl Config {
    /// Absolute path of the per-record directory.
    pub fn conferences_dir(&self) -> PathBuf {
        self.base_dir.join(&self.data.conferences_dir)
    }

    /// Absolute path of the legacy single-file record list.
    pub fn monolithic_file(&self) -> PathBuf {
        self.base_dir.join(&self.data.monolithic_file)
    }
}

// ---------------------------------------------------------------------------
// cfpwatch.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire cfpwatch.toml file.
#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    data: DataPaths,
    #[serde(default)]
    focus: Focus,
    display: DisplayConfig,
    #[serde(default)]
    categories: Vec<Category>,
    sync: SyncConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub conferences_dir: String,
    pub monolithic_file: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    /// Initial state of the "show past conferences" switch.
    #[serde(default)]
    pub show_past: bool,
    pub urgent_days: i64,
    pub soon_days: i64,
    /// Tags listed first in the tag picker.
    #[serde(default)]
    pub priority_tags: Vec<String>,
}

impl DisplayConfig {
    pub fn thresholds(&self) -> UrgencyThresholds {
        UrgencyThresholds {
            urgent_days: self.urgent_days,
            soon_days: self.soon_days,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    /// GitHub contents API URL of the upstream record directory.
    pub api_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Maximum number of record downloads in flight.
    pub concurrency: usize,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/cfpwatch.toml` relative to `base_dir`.
///
/// Does not seed from `defaults/`; see `load_config_in`.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let file: ConfigFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    let config = Config {
        base_dir: base_dir.to_path_buf(),
        data: file.data,
        focus: file.focus,
        display: file.display,
        categories: file.categories,
        sync: file.sync,
    };

    validate(&config)?;

    Ok(config)
}

/// Seed `config/cfpwatch.toml` from `defaults/` when it does not exist yet.
///
/// Returns the path written, or `None` when a config was already in place.
/// An existing config is never overwritten.
pub fn seed_config(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = base_dir.join("config").join(CONFIG_FILE);
    if target.is_file() {
        return Ok(None);
    }

    let template = base_dir.join("defaults").join(CONFIG_FILE);
    if !template.is_file() {
        return Err(ConfigError::NoProjectRoot {
            base_dir: base_dir.to_path_buf(),
        });
    }

    let seed_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source| ConfigError::Seed { path, source }
    };
    if let Some(dir) = target.parent() {
        std::fs::create_dir_all(dir).map_err(seed_err(dir))?;
    }
    std::fs::copy(&template, &target).map_err(seed_err(&target))?;
    Ok(Some(target))
}

/// Seed the config from defaults if needed, then load it.
pub fn load_config_in(base_dir: &Path) -> Result<Config, ConfigError> {
    seed_config(base_dir)?;
    load_config_from(base_dir)
}

/// Convenience wrapper: loads config relative to the current working directory.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    load_config_in(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let display = &config.display;
    if display.urgent_days <= 0 {
        return Err(ConfigError::ValidationError {
            field: "display.urgent_days".into(),
            message: format!("must be > 0, got {}", display.urgent_days),
        });
    }
    if display.soon_days < display.urgent_days {
        return Err(ConfigError::ValidationError {
            field: "display.soon_days".into(),
            message: format!(
                "must be >= urgent_days ({}), got {}",
                display.urgent_days, display.soon_days
            ),
        });
    }

    for (i, category) in config.categories.iter().enumerate() {
        if category.id.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: format!("categories[{i}].id"),
                message: "must not be empty".into(),
            });
        }
    }

    let sync = &config.sync;
    if sync.api_url.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "sync.api_url".into(),
            message: "must not be empty".into(),
        });
    }
    let sync_fields: &[(&str, u64)] = &[
        ("sync.timeout_secs", sync.timeout_secs),
        ("sync.concurrency", sync.concurrency as u64),
    ];
    for (name, val) in sync_fields {
        if *val == 0 {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must be > 0".into(),
            });
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
