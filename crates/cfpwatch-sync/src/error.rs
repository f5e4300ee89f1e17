// Error type shared by the sync modules.

use std::path::PathBuf;

use cfpwatch_core::loader::LoadError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("failed to build HTTP client: {0}")]
    Client(reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("failed to parse upstream record {name}: {source}")]
    Parse {
        name: String,
        source: serde_yaml::Error,
    },

    #[error("could not parse date `{date}`: {reason}")]
    DateRange { date: String, reason: String },

    #[error("failed to convert conference {id}: {source}")]
    Record {
        id: String,
        source: serde_yaml::Error,
    },

    #[error("failed to create {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Load(#[from] LoadError),
}
