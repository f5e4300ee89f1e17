// Upstream record shapes and the sources that produce them.
//
// The upstream dataset keeps one YAML file per venue. Each file is a
// one-element list holding the venue and its per-year instances.

use std::time::Duration;

use async_trait::async_trait;
use cfpwatch_core::config::SyncConfig;
use futures_util::stream::{self, StreamExt};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::SyncError;

// ---------------------------------------------------------------------------
// Upstream types
// ---------------------------------------------------------------------------

/// One venue as published upstream.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpstreamConference {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Ranking systems to grades, e.g. `ccf: A`.
    #[serde(default)]
    pub rank: Option<serde_yaml::Mapping>,
    #[serde(default)]
    pub confs: Vec<UpstreamInstance>,
}

/// One year of a venue.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpstreamInstance {
    pub year: i32,
    pub id: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub timeline: Vec<Timeline>,
    #[serde(default)]
    pub timezone: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub place: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Timeline {
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub abstract_deadline: Option<String>,
}

/// Parse one upstream file. Only the first list element is used; an empty
/// list yields `None`.
pub fn parse_upstream_file(name: &str, text: &str) -> Result<Option<UpstreamConference>, SyncError> {
    let mut list: Vec<UpstreamConference> =
        serde_yaml::from_str(text).map_err(|source| SyncError::Parse {
            name: name.to_string(),
            source,
        })?;
    if list.is_empty() {
        return Ok(None);
    }
    Ok(Some(list.swap_remove(0)))
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// Anything that can hand back the upstream venue list.
#[async_trait]
pub trait UpstreamSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<UpstreamConference>, SyncError>;
}

/// Directory entry from the GitHub contents API.
#[derive(Debug, Deserialize)]
struct ContentEntry {
    name: String,
    download_url: Option<String>,
}

/// Reads the upstream directory through the GitHub contents API.
pub struct GithubSource {
    http: reqwest::Client,
    api_url: String,
    concurrency: usize,
}

impl GithubSource {
    pub fn from_config(config: &SyncConfig) -> Result<Self, SyncError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(SyncError::Client)?;
        Ok(GithubSource {
            http,
            api_url: config.api_url.clone(),
            concurrency: config.concurrency.max(1),
        })
    }

    async fn get_text(&self, url: &str) -> Result<String, SyncError> {
        let http_err = |source| SyncError::Http {
            url: url.to_string(),
            source,
        };
        self.http
            .get(url)
            .send()
            .await
            .map_err(http_err)?
            .error_for_status()
            .map_err(http_err)?
            .text()
            .await
            .map_err(http_err)
    }

    async fn list_files(&self) -> Result<Vec<(String, String)>, SyncError> {
        let http_err = |source| SyncError::Http {
            url: self.api_url.clone(),
            source,
        };
        let entries: Vec<ContentEntry> = self
            .http
            .get(&self.api_url)
            .send()
            .await
            .map_err(http_err)?
            .error_for_status()
            .map_err(http_err)?
            .json()
            .await
            .map_err(http_err)?;

        Ok(entries
            .into_iter()
            .filter(|e| e.name.ends_with(".yml"))
            .filter_map(|e| e.download_url.map(|url| (e.name, url)))
            .collect())
    }

    async fn fetch_one(&self, name: String, url: String) -> Result<Option<UpstreamConference>, SyncError> {
        debug!("downloading {}", url);
        let text = self.get_text(&url).await?;
        parse_upstream_file(&name, &text)
    }
}

#[async_trait]
impl UpstreamSource for GithubSource {
    async fn fetch(&self) -> Result<Vec<UpstreamConference>, SyncError> {
        let files = self.list_files().await?;
        info!("Fetching {} upstream conference files", files.len());

        let results: Vec<_> = stream::iter(files)
            .map(|(name, url)| self.fetch_one(name, url))
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut conferences = Vec::with_capacity(results.len());
        for result in results {
            match result {
                Ok(Some(conf)) => conferences.push(conf),
                Ok(None) => {}
                Err(e) => warn!("skipping upstream file: {}", e),
            }
        }
        Ok(conferences)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
