// Share query: the `tags=...&countries=...` query string that reproduces a
// view.
//
// Values are comma-separated and form-encoded. Parameters other than `tags`
// and `countries` are carried through untouched and keep their order.

use cfpwatch_core::filter::FilterState;
use reqwest::Url;
use tracing::warn;

const TAGS: &str = "tags";
const COUNTRIES: &str = "countries";

/// Only used to borrow `Url`'s query encoder.
const PLACEHOLDER_BASE: &str = "http://localhost/";

/// An ordered list of query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShareQuery {
    params: Vec<(String, String)>,
}

fn placeholder_url() -> Option<Url> {
    match Url::parse(PLACEHOLDER_BASE) {
        Ok(url) => Some(url),
        Err(e) => {
            warn!("cannot build query encoder: {}", e);
            None
        }
    }
}

fn split_list(value: &str) -> impl Iterator<Item = String> + '_ {
    value
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl ShareQuery {
    /// Parse a query string; a leading `?` is allowed.
    pub fn parse(query: &str) -> Self {
        let query = query.trim();
        let query = query.strip_prefix('?').unwrap_or(query);
        if query.is_empty() {
            return ShareQuery::default();
        }
        let Some(mut url) = placeholder_url() else {
            return ShareQuery::default();
        };
        url.set_query(Some(query));
        ShareQuery {
            params: url.query_pairs().into_owned().collect(),
        }
    }

    /// Query for a filter alone.
    pub fn from_filter(filter: &FilterState) -> Self {
        let mut query = ShareQuery::default();
        query.sync_from(filter);
        query
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Items of a comma-separated parameter; empty items are dropped.
    pub fn list(&self, key: &str) -> Vec<String> {
        self.get(key).map(|v| split_list(v).collect()).unwrap_or_default()
    }

    /// Set `key` in place of its first occurrence (appending when absent)
    /// and drop any later duplicates.
    pub fn set(&mut self, key: &str, value: String) {
        match self.params.iter().position(|(k, _)| k == key) {
            Some(first) => {
                self.params[first].1 = value;
                let mut index = 0;
                self.params.retain(|(k, _)| {
                    let keep = k != key || index == first;
                    index += 1;
                    keep
                });
            }
            None => self.params.push((key.to_string(), value)),
        }
    }

    pub fn remove(&mut self, key: &str) {
        self.params.retain(|(k, _)| k != key);
    }

    /// Replace the filter's tag and country selections with the query's.
    pub fn apply_to(&self, filter: &mut FilterState) {
        filter.tags = self.list(TAGS).into_iter().collect();
        filter.countries = self.list(COUNTRIES).into_iter().collect();
    }

    /// Write the filter's selections into the query. An empty selection
    /// removes its parameter.
    pub fn sync_from(&mut self, filter: &FilterState) {
        for (key, values) in [(TAGS, &filter.tags), (COUNTRIES, &filter.countries)] {
            if values.is_empty() {
                self.remove(key);
            } else {
                let joined = values.iter().map(String::as_str).collect::<Vec<_>>().join(",");
                self.set(key, joined);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Encoded query without the leading `?`; empty when there is nothing
    /// to share.
    pub fn to_query_string(&self) -> String {
        if self.params.is_empty() {
            return String::new();
        }
        let Some(mut url) = placeholder_url() else {
            return String::new();
        };
        url.query_pairs_mut().extend_pairs(self.params.iter());
        url.query().unwrap_or_default().to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
