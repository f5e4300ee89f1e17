// Conference record: one venue/year instance with its deadlines and metadata.
//
// Records are read from YAML and written back by the splitter and the sync.
// Keys this struct does not name are kept in `extra` so they survive a
// load/save cycle untouched.

use serde::{Deserialize, Deserializer, Serialize};

use crate::deadline::{self, DeadlineStatus};

/// A key written with no value (`title:`) reads as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A single conference record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Conference {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// Unique identifier; also the file stem of the record's YAML file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Submission deadline: ISO date/datetime or the literal `TBD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abstract_deadline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    /// Free-form display date, e.g. "July 27 - August 1, 2025".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rankings: Option<String>,
    /// Any other keys present in the source file.
    #[serde(flatten)]
    pub extra: serde_yaml::Mapping,
}

impl Conference {
    /// "Title Year", or just the title when the year is unknown.
    pub fn display_title(&self) -> String {
        match self.year {
            Some(year) => format!("{} {}", self.title, year),
            None => self.title.clone(),
        }
    }

    /// City and country joined with ", ", skipping empty parts.
    pub fn location(&self) -> String {
        [self.city.as_deref(), self.country.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// The record's country, trimmed, if it has a non-empty one.
    pub fn country_name(&self) -> Option<&str> {
        self.country
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Resolve the submission deadline against the record's timezone.
    pub fn deadline_status(&self) -> DeadlineStatus {
        deadline::resolve(self.deadline.as_deref(), self.timezone.as_deref())
    }

    /// Resolve the abstract deadline against the record's timezone.
    pub fn abstract_deadline_status(&self) -> DeadlineStatus {
        deadline::resolve(self.abstract_deadline.as_deref(), self.timezone.as_deref())
    }

    /// Title used in log messages for records that may lack one.
    pub fn log_name(&self) -> &str {
        if self.title.is_empty() {
            "<untitled>"
        } else {
            &self.title
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
