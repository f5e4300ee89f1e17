// Mapping upstream venues onto local conference records.

use chrono::NaiveDate;
use serde_yaml::Value;
use tracing::warn;

use cfpwatch_core::conference::Conference;
use cfpwatch_core::country::extract_country;

use crate::error::SyncError;
use crate::upstream::{UpstreamConference, UpstreamInstance};

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

// ---------------------------------------------------------------------------
// Date ranges
// ---------------------------------------------------------------------------

/// Canonical month name for a full or three-letter name, plus `Sept`.
fn month_name(word: &str) -> Option<&'static str> {
    let word = word.trim_end_matches('.');
    if word.eq_ignore_ascii_case("sept") {
        return Some("September");
    }
    MONTHS.iter().copied().find(|m| {
        m.eq_ignore_ascii_case(word) || (word.len() == 3 && m[..3].eq_ignore_ascii_case(word))
    })
}

/// Collapse whitespace and spell month names out in full.
fn normalise(part: &str) -> String {
    part.split_whitespace()
        .map(|w| month_name(w).unwrap_or(w))
        .collect::<Vec<_>>()
        .join(" ")
}

fn parse_day(part: &str, year: i32, original: &str) -> Result<NaiveDate, SyncError> {
    NaiveDate::parse_from_str(&format!("{part}, {year}"), "%B %d, %Y").map_err(|e| {
        SyncError::DateRange {
            date: original.to_string(),
            reason: format!("`{part}`: {e}"),
        }
    })
}

/// Parse a human date range such as `February 25 - March 4, 2025`,
/// `July 2-7` or `May 19, 2025` into its first and last day.
///
/// An end without a month takes the start's month. A range that wraps
/// past December ends in the following year.
pub fn parse_date_range(date: &str, year: i32) -> Result<(NaiveDate, NaiveDate), SyncError> {
    let bad = |reason: &str| SyncError::DateRange {
        date: date.to_string(),
        reason: reason.to_string(),
    };

    let cleaned = date.replace(&format!(", {year}"), "");
    let (start, end) = if cleaned.contains(" - ") {
        let parts: Vec<&str> = cleaned.split(" - ").collect();
        if parts.len() != 2 {
            return Err(bad("more than one range separator"));
        }
        (parts[0].to_string(), parts[1].to_string())
    } else if cleaned.contains('-') {
        let parts: Vec<&str> = cleaned.split('-').collect();
        if parts.len() != 2 {
            return Err(bad("more than one range separator"));
        }
        (parts[0].to_string(), parts[1].to_string())
    } else {
        (cleaned.clone(), cleaned.clone())
    };

    let start = normalise(&start);
    let mut end = normalise(&end);
    if !end.split_whitespace().any(|w| month_name(w).is_some()) {
        let month = start
            .split_whitespace()
            .next()
            .ok_or_else(|| bad("empty start"))?;
        end = format!("{month} {end}");
    }

    let first = parse_day(&start, year, date)?;
    let mut last = parse_day(&end, year, date)?;
    if last < first {
        last = parse_day(&end, year + 1, date)?;
    }
    Ok((first, last))
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// `"CCF: A, CORE: A*"` from an upstream rank map.
fn rankings(rank: &serde_yaml::Mapping) -> Option<String> {
    let scalar = |v: &Value| match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    };
    let parts: Vec<String> = rank
        .iter()
        .filter_map(|(k, v)| Some(format!("{}: {}", scalar(k)?.to_uppercase(), scalar(v)?)))
        .collect();
    (!parts.is_empty()).then(|| parts.join(", "))
}

fn to_record(conf: &UpstreamConference, instance: &UpstreamInstance) -> Conference {
    let timeline = instance.timeline.first();
    let mut record = Conference {
        title: conf.title.clone(),
        year: Some(instance.year),
        id: Some(instance.id.clone()),
        full_name: non_empty(&conf.description),
        link: non_empty(&instance.link),
        deadline: timeline.and_then(|t| t.deadline.clone()),
        abstract_deadline: timeline.and_then(|t| t.abstract_deadline.clone()),
        timezone: non_empty(&instance.timezone),
        date: non_empty(&instance.date),
        tags: Vec::new(),
        rankings: conf.rank.as_ref().and_then(rankings),
        ..Conference::default()
    };

    if let Some((city, _)) = instance.place.split_once(',') {
        record.city = non_empty(city);
    }
    record.country = extract_country(&instance.place);

    if let Some(date) = &record.date {
        match parse_date_range(date, instance.year) {
            Ok((start, end)) => {
                record.start = Some(start.format("%Y-%m-%d").to_string());
                record.end = Some(end.format("%Y-%m-%d").to_string());
            }
            Err(e) => warn!("Could not parse date for {}: {}", conf.title, e),
        }
    }

    record
}

/// Map each upstream venue to a record for its first instance in or after
/// `current_year`. Venues with no such instance are dropped.
pub fn transform(upstream: &[UpstreamConference], current_year: i32) -> Vec<Conference> {
    upstream
        .iter()
        .filter_map(|conf| {
            let instance = conf.confs.iter().find(|i| i.year >= current_year)?;
            Some(to_record(conf, instance))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
