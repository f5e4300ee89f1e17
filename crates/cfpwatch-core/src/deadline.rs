// Deadline resolution: turn a (deadline, timezone) pair from a record into a
// comparable UTC instant, plus the countdown text and urgency derived from it.
//
// Resolution never fails outright. A missing or "TBD" deadline resolves to
// `DeadlineStatus::Tbd`; text that is not a recognisable date resolves to
// `DeadlineStatus::Invalid`. Both sort after every known deadline.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use thiserror::Error;
use tracing::debug;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeadlineError {
    #[error("unrecognised timezone `{0}`")]
    UnknownTimezone(String),

    #[error("timezone offset out of range in `{0}`")]
    OffsetOutOfRange(String),
}

// ---------------------------------------------------------------------------
// DeadlineStatus
// ---------------------------------------------------------------------------

/// The outcome of resolving a deadline field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadlineStatus {
    /// No deadline announced yet (missing, blank or literally "TBD").
    Tbd,
    /// A deadline was given but could not be parsed.
    Invalid,
    /// A resolved instant.
    At(DateTime<Utc>),
}

impl DeadlineStatus {
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            DeadlineStatus::At(t) => Some(*t),
            DeadlineStatus::Tbd | DeadlineStatus::Invalid => None,
        }
    }

    /// True only for a known deadline at or before `now`.
    pub fn is_past(&self, now: DateTime<Utc>) -> bool {
        matches!(self, DeadlineStatus::At(t) if *t <= now)
    }
}

/// Colour band for a countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    Urgent,
    Soon,
    Comfortable,
    Unknown,
}

/// Day thresholds separating the urgency bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrgencyThresholds {
    pub urgent_days: i64,
    pub soon_days: i64,
}

impl Default for UrgencyThresholds {
    fn default() -> Self {
        UrgencyThresholds {
            urgent_days: 7,
            soon_days: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// Timezones
// ---------------------------------------------------------------------------

const HOUR: i32 = 3600;

/// Common abbreviations seen in conference calls. Offsets in seconds east of UTC.
const ABBREVIATIONS: &[(&str, i32)] = &[
    ("PST", -8 * HOUR),
    ("PDT", -7 * HOUR),
    ("MST", -7 * HOUR),
    ("MDT", -6 * HOUR),
    ("CST", -6 * HOUR),
    ("CDT", -5 * HOUR),
    ("EST", -5 * HOUR),
    ("EDT", -4 * HOUR),
    ("BST", HOUR),
    ("CET", HOUR),
    ("CEST", 2 * HOUR),
    ("EET", 2 * HOUR),
    ("EEST", 3 * HOUR),
    ("IST", 5 * HOUR + 1800),
    ("SGT", 8 * HOUR),
    ("JST", 9 * HOUR),
    ("KST", 9 * HOUR),
    ("AEST", 10 * HOUR),
    ("AEDT", 11 * HOUR),
    ("NZST", 12 * HOUR),
    ("NZDT", 13 * HOUR),
];

const MAX_OFFSET: i32 = 14 * HOUR;

fn utc() -> FixedOffset {
    Utc.fix()
}

/// Parse a record's timezone field into a fixed offset.
///
/// Accepts `AoE` (anywhere on earth, UTC-12), `UTC`/`GMT`/`Z`, `UTC+8`,
/// `UTC-03:30`, `GMT+0530`, `Etc/GMT+12` (POSIX sign, so UTC-12) and the
/// abbreviations in `ABBREVIATIONS`. Matching is case-insensitive.
pub fn parse_timezone(raw: &str) -> Result<FixedOffset, DeadlineError> {
    let trimmed = raw.trim();
    let upper = trimmed.to_ascii_uppercase();

    let seconds = match upper.as_str() {
        "" | "UTC" | "GMT" | "UT" | "Z" => 0,
        "AOE" => -12 * HOUR,
        _ => {
            if let Some(rest) = upper.strip_prefix("ETC/GMT") {
                if rest.is_empty() {
                    0
                } else {
                    -parse_offset(rest, trimmed)?
                }
            } else if let Some(rest) = upper
                .strip_prefix("UTC")
                .or_else(|| upper.strip_prefix("GMT"))
            {
                parse_offset(rest, trimmed)?
            } else if let Some((_, secs)) = ABBREVIATIONS.iter().find(|(abbr, _)| *abbr == upper) {
                *secs
            } else {
                return Err(DeadlineError::UnknownTimezone(trimmed.to_string()));
            }
        }
    };

    FixedOffset::east_opt(seconds).ok_or_else(|| DeadlineError::OffsetOutOfRange(trimmed.to_string()))
}

/// Parse a signed offset suffix such as `+8`, `-03:30` or `+0530`.
fn parse_offset(suffix: &str, original: &str) -> Result<i32, DeadlineError> {
    let unknown = || DeadlineError::UnknownTimezone(original.to_string());

    let (sign, body) = match suffix.as_bytes().first() {
        Some(b'+') => (1, &suffix[1..]),
        Some(b'-') => (-1, &suffix[1..]),
        _ => return Err(unknown()),
    };

    let (hours, minutes) = match body.split_once(':') {
        Some((h, m)) => (h, m),
        None if body.len() == 4 && body.is_ascii() => body.split_at(2),
        None => (body, "0"),
    };

    let is_number = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !is_number(hours) || !is_number(minutes) {
        return Err(unknown());
    }

    let out_of_range = || DeadlineError::OffsetOutOfRange(original.to_string());
    let hours: i32 = hours.parse().map_err(|_| out_of_range())?;
    let minutes: i32 = minutes.parse().map_err(|_| out_of_range())?;
    if hours > MAX_OFFSET / HOUR || minutes >= 60 {
        return Err(out_of_range());
    }
    let total = hours * HOUR + minutes * 60;
    if total > MAX_OFFSET {
        return Err(out_of_range());
    }
    Ok(sign * total)
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

fn parse_naive(raw: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            // A bare date means the end of that day.
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(23, 59, 59))
        })
}

/// Resolve a deadline string in the given timezone.
///
/// An explicit RFC 3339 offset in the deadline wins over `timezone`. A
/// missing timezone means UTC; an unrecognised one falls back to UTC.
pub fn resolve(deadline: Option<&str>, timezone: Option<&str>) -> DeadlineStatus {
    let Some(raw) = deadline.map(str::trim).filter(|d| !d.is_empty()) else {
        return DeadlineStatus::Tbd;
    };
    if raw.eq_ignore_ascii_case("TBD") {
        return DeadlineStatus::Tbd;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return DeadlineStatus::At(dt.with_timezone(&Utc));
    }

    let Some(naive) = parse_naive(raw) else {
        return DeadlineStatus::Invalid;
    };

    let offset = match timezone.map(str::trim).filter(|t| !t.is_empty()) {
        None => utc(),
        Some(tz) => parse_timezone(tz).unwrap_or_else(|e| {
            debug!("{}; treating deadline {} as UTC", e, raw);
            utc()
        }),
    };

    match offset.from_local_datetime(&naive).single() {
        Some(dt) => DeadlineStatus::At(dt.with_timezone(&Utc)),
        None => DeadlineStatus::Invalid,
    }
}

// ---------------------------------------------------------------------------
// Display helpers
// ---------------------------------------------------------------------------

/// The deadline as written in the record, or "TBD".
pub fn deadline_display(raw: Option<&str>) -> String {
    match raw.map(str::trim).filter(|d| !d.is_empty()) {
        Some(d) if d.eq_ignore_ascii_case("TBD") => "TBD".to_string(),
        Some(d) => d.to_string(),
        None => "TBD".to_string(),
    }
}

/// Countdown text shown next to a deadline.
pub fn countdown_label(status: DeadlineStatus, now: DateTime<Utc>) -> String {
    match status {
        DeadlineStatus::Tbd => "TBD".to_string(),
        DeadlineStatus::Invalid => "Invalid date".to_string(),
        DeadlineStatus::At(t) if t <= now => "Deadline passed".to_string(),
        DeadlineStatus::At(t) => format!("in {}", format_distance(now, t)),
    }
}

const MINUTES_IN_DAY: i64 = 1440;
const MINUTES_IN_ALMOST_TWO_DAYS: i64 = 2520;
const MINUTES_IN_MONTH: i64 = 43200;
const MINUTES_IN_TWO_MONTHS: i64 = 86400;

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit}")
    } else {
        format!("{n} {unit}s")
    }
}

/// Approximate human distance between two instants, e.g. "about 3 hours".
pub fn format_distance(from: DateTime<Utc>, to: DateTime<Utc>) -> String {
    let seconds = (to - from).num_seconds().abs();
    // Round to the nearest minute.
    let minutes = (seconds + 30) / 60;

    if minutes == 0 {
        "less than a minute".to_string()
    } else if minutes < 45 {
        plural(minutes, "minute")
    } else if minutes < 90 {
        "about 1 hour".to_string()
    } else if minutes < MINUTES_IN_DAY {
        format!("about {}", plural((minutes + 30) / 60, "hour"))
    } else if minutes < MINUTES_IN_ALMOST_TWO_DAYS {
        "1 day".to_string()
    } else if minutes < MINUTES_IN_MONTH {
        plural((minutes + MINUTES_IN_DAY / 2) / MINUTES_IN_DAY, "day")
    } else if minutes < MINUTES_IN_TWO_MONTHS {
        let months = (minutes + MINUTES_IN_MONTH / 2) / MINUTES_IN_MONTH;
        format!("about {}", plural(months, "month"))
    } else {
        let months = minutes / MINUTES_IN_MONTH;
        if months < 12 {
            plural((minutes + MINUTES_IN_MONTH / 2) / MINUTES_IN_MONTH, "month")
        } else {
            let years = months / 12;
            match months % 12 {
                0..=2 => format!("about {}", plural(years, "year")),
                3..=8 => format!("over {}", plural(years, "year")),
                _ => format!("almost {}", plural(years + 1, "year")),
            }
        }
    }
}

/// Whole days until the deadline, rounded up (negative once passed).
pub fn days_remaining(deadline: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let secs = (deadline - now).num_seconds();
    secs.div_euclid(86_400) + i64::from(secs.rem_euclid(86_400) > 0)
}

/// Classify a deadline into an urgency band.
pub fn urgency(
    status: DeadlineStatus,
    now: DateTime<Utc>,
    thresholds: UrgencyThresholds,
) -> Urgency {
    match status.instant() {
        None => Urgency::Unknown,
        Some(t) => {
            let days = days_remaining(t, now);
            if days <= thresholds.urgent_days {
                Urgency::Urgent
            } else if days <= thresholds.soon_days {
                Urgency::Soon
            } else {
                Urgency::Comfortable
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
