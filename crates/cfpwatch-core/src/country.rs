// Country extraction from free-form place strings and the country option list.

use std::collections::BTreeSet;

use crate::conference::Conference;

const USA_ALIASES: &[&str] = &["USA", "U.S.A.", "United States", "United States of America"];
const UK_ALIASES: &[&str] = &["UK", "U.K.", "United Kingdom", "England", "Scotland", "Wales"];

/// Countries searched for when a place string has no comma. Order matters:
/// the first one contained in the place wins.
const KNOWN_COUNTRIES: &[&str] = &[
    "USA",
    "Canada",
    "China",
    "Japan",
    "Germany",
    "France",
    "UK",
    "Italy",
    "Spain",
    "Australia",
    "Brazil",
    "India",
    "Singapore",
    "South Korea",
    "Netherlands",
    "Sweden",
    "Switzerland",
    "Belgium",
    "Austria",
    "Portugal",
    "UAE",
    "Thailand",
    "Hawaii",
    "Russia",
    "Lithuania",
];

/// Extract a normalised country from a place such as "Vienna, Austria".
///
/// The segment after the last comma is taken as the country. US and UK
/// spellings collapse to `USA` and `UK`. A place without a comma is scanned
/// for a known country name before falling back to the whole string.
pub fn extract_country(place: &str) -> Option<String> {
    if place.trim().is_empty() {
        return None;
    }

    let parts: Vec<&str> = place.split(',').collect();
    let last = parts.last().map(|p| p.trim()).unwrap_or_default();

    if USA_ALIASES.contains(&last) {
        return Some("USA".to_string());
    }
    if UK_ALIASES.contains(&last) {
        return Some("UK".to_string());
    }

    if parts.len() == 1 {
        if let Some(known) = KNOWN_COUNTRIES.iter().find(|c| place.contains(*c)) {
            return Some((*known).to_string());
        }
    }

    Some(last.to_string())
}

/// Sorted, de-duplicated countries of all records that name one.
pub fn all_countries(conferences: &[Conference]) -> Vec<String> {
    conferences
        .iter()
        .filter_map(Conference::country_name)
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
