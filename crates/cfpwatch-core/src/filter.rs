// Filter state, the per-record predicate and deadline ordering.
//
// The predicate has four independent clauses (recency, tags, countries,
// text search); each one rejects on its own and none of them skips the
// others.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::conference::Conference;

// ---------------------------------------------------------------------------
// FilterState
// ---------------------------------------------------------------------------

/// The user's current selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub tags: BTreeSet<String>,
    pub countries: BTreeSet<String>,
    /// Free-text query, matched case-insensitively.
    pub search: String,
    /// Include records whose deadline has passed.
    pub show_past: bool,
}

impl FilterState {
    /// Add the tag if absent, remove it if present.
    pub fn toggle_tag(&mut self, tag: &str) {
        if !self.tags.remove(tag) {
            self.tags.insert(tag.to_string());
        }
    }

    pub fn toggle_country(&mut self, country: &str) {
        if !self.countries.remove(country) {
            self.countries.insert(country.to_string());
        }
    }

    /// Drop the tag and country selections. Search and show-past are kept.
    pub fn clear(&mut self) {
        self.tags.clear();
        self.countries.clear();
    }

    /// Whether any tag or country is selected.
    pub fn is_filtered(&self) -> bool {
        !self.tags.is_empty() || !self.countries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Focus
// ---------------------------------------------------------------------------

/// Default view applied while no tag is selected.
///
/// An empty focus lets every record through.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Focus {
    #[serde(default)]
    pub tags: Vec<String>,
    /// Substrings of record titles that are always in focus.
    #[serde(default)]
    pub titles: Vec<String>,
}

impl Focus {
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.titles.is_empty()
    }

    pub fn admits(&self, conf: &Conference) -> bool {
        self.is_empty()
            || self.tags.iter().any(|t| conf.has_tag(t))
            || self.titles.iter().any(|t| conf.title.contains(t.as_str()))
    }
}

// ---------------------------------------------------------------------------
// Predicate
// ---------------------------------------------------------------------------

fn passes_recency(conf: &Conference, filter: &FilterState, now: DateTime<Utc>) -> bool {
    filter.show_past || !conf.deadline_status().is_past(now)
}

fn passes_tags(conf: &Conference, filter: &FilterState, focus: &Focus) -> bool {
    if filter.tags.is_empty() {
        focus.admits(conf)
    } else {
        conf.tags.iter().any(|t| filter.tags.contains(t))
    }
}

fn passes_countries(conf: &Conference, filter: &FilterState) -> bool {
    filter.countries.is_empty()
        || conf
            .country_name()
            .is_some_and(|c| filter.countries.contains(c))
}

fn passes_search(conf: &Conference, filter: &FilterState) -> bool {
    let query = filter.search.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }
    let hit = |field: Option<&str>| field.is_some_and(|f| f.to_lowercase().contains(&query));

    hit(Some(conf.title.as_str()))
        || hit(conf.full_name.as_deref())
        || hit(conf.city.as_deref())
        || hit(conf.country.as_deref())
        || conf.tags.iter().any(|t| hit(Some(t.as_str())))
}

/// Whether a record belongs in the current view.
pub fn matches(conf: &Conference, filter: &FilterState, focus: &Focus, now: DateTime<Utc>) -> bool {
    passes_recency(conf, filter, now)
        && passes_tags(conf, filter, focus)
        && passes_countries(conf, filter)
        && passes_search(conf, filter)
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

/// Stable sort by resolved deadline, earliest first; unknown deadlines last.
pub fn sort_by_deadline(conferences: &mut [&Conference]) {
    conferences.sort_by_cached_key(|c| match c.deadline_status().instant() {
        Some(t) => (false, Some(t)),
        None => (true, None),
    });
}

/// Filter then sort.
pub fn apply<'a>(
    conferences: &'a [Conference],
    filter: &FilterState,
    focus: &Focus,
    now: DateTime<Utc>,
) -> Vec<&'a Conference> {
    let mut visible: Vec<&Conference> = conferences
        .iter()
        .filter(|c| matches(c, filter, focus, now))
        .collect();
    sort_by_deadline(&mut visible);
    visible
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()
    }

    fn conf(title: &str, deadline: Option<&str>, tags: &[&str], country: Option<&str>) -> Conference {
        Conference {
            title: title.into(),
            deadline: deadline.map(str::to_string),
            timezone: Some("UTC".into()),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            country: country.map(str::to_string),
            ..Conference::default()
        }
    }

    fn mt_focus() -> Focus {
        Focus {
            tags: vec!["machine-translation".into()],
            titles: vec!["WMT".into(), "ACL".into()],
        }
    }

    // -- FilterState --

    #[test]
    fn toggle_adds_then_removes() {
        let mut f = FilterState::default();
        f.toggle_tag("multilingual");
        assert!(f.tags.contains("multilingual"));
        f.toggle_tag("multilingual");
        assert!(f.tags.is_empty());

        f.toggle_country("UK");
        assert!(f.is_filtered());
        f.toggle_country("UK");
        assert!(!f.is_filtered());
    }

    #[test]
    fn clear_keeps_search_and_show_past() {
        let mut f = FilterState {
            search: "acl".into(),
            show_past: true,
            ..FilterState::default()
        };
        f.toggle_tag("a");
        f.toggle_country("b");
        f.clear();
        assert!(!f.is_filtered());
        assert_eq!(f.search, "acl");
        assert!(f.show_past);
    }

    // -- recency --

    #[test]
    fn past_deadline_hidden_unless_show_past() {
        let c = conf("X", Some("2025-01-01 00:00:00"), &[], None);
        let mut f = FilterState::default();
        assert!(!matches(&c, &f, &Focus::default(), now()));
        f.show_past = true;
        assert!(matches(&c, &f, &Focus::default(), now()));
    }

    #[test]
    fn unknown_deadlines_count_as_upcoming() {
        let f = FilterState::default();
        assert!(matches(&conf("A", Some("TBD"), &[], None), &f, &Focus::default(), now()));
        assert!(matches(&conf("B", Some("soon"), &[], None), &f, &Focus::default(), now()));
        assert!(matches(&conf("C", None, &[], None), &f, &Focus::default(), now()));
    }

    // -- tags / focus --

    #[test]
    fn selected_tags_require_any_overlap() {
        let mut f = FilterState::default();
        f.toggle_tag("speech-recognition");
        f.toggle_tag("multimodal");
        let focus = Focus::default();
        assert!(matches(&conf("A", None, &["multimodal"], None), &f, &focus, now()));
        assert!(!matches(&conf("B", None, &["data-mining"], None), &f, &focus, now()));
        assert!(!matches(&conf("C", None, &[], None), &f, &focus, now()));
    }

    #[test]
    fn focus_applies_only_without_selected_tags() {
        let f = FilterState::default();
        let focus = mt_focus();
        assert!(matches(&conf("AMTA", None, &["machine-translation"], None), &f, &focus, now()));
        assert!(matches(&conf("WMT", None, &[], None), &f, &focus, now()));
        assert!(matches(&conf("NAACL", None, &["data-mining"], None), &f, &focus, now()));
        assert!(!matches(&conf("KDD", None, &["data-mining"], None), &f, &focus, now()));

        let mut tagged = FilterState::default();
        tagged.toggle_tag("data-mining");
        assert!(matches(&conf("KDD", None, &["data-mining"], None), &tagged, &focus, now()));
    }

    #[test]
    fn untagged_focus_title_still_goes_through_other_clauses() {
        let mut f = FilterState::default();
        f.toggle_country("UK");
        let c = conf("WMT", None, &[], Some("USA"));
        assert!(!matches(&c, &f, &mt_focus(), now()));
    }

    // -- countries --

    #[test]
    fn country_selection_requires_membership() {
        let mut f = FilterState::default();
        f.toggle_country("Austria");
        let focus = Focus::default();
        assert!(matches(&conf("A", None, &[], Some(" Austria ")), &f, &focus, now()));
        assert!(!matches(&conf("B", None, &[], Some("USA")), &f, &focus, now()));
        assert!(!matches(&conf("C", None, &[], None), &f, &focus, now()));
    }

    // -- search --

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let mut c = conf("EMNLP", None, &["natural-language-processing"], Some("China"));
        c.full_name = Some("Empirical Methods in NLP".into());
        c.city = Some("Suzhou".into());
        let focus = Focus::default();

        for q in ["emnlp", "EMPIRICAL", "suz", "china", "language-proc"] {
            let f = FilterState {
                search: q.into(),
                ..FilterState::default()
            };
            assert!(matches(&c, &f, &focus, now()), "query {q} should match");
        }

        let f = FilterState {
            search: "vision".into(),
            ..FilterState::default()
        };
        assert!(!matches(&c, &f, &focus, now()));
    }

    // -- ordering --

    #[test]
    fn earlier_deadline_first_unknown_last() {
        let late = conf("Late", Some("2025-09-01 00:00:00"), &[], None);
        let tbd = conf("Tbd", Some("TBD"), &[], None);
        let early = conf("Early", Some("2025-04-01 00:00:00"), &[], None);
        let invalid = conf("Invalid", Some("whenever"), &[], None);
        let mut list = vec![&tbd, &late, &invalid, &early];
        sort_by_deadline(&mut list);
        let titles: Vec<&str> = list.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Early", "Late", "Tbd", "Invalid"]);
    }

    #[test]
    fn deadline_sort_respects_timezones() {
        // 23:59 AoE is later than 23:59 UTC+8 on the same day.
        let mut aoe = conf("AoE", Some("2025-05-01 23:59:59"), &[], None);
        aoe.timezone = Some("AoE".into());
        let mut cst = conf("Beijing", Some("2025-05-01 23:59:59"), &[], None);
        cst.timezone = Some("UTC+8".into());
        let mut list = vec![&aoe, &cst];
        sort_by_deadline(&mut list);
        assert_eq!(list[0].title, "Beijing");
    }

    #[test]
    fn apply_filters_and_sorts() {
        let confs = vec![
            conf("Past", Some("2025-01-01 00:00:00"), &[], None),
            conf("Later", Some("2025-08-01 00:00:00"), &[], None),
            conf("Sooner", Some("2025-04-01 00:00:00"), &[], None),
        ];
        let visible = apply(&confs, &FilterState::default(), &Focus::default(), now());
        let titles: Vec<&str> = visible.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Sooner", "Later"]);
    }
}
