// Merging freshly transformed records into the existing set.
//
// Upstream owns the schedule fields. Everything curated by hand lives in
// PRESERVED_FIELDS and is carried over from the existing record whenever an
// update is applied.

use std::collections::{BTreeMap, HashSet};

use serde_yaml::{Mapping, Value};
use tracing::{info, warn};

use cfpwatch_core::conference::Conference;

use crate::error::SyncError;

/// Keys an upstream update never overwrites.
pub const PRESERVED_FIELDS: &[&str] = &[
    "tags",
    "venue",
    "hindex",
    "submission_deadline",
    "timezone_submission",
    "rebuttal_period_start",
    "rebuttal_period_end",
    "final_decision_date",
    "review_release_date",
    "commitment_deadline",
    "start",
    "end",
    "note",
    "city",
    "country",
    "rankings",
];

#[derive(Debug, Default)]
pub struct MergeOutcome {
    /// The full record set after merging, keyed by id.
    pub conferences: BTreeMap<String, Conference>,
    pub added: Vec<String>,
    pub updated: Vec<String>,
    /// Incoming ids dropped because their (title, year) already exists.
    pub skipped_duplicates: Vec<String>,
}

impl MergeOutcome {
    pub fn changed(&self) -> bool {
        !self.added.is_empty() || !self.updated.is_empty()
    }

    /// Records that were added or updated, in id order.
    pub fn changed_records(&self) -> impl Iterator<Item = &Conference> {
        self.conferences.iter().filter_map(|(id, conf)| {
            (self.added.contains(id) || self.updated.contains(id)).then_some(conf)
        })
    }
}

fn to_mapping(conf: &Conference, id: &str) -> Result<Mapping, SyncError> {
    let value = serde_yaml::to_value(conf).map_err(|source| SyncError::Record {
        id: id.to_string(),
        source,
    })?;
    Ok(match value {
        Value::Mapping(map) => map,
        _ => Mapping::new(),
    })
}

fn is_preserved(key: &Value) -> bool {
    key.as_str().is_some_and(|k| PRESERVED_FIELDS.contains(&k))
}

/// Combine `existing` (keyed by id) with `incoming` records.
///
/// An incoming record whose id is new but whose (title, year) is already
/// present is skipped. A known id is updated only when a non-preserved field
/// differs; the update keeps the existing record's preserved fields.
pub fn merge(
    existing: BTreeMap<String, Conference>,
    incoming: Vec<Conference>,
) -> Result<MergeOutcome, SyncError> {
    let mut seen: HashSet<(String, Option<i32>)> = existing
        .values()
        .map(|c| (c.title.clone(), c.year))
        .collect();
    let mut outcome = MergeOutcome {
        conferences: existing,
        ..MergeOutcome::default()
    };

    for new in incoming {
        let Some(id) = new.id.clone() else {
            warn!("Incoming conference {} has no ID, skipping", new.log_name());
            continue;
        };
        let key = (new.title.clone(), new.year);

        let Some(current) = outcome.conferences.get(&id) else {
            if seen.contains(&key) {
                info!(
                    "Skipping duplicate conference: {} (ID: {})",
                    new.display_title(),
                    id
                );
                outcome.skipped_duplicates.push(id);
                continue;
            }
            seen.insert(key);
            outcome.conferences.insert(id.clone(), new);
            outcome.added.push(id);
            continue;
        };

        let current_map = to_mapping(current, &id)?;
        let mut new_map = to_mapping(&new, &id)?;

        let differs = new_map
            .iter()
            .filter(|(k, _)| !is_preserved(k))
            .any(|(k, v)| current_map.get(k) != Some(v));
        if !differs {
            continue;
        }

        for field in PRESERVED_FIELDS {
            if let Some(v) = current_map.get(*field) {
                new_map.insert(Value::from(*field), v.clone());
            }
        }

        let merged: Conference =
            serde_yaml::from_value(Value::Mapping(new_map)).map_err(|source| SyncError::Record {
                id: id.clone(),
                source,
            })?;
        info!("Updating {}", id);
        outcome.conferences.insert(id.clone(), merged);
        outcome.updated.push(id);
    }

    Ok(outcome)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, year: i32, id: &str, deadline: &str) -> Conference {
        Conference {
            title: title.into(),
            year: Some(year),
            id: Some(id.into()),
            deadline: Some(deadline.into()),
            timezone: Some("UTC-12".into()),
            ..Conference::default()
        }
    }

    fn existing(confs: Vec<Conference>) -> BTreeMap<String, Conference> {
        confs
            .into_iter()
            .map(|c| (c.id.clone().unwrap(), c))
            .collect()
    }

    #[test]
    fn new_records_are_added() {
        let outcome = merge(
            BTreeMap::new(),
            vec![record("AAAI", 2026, "aaai26", "2025-08-01 23:59:59")],
        )
        .unwrap();
        assert_eq!(outcome.added, vec!["aaai26"]);
        assert!(outcome.changed());
        assert_eq!(outcome.changed_records().count(), 1);
    }

    #[test]
    fn unchanged_records_are_left_alone() {
        let mut curated = record("AAAI", 2026, "aaai26", "2025-08-01 23:59:59");
        curated.tags = vec!["machine-learning".into()];
        curated.city = Some("Singapore".into());

        let incoming = record("AAAI", 2026, "aaai26", "2025-08-01 23:59:59");
        let outcome = merge(existing(vec![curated.clone()]), vec![incoming]).unwrap();

        assert!(!outcome.changed());
        assert_eq!(outcome.conferences["aaai26"], curated);
    }

    #[test]
    fn updates_keep_curated_fields() {
        let mut curated = record("AAAI", 2026, "aaai26", "2025-08-01 23:59:59");
        curated.tags = vec!["machine-learning".into()];
        curated.note = Some("Two-phase review".into());
        curated
            .extra
            .insert("hindex".into(), Value::Number(212.into()));

        let mut incoming = record("AAAI", 2026, "aaai26", "2025-08-04 23:59:59");
        incoming.note = Some("upstream note".into());
        incoming.link = Some("https://aaai.org/".into());

        let outcome = merge(existing(vec![curated]), vec![incoming]).unwrap();
        assert_eq!(outcome.updated, vec!["aaai26"]);

        let merged = &outcome.conferences["aaai26"];
        assert_eq!(merged.deadline.as_deref(), Some("2025-08-04 23:59:59"));
        assert_eq!(merged.link.as_deref(), Some("https://aaai.org/"));
        assert_eq!(merged.tags, vec!["machine-learning"]);
        assert_eq!(merged.note.as_deref(), Some("Two-phase review"));
        assert_eq!(merged.extra.get("hindex"), Some(&Value::Number(212.into())));
    }

    #[test]
    fn preserved_field_missing_from_existing_comes_from_upstream() {
        let current = record("IJCAI", 2026, "ijcai26", "2026-01-20 23:59:59");
        let mut incoming = record("IJCAI", 2026, "ijcai26", "2026-01-23 23:59:59");
        incoming.city = Some("Bremen".into());

        let outcome = merge(existing(vec![current]), vec![incoming]).unwrap();
        assert_eq!(outcome.conferences["ijcai26"].city.as_deref(), Some("Bremen"));
    }

    #[test]
    fn preserved_field_alone_does_not_trigger_an_update() {
        let current = record("IJCAI", 2026, "ijcai26", "2026-01-20 23:59:59");
        let mut incoming = current.clone();
        incoming.city = Some("Bremen".into());

        let outcome = merge(existing(vec![current]), vec![incoming]).unwrap();
        assert!(!outcome.changed());
    }

    #[test]
    fn same_title_and_year_under_new_id_is_skipped() {
        let current = record("AAAI", 2026, "aaai2026", "2025-08-01 23:59:59");
        let incoming = record("AAAI", 2026, "aaai26", "2025-08-01 23:59:59");

        let outcome = merge(existing(vec![current]), vec![incoming]).unwrap();
        assert_eq!(outcome.skipped_duplicates, vec!["aaai26"]);
        assert!(!outcome.changed());
        assert!(!outcome.conferences.contains_key("aaai26"));
    }

    #[test]
    fn incoming_without_id_is_ignored() {
        let mut incoming = record("X", 2026, "x", "TBD");
        incoming.id = None;
        let outcome = merge(BTreeMap::new(), vec![incoming]).unwrap();
        assert!(outcome.conferences.is_empty());
    }
}
