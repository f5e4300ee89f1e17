// Tag labels, the tag catalog shown in the picker, and the quick-toggle
// categories.

use std::collections::BTreeSet;

use serde::Deserialize;

use crate::conference::Conference;

/// One entry of the tag picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagInfo {
    pub id: String,
    pub label: String,
    /// Listed ahead of the others.
    pub priority: bool,
}

/// A quick-toggle category shown in the category bar.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Category {
    pub id: String,
    pub label: String,
}

/// Human label for a tag id: "machine-translation" -> "Machine Translation".
pub fn tag_label(id: &str) -> String {
    id.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Every tag used by any record: priority tags first, then by label.
pub fn tag_catalog(conferences: &[Conference], priority: &[String]) -> Vec<TagInfo> {
    let ids: BTreeSet<&str> = conferences
        .iter()
        .flat_map(|c| c.tags.iter().map(String::as_str))
        .collect();

    let mut catalog: Vec<TagInfo> = ids
        .into_iter()
        .map(|id| TagInfo {
            id: id.to_string(),
            label: tag_label(id),
            priority: priority.iter().any(|p| p == id),
        })
        .collect();

    catalog.sort_by(|a, b| b.priority.cmp(&a.priority).then_with(|| a.label.cmp(&b.label)));
    catalog
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
