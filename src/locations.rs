use crate::models::{Entry, LocationGroup, LocationShare, LocationStats};
use crate::stats::percent_of;
use indexmap::IndexMap;

pub const UNKNOWN_LOCATION: &str = "Unknown";
pub const OTHER_LOCATION: &str = "Other";

/// `NYC · {detail}` when the primary label is the city token and a detail is present.
pub fn location_label(entry: &Entry) -> String {
    let base = entry
        .specific_location
        .as_deref()
        .unwrap_or(UNKNOWN_LOCATION)
        .trim();
    let detail = entry.nyc_location.as_deref().unwrap_or_default().trim();

    if base.eq_ignore_ascii_case("nyc") && !detail.is_empty() {
        return format!("NYC · {detail}");
    }
    if base.is_empty() {
        UNKNOWN_LOCATION.to_string()
    } else {
        base.to_string()
    }
}

/// Visit counts per resolved label, in first-seen order.
pub fn location_counts(entries: &[Entry]) -> IndexMap<String, usize> {
    let mut counts = IndexMap::new();
    for entry in entries {
        *counts.entry(location_label(entry)).or_insert(0) += 1;
    }
    counts
}

pub fn location_stats(entries: &[Entry]) -> LocationStats {
    let total_visits = entries.len();
    let counts = location_counts(entries);

    let mut frequent: Vec<LocationShare> = counts
        .iter()
        .filter(|(_, count)| **count > 1)
        .map(|(label, count)| LocationShare {
            label: label.clone(),
            count: *count,
            percent: percent_of(*count, total_visits),
        })
        .collect();
    frequent.sort_by(|a, b| b.count.cmp(&a.count));

    let single_visit: Vec<String> = counts
        .iter()
        .filter(|(_, count)| **count == 1)
        .map(|(label, _)| label.clone())
        .collect();

    let other = (!single_visit.is_empty()).then(|| LocationShare {
        label: OTHER_LOCATION.to_string(),
        count: single_visit.len(),
        percent: percent_of(single_visit.len(), total_visits),
    });

    LocationStats {
        total_visits,
        frequent,
        single_visit,
        other,
    }
}

/// Every label's entries, largest group first; ties keep first-seen order.
pub fn location_groups(entries: &[Entry]) -> Vec<LocationGroup> {
    let mut grouped: IndexMap<String, Vec<Entry>> = IndexMap::new();
    for entry in entries {
        grouped
            .entry(location_label(entry))
            .or_default()
            .push(entry.clone());
    }

    let mut groups: Vec<LocationGroup> = grouped
        .into_iter()
        .map(|(label, entries)| LocationGroup {
            label,
            count: entries.len(),
            entries,
        })
        .collect();
    groups.sort_by(|a, b| b.count.cmp(&a.count));
    groups
}

pub fn default_location_group(groups: &[LocationGroup]) -> Option<&LocationGroup> {
    groups.first()
}
