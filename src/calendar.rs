use crate::config::WeekReference;
use crate::models::{DayGroup, Entry, WeekGroup};
use crate::normalize::{format_iso_date, parse_date_value};
use crate::stats::round_half_up;
use chrono::{Datelike, Duration, NaiveDate};
use indexmap::IndexMap;

pub fn day_label(date: NaiveDate) -> String {
    date.format("%a, %b %-d").to_string()
}

pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

pub fn week_number(start: NaiveDate, reference: &WeekReference) -> i64 {
    let weeks = (start - reference.start).num_days() as f64 / 7.0;
    round_half_up(weeks) as i64 + reference.number
}

/// One group per distinct date, ascending. A repeated date+slot keeps the last entry.
pub fn group_by_day(entries: &[Entry]) -> Vec<DayGroup> {
    let mut days: IndexMap<NaiveDate, DayGroup> = IndexMap::new();

    for entry in entries {
        let date = parse_date_value(&entry.date);
        let group = days.entry(date).or_insert_with(|| DayGroup {
            date,
            iso_date: format_iso_date(date),
            label: day_label(date),
            entries: IndexMap::new(),
        });
        if let Some(slot) = entry.time_of_day {
            group.entries.insert(slot, entry.clone());
        }
    }

    let mut groups: Vec<DayGroup> = days.into_values().collect();
    groups.sort_by_key(|group| group.date);
    groups
}

/// Monday-start weeks numbered relative to `reference`; weeks numbered below 1 are dropped.
pub fn group_by_week(entries: &[Entry], reference: &WeekReference) -> Vec<WeekGroup> {
    let mut weeks: IndexMap<NaiveDate, WeekGroup> = IndexMap::new();

    for entry in entries {
        let date = parse_date_value(&entry.date);
        let start = week_start(date);
        let iso_date = format_iso_date(date);
        let group = weeks
            .entry(start)
            .or_insert_with(|| new_week_group(start, reference));

        if !group.days.contains(&iso_date) {
            group.days.push(iso_date.clone());
        }
        if let Some(slot) = entry.time_of_day {
            group.slots.insert((iso_date, slot), entry.clone());
        }
    }

    let mut groups: Vec<WeekGroup> = weeks
        .into_values()
        .filter(|group| group.week_number >= 1)
        .collect();
    groups.sort_by_key(|group| group.start);
    for group in &mut groups {
        group.days.sort();
    }
    groups
}

fn new_week_group(start: NaiveDate, reference: &WeekReference) -> WeekGroup {
    let number = week_number(start, reference);
    WeekGroup {
        start,
        week_start: format_iso_date(start),
        week_end: format_iso_date(start + Duration::days(6)),
        week_number: number,
        label: format!("Week {number}"),
        days: Vec::new(),
        slots: IndexMap::new(),
    }
}
