use crate::models::{Entry, PreparedEntries};
use chrono::{Duration, Months, NaiveDate, NaiveDateTime, NaiveTime};

const MAX_YEAR: i64 = 9999;

/// Best-effort `YYYY-M-D` parse. Missing or unparseable fragments become 1,
/// month and day overflow roll forward and stop at the last day of year 9999.
pub fn parse_date_value(raw: &str) -> NaiveDate {
    let mut fragments = raw.split('-').map(parse_fragment);
    let year = fragments.next().flatten().unwrap_or(1).min(MAX_YEAR);
    let month = fragments.next().flatten().unwrap_or(1);
    let day = fragments.next().flatten().unwrap_or(1);

    let base = i32::try_from(year)
        .ok()
        .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1))
        .unwrap_or_default();
    let latest = NaiveDate::from_ymd_opt(MAX_YEAR as i32, 12, 31).unwrap_or(base);

    u32::try_from(month - 1)
        .ok()
        .and_then(|months| base.checked_add_months(Months::new(months)))
        .and_then(|date| Duration::try_days(day - 1).and_then(|days| date.checked_add_signed(days)))
        .map_or(latest, |date| date.min(latest))
}

fn parse_fragment(fragment: &str) -> Option<i64> {
    fragment.trim().parse::<i64>().ok().filter(|value| *value >= 1)
}

pub fn format_iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn normalize_date(raw: &str) -> String {
    format_iso_date(parse_date_value(raw))
}

/// Minutes past midnight for an `HH:MM` string; anything unparseable is `00:00`.
pub fn parse_exact_time(raw: Option<&str>) -> i64 {
    let raw = raw.filter(|value| !value.is_empty()).unwrap_or("00:00");
    let mut fragments = raw.split(':').map(|fragment| fragment.trim().parse::<i64>());

    let hours = match fragments.next() {
        Some(Ok(hours)) => hours,
        _ => return 0,
    };
    let minutes = match fragments.next() {
        None => 0,
        Some(Ok(minutes)) => minutes,
        Some(Err(_)) => return 0,
    };

    hours.saturating_mul(60).saturating_add(minutes)
}

pub fn composite_timestamp(entry: &Entry) -> NaiveDateTime {
    let midnight = parse_date_value(&entry.date).and_time(NaiveTime::MIN);
    Duration::try_minutes(parse_exact_time(entry.exact_time.as_deref()))
        .and_then(|offset| midnight.checked_add_signed(offset))
        .unwrap_or(midnight)
}

pub fn normalize_entry(entry: &Entry) -> Entry {
    Entry {
        date: normalize_date(&entry.date),
        ..entry.clone()
    }
}

pub fn normalize_entries(entries: &[Entry]) -> Vec<Entry> {
    entries.iter().map(normalize_entry).collect()
}

/// Stable ascending sort by date plus exact time.
pub fn sort_entries(mut entries: Vec<Entry>) -> Vec<Entry> {
    entries.sort_by_cached_key(composite_timestamp);
    entries
}

pub fn prepare_entries(entries: &[Entry]) -> PreparedEntries {
    let normalized = normalize_entries(entries);
    let sorted = sort_entries(normalized.clone());
    PreparedEntries { normalized, sorted }
}
