use crate::config::{MealBucket, VizConfig};
use crate::locations::location_stats;
use crate::models::{DiaryReport, Entry, MealShare, Summary, TrendPoint};
use crate::normalize::{format_iso_date, parse_date_value};
use chrono::NaiveDate;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

pub fn build_report(entries: &[Entry], config: &VizConfig) -> DiaryReport {
    let summary = summarize(entries);
    let satisfaction_daily = daily_satisfaction(entries);

    DiaryReport {
        meals: meal_shares(entries, &config.meal_buckets, summary.total_days),
        core_meals: meal_shares(entries, &config.core_meal_buckets, summary.total_days),
        satisfaction_points: satisfaction_points(entries),
        satisfaction_trend: smooth(&satisfaction_daily, config.smoothing_window),
        satisfaction_daily,
        locations: location_stats(entries),
        summary,
    }
}

/// Half-up rounding (`floor(x + 0.5)`), so `-2.5` rounds to `-2`.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Share of `total` rounded to one decimal place; zero when `total` is zero.
pub fn percent_of(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round_half_up(count as f64 / total as f64 * 1000.0) / 10.0
}

pub fn distinct_days(entries: &[Entry]) -> usize {
    entries
        .iter()
        .map(|entry| parse_date_value(&entry.date))
        .collect::<BTreeSet<_>>()
        .len()
}

pub fn summarize(entries: &[Entry]) -> Summary {
    Summary {
        total_days: distinct_days(entries),
        total_entries: entries.len(),
    }
}

/// Food entries per bucket, as a share of recorded days rather than of food entries.
pub fn meal_shares(entries: &[Entry], buckets: &[MealBucket], total_days: usize) -> Vec<MealShare> {
    let food: Vec<&Entry> = entries.iter().filter(|entry| entry.is_food()).collect();

    buckets
        .iter()
        .map(|bucket| {
            let count = food
                .iter()
                .filter(|entry| bucket.matches(entry.time_of_day))
                .count();
            MealShare {
                label: bucket.label.clone(),
                count,
                percent: percent_of(count, total_days),
            }
        })
        .collect()
}

/// Numeric satisfaction, or `None` for anything that is not a finite number.
pub fn satisfaction_value(entry: &Entry) -> Option<f64> {
    let value = match entry.satisfaction.as_ref()? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    value.filter(|value| value.is_finite())
}

pub fn satisfaction_points(entries: &[Entry]) -> Vec<TrendPoint> {
    entries
        .iter()
        .filter_map(|entry| {
            satisfaction_value(entry).map(|value| TrendPoint {
                date: format_iso_date(parse_date_value(&entry.date)),
                value,
            })
        })
        .collect()
}

pub fn daily_satisfaction(entries: &[Entry]) -> Vec<TrendPoint> {
    let mut days: BTreeMap<NaiveDate, (f64, u32)> = BTreeMap::new();
    for entry in entries {
        if let Some(value) = satisfaction_value(entry) {
            let day = days.entry(parse_date_value(&entry.date)).or_default();
            day.0 += value;
            day.1 += 1;
        }
    }

    days.into_iter()
        .map(|(date, (sum, count))| TrendPoint {
            date: format_iso_date(date),
            value: sum / f64::from(count),
        })
        .collect()
}

/// Centered moving average; windows shrink at the edges instead of padding.
pub fn smooth(points: &[TrendPoint], window: usize) -> Vec<TrendPoint> {
    let half = window / 2;

    (0..points.len())
        .map(|index| {
            let start = index.saturating_sub(half);
            let end = (index + half).min(points.len() - 1);
            let slice = &points[start..=end];
            let sum: f64 = slice.iter().map(|point| point.value).sum();
            TrendPoint {
                date: points[index].date.clone(),
                value: sum / slice.len() as f64,
            }
        })
        .collect()
}
