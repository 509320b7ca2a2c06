use crate::models::TimeOfDay;
use chrono::NaiveDate;
use indexmap::IndexMap;
use std::env;
use tracing::warn;

pub const DEFAULT_MOOD_COLOR: &str = "#e0e0e0";
pub const DEFAULT_SMOOTHING_WINDOW: usize = 3;

/// Mood key to border colour lookup. Unknown keys resolve to the default colour.
#[derive(Debug, Clone, PartialEq)]
pub struct MoodPalette {
    colors: IndexMap<String, String>,
    default_color: String,
}

impl MoodPalette {
    pub fn new<K, V>(colors: impl IntoIterator<Item = (K, V)>, default_color: impl Into<String>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            colors: colors
                .into_iter()
                .map(|(key, color)| (key.into(), color.into()))
                .collect(),
            default_color: default_color.into(),
        }
    }

    pub fn color_for(&self, mood: Option<&str>) -> &str {
        mood.and_then(|key| self.colors.get(key))
            .map(String::as_str)
            .unwrap_or(&self.default_color)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.colors
            .iter()
            .map(|(key, color)| (key.as_str(), color.as_str()))
    }
}

impl Default for MoodPalette {
    fn default() -> Self {
        Self::new(
            [
                ("cold", "#cccccc"),
                ("cozy", "#ffe4a3"),
                ("warm", "#ffb15c"),
                ("happy", "#ff7f50"),
            ],
            DEFAULT_MOOD_COLOR,
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MealBucket {
    pub label: String,
    pub slots: Vec<TimeOfDay>,
}

impl MealBucket {
    pub fn new(label: impl Into<String>, slots: &[TimeOfDay]) -> Self {
        Self {
            label: label.into(),
            slots: slots.to_vec(),
        }
    }

    pub fn matches(&self, slot: Option<TimeOfDay>) -> bool {
        slot.is_some_and(|slot| self.slots.contains(&slot))
    }
}

pub fn meal_buckets() -> Vec<MealBucket> {
    vec![
        MealBucket::new("Breakfast", &[TimeOfDay::Morning]),
        MealBucket::new("Lunch", &[TimeOfDay::Noon]),
        MealBucket::new("Dinner", &[TimeOfDay::Evening]),
        MealBucket::new("Afternoon Late Meal", &[TimeOfDay::Afternoon]),
        MealBucket::new("Night Late Meal", &[TimeOfDay::Night]),
    ]
}

pub fn core_meal_buckets() -> Vec<MealBucket> {
    vec![
        MealBucket::new("Breakfast", &[TimeOfDay::Morning]),
        MealBucket::new("Lunch", &[TimeOfDay::Noon, TimeOfDay::Afternoon]),
        MealBucket::new("Dinner", &[TimeOfDay::Evening, TimeOfDay::Night]),
    ]
}

/// Anchor for relative week numbering: the Monday `start` is week `number`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekReference {
    pub start: NaiveDate,
    pub number: i64,
}

impl Default for WeekReference {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2025, 11, 10).unwrap_or_default(),
            number: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VizConfig {
    pub palette: MoodPalette,
    pub meal_buckets: Vec<MealBucket>,
    pub core_meal_buckets: Vec<MealBucket>,
    pub smoothing_window: usize,
    pub week_reference: WeekReference,
}

impl Default for VizConfig {
    fn default() -> Self {
        Self {
            palette: MoodPalette::default(),
            meal_buckets: meal_buckets(),
            core_meal_buckets: core_meal_buckets(),
            smoothing_window: DEFAULT_SMOOTHING_WINDOW,
            week_reference: WeekReference::default(),
        }
    }
}

impl VizConfig {
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| env::var(key).ok())
    }

    /// Applies `SMOOTHING_WINDOW` and `REFERENCE_WEEK_START`; bad values are logged and ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(raw) = lookup("SMOOTHING_WINDOW") {
            match raw.trim().parse::<usize>() {
                Ok(window) if window > 0 => self.smoothing_window = window,
                _ => warn!("ignoring invalid SMOOTHING_WINDOW={raw:?}"),
            }
        }

        if let Some(raw) = lookup("REFERENCE_WEEK_START") {
            match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
                Ok(start) => self.week_reference.start = start,
                Err(err) => warn!("ignoring invalid REFERENCE_WEEK_START={raw:?}: {err}"),
            }
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_falls_back_to_default_color() {
        let palette = MoodPalette::default();
        assert_eq!(palette.color_for(Some("warm")), "#ffb15c");
        assert_eq!(palette.color_for(Some("grumpy")), DEFAULT_MOOD_COLOR);
        assert_eq!(palette.color_for(None), DEFAULT_MOOD_COLOR);
    }

    #[test]
    fn substitute_palette() {
        let palette = MoodPalette::new([("calm", "#0000ff")], "#000000");
        assert_eq!(palette.color_for(Some("calm")), "#0000ff");
        assert_eq!(palette.color_for(Some("cold")), "#000000");
    }

    #[test]
    fn core_buckets_merge_adjacent_slots() {
        let buckets = core_meal_buckets();
        assert_eq!(buckets.len(), 3);
        assert!(buckets[1].matches(Some(TimeOfDay::Afternoon)));
        assert!(buckets[2].matches(Some(TimeOfDay::Night)));
        assert!(!buckets[0].matches(None));
    }

    #[test]
    fn overrides_apply_valid_values_only() {
        let config = VizConfig::default().with_overrides(|key| match key {
            "SMOOTHING_WINDOW" => Some("5".into()),
            "REFERENCE_WEEK_START" => Some("not-a-date".into()),
            _ => None,
        });
        assert_eq!(config.smoothing_window, 5);
        assert_eq!(config.week_reference, WeekReference::default());

        let config = VizConfig::default().with_overrides(|key| match key {
            "SMOOTHING_WINDOW" => Some("0".into()),
            "REFERENCE_WEEK_START" => Some("2025-11-17".into()),
            _ => None,
        });
        assert_eq!(config.smoothing_window, DEFAULT_SMOOTHING_WINDOW);
        assert_eq!(
            config.week_reference.start,
            NaiveDate::from_ymd_opt(2025, 11, 17).unwrap()
        );
    }
}
