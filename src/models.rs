use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Coarse slot of the day an entry was logged in, independent of the clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimeOfDay {
    Morning,
    Noon,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    pub const ALL: [TimeOfDay; 5] = [
        TimeOfDay::Morning,
        TimeOfDay::Noon,
        TimeOfDay::Afternoon,
        TimeOfDay::Evening,
        TimeOfDay::Night,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TimeOfDay::Morning => "Morning",
            TimeOfDay::Noon => "Noon",
            TimeOfDay::Afternoon => "Afternoon",
            TimeOfDay::Evening => "Evening",
            TimeOfDay::Night => "Night",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|slot| slot.as_str().eq_ignore_ascii_case(value))
    }
}

/// One diary record as supplied by the data source.
///
/// Every field is optional on the wire and deserialized leniently: numbers
/// become strings, unknown time slots become `None`, and `satisfaction` is
/// kept raw so aggregation can decide what counts as numeric.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    #[serde(default, deserialize_with = "lenient_date")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub exact_time: Option<String>,
    #[serde(default, deserialize_with = "lenient_slot", skip_serializing_if = "Option::is_none")]
    pub time_of_day: Option<TimeOfDay>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub specific_location: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub nyc_location: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub color_mood: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub emotion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub satisfaction: Option<Value>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub food_items: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
}

impl Entry {
    pub fn is_food(&self) -> bool {
        self.category
            .as_deref()
            .is_some_and(|category| category.eq_ignore_ascii_case("food"))
    }

    /// `colorMood` wins over `emotion`; empty strings fall through.
    pub fn mood_key(&self) -> Option<&str> {
        non_empty(self.color_mood.as_deref()).or_else(|| non_empty(self.emotion.as_deref()))
    }

    pub fn diary_note(&self) -> &str {
        non_empty(self.description.as_deref())
            .or_else(|| non_empty(self.note.as_deref()))
            .unwrap_or("No diary note available.")
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(text)) => Some(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        Some(Value::Bool(flag)) => Some(flag.to_string()),
        _ => None,
    })
}

fn lenient_date<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer)?.unwrap_or_default())
}

fn lenient_slot<'de, D>(deserializer: D) -> Result<Option<TimeOfDay>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer)?
        .as_deref()
        .and_then(TimeOfDay::parse))
}

/// Result of the normalizer: input order and composite-timestamp order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreparedEntries {
    pub normalized: Vec<Entry>,
    pub sorted: Vec<Entry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayGroup {
    #[serde(skip)]
    pub date: NaiveDate,
    pub iso_date: String,
    pub label: String,
    pub entries: IndexMap<TimeOfDay, Entry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekGroup {
    #[serde(skip)]
    pub start: NaiveDate,
    pub week_start: String,
    pub week_end: String,
    pub week_number: i64,
    pub label: String,
    pub days: Vec<String>,
    #[serde(serialize_with = "serialize_week_slots")]
    pub slots: IndexMap<(String, TimeOfDay), Entry>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WeekSlot<'a> {
    date: &'a str,
    time_of_day: TimeOfDay,
    entry: &'a Entry,
}

fn serialize_week_slots<S>(
    slots: &IndexMap<(String, TimeOfDay), Entry>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_seq(slots.iter().map(|((date, time_of_day), entry)| WeekSlot {
        date,
        time_of_day: *time_of_day,
        entry,
    }))
}

#[derive(Debug, Serialize)]
#[serde(tag = "view", content = "groups", rename_all = "lowercase")]
pub enum CalendarView {
    Days(Vec<DayGroup>),
    Weeks(Vec<WeekGroup>),
}

#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    pub view: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LocationQuery {
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationShare {
    pub label: String,
    pub count: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationStats {
    pub total_visits: usize,
    pub frequent: Vec<LocationShare>,
    pub single_visit: Vec<String>,
    pub other: Option<LocationShare>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationGroup {
    pub label: String,
    pub count: usize,
    pub entries: Vec<Entry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealShare {
    pub label: String,
    pub count: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: String,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total_days: usize,
    pub total_entries: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiaryReport {
    pub summary: Summary,
    pub meals: Vec<MealShare>,
    pub core_meals: Vec<MealShare>,
    pub satisfaction_points: Vec<TrendPoint>,
    pub satisfaction_daily: Vec<TrendPoint>,
    pub satisfaction_trend: Vec<TrendPoint>,
    pub locations: LocationStats,
}
