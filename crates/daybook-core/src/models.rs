use chrono::{DateTime, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

// ============================================================================
// Day codes
// ============================================================================

/// Fixed 3-letter English weekday code, as stored in `days` / `scheduled_days`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DayCode {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl DayCode {
    /// Monday first, matching the order the codes are displayed in.
    pub const ALL: [DayCode; 7] = [
        DayCode::Mon,
        DayCode::Tue,
        DayCode::Wed,
        DayCode::Thu,
        DayCode::Fri,
        DayCode::Sat,
        DayCode::Sun,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DayCode::Mon => "Mon",
            DayCode::Tue => "Tue",
            DayCode::Wed => "Wed",
            DayCode::Thu => "Thu",
            DayCode::Fri => "Fri",
            DayCode::Sat => "Sat",
            DayCode::Sun => "Sun",
        }
    }

    pub fn of(date: NaiveDate) -> Self {
        use chrono::Datelike;
        date.weekday().into()
    }
}

impl From<Weekday> for DayCode {
    fn from(day: Weekday) -> Self {
        match day {
            Weekday::Mon => DayCode::Mon,
            Weekday::Tue => DayCode::Tue,
            Weekday::Wed => DayCode::Wed,
            Weekday::Thu => DayCode::Thu,
            Weekday::Fri => DayCode::Fri,
            Weekday::Sat => DayCode::Sat,
            Weekday::Sun => DayCode::Sun,
        }
    }
}

impl fmt::Display for DayCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Invalid day code: '{0}' (expected Mon, Tue, Wed, Thu, Fri, Sat or Sun)")]
pub struct ParseDayError(String);

impl FromStr for DayCode {
    type Err = ParseDayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mon" | "monday" => Ok(DayCode::Mon),
            "tue" | "tues" | "tuesday" => Ok(DayCode::Tue),
            "wed" | "wednesday" => Ok(DayCode::Wed),
            "thu" | "thurs" | "thursday" => Ok(DayCode::Thu),
            "fri" | "friday" => Ok(DayCode::Fri),
            "sat" | "saturday" => Ok(DayCode::Sat),
            "sun" | "sunday" => Ok(DayCode::Sun),
            _ => Err(ParseDayError(s.to_string())),
        }
    }
}

/// Ordered, duplicate-free set of day codes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<DayCode>", into = "Vec<DayCode>")]
pub struct DaySet(Vec<DayCode>);

impl DaySet {
    pub fn new(days: impl IntoIterator<Item = DayCode>) -> Self {
        let mut days: Vec<DayCode> = days.into_iter().collect();
        days.sort();
        days.dedup();
        Self(days)
    }

    pub fn every_day() -> Self {
        Self(DayCode::ALL.to_vec())
    }

    pub fn weekdays() -> Self {
        Self(DayCode::ALL[..5].to_vec())
    }

    pub fn weekends() -> Self {
        Self(vec![DayCode::Sat, DayCode::Sun])
    }

    pub fn contains(&self, day: DayCode) -> bool {
        self.0.contains(&day)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_every_day(&self) -> bool {
        self.0.len() == DayCode::ALL.len()
    }

    pub fn days(&self) -> &[DayCode] {
        &self.0
    }
}

impl From<Vec<DayCode>> for DaySet {
    fn from(days: Vec<DayCode>) -> Self {
        Self::new(days)
    }
}

impl From<DaySet> for Vec<DayCode> {
    fn from(set: DaySet) -> Self {
        set.0
    }
}

impl fmt::Display for DaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.0.iter().map(DayCode::as_str).collect();
        f.write_str(&joined.join(","))
    }
}

impl FromStr for DaySet {
    type Err = ParseDayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" | "every day" | "everyday" | "all" => return Ok(Self::every_day()),
            "weekdays" => return Ok(Self::weekdays()),
            "weekends" => return Ok(Self::weekends()),
            _ => {}
        }

        s.split(|c: char| c == ',' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .map(DayCode::from_str)
            .collect::<Result<Vec<_>, _>>()
            .map(Self::new)
    }
}

// ============================================================================
// Todos
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: Uuid,
    pub user_id: String,
    pub text: String,
    /// Day view this todo shows up under.
    pub date: NaiveDate,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_days: Option<DaySet>,
    /// Template this todo was expanded from, if any.
    #[serde(default)]
    pub parent_todo_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Todo {
    pub fn is_scheduled(&self) -> bool {
        self.scheduled_days.as_ref().is_some_and(|days| !days.is_empty())
    }
}

impl<'r> FromRow<'r, SqliteRow> for Todo {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            text: row.try_get("text")?,
            date: row.try_get("date")?,
            completed: row.try_get("completed")?,
            scheduled_days: decode_day_set(row, "scheduled_days")?,
            parent_todo_id: row.try_get("parent_todo_id")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub user_id: String,
    pub text: String,
    pub date: NaiveDate,
    pub completed: bool,
    pub scheduled_days: Option<DaySet>,
    pub parent_todo_id: Option<Uuid>,
}

impl NewTodo {
    pub fn new(user_id: impl Into<String>, text: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            user_id: user_id.into(),
            text: text.into(),
            date,
            completed: false,
            scheduled_days: None,
            parent_todo_id: None,
        }
    }
}

/// Partial update of a todo. `None` leaves the field alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTodoData {
    pub text: Option<String>,
    pub date: Option<NaiveDate>,
    pub completed: Option<bool>,
    pub scheduled_days: Option<Option<DaySet>>,
}

impl UpdateTodoData {
    pub fn is_empty(&self) -> bool {
        self.text.is_none()
            && self.date.is_none()
            && self.completed.is_none()
            && self.scheduled_days.is_none()
    }

    pub fn apply_to(&self, todo: &mut Todo) {
        if let Some(text) = &self.text {
            todo.text = text.clone();
        }
        if let Some(date) = self.date {
            todo.date = date;
        }
        if let Some(completed) = self.completed {
            todo.completed = completed;
        }
        if let Some(days) = &self.scheduled_days {
            todo.scheduled_days = days.clone();
        }
    }
}

// ============================================================================
// Recurrence patterns
// ============================================================================

/// Weekday rule that expands a template todo into daily instances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrencePattern {
    pub id: Uuid,
    /// Template todo; unique across patterns.
    pub parent_id: Uuid,
    pub days: DaySet,
    pub active: bool,
    /// Last day the expander created an instance for this pattern.
    pub last_created_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl RecurrencePattern {
    pub fn fires_on(&self, date: NaiveDate) -> bool {
        self.active && self.days.contains(DayCode::of(date))
    }
}

impl<'r> FromRow<'r, SqliteRow> for RecurrencePattern {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            parent_id: row.try_get("parent_id")?,
            days: decode_day_set(row, "days")?.unwrap_or_default(),
            active: row.try_get("active")?,
            last_created_date: row.try_get("last_created_date")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPatternData {
    pub parent_id: Uuid,
    pub days: DaySet,
    pub last_created_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdatePatternData {
    pub days: Option<DaySet>,
    pub active: Option<bool>,
    pub last_created_date: Option<Option<NaiveDate>>,
}

impl UpdatePatternData {
    pub fn is_empty(&self) -> bool {
        self.days.is_none() && self.active.is_none() && self.last_created_date.is_none()
    }

    pub fn apply_to(&self, pattern: &mut RecurrencePattern) {
        if let Some(days) = &self.days {
            pattern.days = days.clone();
        }
        if let Some(active) = self.active {
            pattern.active = active;
        }
        if let Some(stamp) = self.last_created_date {
            pattern.last_created_date = stamp;
        }
    }

    /// The update that puts `pattern` back the way it is now.
    pub fn restoring(pattern: &RecurrencePattern) -> Self {
        Self {
            days: Some(pattern.days.clone()),
            active: Some(pattern.active),
            last_created_date: Some(pattern.last_created_date),
        }
    }
}

/// An active pattern joined with its template todo.
/// `template` is `None` when the template row has gone missing.
#[derive(Debug, Clone)]
pub struct PatternWithTemplate {
    pub pattern: RecurrencePattern,
    pub template: Option<Todo>,
}

// ============================================================================
// Quick notes
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Note {
    pub id: i64,
    pub user_id: String,
    pub note_text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    pub user_id: String,
    pub note_text: String,
}

impl NewNote {
    pub fn new(user_id: impl Into<String>, note_text: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            note_text: note_text.into(),
        }
    }
}

// ============================================================================
// Mood log
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Neutral,
    Sad,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Neutral => "neutral",
            Mood::Sad => "sad",
        }
    }

    /// 3 for happy down to 1 for sad, used to chart and average moods.
    pub fn score(&self) -> u8 {
        match self {
            Mood::Happy => 3,
            Mood::Neutral => 2,
            Mood::Sad => 1,
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Invalid mood: '{0}' (expected happy, neutral or sad)")]
pub struct ParseMoodError(String);

impl FromStr for Mood {
    type Err = ParseMoodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "happy" => Ok(Mood::Happy),
            "neutral" | "meh" => Ok(Mood::Neutral),
            "sad" => Ok(Mood::Sad),
            _ => Err(ParseMoodError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub id: i64,
    pub user_id: String,
    pub mood: Mood,
    pub created_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, SqliteRow> for MoodEntry {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let mood: String = row.try_get("mood")?;
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            mood: mood.parse().map_err(|e: ParseMoodError| sqlx::Error::ColumnDecode {
                index: "mood".to_string(),
                source: Box::new(e),
            })?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMoodEntry {
    pub user_id: String,
    pub mood: Mood,
}

/// Mean score of `entries`, or `None` when there are none.
pub fn average_mood_score(entries: &[MoodEntry]) -> Option<f64> {
    if entries.is_empty() {
        return None;
    }
    let total: u32 = entries.iter().map(|e| u32::from(e.mood.score())).sum();
    Some(f64::from(total) / entries.len() as f64)
}

// ============================================================================
// Optimistic mutations
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MutationKind {
    Add,
    Update,
    Delete,
    Toggle,
    Schedule,
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MutationKind::Add => write!(f, "add"),
            MutationKind::Update => write!(f, "update"),
            MutationKind::Delete => write!(f, "delete"),
            MutationKind::Toggle => write!(f, "toggle"),
            MutationKind::Schedule => write!(f, "schedule"),
        }
    }
}

/// Which day the add box targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayTab {
    #[default]
    Today,
    Tomorrow,
}

impl DayTab {
    pub fn target_date(&self, today: NaiveDate) -> NaiveDate {
        match self {
            DayTab::Today => today,
            DayTab::Tomorrow => today.succ_opt().unwrap_or(today),
        }
    }
}

fn decode_day_set(row: &SqliteRow, column: &str) -> Result<Option<DaySet>, sqlx::Error> {
    let raw: Option<String> = row.try_get(column)?;
    raw.map(|s| s.parse::<DaySet>())
        .transpose()
        .map_err(|e| sqlx::Error::ColumnDecode {
            index: column.to_string(),
            source: Box::new(e),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Mon", DayCode::Mon)]
    #[case("tue", DayCode::Tue)]
    #[case("Wednesday", DayCode::Wed)]
    #[case(" sun ", DayCode::Sun)]
    fn test_parse_day_code(#[case] input: &str, #[case] expected: DayCode) {
        assert_eq!(input.parse::<DayCode>().unwrap(), expected);
    }

    #[test]
    fn test_parse_day_code_invalid() {
        assert!("Funday".parse::<DayCode>().is_err());
    }

    #[test]
    fn test_day_set_is_sorted_and_deduplicated() {
        let set: DaySet = "Wed, mon,Wed".parse().unwrap();
        assert_eq!(set.days(), &[DayCode::Mon, DayCode::Wed]);
        assert_eq!(set.to_string(), "Mon,Wed");
    }

    #[rstest]
    #[case("daily", 7)]
    #[case("weekdays", 5)]
    #[case("weekends", 2)]
    #[case("", 0)]
    fn test_day_set_shortcuts(#[case] input: &str, #[case] len: usize) {
        let set: DaySet = input.parse().unwrap();
        assert_eq!(set.days().len(), len);
    }

    #[test]
    fn test_day_set_json_is_a_list_of_codes() {
        let set = DaySet::new([DayCode::Fri, DayCode::Mon]);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["Mon","Fri"]"#);

        let back: DaySet = serde_json::from_str(r#"["Fri","Mon","Mon"]"#).unwrap();
        assert_eq!(back, set);
    }

    #[test]
    fn test_day_code_of_date() {
        // 2024-01-01 was a Monday
        let monday = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(DayCode::of(monday), DayCode::Mon);
        assert_eq!(DayCode::of(monday.succ_opt().unwrap()), DayCode::Tue);
    }

    #[rstest]
    #[case("happy", Mood::Happy)]
    #[case(" Neutral ", Mood::Neutral)]
    #[case("meh", Mood::Neutral)]
    #[case("SAD", Mood::Sad)]
    fn test_parse_mood(#[case] input: &str, #[case] expected: Mood) {
        assert_eq!(input.parse::<Mood>().unwrap(), expected);
        assert_eq!(expected.to_string().parse::<Mood>().unwrap(), expected);
    }

    #[test]
    fn test_parse_mood_invalid() {
        assert!("ecstatic".parse::<Mood>().is_err());
    }

    #[test]
    fn test_average_mood_score() {
        let entry = |mood| MoodEntry {
            id: 1,
            user_id: "ann".to_string(),
            mood,
            created_at: Utc::now(),
        };
        assert_eq!(average_mood_score(&[]), None);
        assert_eq!(
            average_mood_score(&[entry(Mood::Happy), entry(Mood::Sad)]),
            Some(2.0)
        );
    }

    #[test]
    fn test_tab_target_date() {
        let today = NaiveDate::from_ymd_opt(2024, 2, 28).unwrap();
        assert_eq!(DayTab::Today.target_date(today), today);
        assert_eq!(
            DayTab::Tomorrow.target_date(today),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
    }
}
