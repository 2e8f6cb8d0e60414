//! Week arithmetic for the weekly history view.
//!
//! Weeks run Monday to Sunday. Week 1 of a month starts on the Monday of the
//! Sunday-first calendar row that holds the 1st; a month that starts on a
//! Sunday therefore has its 1st in week 0.

use crate::error::CoreError;
use crate::models::Todo;
use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

/// Seven consecutive dates, Monday first, for `week` of `month` (1-12).
pub fn week_dates(year: i32, month: u32, week: u32) -> Result<Vec<NaiveDate>, CoreError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| CoreError::InvalidInput(format!("Invalid month: {}-{}", year, month)))?;
    if week > 6 {
        return Err(CoreError::InvalidInput(format!(
            "Week must be between 0 and 6, got {}",
            week
        )));
    }

    let offset = (i64::from(week) - 1) * 7 - i64::from(first.weekday().num_days_from_sunday()) + 1;
    let out_of_range =
        || CoreError::InvalidInput(format!("Week {} of {}-{} is out of range", week, year, month));
    let start = first
        .checked_add_signed(Duration::days(offset))
        .ok_or_else(out_of_range)?;
    (0..7)
        .map(|i| {
            start
                .checked_add_signed(Duration::days(i))
                .ok_or_else(out_of_range)
        })
        .collect()
}

/// Week number (as used by [`week_dates`]) that `date` falls in.
pub fn week_of_month(date: NaiveDate) -> u32 {
    let first_dow = date
        .with_day(1)
        .map(|first| first.weekday().num_days_from_sunday())
        .unwrap_or(0);
    (date.day() + first_dow - 1).div_ceil(7)
}

/// Todos of one day split by completion.
#[derive(Debug, Clone, Serialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub completed: Vec<Todo>,
    pub pending: Vec<Todo>,
}

impl DaySummary {
    pub fn collect<'a>(date: NaiveDate, todos: impl IntoIterator<Item = &'a Todo>) -> Self {
        let (completed, pending): (Vec<Todo>, Vec<Todo>) = todos
            .into_iter()
            .filter(|t| t.date == date)
            .cloned()
            .partition(|t| t.completed);
        Self {
            date,
            completed,
            pending,
        }
    }

    pub fn total(&self) -> usize {
        self.completed.len() + self.pending.len()
    }
}
