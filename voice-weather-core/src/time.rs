//! Resolution of spoken time expressions ("tomorrow morning", "on friday",
//! "tonight") into a calendar date and an hour of day.
//!
//! Both halves are keyword tables scanned top to bottom; the first rule whose
//! keyword occurs anywhere in the text wins. Resolution never fails: a text
//! without any time vocabulary means today at midday.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

/// Relative-day keywords and their offset from today, in precedence order.
pub const DAY_RULES: &[(&[&str], i64)] = &[
    (&["day after tomorrow"], 2),
    (&["tomorrow"], 1),
    (&["today", "right now", "now"], 0),
];

/// Weekday names, only consulted when no relative-day keyword matched.
pub const WEEKDAYS: &[(&str, Weekday)] = &[
    ("monday", Weekday::Mon),
    ("tuesday", Weekday::Tue),
    ("wednesday", Weekday::Wed),
    ("thursday", Weekday::Thu),
    ("friday", Weekday::Fri),
    ("saturday", Weekday::Sat),
    ("sunday", Weekday::Sun),
];

/// Day-part keywords and the hour they stand for, in precedence order.
pub const HOUR_RULES: &[(&[&str], u32)] = &[
    (&["morning"], 9),
    (&["afternoon"], 15),
    (&["evening", "tonight"], 18),
    (&["night"], 21),
];

pub const DEFAULT_HOUR: u32 = 12;

/// A resolved (date, hour) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeExpression {
    pub date: NaiveDate,
    pub hour: u32,
}

impl TimeExpression {
    /// The target instant, `date` at `hour:00:00`.
    pub fn instant(&self) -> NaiveDateTime {
        self.date.and_time(NaiveTime::MIN) + Duration::hours(i64::from(self.hour))
    }
}

/// Resolve both the date and the hour referenced by `text`, relative to `now`.
pub fn resolve(text: &str, now: NaiveDateTime) -> TimeExpression {
    TimeExpression {
        date: resolve_date(text, now),
        hour: resolve_hour(text),
    }
}

pub fn resolve_date(text: &str, now: NaiveDateTime) -> NaiveDate {
    let text = text.to_lowercase();
    let today = now.date();

    if let Some(offset) = first_match(&text, DAY_RULES) {
        return today + Duration::days(offset);
    }

    if let Some(weekday) = WEEKDAYS
        .iter()
        .find(|(name, _)| text.contains(name))
        .map(|(_, weekday)| *weekday)
    {
        return today + Duration::days(days_until(today, weekday));
    }

    today
}

pub fn resolve_hour(text: &str) -> u32 {
    first_match(&text.to_lowercase(), HOUR_RULES).unwrap_or(DEFAULT_HOUR)
}

/// Days from `from` to the next `weekday`, 0 when `from` already is that day.
fn days_until(from: NaiveDate, weekday: Weekday) -> i64 {
    let target = i64::from(weekday.num_days_from_monday());
    let current = i64::from(from.weekday().num_days_from_monday());
    (target - current).rem_euclid(7)
}

fn first_match<T: Copy>(text: &str, rules: &[(&[&str], T)]) -> Option<T> {
    rules
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| text.contains(k)))
        .map(|(_, value)| *value)
}
