pub mod calendar;
pub mod chore;
pub mod config;
pub mod remind;
pub mod summary;
pub mod team;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use office_chores_core::RecurrenceEngine;

/// Parse a `YYYY-MM-DD` argument.
pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{value}', expected YYYY-MM-DD"))
}

/// Parse an `HH:MM` argument.
pub fn parse_time(value: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|_| format!("invalid time '{value}', expected HH:MM"))
}

/// Local wall-clock date + time as an instant.
pub fn local_due<Tz: TimeZone>(
    engine: &RecurrenceEngine<Tz>,
    date: NaiveDate,
    time: NaiveTime,
) -> DateTime<Utc> {
    engine.resolve_local(&date.and_time(time))
}

/// "Today, 9:00 AM", "Tomorrow, 5:30 PM" or "Wed, Jan 10".
pub fn due_label(at: NaiveDateTime, today: NaiveDate) -> String {
    let date = at.date();
    if date == today {
        format!("Today, {}", at.format("%-I:%M %p"))
    } else if today.succ_opt() == Some(date) {
        format!("Tomorrow, {}", at.format("%-I:%M %p"))
    } else {
        at.format("%a, %b %-d").to_string()
    }
}
