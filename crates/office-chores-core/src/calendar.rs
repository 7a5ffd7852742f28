//! Month calendar grid.
//!
//! A [`MonthGrid`] covers whole weeks around a month (5 or 6 rows). Bucketing
//! expands every chore once over the grid range and files the occurrences
//! under their local calendar day. Days show at most `display_limit`
//! occurrences; the rest is reported as overflow ("+N more").

use chrono::{Datelike, Months, NaiveDate, TimeZone, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::chore::Chore;
use crate::error::ValidationError;
use crate::recurrence::{Occurrence, RecurrenceEngine};

/// Occurrences shown per day before collapsing into an overflow count.
pub const DEFAULT_DISPLAY_LIMIT: usize = 3;

/// First column of the grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    fn offset(&self, weekday: Weekday) -> u64 {
        match self {
            WeekStart::Sunday => u64::from(weekday.num_days_from_sunday()),
            WeekStart::Monday => u64::from(weekday.num_days_from_monday()),
        }
    }

    /// Column headers in grid order.
    pub fn labels(&self) -> [&'static str; 7] {
        match self {
            WeekStart::Sunday => ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"],
            WeekStart::Monday => ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"],
        }
    }
}

/// The visible date range for one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthGrid {
    month_start: NaiveDate,
    month_end: NaiveDate,
    week_start: WeekStart,
}

impl MonthGrid {
    /// Grid for `year`-`month`.
    ///
    /// # Errors
    /// Returns an error if the month is not a valid calendar month.
    pub fn new(year: i32, month: u32, week_start: WeekStart) -> Result<Self, ValidationError> {
        let month_start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            ValidationError::InvalidValue {
                field: "month".into(),
                message: format!("{year}-{month:02} is not a calendar month"),
            }
        })?;
        let month_end = month_start
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "month".into(),
                message: format!("{year}-{month:02} is out of range"),
            })?;
        Ok(Self {
            month_start,
            month_end,
            week_start,
        })
    }

    /// Grid for the month containing `date`.
    pub fn containing(date: NaiveDate, week_start: WeekStart) -> Self {
        let month_start = date.with_day(1).unwrap_or(date);
        let month_end = month_start
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(date);
        Self {
            month_start,
            month_end,
            week_start,
        }
    }

    pub fn year(&self) -> i32 {
        self.month_start.year()
    }

    pub fn month(&self) -> u32 {
        self.month_start.month()
    }

    pub fn week_start(&self) -> WeekStart {
        self.week_start
    }

    pub fn month_start(&self) -> NaiveDate {
        self.month_start
    }

    pub fn month_end(&self) -> NaiveDate {
        self.month_end
    }

    /// First day shown (start of the week containing the 1st).
    pub fn grid_start(&self) -> NaiveDate {
        let back = self.week_start.offset(self.month_start.weekday());
        self.month_start - chrono::Days::new(back)
    }

    /// Last day shown (end of the week containing the last day).
    pub fn grid_end(&self) -> NaiveDate {
        let forward = 6 - self.week_start.offset(self.month_end.weekday());
        self.month_end + chrono::Days::new(forward)
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.grid_end();
        self.grid_start().iter_days().take_while(move |d| *d <= end)
    }

    /// "January 2024"
    pub fn title(&self) -> String {
        self.month_start.format("%B %Y").to_string()
    }

    pub fn previous(&self) -> Self {
        let start = self
            .month_start
            .checked_sub_months(Months::new(1))
            .unwrap_or(self.month_start);
        Self::containing(start, self.week_start)
    }

    pub fn next(&self) -> Self {
        let start = self
            .month_start
            .checked_add_months(Months::new(1))
            .unwrap_or(self.month_start);
        Self::containing(start, self.week_start)
    }

    /// Expand `chores` over the grid and group occurrences by local day.
    pub fn bucket<Tz: TimeZone>(
        &self,
        engine: &RecurrenceEngine<Tz>,
        chores: &[Chore],
        today: NaiveDate,
    ) -> CalendarMonth {
        let mut by_day: BTreeMap<NaiveDate, Vec<Occurrence>> = BTreeMap::new();
        for occ in engine.expand_all(chores, self.grid_start(), self.grid_end()) {
            let date = engine.local_day(&occ.occurrence_date);
            by_day.entry(date).or_default().push(occ);
        }

        let days = self
            .days()
            .map(|date| CalendarDay {
                date,
                in_month: date.month() == self.month() && date.year() == self.year(),
                is_today: date == today,
                occurrences: by_day.remove(&date).unwrap_or_default(),
            })
            .collect();

        CalendarMonth {
            title: self.title(),
            week_start: self.week_start,
            days,
        }
    }
}

/// One cell of the calendar.
#[derive(Debug, Clone, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    /// False for the leading/trailing days of neighbouring months.
    pub in_month: bool,
    pub is_today: bool,
    pub occurrences: Vec<Occurrence>,
}

impl CalendarDay {
    /// Occurrences that fit in the cell.
    pub fn visible(&self, limit: usize) -> &[Occurrence] {
        &self.occurrences[..self.occurrences.len().min(limit)]
    }

    /// Number of occurrences hidden behind "+N more".
    pub fn overflow(&self, limit: usize) -> usize {
        self.occurrences.len().saturating_sub(limit)
    }
}

/// A bucketed month, ready for display.
#[derive(Debug, Clone, Serialize)]
pub struct CalendarMonth {
    pub title: String,
    pub week_start: WeekStart,
    pub days: Vec<CalendarDay>,
}

impl CalendarMonth {
    pub fn weeks(&self) -> impl Iterator<Item = &[CalendarDay]> {
        self.days.chunks(7)
    }

    pub fn day(&self, date: NaiveDate) -> Option<&CalendarDay> {
        self.days.iter().find(|d| d.date == date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chore::Recurrence;
    use chrono::Utc;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn grid_covers_whole_weeks() {
        // Feb 2024: Thu 1st .. Thu 29th
        let grid = MonthGrid::new(2024, 2, WeekStart::Sunday).unwrap();
        assert_eq!(grid.grid_start(), day(2024, 1, 28));
        assert_eq!(grid.grid_end(), day(2024, 3, 2));
        assert_eq!(grid.days().count(), 35);

        let monday = MonthGrid::new(2024, 2, WeekStart::Monday).unwrap();
        assert_eq!(monday.grid_start(), day(2024, 1, 29));
        assert_eq!(monday.grid_end(), day(2024, 3, 3));
    }

    #[test]
    fn six_row_month() {
        // Jun 2024 starts on a Saturday
        let grid = MonthGrid::new(2024, 6, WeekStart::Sunday).unwrap();
        assert_eq!(grid.days().count(), 42);
        assert_eq!(grid.title(), "June 2024");
    }

    #[test]
    fn invalid_month_is_rejected() {
        assert!(MonthGrid::new(2024, 13, WeekStart::Sunday).is_err());
    }

    #[test]
    fn navigation_wraps_years() {
        let grid = MonthGrid::new(2024, 1, WeekStart::Sunday).unwrap();
        assert_eq!((grid.previous().year(), grid.previous().month()), (2023, 12));
        let dec = MonthGrid::new(2024, 12, WeekStart::Sunday).unwrap();
        assert_eq!((dec.next().year(), dec.next().month()), (2025, 1));
    }

    #[test]
    fn bucket_groups_by_day_with_overflow() {
        let engine = RecurrenceEngine::utc();
        let due = Utc.with_ymd_and_hms(2024, 2, 5, 9, 0, 0).unwrap();
        let chores: Vec<Chore> = (0..5)
            .map(|i| Chore::new(format!("Chore {i}"), due))
            .chain(std::iter::once(
                Chore::new("Standup snacks", due).with_recurrence(Recurrence::Weekly),
            ))
            .collect();

        let grid = MonthGrid::new(2024, 2, WeekStart::Sunday).unwrap();
        let month = grid.bucket(&engine, &chores, day(2024, 2, 5));

        let busy = month.day(day(2024, 2, 5)).unwrap();
        assert!(busy.is_today);
        assert_eq!(busy.occurrences.len(), 6);
        assert_eq!(busy.visible(DEFAULT_DISPLAY_LIMIT).len(), 3);
        assert_eq!(busy.overflow(DEFAULT_DISPLAY_LIMIT), 3);

        // weekly repeats run into the trailing days of March
        assert_eq!(month.day(day(2024, 2, 26)).unwrap().occurrences.len(), 1);
        let trailing = month.day(day(2024, 3, 2)).unwrap();
        assert!(!trailing.in_month);
        assert_eq!(month.weeks().count(), 5);
    }
}
