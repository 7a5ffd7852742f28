//! Week-ahead statistics and the upcoming list.
//!
//! Both look at the window from the start of today through `window_days`
//! days later (inclusive), expanding every chore over it.

use chrono::{DateTime, Days, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::chore::Chore;
use crate::recurrence::{Occurrence, RecurrenceEngine};

pub const DEFAULT_WINDOW_DAYS: u64 = 7;
pub const DEFAULT_UPCOMING_LIMIT: usize = 5;

/// Counts over the summary window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekSummary {
    pub total: usize,
    pub completed: usize,
    /// Occurrences already past `now` and not completed
    pub overdue: usize,
}

/// Window bounds: local today and `window_days` later.
pub fn summary_window<Tz: TimeZone>(
    engine: &RecurrenceEngine<Tz>,
    now: &DateTime<Utc>,
    window_days: u64,
) -> (NaiveDate, NaiveDate) {
    let today = engine.local_day(now);
    let end = today.checked_add_days(Days::new(window_days)).unwrap_or(today);
    (today, end)
}

impl WeekSummary {
    pub fn compute<Tz: TimeZone>(
        engine: &RecurrenceEngine<Tz>,
        chores: &[Chore],
        now: &DateTime<Utc>,
        window_days: u64,
    ) -> Self {
        let (start, end) = summary_window(engine, now, window_days);
        engine
            .expand_all(chores, start, end)
            .iter()
            .fold(Self::default(), |mut acc, occ| {
                acc.total += 1;
                if occ.chore.completed {
                    acc.completed += 1;
                } else if occ.occurrence_date < *now {
                    acc.overdue += 1;
                }
                acc
            })
    }
}

/// Open occurrences in the window, earliest first, at most `limit`.
pub fn upcoming<Tz: TimeZone>(
    engine: &RecurrenceEngine<Tz>,
    chores: &[Chore],
    now: &DateTime<Utc>,
    window_days: u64,
    limit: usize,
) -> Vec<Occurrence> {
    let (start, end) = summary_window(engine, now, window_days);
    let mut open: Vec<Occurrence> = engine
        .expand_all(chores, start, end)
        .into_iter()
        .filter(|occ| !occ.chore.completed)
        .collect();
    open.sort_by_key(|occ| occ.occurrence_date);
    open.truncate(limit);
    open
}
