//! Recurrence expansion for chores.
//!
//! [`RecurrenceEngine`] turns a chore (anchor due date + [`Recurrence`](crate::chore::Recurrence) rule)
//! into the concrete [`Occurrence`]s that fall inside a day-granular range.
//! It is stateless apart from the time zone used for calendar arithmetic:
//! ranges are normalized to local midnight / 23:59:59.999 and rule steps keep
//! the local time of day.
//!
//! Stepping from a far-past anchor is bounded by `max_steps`; past the cap the
//! infallible API returns nothing and the `try_` API reports
//! [`RecurrenceError::RangeUnreachable`].

mod occurrence;
mod step;

pub use occurrence::{occurrence_id, Occurrence};
pub use step::step;

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

use crate::chore::Chore;
use crate::error::RecurrenceError;
use step::StepCursor;

/// Step cap applied when none is configured.
pub const DEFAULT_MAX_STEPS: usize = 100_000;

/// 00:00:00.000 of `date`.
pub fn day_start(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// 23:59:59.999 of `date`.
pub fn day_end(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_milli_opt(23, 59, 59, 999)
        .unwrap_or_else(|| day_start(date))
}

/// Expands chores into occurrences using calendar arithmetic in `Tz`.
#[derive(Debug, Clone)]
pub struct RecurrenceEngine<Tz: TimeZone> {
    tz: Tz,
    max_steps: usize,
}

impl RecurrenceEngine<Local> {
    /// Engine on the machine's local clock.
    pub fn local() -> Self {
        Self::new(Local)
    }
}

impl RecurrenceEngine<Utc> {
    pub fn utc() -> Self {
        Self::new(Utc)
    }
}

impl<Tz: TimeZone> RecurrenceEngine<Tz> {
    pub fn new(tz: Tz) -> Self {
        Self {
            tz,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn timezone(&self) -> &Tz {
        &self.tz
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// Wall-clock time of `at` in the engine's zone.
    pub fn to_local(&self, at: &DateTime<Utc>) -> NaiveDateTime {
        at.with_timezone(&self.tz).naive_local()
    }

    /// Calendar day of `at` in the engine's zone.
    pub fn local_day(&self, at: &DateTime<Utc>) -> NaiveDate {
        self.to_local(at).date()
    }

    /// Map a wall-clock time back to an instant.
    ///
    /// Ambiguous times take the earlier instant; times inside a DST gap are
    /// moved forward by an hour.
    pub fn resolve_local(&self, local: &NaiveDateTime) -> DateTime<Utc> {
        self.tz
            .from_local_datetime(local)
            .earliest()
            .or_else(|| self.tz.from_local_datetime(&(*local + Duration::hours(1))).earliest())
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| Utc.from_utc_datetime(local))
    }

    /// Every occurrence of `chore` between `range_start` and `range_end`,
    /// both days inclusive, in chronological order.
    ///
    /// An inverted range yields nothing. So does a recurring chore whose
    /// anchor is more than `max_steps` steps away from the range.
    pub fn expand_in_range(
        &self,
        chore: &Chore,
        range_start: NaiveDate,
        range_end: NaiveDate,
    ) -> Vec<Occurrence> {
        match self.try_expand_in_range(chore, range_start, range_end) {
            Ok(occurrences) => occurrences,
            Err(err) => {
                tracing::warn!(
                    chore_id = %chore.id,
                    %range_start,
                    %range_end,
                    error = %err,
                    "recurrence expansion abandoned"
                );
                Vec::new()
            }
        }
    }

    /// Like [`expand_in_range`](Self::expand_in_range), but reports the step
    /// cap instead of returning an empty result.
    ///
    /// # Errors
    /// Returns [`RecurrenceError::RangeUnreachable`] when stepping exceeds
    /// `max_steps` or leaves the representable date range.
    pub fn try_expand_in_range(
        &self,
        chore: &Chore,
        range_start: NaiveDate,
        range_end: NaiveDate,
    ) -> Result<Vec<Occurrence>, RecurrenceError> {
        if range_start > range_end {
            return Ok(Vec::new());
        }

        let lower = day_start(range_start);
        let upper = day_end(range_end);
        let anchor = self.to_local(&chore.due_date);

        if !chore.is_recurring() {
            let hit = (lower..=upper).contains(&anchor);
            return Ok(if hit { vec![Occurrence::single(chore)] } else { Vec::new() });
        }

        let mut cursor = StepCursor::new(chore.recurrence, anchor, self.max_steps);
        while cursor.current() < lower {
            cursor.advance()?;
        }

        let mut occurrences = Vec::new();
        while cursor.current() <= upper {
            occurrences.push(Occurrence::repeat(chore, self.instant_of(chore, &cursor)));
            if let Err(err) = cursor.advance() {
                // The step that only confirms the range has ended is not charged to the cap.
                match step(chore.recurrence, cursor.current()) {
                    Some(next) if next <= upper => return Err(err),
                    _ => break,
                }
            }
        }

        tracing::debug!(
            chore_id = %chore.id,
            rule = %chore.recurrence,
            count = occurrences.len(),
            "expanded chore"
        );
        Ok(occurrences)
    }

    /// Expand several chores over the same range, chore by chore.
    pub fn expand_all<'a, I>(
        &self,
        chores: I,
        range_start: NaiveDate,
        range_end: NaiveDate,
    ) -> Vec<Occurrence>
    where
        I: IntoIterator<Item = &'a Chore>,
    {
        chores
            .into_iter()
            .flat_map(|chore| self.expand_in_range(chore, range_start, range_end))
            .collect()
    }

    /// Whether any occurrence of `chore` falls on the calendar day `date`.
    pub fn is_occurrence_on_date(&self, chore: &Chore, date: NaiveDate) -> bool {
        let anchor = self.to_local(&chore.due_date);
        if !chore.is_recurring() {
            return anchor.date() == date;
        }

        let upper = day_end(date);
        let mut cursor = StepCursor::new(chore.recurrence, anchor, self.max_steps);
        loop {
            let current = cursor.current();
            if current > upper {
                return false;
            }
            if current.date() == date {
                return true;
            }
            if let Err(err) = cursor.advance() {
                tracing::warn!(chore_id = %chore.id, %date, error = %err, "occurrence check abandoned");
                return false;
            }
        }
    }

    /// First occurrence strictly after `after`.
    ///
    /// A one-time chore has a next occurrence only while it is still ahead.
    pub fn next_occurrence(&self, chore: &Chore, after: &DateTime<Utc>) -> Option<DateTime<Utc>> {
        if !chore.is_recurring() {
            return (chore.due_date > *after).then_some(chore.due_date);
        }

        let threshold = self.to_local(after);
        let mut cursor = StepCursor::new(chore.recurrence, self.to_local(&chore.due_date), self.max_steps);
        while cursor.current() <= threshold {
            if let Err(err) = cursor.advance() {
                tracing::warn!(chore_id = %chore.id, error = %err, "next occurrence search abandoned");
                return None;
            }
        }
        Some(self.instant_of(chore, &cursor))
    }

    fn instant_of(&self, chore: &Chore, cursor: &StepCursor) -> DateTime<Utc> {
        if cursor.at_anchor() {
            chore.due_date
        } else {
            self.resolve_local(&cursor.current())
        }
    }
}

impl Default for RecurrenceEngine<Local> {
    fn default() -> Self {
        Self::local()
    }
}

#[cfg(test)]
mod tests;
