//! Bounded stepping over local wall-clock time.

use chrono::{Days, Months, NaiveDateTime};

use crate::chore::Recurrence;
use crate::error::RecurrenceError;

/// Advance `from` by one rule step.
///
/// Monthly steps clamp to the last day of the target month
/// (Jan 31 -> Feb 29 in a leap year). Returns `None` for non-recurring rules
/// and on date overflow.
pub fn step(rule: Recurrence, from: NaiveDateTime) -> Option<NaiveDateTime> {
    match rule {
        Recurrence::Daily => from.checked_add_days(Days::new(1)),
        Recurrence::Weekly => from.checked_add_days(Days::new(7)),
        Recurrence::Monthly => from.checked_add_months(Months::new(1)),
        Recurrence::None => None,
    }
}

/// Walks the candidates of a recurring chore, starting at its anchor.
///
/// Every call to [`StepCursor::advance`] counts against `max_steps`.
#[derive(Debug, Clone)]
pub(crate) struct StepCursor {
    rule: Recurrence,
    current: NaiveDateTime,
    taken: usize,
    max_steps: usize,
}

impl StepCursor {
    pub(crate) fn new(rule: Recurrence, anchor: NaiveDateTime, max_steps: usize) -> Self {
        Self {
            rule,
            current: anchor,
            taken: 0,
            max_steps,
        }
    }

    pub(crate) fn current(&self) -> NaiveDateTime {
        self.current
    }

    /// True while the cursor still sits on the anchor.
    pub(crate) fn at_anchor(&self) -> bool {
        self.taken == 0
    }

    pub(crate) fn advance(&mut self) -> Result<NaiveDateTime, RecurrenceError> {
        let unreachable = RecurrenceError::RangeUnreachable {
            rule: self.rule,
            steps: self.taken,
        };
        if self.taken >= self.max_steps {
            return Err(unreachable);
        }
        self.current = step(self.rule, self.current).ok_or(unreachable)?;
        self.taken += 1;
        Ok(self.current)
    }
}
