//! Chore reminders.
//!
//! A [`Reminder`] fires a fixed number of minutes before a chore's next
//! occurrence. [`ReminderScheduler`] keeps one pending tokio timer per chore,
//! hands due reminders to a [`Notifier`] and can cancel them by chore id.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;

use crate::chore::Chore;
use crate::recurrence::RecurrenceEngine;

pub const DEFAULT_MINUTES_BEFORE: i64 = 30;
/// Longest accepted lead time (one week).
pub const MAX_MINUTES_BEFORE: i64 = 7 * 24 * 60;

fn lead_time(minutes_before: i64) -> Option<TimeDelta> {
    if !(0..=MAX_MINUTES_BEFORE).contains(&minutes_before) {
        return None;
    }
    TimeDelta::try_minutes(minutes_before)
}

/// When a reminder for an occurrence at `due` should fire.
///
/// `None` when `minutes_before` is outside `0..=MAX_MINUTES_BEFORE` or the
/// result is not representable.
pub fn reminder_time(due: &DateTime<Utc>, minutes_before: i64) -> Option<DateTime<Utc>> {
    due.checked_sub_signed(lead_time(minutes_before)?)
}

/// A notification due at `fire_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    /// Chore id; one pending reminder per tag.
    pub tag: String,
    pub title: String,
    pub body: String,
    pub due_at: DateTime<Utc>,
    pub fire_at: DateTime<Utc>,
}

impl Reminder {
    /// Reminder for a chore occurrence due at `due_at`.
    ///
    /// Returns `None` for completed chores and when the fire time has
    /// already passed.
    pub fn for_occurrence(
        chore: &Chore,
        due_at: DateTime<Utc>,
        minutes_before: i64,
        now: &DateTime<Utc>,
    ) -> Option<Self> {
        if chore.completed {
            return None;
        }
        let fire_at = reminder_time(&due_at, minutes_before)?;
        if fire_at <= *now {
            return None;
        }
        Some(Self {
            tag: chore.id.clone(),
            title: format!("Chore Reminder: {}", chore.title),
            body: format!(
                "Due in {minutes_before} minutes. Assigned to: {}",
                chore.assignee_label()
            ),
            due_at,
            fire_at,
        })
    }

    /// Reminder for the anchor due date of `chore`.
    pub fn for_chore(chore: &Chore, minutes_before: i64, now: &DateTime<Utc>) -> Option<Self> {
        Self::for_occurrence(chore, chore.due_date, minutes_before, now)
    }

    /// Reminder for the next occurrence whose fire time is still ahead.
    pub fn next_for<Tz: TimeZone>(
        engine: &RecurrenceEngine<Tz>,
        chore: &Chore,
        minutes_before: i64,
        now: &DateTime<Utc>,
    ) -> Option<Self> {
        let threshold = now.checked_add_signed(lead_time(minutes_before)?)?;
        let due_at = engine.next_occurrence(chore, &threshold)?;
        Self::for_occurrence(chore, due_at, minutes_before, now)
    }
}

/// Delivers reminders (desktop notification, stdout, ...).
pub trait Notifier: Send + Sync + 'static {
    fn notify(&self, reminder: &Reminder);
}

/// A scheduled timer. `generation` tells a replaced timer apart from the one
/// that now holds its tag.
struct PendingEntry {
    reminder: Reminder,
    generation: u64,
    handle: JoinHandle<()>,
}

type PendingMap = HashMap<String, PendingEntry>;

/// Pending reminder timers keyed by chore id.
///
/// Must be used from within a tokio runtime.
pub struct ReminderScheduler<N: Notifier> {
    notifier: Arc<N>,
    pending: Arc<Mutex<PendingMap>>,
    next_generation: AtomicU64,
}

fn lock(pending: &Mutex<PendingMap>) -> MutexGuard<'_, PendingMap> {
    pending.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<N: Notifier> ReminderScheduler<N> {
    pub fn new(notifier: N) -> Self {
        Self {
            notifier: Arc::new(notifier),
            pending: Arc::new(Mutex::new(HashMap::new())),
            next_generation: AtomicU64::new(0),
        }
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Schedule `reminder`, replacing any pending one with the same tag.
    ///
    /// Returns false if the fire time is not after `now`.
    pub fn schedule(&self, reminder: Reminder, now: &DateTime<Utc>) -> bool {
        let Ok(delay) = (reminder.fire_at - *now).to_std() else {
            return false;
        };
        if delay.is_zero() {
            return false;
        }

        let tag = reminder.tag.clone();
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let notifier = Arc::clone(&self.notifier);
        let pending = Arc::clone(&self.pending);
        let fired = reminder.clone();

        // The timer cannot touch the map before its entry is in place.
        let mut map = lock(&self.pending);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Replaced or cancelled while waking up: the entry is no longer ours.
            let current = {
                let mut map = lock(&pending);
                let ours = map.get(&fired.tag).is_some_and(|e| e.generation == generation);
                if ours {
                    map.remove(&fired.tag);
                }
                ours
            };
            if !current {
                return;
            }
            tracing::info!(tag = %fired.tag, title = %fired.title, "reminder fired");
            notifier.notify(&fired);
        });
        let entry = PendingEntry {
            reminder,
            generation,
            handle,
        };
        if let Some(previous) = map.insert(tag.clone(), entry) {
            previous.handle.abort();
        }
        drop(map);

        tracing::debug!(%tag, delay_secs = delay.as_secs(), "reminder scheduled");
        true
    }

    /// Cancel the pending reminder for `tag`.
    pub fn cancel(&self, tag: &str) -> bool {
        match lock(&self.pending).remove(tag) {
            Some(entry) => {
                entry.handle.abort();
                tracing::info!(%tag, "reminder cancelled");
                true
            }
            None => false,
        }
    }

    pub fn cancel_all(&self) {
        for (_, entry) in lock(&self.pending).drain() {
            entry.handle.abort();
        }
    }

    /// Drop every pending reminder and schedule the next one for each open
    /// chore. Returns how many were scheduled.
    pub fn reschedule_all<Tz: TimeZone>(
        &self,
        engine: &RecurrenceEngine<Tz>,
        chores: &[Chore],
        minutes_before: i64,
        now: &DateTime<Utc>,
    ) -> usize {
        self.cancel_all();
        chores
            .iter()
            .filter_map(|chore| Reminder::next_for(engine, chore, minutes_before, now))
            .map(|reminder| self.schedule(reminder, now))
            .filter(|scheduled| *scheduled)
            .count()
    }

    /// Pending reminders, earliest first.
    pub fn pending(&self) -> Vec<Reminder> {
        let mut reminders: Vec<Reminder> = lock(&self.pending)
            .values()
            .map(|entry| entry.reminder.clone())
            .collect();
        reminders.sort_by_key(|r| r.fire_at);
        reminders
    }
}

impl<N: Notifier> Drop for ReminderScheduler<N> {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
