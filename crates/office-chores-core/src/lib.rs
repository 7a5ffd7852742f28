//! # Office Chores Core Library
//!
//! Core logic for the Office Chores scheduler. The `office-chores` CLI is a
//! thin front end over this crate.
//!
//! ## Architecture
//!
//! - **Recurrence**: a pure engine that expands a chore's due date and repeat
//!   rule into the occurrences falling inside a day-granular range
//! - **Calendar / Summary**: month grid bucketing and the week-ahead sidebar,
//!   both recomputed from the engine on every call
//! - **Reminders**: fire-time computation and a tokio-based scheduler,
//!   cancellable per chore
//! - **Storage**: SQLite key-value store for chores, team and categories, and
//!   TOML-based configuration
//!
//! ## Key Components
//!
//! - [`RecurrenceEngine`]: occurrence expansion
//! - [`MonthGrid`]: calendar grid and bucketing
//! - [`ReminderScheduler`]: pending reminder timers
//! - [`ChoreStore`]: chore persistence
//! - [`Config`]: application configuration management

pub mod calendar;
pub mod chore;
pub mod error;
pub mod recurrence;
pub mod reminder;
pub mod storage;
pub mod summary;

pub use calendar::{CalendarDay, CalendarMonth, MonthGrid, WeekStart};
pub use chore::{Category, Chore, Priority, Recurrence, TeamMember};
pub use error::{ConfigError, CoreError, RecurrenceError, StorageError, ValidationError};
pub use recurrence::{Occurrence, RecurrenceEngine};
pub use reminder::{Notifier, Reminder, ReminderScheduler};
pub use storage::{ChoreStore, Config, KeyValueStore, SqliteStore};
pub use summary::WeekSummary;
