//! Chore, team and category types.
//!
//! A [`Chore`] is the unit the rest of the crate schedules: a due date, an
//! optional [`Recurrence`] and a payload (title, assignees, completion flag...)
//! that the recurrence engine carries through untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Repeat cadence of a chore.
///
/// Serialized as a lowercase string. Missing, `null` or unrecognized values
/// read back as [`Recurrence::None`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum Recurrence {
    /// One-time chore
    #[default]
    None,
    /// Every day at the same local time
    Daily,
    /// Every seven days
    Weekly,
    /// Every calendar month, clamped to the last day of shorter months
    Monthly,
}

impl Recurrence {
    /// Parse a rule label. Anything unrecognized is `None`.
    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "daily" => Recurrence::Daily,
            "weekly" => Recurrence::Weekly,
            "monthly" => Recurrence::Monthly,
            _ => Recurrence::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Recurrence::None => "none",
            Recurrence::Daily => "daily",
            Recurrence::Weekly => "weekly",
            Recurrence::Monthly => "monthly",
        }
    }

    pub fn is_recurring(&self) -> bool {
        !matches!(self, Recurrence::None)
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Option<String>> for Recurrence {
    fn from(value: Option<String>) -> Self {
        value.as_deref().map(Recurrence::parse).unwrap_or_default()
    }
}

impl From<Recurrence> for String {
    fn from(value: Recurrence) -> Self {
        value.as_str().to_string()
    }
}

/// Chore priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }
}

fn default_category() -> String {
    "other".into()
}

/// A schedulable office chore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chore {
    /// Unique identifier
    pub id: String,
    /// Chore title
    pub title: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// Anchor occurrence
    pub due_date: DateTime<Utc>,
    /// Category id (see [`Category`])
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub recurrence: Recurrence,
    /// Names of the team members the chore is assigned to
    #[serde(default)]
    pub assignees: Vec<String>,
    #[serde(default)]
    pub completed: bool,
}

impl Chore {
    /// Create a chore with a fresh id and default payload.
    pub fn new(title: impl Into<String>, due_date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            description: String::new(),
            due_date,
            category: default_category(),
            priority: Priority::default(),
            recurrence: Recurrence::None,
            assignees: Vec::new(),
            completed: false,
        }
    }

    pub fn with_recurrence(mut self, recurrence: Recurrence) -> Self {
        self.recurrence = recurrence;
        self
    }

    pub fn is_recurring(&self) -> bool {
        self.recurrence.is_recurring()
    }

    /// Assignees joined for display, or `Unassigned`.
    pub fn assignee_label(&self) -> String {
        if self.assignees.is_empty() {
            "Unassigned".to_string()
        } else {
            self.assignees.join(", ")
        }
    }
}

/// A member of the office team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: String,
    pub name: String,
}

impl TeamMember {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
        }
    }
}

/// A chore category with its display color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub color: String,
}

/// Color of the built-in "other" category.
pub const DEFAULT_CATEGORY_COLOR: &str = "#6B7280";

/// Categories used until the user saves their own.
pub fn default_categories() -> Vec<Category> {
    [
        ("cleaning", "Cleaning", "#4ADE80"),
        ("maintenance", "Maintenance", "#F59E0B"),
        ("supplies", "Supplies", "#3B82F6"),
        ("admin", "Administrative", "#8B5CF6"),
        ("other", "Other", DEFAULT_CATEGORY_COLOR),
    ]
    .into_iter()
    .map(|(id, name, color)| Category {
        id: id.to_string(),
        name: name.to_string(),
        color: color.to_string(),
    })
    .collect()
}
