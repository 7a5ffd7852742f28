use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::chore::Chore;

/// One concrete instance of a chore.
///
/// Derived on every query and never persisted. Serializes as the chore's
/// fields plus `occurrence_date` and `occurrence_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Occurrence {
    #[serde(flatten)]
    pub chore: Chore,
    pub occurrence_date: DateTime<Utc>,
    pub occurrence_id: String,
}

impl Occurrence {
    /// The only occurrence of a one-time chore; shares the chore's id.
    pub(crate) fn single(chore: &Chore) -> Self {
        Self {
            chore: chore.clone(),
            occurrence_date: chore.due_date,
            occurrence_id: chore.id.clone(),
        }
    }

    pub(crate) fn repeat(chore: &Chore, at: DateTime<Utc>) -> Self {
        Self {
            chore: chore.clone(),
            occurrence_date: at,
            occurrence_id: occurrence_id(&chore.id, &at),
        }
    }
}

/// `"{chore_id}-{ISO-8601 UTC with milliseconds}"`.
pub fn occurrence_id(chore_id: &str, at: &DateTime<Utc>) -> String {
    format!("{chore_id}-{}", at.to_rfc3339_opts(SecondsFormat::Millis, true))
}
