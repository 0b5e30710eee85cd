//! Collection record: the top-level grouping of threads.

use super::has_text;
use super::validation::{check_timestamps, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable collection identifier.
pub type CollectionId = Uuid;

/// Top-level grouping that owns zero or more threads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: CollectionId,
    /// Display name. Must contain non-whitespace text.
    pub name: String,
    pub summary: Option<String>,
    /// Epoch ms, fixed at creation.
    pub creation_date: i64,
    /// Epoch ms, advanced by every update.
    pub last_modified: i64,
}

impl Collection {
    /// Creates a fresh collection stamped at `now`.
    pub fn new(name: impl Into<String>, summary: Option<String>, now: i64) -> Self {
        Self::with_id(Uuid::new_v4(), name, summary, now)
    }

    /// Creates a collection with a caller-provided id.
    ///
    /// Used by fixture generation where identity must be reproducible.
    pub fn with_id(
        id: CollectionId,
        name: impl Into<String>,
        summary: Option<String>,
        now: i64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            summary,
            creation_date: now,
            last_modified: now,
        }
    }

    /// Checks field invariants required before persistence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !has_text(&self.name) {
            return Err(ValidationError::BlankName);
        }
        check_timestamps(self.creation_date, self.last_modified)
    }

    /// Returns whether the record was touched after it was created.
    pub fn is_edited(&self) -> bool {
        self.last_modified != self.creation_date
    }
}
