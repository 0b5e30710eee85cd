//! Thread record: a titled grouping of thoughts inside one collection.

use super::collection::CollectionId;
use super::has_text;
use super::validation::{check_timestamps, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable thread identifier.
pub type ThreadId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
    pub id: ThreadId,
    /// Owning collection. Never dangling once persisted.
    pub collection_id: CollectionId,
    pub title: String,
    pub summary: Option<String>,
    pub creation_date: i64,
    pub last_modified: i64,
}

impl Thread {
    pub fn new(
        collection_id: CollectionId,
        title: impl Into<String>,
        summary: Option<String>,
        now: i64,
    ) -> Self {
        Self::with_id(Uuid::new_v4(), collection_id, title, summary, now)
    }

    pub fn with_id(
        id: ThreadId,
        collection_id: CollectionId,
        title: impl Into<String>,
        summary: Option<String>,
        now: i64,
    ) -> Self {
        Self {
            id,
            collection_id,
            title: title.into(),
            summary,
            creation_date: now,
            last_modified: now,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !has_text(&self.title) {
            return Err(ValidationError::BlankTitle);
        }
        check_timestamps(self.creation_date, self.last_modified)
    }

    pub fn is_edited(&self) -> bool {
        self.last_modified != self.creation_date
    }
}
