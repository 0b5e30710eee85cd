//! Thought record: one freeform text entry with an explicit position.
//!
//! # Invariants
//! - `position` orders thoughts inside one thread; values may repeat or
//!   leave gaps. Ties fall back to newest `creation_date` first.

use super::has_text;
use super::thread::ThreadId;
use super::validation::{check_timestamps, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable thought identifier.
pub type ThoughtId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thought {
    pub id: ThoughtId,
    pub thread_id: ThreadId,
    pub content: String,
    /// Zero-based ordering index within the owning thread.
    pub position: i64,
    pub creation_date: i64,
    pub last_modified: i64,
}

impl Thought {
    pub fn new(thread_id: ThreadId, content: impl Into<String>, position: i64, now: i64) -> Self {
        Self::with_id(Uuid::new_v4(), thread_id, content, position, now)
    }

    pub fn with_id(
        id: ThoughtId,
        thread_id: ThreadId,
        content: impl Into<String>,
        position: i64,
        now: i64,
    ) -> Self {
        Self {
            id,
            thread_id,
            content: content.into(),
            position,
            creation_date: now,
            last_modified: now,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !has_text(&self.content) {
            return Err(ValidationError::BlankContent);
        }
        check_timestamps(self.creation_date, self.last_modified)
    }

    pub fn is_edited(&self) -> bool {
        self.last_modified != self.creation_date
    }
}

#[cfg(test)]
mod tests {
    use super::Thought;
    use uuid::Uuid;

    #[test]
    fn blank_content_fails_validation() {
        let thought = Thought::new(Uuid::new_v4(), "   ", 0, 1);
        assert!(thought.validate().is_err());
    }
}
