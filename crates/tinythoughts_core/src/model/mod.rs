//! Domain model for the collection/thread/thought hierarchy.
//!
//! # Responsibility
//! - Define the records persisted by the entity store.
//! - Own the field-level validation every write path must pass.
//!
//! # Invariants
//! - Every record is identified by a UUID that never changes after creation.
//! - `last_modified >= creation_date` for every timestamped record.
//! - Timestamps are Unix epoch milliseconds.

pub mod collection;
pub mod tag;
pub mod thought;
pub mod thread;
pub mod validation;

use std::time::{SystemTime, UNIX_EPOCH};

/// Returns the current wall-clock time in epoch milliseconds.
///
/// Clocks set before 1970 collapse to `0` instead of failing.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

/// Returns `true` when `value` still has text after trimming whitespace.
pub(crate) fn has_text(value: &str) -> bool {
    !value.trim().is_empty()
}
