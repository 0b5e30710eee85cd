//! Field validation errors shared by all entity kinds.

use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Reasons a record is rejected before it reaches the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Collection name is blank after trim.
    BlankName,
    /// Thread title is blank after trim.
    BlankTitle,
    /// Thought content is blank after trim.
    BlankContent,
    /// Tag name is blank after trim.
    BlankTagName,
    /// A thought was created with no target thread.
    MissingThread,
    /// An ordering listed the same record more than once.
    DuplicateId(Uuid),
    /// `last_modified` would precede `creation_date`.
    TimestampOrder {
        creation_date: i64,
        last_modified: i64,
    },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "collection name must not be blank"),
            Self::BlankTitle => write!(f, "thread title must not be blank"),
            Self::BlankContent => write!(f, "thought content must not be blank"),
            Self::BlankTagName => write!(f, "tag name must not be blank"),
            Self::MissingThread => write!(f, "thought requires a target thread"),
            Self::DuplicateId(id) => write!(f, "id {id} appears more than once"),
            Self::TimestampOrder {
                creation_date,
                last_modified,
            } => write!(
                f,
                "last_modified ({last_modified}) must not be earlier than creation_date ({creation_date})"
            ),
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn check_timestamps(
    creation_date: i64,
    last_modified: i64,
) -> Result<(), ValidationError> {
    if last_modified < creation_date {
        return Err(ValidationError::TimestampOrder {
            creation_date,
            last_modified,
        });
    }
    Ok(())
}
