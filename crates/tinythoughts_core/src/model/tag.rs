//! Tag label and its association with thoughts.

use super::has_text;
use super::thought::ThoughtId;
use super::validation::ValidationError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type TagId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !has_text(&self.name) {
            return Err(ValidationError::BlankTagName);
        }
        Ok(())
    }
}

/// Join row linking one tag to one thought.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagAssociation {
    pub id: Uuid,
    pub tag_id: TagId,
    pub thought_id: ThoughtId,
}
