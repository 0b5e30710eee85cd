//! Tag storage and thought/tag associations.
//!
//! Tags have no façade service; this repository exists so the join table
//! keeps referential integrity when thoughts or tags go away.

use super::{begin_immediate, cascade, parse_uuid, row_exists, RepoError, RepoResult};
use crate::model::tag::{Tag, TagAssociation, TagId};
use crate::model::thought::ThoughtId;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

pub trait TagRepository {
    fn create_tag(&self, tag: &Tag) -> RepoResult<()>;
    /// Links a tag to a thought. Linking twice returns the existing row.
    fn tag_thought(&self, tag_id: TagId, thought_id: ThoughtId) -> RepoResult<TagAssociation>;
    fn tags_for_thought(&self, thought_id: ThoughtId) -> RepoResult<Vec<Tag>>;
    /// Deletes a tag and all of its associations.
    fn delete_tag(&self, id: TagId) -> RepoResult<()>;
}

pub struct SqliteTagRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTagRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TagRepository for SqliteTagRepository<'_> {
    fn create_tag(&self, tag: &Tag) -> RepoResult<()> {
        tag.validate()?;
        self.conn.execute(
            "INSERT INTO tags (uuid, name) VALUES (?1, ?2);",
            params![tag.id.to_string(), tag.name.as_str()],
        )?;
        Ok(())
    }

    fn tag_thought(&self, tag_id: TagId, thought_id: ThoughtId) -> RepoResult<TagAssociation> {
        if !row_exists(
            self.conn,
            "SELECT EXISTS(SELECT 1 FROM tags WHERE uuid = ?1);",
            tag_id,
        )? {
            return Err(RepoError::TagNotFound(tag_id));
        }
        if !row_exists(
            self.conn,
            "SELECT EXISTS(SELECT 1 FROM thoughts WHERE uuid = ?1);",
            thought_id,
        )? {
            return Err(RepoError::ThoughtNotFound(thought_id));
        }

        let existing: Option<String> = self
            .conn
            .query_row(
                "SELECT uuid FROM thought_tags WHERE tag_uuid = ?1 AND thought_uuid = ?2;",
                params![tag_id.to_string(), thought_id.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        if let Some(uuid) = existing {
            return Ok(TagAssociation {
                id: parse_uuid(&uuid, "thought_tags.uuid")?,
                tag_id,
                thought_id,
            });
        }

        let association = TagAssociation {
            id: Uuid::new_v4(),
            tag_id,
            thought_id,
        };
        self.conn.execute(
            "INSERT INTO thought_tags (uuid, tag_uuid, thought_uuid) VALUES (?1, ?2, ?3);",
            params![
                association.id.to_string(),
                tag_id.to_string(),
                thought_id.to_string(),
            ],
        )?;
        Ok(association)
    }

    fn tags_for_thought(&self, thought_id: ThoughtId) -> RepoResult<Vec<Tag>> {
        let mut stmt = self.conn.prepare(
            "SELECT t.uuid, t.name
             FROM tags t
             INNER JOIN thought_tags tt ON tt.tag_uuid = t.uuid
             WHERE tt.thought_uuid = ?1
             ORDER BY t.name ASC, t.uuid ASC;",
        )?;
        let rows = stmt.query_map([thought_id.to_string()], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut tags = Vec::new();
        for row in rows {
            let (uuid, name) = row?;
            tags.push(Tag {
                id: parse_uuid(&uuid, "tags.uuid")?,
                name,
            });
        }
        Ok(tags)
    }

    fn delete_tag(&self, id: TagId) -> RepoResult<()> {
        let tx = begin_immediate(self.conn)?;
        if cascade::delete_tag(&tx, id)? == 0 {
            return Err(RepoError::TagNotFound(id));
        }
        tx.commit()?;
        Ok(())
    }
}
