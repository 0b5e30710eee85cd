//! Thought repository contract and SQLite implementation.
//!
//! # Invariants
//! - A thought is only inserted or moved under an existing thread.
//! - Listing order is `position ASC, creation_date DESC, uuid ASC`.
//! - Next position within a thread is `MAX(position) + 1`, or `0` for an
//!   empty thread. Two writers computing it from the same state may end up
//!   with equal positions; ordering then falls back to `creation_date`.

use super::{
    begin_immediate, cascade, first_duplicate, parse_uuid, row_exists, unique_ids, RepoError,
    RepoResult,
};
use crate::model::has_text;
use crate::model::thought::{Thought, ThoughtId};
use crate::model::thread::ThreadId;
use crate::model::validation::ValidationError;
use rusqlite::{params, Connection, OptionalExtension, Row};

const THOUGHT_SELECT_SQL: &str = "SELECT
    uuid,
    thread_uuid,
    content,
    position,
    creation_date,
    last_modified
FROM thoughts";

const THREAD_EXISTS_SQL: &str = "SELECT EXISTS(SELECT 1 FROM threads WHERE uuid = ?1);";

/// Repository interface for thought persistence.
pub trait ThoughtRepository {
    /// Returns the position a thought appended to `thread_id` would get.
    fn next_position(&self, thread_id: ThreadId) -> RepoResult<i64>;
    fn create_thought(&self, thought: &Thought) -> RepoResult<()>;
    fn update_thought(&self, id: ThoughtId, content: &str, now: i64) -> RepoResult<Thought>;
    /// Reparents a thought and appends it at the end of the destination.
    fn move_thought(&self, id: ThoughtId, thread_id: ThreadId, now: i64) -> RepoResult<Thought>;
    /// Sets `position = index` for every id, in one transaction.
    /// Repeated ids are rejected before anything is written.
    fn reorder_thoughts(&self, ordered_ids: &[ThoughtId], now: i64) -> RepoResult<()>;
    fn get_thought(&self, id: ThoughtId) -> RepoResult<Option<Thought>>;
    fn list_thoughts(&self, thread_id: Option<ThreadId>) -> RepoResult<Vec<Thought>>;
    fn delete_thoughts(&self, ids: &[ThoughtId]) -> RepoResult<()>;
}

/// SQLite-backed thought repository.
pub struct SqliteThoughtRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteThoughtRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ThoughtRepository for SqliteThoughtRepository<'_> {
    fn next_position(&self, thread_id: ThreadId) -> RepoResult<i64> {
        next_position(self.conn, thread_id)
    }

    fn create_thought(&self, thought: &Thought) -> RepoResult<()> {
        thought.validate()?;
        ensure_thread_exists(self.conn, thought.thread_id)?;

        self.conn.execute(
            "INSERT INTO thoughts (
                uuid,
                thread_uuid,
                content,
                position,
                creation_date,
                last_modified
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                thought.id.to_string(),
                thought.thread_id.to_string(),
                thought.content.as_str(),
                thought.position,
                thought.creation_date,
                thought.last_modified,
            ],
        )?;
        Ok(())
    }

    fn update_thought(&self, id: ThoughtId, content: &str, now: i64) -> RepoResult<Thought> {
        if !has_text(content) {
            return Err(ValidationError::BlankContent.into());
        }

        let changed = self.conn.execute(
            "UPDATE thoughts
             SET content = ?2,
                 last_modified = MAX(last_modified, ?3)
             WHERE uuid = ?1;",
            params![id.to_string(), content, now],
        )?;
        if changed == 0 {
            return Err(RepoError::ThoughtNotFound(id));
        }
        self.get_thought(id)?.ok_or(RepoError::ThoughtNotFound(id))
    }

    fn move_thought(&self, id: ThoughtId, thread_id: ThreadId, now: i64) -> RepoResult<Thought> {
        let tx = begin_immediate(self.conn)?;
        ensure_thread_exists(&tx, thread_id)?;

        let position = next_position(&tx, thread_id)?;
        let changed = tx.execute(
            "UPDATE thoughts
             SET thread_uuid = ?2,
                 position = ?3,
                 last_modified = MAX(last_modified, ?4)
             WHERE uuid = ?1;",
            params![id.to_string(), thread_id.to_string(), position, now],
        )?;
        if changed == 0 {
            return Err(RepoError::ThoughtNotFound(id));
        }
        tx.commit()?;

        self.get_thought(id)?.ok_or(RepoError::ThoughtNotFound(id))
    }

    fn reorder_thoughts(&self, ordered_ids: &[ThoughtId], now: i64) -> RepoResult<()> {
        if let Some(id) = first_duplicate(ordered_ids) {
            return Err(ValidationError::DuplicateId(id).into());
        }

        let tx = begin_immediate(self.conn)?;
        for (index, id) in ordered_ids.iter().enumerate() {
            let changed = tx.execute(
                "UPDATE thoughts
                 SET position = ?2,
                     last_modified = MAX(last_modified, ?3)
                 WHERE uuid = ?1;",
                params![id.to_string(), index as i64, now],
            )?;
            if changed == 0 {
                return Err(RepoError::ThoughtNotFound(*id));
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn get_thought(&self, id: ThoughtId) -> RepoResult<Option<Thought>> {
        let raw = self
            .conn
            .query_row(
                &format!("{THOUGHT_SELECT_SQL} WHERE uuid = ?1;"),
                [id.to_string()],
                read_thought_row,
            )
            .optional()?;
        raw.map(RawThought::into_model).transpose()
    }

    fn list_thoughts(&self, thread_id: Option<ThreadId>) -> RepoResult<Vec<Thought>> {
        let raw_rows = match thread_id {
            Some(thread_id) => {
                let mut stmt = self.conn.prepare(&format!(
                    "{THOUGHT_SELECT_SQL}
                     WHERE thread_uuid = ?1
                     ORDER BY position ASC, creation_date DESC, uuid ASC;"
                ))?;
                let rows = stmt.query_map([thread_id.to_string()], read_thought_row)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
            None => {
                let mut stmt = self.conn.prepare(&format!(
                    "{THOUGHT_SELECT_SQL}
                     ORDER BY position ASC, creation_date DESC, uuid ASC;"
                ))?;
                let rows = stmt.query_map([], read_thought_row)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
        };

        raw_rows.into_iter().map(RawThought::into_model).collect()
    }

    fn delete_thoughts(&self, ids: &[ThoughtId]) -> RepoResult<()> {
        let tx = begin_immediate(self.conn)?;
        for id in unique_ids(ids) {
            if cascade::delete_thought(&tx, id)? == 0 {
                return Err(RepoError::ThoughtNotFound(id));
            }
        }
        tx.commit()?;
        Ok(())
    }
}

fn next_position(conn: &Connection, thread_id: ThreadId) -> RepoResult<i64> {
    let next = conn.query_row(
        "SELECT COALESCE(MAX(position), -1) + 1
         FROM thoughts
         WHERE thread_uuid = ?1;",
        [thread_id.to_string()],
        |row| row.get(0),
    )?;
    Ok(next)
}

fn ensure_thread_exists(conn: &Connection, thread_id: ThreadId) -> RepoResult<()> {
    if !row_exists(conn, THREAD_EXISTS_SQL, thread_id)? {
        return Err(RepoError::ThreadNotFound(thread_id));
    }
    Ok(())
}

struct RawThought {
    uuid: String,
    thread_uuid: String,
    content: String,
    position: i64,
    creation_date: i64,
    last_modified: i64,
}

impl RawThought {
    fn into_model(self) -> RepoResult<Thought> {
        let thought = Thought {
            id: parse_uuid(&self.uuid, "thoughts.uuid")?,
            thread_id: parse_uuid(&self.thread_uuid, "thoughts.thread_uuid")?,
            content: self.content,
            position: self.position,
            creation_date: self.creation_date,
            last_modified: self.last_modified,
        };
        thought
            .validate()
            .map_err(|err| RepoError::InvalidData(format!("thought {}: {err}", thought.id)))?;
        Ok(thought)
    }
}

fn read_thought_row(row: &Row<'_>) -> rusqlite::Result<RawThought> {
    Ok(RawThought {
        uuid: row.get("uuid")?,
        thread_uuid: row.get("thread_uuid")?,
        content: row.get("content")?,
        position: row.get("position")?,
        creation_date: row.get("creation_date")?,
        last_modified: row.get("last_modified")?,
    })
}
