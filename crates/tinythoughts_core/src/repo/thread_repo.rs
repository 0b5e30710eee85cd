//! Thread repository contract and SQLite implementation.
//!
//! # Invariants
//! - A thread is only inserted or moved under an existing collection.
//! - Listing order is `last_modified DESC, uuid ASC`, optionally scoped to
//!   one collection.

use super::{
    begin_immediate, cascade, count_u64, parse_uuid, row_exists, unique_ids, RepoError,
    RepoResult,
};
use crate::model::collection::CollectionId;
use crate::model::has_text;
use crate::model::thread::{Thread, ThreadId};
use crate::model::validation::ValidationError;
use rusqlite::{params, Connection, OptionalExtension, Row};

const THREAD_SELECT_SQL: &str = "SELECT
    uuid,
    collection_uuid,
    title,
    summary,
    creation_date,
    last_modified
FROM threads";

const COLLECTION_EXISTS_SQL: &str = "SELECT EXISTS(SELECT 1 FROM collections WHERE uuid = ?1);";

/// Repository interface for thread persistence.
pub trait ThreadRepository {
    fn create_thread(&self, thread: &Thread) -> RepoResult<()>;
    fn update_thread(
        &self,
        id: ThreadId,
        title: &str,
        summary: Option<&str>,
        now: i64,
    ) -> RepoResult<Thread>;
    /// Reparents a thread and stamps `last_modified`.
    fn move_thread(&self, id: ThreadId, collection_id: CollectionId, now: i64)
        -> RepoResult<Thread>;
    fn get_thread(&self, id: ThreadId) -> RepoResult<Option<Thread>>;
    /// Lists all threads, or only those of `collection_id` when given.
    fn list_threads(&self, collection_id: Option<CollectionId>) -> RepoResult<Vec<Thread>>;
    fn delete_threads(&self, ids: &[ThreadId]) -> RepoResult<()>;
    /// Number of thoughts owned by one thread.
    fn count_thoughts(&self, id: ThreadId) -> RepoResult<u64>;
}

/// SQLite-backed thread repository.
pub struct SqliteThreadRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteThreadRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn ensure_collection_exists(&self, collection_id: CollectionId) -> RepoResult<()> {
        if !row_exists(self.conn, COLLECTION_EXISTS_SQL, collection_id)? {
            return Err(RepoError::CollectionNotFound(collection_id));
        }
        Ok(())
    }
}

impl ThreadRepository for SqliteThreadRepository<'_> {
    fn create_thread(&self, thread: &Thread) -> RepoResult<()> {
        thread.validate()?;
        self.ensure_collection_exists(thread.collection_id)?;

        self.conn.execute(
            "INSERT INTO threads (
                uuid,
                collection_uuid,
                title,
                summary,
                creation_date,
                last_modified
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                thread.id.to_string(),
                thread.collection_id.to_string(),
                thread.title.as_str(),
                thread.summary.as_deref(),
                thread.creation_date,
                thread.last_modified,
            ],
        )?;
        Ok(())
    }

    fn update_thread(
        &self,
        id: ThreadId,
        title: &str,
        summary: Option<&str>,
        now: i64,
    ) -> RepoResult<Thread> {
        if !has_text(title) {
            return Err(ValidationError::BlankTitle.into());
        }

        let changed = self.conn.execute(
            "UPDATE threads
             SET title = ?2,
                 summary = ?3,
                 last_modified = MAX(last_modified, ?4)
             WHERE uuid = ?1;",
            params![id.to_string(), title, summary, now],
        )?;
        if changed == 0 {
            return Err(RepoError::ThreadNotFound(id));
        }
        self.get_thread(id)?.ok_or(RepoError::ThreadNotFound(id))
    }

    fn move_thread(
        &self,
        id: ThreadId,
        collection_id: CollectionId,
        now: i64,
    ) -> RepoResult<Thread> {
        self.ensure_collection_exists(collection_id)?;

        let changed = self.conn.execute(
            "UPDATE threads
             SET collection_uuid = ?2,
                 last_modified = MAX(last_modified, ?3)
             WHERE uuid = ?1;",
            params![id.to_string(), collection_id.to_string(), now],
        )?;
        if changed == 0 {
            return Err(RepoError::ThreadNotFound(id));
        }
        self.get_thread(id)?.ok_or(RepoError::ThreadNotFound(id))
    }

    fn get_thread(&self, id: ThreadId) -> RepoResult<Option<Thread>> {
        let raw = self
            .conn
            .query_row(
                &format!("{THREAD_SELECT_SQL} WHERE uuid = ?1;"),
                [id.to_string()],
                read_thread_row,
            )
            .optional()?;
        raw.map(RawThread::into_model).transpose()
    }

    fn list_threads(&self, collection_id: Option<CollectionId>) -> RepoResult<Vec<Thread>> {
        let raw_rows = match collection_id {
            Some(collection_id) => {
                let mut stmt = self.conn.prepare(&format!(
                    "{THREAD_SELECT_SQL}
                     WHERE collection_uuid = ?1
                     ORDER BY last_modified DESC, uuid ASC;"
                ))?;
                let rows = stmt.query_map([collection_id.to_string()], read_thread_row)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
            None => {
                let mut stmt = self.conn.prepare(&format!(
                    "{THREAD_SELECT_SQL} ORDER BY last_modified DESC, uuid ASC;"
                ))?;
                let rows = stmt.query_map([], read_thread_row)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
        };

        raw_rows.into_iter().map(RawThread::into_model).collect()
    }

    fn delete_threads(&self, ids: &[ThreadId]) -> RepoResult<()> {
        let tx = begin_immediate(self.conn)?;
        for id in unique_ids(ids) {
            if cascade::delete_thread(&tx, id)? == 0 {
                return Err(RepoError::ThreadNotFound(id));
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn count_thoughts(&self, id: ThreadId) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM thoughts WHERE thread_uuid = ?1;",
            [id.to_string()],
            |row| row.get(0),
        )?;
        count_u64(count, "thoughts.thread_uuid")
    }
}

struct RawThread {
    uuid: String,
    collection_uuid: String,
    title: String,
    summary: Option<String>,
    creation_date: i64,
    last_modified: i64,
}

impl RawThread {
    fn into_model(self) -> RepoResult<Thread> {
        let thread = Thread {
            id: parse_uuid(&self.uuid, "threads.uuid")?,
            collection_id: parse_uuid(&self.collection_uuid, "threads.collection_uuid")?,
            title: self.title,
            summary: self.summary,
            creation_date: self.creation_date,
            last_modified: self.last_modified,
        };
        thread
            .validate()
            .map_err(|err| RepoError::InvalidData(format!("thread {}: {err}", thread.id)))?;
        Ok(thread)
    }
}

fn read_thread_row(row: &Row<'_>) -> rusqlite::Result<RawThread> {
    Ok(RawThread {
        uuid: row.get("uuid")?,
        collection_uuid: row.get("collection_uuid")?,
        title: row.get("title")?,
        summary: row.get("summary")?,
        creation_date: row.get("creation_date")?,
        last_modified: row.get("last_modified")?,
    })
}
