//! Repository layer: SQLite data access per entity kind.
//!
//! # Responsibility
//! - Keep every SQL statement behind one trait per entity kind.
//! - Translate storage failures and missing rows into `RepoError`.
//! - Run cascading deletes as explicit child-first statements.
//!
//! # Invariants
//! - Writes validate records before touching SQL.
//! - Multi-statement writes run in one immediate transaction, so a failure
//!   leaves the store exactly as it was.
//! - Read paths reject unparseable rows instead of masking them.

pub mod cascade;
pub mod collection_repo;
pub mod tag_repo;
pub mod thought_repo;
pub mod thread_repo;

use crate::db::DbError;
use crate::model::collection::CollectionId;
use crate::model::tag::TagId;
use crate::model::thought::ThoughtId;
use crate::model::thread::ThreadId;
use crate::model::validation::ValidationError;
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors from repository reads and writes.
#[derive(Debug)]
pub enum RepoError {
    /// Record failed field validation; nothing was written.
    Validation(ValidationError),
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    CollectionNotFound(CollectionId),
    ThreadNotFound(ThreadId),
    ThoughtNotFound(ThoughtId),
    TagNotFound(TagId),
    /// Persisted row cannot be converted into a model record.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::CollectionNotFound(id) => write!(f, "collection not found: {id}"),
            Self::ThreadNotFound(id) => write!(f, "thread not found: {id}"),
            Self::ThoughtNotFound(id) => write!(f, "thought not found: {id}"),
            Self::TagNotFound(id) => write!(f, "tag not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid stored data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

pub(crate) fn parse_uuid(value: &str, column: &'static str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}

pub(crate) fn begin_immediate(conn: &Connection) -> RepoResult<Transaction<'_>> {
    Ok(Transaction::new_unchecked(
        conn,
        TransactionBehavior::Immediate,
    )?)
}

/// Drops repeated ids while keeping first-seen order.
pub(crate) fn unique_ids(ids: &[Uuid]) -> Vec<Uuid> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

/// Returns the first id that repeats an earlier one.
pub(crate) fn first_duplicate(ids: &[Uuid]) -> Option<Uuid> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().copied().find(|id| !seen.insert(*id))
}

pub(crate) fn row_exists(conn: &Connection, sql: &str, id: Uuid) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(sql, [id.to_string()], |row| row.get(0))?;
    Ok(exists == 1)
}

pub(crate) fn count_u64(value: i64, column: &'static str) -> RepoResult<u64> {
    u64::try_from(value)
        .map_err(|_| RepoError::InvalidData(format!("negative count `{value}` for {column}")))
}
