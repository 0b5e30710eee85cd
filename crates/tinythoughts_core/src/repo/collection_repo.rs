//! Collection repository contract and SQLite implementation.
//!
//! # Invariants
//! - Listing order is `last_modified DESC, uuid ASC`.
//! - Updates never move `last_modified` backwards.
//! - Deleting a collection removes its whole subtree in one transaction.

use super::{
    begin_immediate, cascade, count_u64, parse_uuid, unique_ids, RepoError, RepoResult,
};
use crate::model::collection::{Collection, CollectionId};
use crate::model::has_text;
use crate::model::validation::ValidationError;
use rusqlite::{params, Connection, OptionalExtension, Row};

const COLLECTION_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    summary,
    creation_date,
    last_modified
FROM collections";

/// Repository interface for collection persistence.
pub trait CollectionRepository {
    /// Inserts a fully-formed record as given.
    fn create_collection(&self, collection: &Collection) -> RepoResult<()>;
    /// Replaces name and summary and stamps `last_modified`.
    fn update_collection(
        &self,
        id: CollectionId,
        name: &str,
        summary: Option<&str>,
        now: i64,
    ) -> RepoResult<Collection>;
    fn get_collection(&self, id: CollectionId) -> RepoResult<Option<Collection>>;
    fn list_collections(&self) -> RepoResult<Vec<Collection>>;
    /// Deletes every listed collection with its subtree, or none of them.
    fn delete_collections(&self, ids: &[CollectionId]) -> RepoResult<()>;
    /// Number of threads owned by one collection.
    fn count_threads(&self, id: CollectionId) -> RepoResult<u64>;
}

/// SQLite-backed collection repository.
pub struct SqliteCollectionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCollectionRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl CollectionRepository for SqliteCollectionRepository<'_> {
    fn create_collection(&self, collection: &Collection) -> RepoResult<()> {
        collection.validate()?;

        self.conn.execute(
            "INSERT INTO collections (
                uuid,
                name,
                summary,
                creation_date,
                last_modified
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                collection.id.to_string(),
                collection.name.as_str(),
                collection.summary.as_deref(),
                collection.creation_date,
                collection.last_modified,
            ],
        )?;
        Ok(())
    }

    fn update_collection(
        &self,
        id: CollectionId,
        name: &str,
        summary: Option<&str>,
        now: i64,
    ) -> RepoResult<Collection> {
        if !has_text(name) {
            return Err(ValidationError::BlankName.into());
        }

        let changed = self.conn.execute(
            "UPDATE collections
             SET name = ?2,
                 summary = ?3,
                 last_modified = MAX(last_modified, ?4)
             WHERE uuid = ?1;",
            params![id.to_string(), name, summary, now],
        )?;
        if changed == 0 {
            return Err(RepoError::CollectionNotFound(id));
        }

        self.get_collection(id)?
            .ok_or(RepoError::CollectionNotFound(id))
    }

    fn get_collection(&self, id: CollectionId) -> RepoResult<Option<Collection>> {
        let raw = self
            .conn
            .query_row(
                &format!("{COLLECTION_SELECT_SQL} WHERE uuid = ?1;"),
                [id.to_string()],
                read_collection_row,
            )
            .optional()?;
        raw.map(RawCollection::into_model).transpose()
    }

    fn list_collections(&self) -> RepoResult<Vec<Collection>> {
        let mut stmt = self.conn.prepare(&format!(
            "{COLLECTION_SELECT_SQL} ORDER BY last_modified DESC, uuid ASC;"
        ))?;
        let rows = stmt.query_map([], read_collection_row)?;

        let mut collections = Vec::new();
        for raw in rows {
            collections.push(raw?.into_model()?);
        }
        Ok(collections)
    }

    fn delete_collections(&self, ids: &[CollectionId]) -> RepoResult<()> {
        let tx = begin_immediate(self.conn)?;
        for id in unique_ids(ids) {
            if cascade::delete_collection(&tx, id)? == 0 {
                return Err(RepoError::CollectionNotFound(id));
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn count_threads(&self, id: CollectionId) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM threads WHERE collection_uuid = ?1;",
            [id.to_string()],
            |row| row.get(0),
        )?;
        count_u64(count, "threads.collection_uuid")
    }
}

struct RawCollection {
    uuid: String,
    name: String,
    summary: Option<String>,
    creation_date: i64,
    last_modified: i64,
}

impl RawCollection {
    fn into_model(self) -> RepoResult<Collection> {
        let collection = Collection {
            id: parse_uuid(&self.uuid, "collections.uuid")?,
            name: self.name,
            summary: self.summary,
            creation_date: self.creation_date,
            last_modified: self.last_modified,
        };
        collection
            .validate()
            .map_err(|err| RepoError::InvalidData(format!("collection {}: {err}", collection.id)))?;
        Ok(collection)
    }
}

fn read_collection_row(row: &Row<'_>) -> rusqlite::Result<RawCollection> {
    Ok(RawCollection {
        uuid: row.get("uuid")?,
        name: row.get("name")?,
        summary: row.get("summary")?,
        creation_date: row.get("creation_date")?,
        last_modified: row.get("last_modified")?,
    })
}
