//! Child-first delete statements shared by the repositories.
//!
//! Callers run these inside a transaction. Foreign keys carry no
//! `ON DELETE` action, so deleting a parent before its children fails the
//! statement instead of leaving orphans behind.

use super::RepoResult;
use rusqlite::Connection;
use uuid::Uuid;

/// Removes one thought and its tag links. Returns deleted thought rows.
pub(crate) fn delete_thought(conn: &Connection, thought_id: Uuid) -> RepoResult<usize> {
    let id = thought_id.to_string();
    conn.execute("DELETE FROM thought_tags WHERE thought_uuid = ?1;", [&id])?;
    Ok(conn.execute("DELETE FROM thoughts WHERE uuid = ?1;", [&id])?)
}

/// Removes one thread, its thoughts and their tag links.
pub(crate) fn delete_thread(conn: &Connection, thread_id: Uuid) -> RepoResult<usize> {
    let id = thread_id.to_string();
    conn.execute(
        "DELETE FROM thought_tags
         WHERE thought_uuid IN (
            SELECT uuid FROM thoughts WHERE thread_uuid = ?1
         );",
        [&id],
    )?;
    conn.execute("DELETE FROM thoughts WHERE thread_uuid = ?1;", [&id])?;
    Ok(conn.execute("DELETE FROM threads WHERE uuid = ?1;", [&id])?)
}

/// Removes one collection with every thread, thought and tag link below it.
pub(crate) fn delete_collection(conn: &Connection, collection_id: Uuid) -> RepoResult<usize> {
    let id = collection_id.to_string();
    conn.execute(
        "DELETE FROM thought_tags
         WHERE thought_uuid IN (
            SELECT t.uuid
            FROM thoughts t
            INNER JOIN threads th ON th.uuid = t.thread_uuid
            WHERE th.collection_uuid = ?1
         );",
        [&id],
    )?;
    conn.execute(
        "DELETE FROM thoughts
         WHERE thread_uuid IN (
            SELECT uuid FROM threads WHERE collection_uuid = ?1
         );",
        [&id],
    )?;
    conn.execute("DELETE FROM threads WHERE collection_uuid = ?1;", [&id])?;
    Ok(conn.execute("DELETE FROM collections WHERE uuid = ?1;", [&id])?)
}

/// Removes one tag and every association pointing at it.
pub(crate) fn delete_tag(conn: &Connection, tag_id: Uuid) -> RepoResult<usize> {
    let id = tag_id.to_string();
    conn.execute("DELETE FROM thought_tags WHERE tag_uuid = ?1;", [&id])?;
    Ok(conn.execute("DELETE FROM tags WHERE uuid = ?1;", [&id])?)
}
