use rusqlite::Connection;
use tinythoughts_core::db::open_db_in_memory;
use tinythoughts_core::{
    CollectionService, RepoError, SqliteCollectionRepository, SqliteTagRepository,
    SqliteThoughtRepository, SqliteThreadRepository, Tag, TagRepository, Thought, ThoughtService,
    ThreadService,
};
use uuid::Uuid;

struct Fixture {
    collection_id: Uuid,
    sibling_collection_id: Uuid,
    thought_ids: Vec<Uuid>,
    tag: Tag,
}

fn build_fixture(conn: &Connection) -> Fixture {
    let mut collections = CollectionService::new(SqliteCollectionRepository::new(conn));
    let mut threads = ThreadService::new(SqliteThreadRepository::new(conn), None);
    let mut thoughts = ThoughtService::new(SqliteThoughtRepository::new(conn), None);
    let tags = SqliteTagRepository::new(conn);

    let collection = collections.create_collection("Doomed", None).unwrap();
    let sibling = collections.create_collection("Survivor", None).unwrap();
    let tag = Tag::new("idea");
    tags.create_tag(&tag).unwrap();

    let mut thought_ids = Vec::new();
    for title in ["First", "Second"] {
        let thread = threads.create_thread(title, None, collection.id).unwrap();
        for content in ["one", "two"] {
            let thought: Thought = thoughts.create_thought(content, Some(thread.id)).unwrap();
            tags.tag_thought(tag.id, thought.id).unwrap();
            thought_ids.push(thought.id);
        }
    }
    let survivor_thread = threads.create_thread("Safe", None, sibling.id).unwrap();
    let safe = thoughts
        .create_thought("safe", Some(survivor_thread.id))
        .unwrap();
    tags.tag_thought(tag.id, safe.id).unwrap();

    Fixture {
        collection_id: collection.id,
        sibling_collection_id: sibling.id,
        thought_ids,
        tag,
    }
}

fn count(conn: &Connection, sql: &str) -> i64 {
    conn.query_row(sql, [], |row| row.get(0)).unwrap()
}

#[test]
fn deleting_collection_removes_every_descendant() {
    let conn = open_db_in_memory().unwrap();
    let fixture = build_fixture(&conn);
    let mut collections = CollectionService::new(SqliteCollectionRepository::new(&conn));

    collections.delete_collection(fixture.collection_id).unwrap();

    let remaining: Vec<_> = collections.collections().iter().map(|c| c.id).collect();
    assert_eq!(remaining, vec![fixture.sibling_collection_id]);
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM threads;"), 1);
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM thoughts;"), 1);
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM thought_tags;"), 1);
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM tags;"), 1);

    let dangling: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM threads WHERE collection_uuid = ?1;",
            [fixture.collection_id.to_string()],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(dangling, 0);
}

#[test]
fn deleting_thread_removes_tag_links_of_its_thoughts() {
    let conn = open_db_in_memory().unwrap();
    let fixture = build_fixture(&conn);
    let mut threads = ThreadService::new(SqliteThreadRepository::new(&conn), None);
    let tags = SqliteTagRepository::new(&conn);

    let doomed = threads
        .threads()
        .iter()
        .find(|thread| thread.title == "First")
        .map(|thread| thread.id)
        .unwrap();
    let doomed_thoughts = &fixture.thought_ids[..2];
    let kept_thoughts = &fixture.thought_ids[2..];

    threads.delete_thread(doomed).unwrap();

    for id in doomed_thoughts {
        assert!(tags.tags_for_thought(*id).unwrap().is_empty());
        let links: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM thought_tags WHERE thought_uuid = ?1;",
                [id.to_string()],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(links, 0);
    }
    for id in kept_thoughts {
        assert_eq!(tags.tags_for_thought(*id).unwrap(), vec![fixture.tag.clone()]);
    }
    // Two links left in "Second" plus the one under the sibling collection.
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM thought_tags;"), 3);
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM thoughts;"), 3);
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM tags;"), 1);
}

#[test]
fn deleting_thought_removes_its_tag_links_only() {
    let conn = open_db_in_memory().unwrap();
    let fixture = build_fixture(&conn);
    let mut thoughts = ThoughtService::new(SqliteThoughtRepository::new(&conn), None);
    let tags = SqliteTagRepository::new(&conn);

    let target = fixture.thought_ids[0];
    assert_eq!(tags.tags_for_thought(target).unwrap(), vec![fixture.tag.clone()]);

    thoughts.delete_thought(target).unwrap();

    assert!(tags.tags_for_thought(target).unwrap().is_empty());
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM thought_tags;"), 4);
}

#[test]
fn deleting_tag_removes_associations_but_keeps_thoughts() {
    let conn = open_db_in_memory().unwrap();
    let fixture = build_fixture(&conn);
    let tags = SqliteTagRepository::new(&conn);

    tags.delete_tag(fixture.tag.id).unwrap();

    assert_eq!(count(&conn, "SELECT COUNT(*) FROM thought_tags;"), 0);
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM thoughts;"), 5);

    let err = tags.delete_tag(fixture.tag.id).unwrap_err();
    assert!(matches!(err, RepoError::TagNotFound(id) if id == fixture.tag.id));
}

#[test]
fn tagging_twice_returns_existing_association() {
    let conn = open_db_in_memory().unwrap();
    let fixture = build_fixture(&conn);
    let tags = SqliteTagRepository::new(&conn);
    let thought = fixture.thought_ids[1];

    let first = tags.tag_thought(fixture.tag.id, thought).unwrap();
    let second = tags.tag_thought(fixture.tag.id, thought).unwrap();
    assert_eq!(first, second);

    let err = tags.tag_thought(fixture.tag.id, Uuid::new_v4()).unwrap_err();
    assert!(matches!(err, RepoError::ThoughtNotFound(_)));
    let err = tags.create_tag(&Tag::new(" ")).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}
