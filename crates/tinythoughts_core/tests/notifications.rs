use tinythoughts_core::db::open_db_in_memory;
use tinythoughts_core::{
    Collection, CollectionRepository, CollectionService, SqliteCollectionRepository,
    SqliteThoughtRepository, SqliteThreadRepository, ThoughtService, ThreadService,
};

#[test]
fn successful_writes_publish_refreshed_lists() {
    let conn = open_db_in_memory().unwrap();
    let mut collections = CollectionService::new(SqliteCollectionRepository::new(&conn));
    let updates = collections.subscribe();

    let created = collections.create_collection("Inbox", None).unwrap();
    let published = updates.try_recv().unwrap();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].id, created.id);

    collections.delete_collection(created.id).unwrap();
    assert!(updates.try_recv().unwrap().is_empty());
}

#[test]
fn rejected_writes_publish_nothing() {
    let conn = open_db_in_memory().unwrap();
    let mut collections = CollectionService::new(SqliteCollectionRepository::new(&conn));
    collections.create_collection("Existing", None).unwrap();
    let updates = collections.subscribe();

    assert!(collections.create_collection("", None).is_err());
    assert!(updates.try_recv().is_err());
    assert_eq!(collections.collections().len(), 1);
}

#[test]
fn store_failure_keeps_previous_list() {
    let conn = open_db_in_memory().unwrap();
    let collection = Collection::new("Home", None, 1_000);
    SqliteCollectionRepository::new(&conn)
        .create_collection(&collection)
        .unwrap();

    let mut threads = ThreadService::new(SqliteThreadRepository::new(&conn), None);
    threads.create_thread("Chores", None, collection.id).unwrap();
    let mut thoughts = ThoughtService::new(SqliteThoughtRepository::new(&conn), None);
    let updates = thoughts.subscribe();
    let before = threads.threads().to_vec();

    conn.execute_batch("DROP TABLE thought_tags; DROP TABLE thoughts;")
        .unwrap();

    let err = thoughts
        .create_thought("lost", Some(before[0].id))
        .unwrap_err();
    assert!(matches!(err, tinythoughts_core::ServiceError::Store(_)));
    assert!(updates.try_recv().is_err());
    assert!(thoughts.thoughts().is_empty());
    assert!(thoughts.refresh().is_err());
    assert_eq!(threads.threads(), before.as_slice());
}
