use tinythoughts_core::db::open_db_in_memory;
use tinythoughts_core::{
    seed_sample_data, CollectionService, SeedOptions, SqliteCollectionRepository,
    SqliteThoughtRepository, SqliteThreadRepository, ThoughtService, ThreadService,
};

const NOW_MS: i64 = 1_750_000_000_000;

fn snapshot(seed: u64) -> (Vec<String>, Vec<String>) {
    let mut conn = open_db_in_memory().unwrap();
    seed_sample_data(&mut conn, &SeedOptions { seed, now_ms: NOW_MS }).unwrap();

    let collections = CollectionService::new(SqliteCollectionRepository::new(&conn));
    let thoughts = ThoughtService::new(SqliteThoughtRepository::new(&conn), None);
    let collection_rows = collections
        .collections()
        .iter()
        .map(|c| format!("{}|{}|{}", c.id, c.name, c.creation_date))
        .collect();
    let thought_rows = thoughts
        .thoughts()
        .iter()
        .map(|t| format!("{}|{}|{}|{}", t.id, t.thread_id, t.position, t.content))
        .collect();
    (collection_rows, thought_rows)
}

#[test]
fn same_seed_produces_identical_data() {
    assert_eq!(snapshot(7), snapshot(7));
    assert_ne!(snapshot(7), snapshot(8));
}

#[test]
fn seeded_rows_follow_model_invariants() {
    let mut conn = open_db_in_memory().unwrap();
    let report =
        seed_sample_data(&mut conn, &SeedOptions { seed: 3, now_ms: NOW_MS }).unwrap();

    let collections = CollectionService::new(SqliteCollectionRepository::new(&conn));
    let threads = ThreadService::new(SqliteThreadRepository::new(&conn), None);
    let thoughts = ThoughtService::new(SqliteThoughtRepository::new(&conn), None);

    assert_eq!(collections.collections().len(), report.collections);
    assert_eq!(threads.threads().len(), report.threads);
    assert_eq!(thoughts.thoughts().len(), report.thoughts);

    let names: Vec<_> = collections
        .collections()
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    for expected in ["Daily Reflections", "Project Ideas", "Reading Notes"] {
        assert!(names.contains(&expected));
    }

    for collection in collections.collections() {
        assert!(collection.creation_date <= NOW_MS);
        assert!(!collection.is_edited());
        assert_eq!(collections.thread_count(collection.id).unwrap(), 3);
    }

    for thread in threads.threads() {
        let in_thread = thoughts.list_thoughts(Some(thread.id)).unwrap();
        assert!((2..=4).contains(&in_thread.len()));
        let mut positions: Vec<_> = in_thread.iter().map(|t| t.position).collect();
        positions.sort_unstable();
        assert_eq!(positions, (0..in_thread.len() as i64).collect::<Vec<_>>());
        assert!(in_thread[0]
            .content
            .ends_with("This is a sample thought for preview purposes."));
    }
}

#[test]
fn reseeding_with_same_seed_is_skipped() {
    let mut conn = open_db_in_memory().unwrap();
    let first = seed_sample_data(&mut conn, &SeedOptions { seed: 42, now_ms: NOW_MS }).unwrap();
    assert!(!first.skipped);

    let again = seed_sample_data(
        &mut conn,
        &SeedOptions {
            seed: 42,
            now_ms: NOW_MS + 60_000,
        },
    )
    .unwrap();
    assert!(again.skipped);
    assert_eq!((again.collections, again.threads, again.thoughts), (0, 0, 0));

    let collections = CollectionService::new(SqliteCollectionRepository::new(&conn));
    assert_eq!(collections.collections().len(), first.collections);

    let other = seed_sample_data(&mut conn, &SeedOptions { seed: 43, now_ms: NOW_MS }).unwrap();
    assert!(!other.skipped);
    let collections = CollectionService::new(SqliteCollectionRepository::new(&conn));
    assert_eq!(collections.collections().len(), first.collections + other.collections);
}
