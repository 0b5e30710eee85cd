//! Deterministic sample data for demos and tests.
//!
//! # Invariants
//! - Same `seed` and `now_ms` produce byte-identical rows, ids included.
//! - Seeded rows go through the repositories, so they obey every write
//!   invariant of hand-made data.
//! - All inserts commit together or not at all.

use crate::model::collection::Collection;
use crate::model::thought::Thought;
use crate::model::thread::Thread;
use crate::model::now_epoch_ms;
use crate::repo::collection_repo::{CollectionRepository, SqliteCollectionRepository};
use crate::repo::thought_repo::{SqliteThoughtRepository, ThoughtRepository};
use crate::repo::thread_repo::{SqliteThreadRepository, ThreadRepository};
use crate::repo::RepoResult;
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rusqlite::Connection;
use serde::Serialize;
use uuid::{Builder, Uuid};

const DAY_MS: i64 = 86_400_000;

const SAMPLE_COLLECTIONS: &[(&str, &str)] = &[
    ("Daily Reflections", "My everyday thoughts and observations"),
    ("Project Ideas", "Brainstorming and ideas for future projects"),
    ("Reading Notes", "Notes and thoughts from books I'm reading"),
];

const SAMPLE_THREADS: &[(&str, &str)] = &[
    ("Morning Reflections", "Thoughts captured during morning routine"),
    ("Evening Wind-down", "End of day reflections and thoughts"),
    ("Random Observations", "Miscellaneous observations throughout the day"),
];

/// Inputs that fully determine generated data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedOptions {
    pub seed: u64,
    /// Reference "now"; all generated timestamps are at or before it.
    pub now_ms: i64,
}

impl Default for SeedOptions {
    fn default() -> Self {
        Self {
            seed: 42,
            now_ms: now_epoch_ms(),
        }
    }
}

/// Row counts written by one seeding run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SeedReport {
    pub collections: usize,
    pub threads: usize,
    pub thoughts: usize,
    /// The store already holds the rows of this seed; nothing was written.
    pub skipped: bool,
}

/// Populates three collections with three threads of 2..=4 thoughts each.
///
/// Seeding the same store twice with one seed is a no-op that returns a
/// report with `skipped` set. Other data in the store is left alone.
pub fn seed_sample_data(conn: &mut Connection, options: &SeedOptions) -> RepoResult<SeedReport> {
    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut report = SeedReport::default();

    let tx = conn.transaction()?;
    {
        let collections = SqliteCollectionRepository::new(&tx);
        let threads = SqliteThreadRepository::new(&tx);
        let thoughts = SqliteThoughtRepository::new(&tx);

        if collections.get_collection(first_collection_id(&rng))?.is_some() {
            info!(
                "event=seed module=seed status=skipped seed={} reason=already_seeded",
                options.seed
            );
            return Ok(SeedReport {
                skipped: true,
                ..SeedReport::default()
            });
        }

        for (name, summary) in SAMPLE_COLLECTIONS {
            let created = backdate(&mut rng, options.now_ms, 30);
            let collection =
                Collection::with_id(next_id(&mut rng), *name, Some(summary.to_string()), created);
            collections.create_collection(&collection)?;
            report.collections += 1;

            for (title, thread_summary) in SAMPLE_THREADS {
                let created = backdate(&mut rng, options.now_ms, 15);
                let thread = Thread::with_id(
                    next_id(&mut rng),
                    collection.id,
                    *title,
                    Some(thread_summary.to_string()),
                    created,
                );
                threads.create_thread(&thread)?;
                report.threads += 1;

                let count: i64 = rng.gen_range(2..=4);
                for index in 0..count {
                    let created = backdate(&mut rng, options.now_ms, 10);
                    let content = format!(
                        "Sample thought #{} in {}. This is a sample thought for preview purposes.",
                        index + 1,
                        thread.title
                    );
                    let thought =
                        Thought::with_id(next_id(&mut rng), thread.id, content, index, created);
                    thoughts.create_thought(&thought)?;
                    report.thoughts += 1;
                }
            }
        }
    }
    tx.commit()?;

    info!(
        "event=seed module=seed status=ok seed={} collections={} threads={} thoughts={}",
        options.seed, report.collections, report.threads, report.thoughts
    );
    Ok(report)
}

fn backdate(rng: &mut StdRng, now_ms: i64, max_days: i64) -> i64 {
    now_ms - rng.gen_range(0..=max_days * DAY_MS)
}

/// Id the first sample collection will get, without advancing `rng`.
fn first_collection_id(rng: &StdRng) -> Uuid {
    let mut lookahead = rng.clone();
    backdate(&mut lookahead, 0, 30);
    next_id(&mut lookahead)
}

fn next_id(rng: &mut StdRng) -> Uuid {
    Builder::from_random_bytes(rng.gen()).into_uuid()
}

#[cfg(test)]
mod tests {
    use super::{next_id, seed_sample_data, SeedOptions};
    use crate::db::open_db_in_memory;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn generated_ids_are_version_four() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(next_id(&mut rng).get_version_num(), 4);
    }

    #[test]
    fn seeding_writes_expected_shape() {
        let mut conn = open_db_in_memory().unwrap();
        let report = seed_sample_data(
            &mut conn,
            &SeedOptions {
                seed: 1,
                now_ms: 1_700_000_000_000,
            },
        )
        .unwrap();

        assert_eq!(report.collections, 3);
        assert_eq!(report.threads, 9);
        assert!((18..=36).contains(&report.thoughts));
    }
}
