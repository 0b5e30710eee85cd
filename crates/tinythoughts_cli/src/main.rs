//! TinyThoughts command-line entry point.
//!
//! # Responsibility
//! - Map collection/thread/thought CRUD onto subcommands.
//! - Resolve config, logging and the store before dispatching.
//!
//! # Invariants
//! - Every successful command prints exactly one JSON document on stdout.
//! - Logging failures never block a command; they are reported on stderr.

mod args;

use anyhow::{Context, Result};
use args::{Cli, CollectionCommand, Commands, ThoughtCommand, ThreadCommand};
use clap::Parser;
use rusqlite::Connection;
use serde::Serialize;
use std::collections::HashSet;
use tinythoughts_core::{
    init_logging, open_db, seed_sample_data, Collection, CollectionService, CoreConfig,
    SeedOptions, SqliteCollectionRepository, SqliteThoughtRepository, SqliteThreadRepository,
    Thread, ThoughtService, ThreadService,
};
use uuid::Uuid;

fn main() {
    if let Err(err) = run(Cli::parse()) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = CoreConfig::load(cli.config.as_deref()).context("failed to load config")?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    if let Err(err) = init_logging(&config.log_level, &config.log_dir) {
        eprintln!("warning: logging disabled: {err}");
    }

    if let Some(parent) = config.db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    let mut conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open {}", config.db_path.display()))?;
    log::info!(
        "event=cli_start module=cli status=ok db={}",
        config.db_path.display()
    );

    match cli.command {
        Commands::Collections(cmd) => collections(&conn, cmd),
        Commands::Threads(cmd) => threads(&conn, cmd),
        Commands::Thoughts(cmd) => thoughts(&conn, cmd),
        Commands::Seed { seed } => {
            let options = SeedOptions {
                seed,
                ..SeedOptions::default()
            };
            let report = seed_sample_data(&mut conn, &options).context("seeding failed")?;
            print_json(&report)
        }
    }
}

/// Collection row as printed by `collections list`.
#[derive(Serialize)]
struct CollectionView<'a> {
    #[serde(flatten)]
    collection: &'a Collection,
    thread_count: u64,
}

/// Thread row as printed by `threads list`.
#[derive(Serialize)]
struct ThreadView<'a> {
    #[serde(flatten)]
    thread: &'a Thread,
    thought_count: u64,
}

fn collections(conn: &Connection, cmd: CollectionCommand) -> Result<()> {
    let mut service = CollectionService::new(SqliteCollectionRepository::new(conn));
    match cmd {
        CollectionCommand::List => {
            let rows = service
                .collections()
                .iter()
                .map(|collection| -> Result<CollectionView<'_>> {
                    Ok(CollectionView {
                        collection,
                        thread_count: service.thread_count(collection.id)?,
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            print_json(&rows)
        }
        CollectionCommand::Add { name, summary } => {
            print_json(&service.create_collection(&name, summary.as_deref())?)
        }
        CollectionCommand::Edit { id, name, summary } => {
            print_json(&service.update_collection(id, &name, summary.as_deref())?)
        }
        CollectionCommand::Delete { ids } => {
            service.delete_collections(&ids)?;
            print_deleted(&ids)
        }
    }
}

fn threads(conn: &Connection, cmd: ThreadCommand) -> Result<()> {
    let filter = match &cmd {
        ThreadCommand::List { collection } => *collection,
        _ => None,
    };
    let mut service = ThreadService::new(SqliteThreadRepository::new(conn), filter);
    match cmd {
        ThreadCommand::List { .. } => {
            let rows = service
                .threads()
                .iter()
                .map(|thread| -> Result<ThreadView<'_>> {
                    Ok(ThreadView {
                        thread,
                        thought_count: service.thought_count(thread.id)?,
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            print_json(&rows)
        }
        ThreadCommand::Add {
            title,
            collection,
            summary,
        } => print_json(&service.create_thread(&title, summary.as_deref(), collection)?),
        ThreadCommand::Edit { id, title, summary } => {
            print_json(&service.update_thread(id, &title, summary.as_deref())?)
        }
        ThreadCommand::Delete { ids } => {
            service.delete_threads(&ids)?;
            print_deleted(&ids)
        }
        ThreadCommand::Move { id, to } => print_json(&service.move_thread(id, to)?),
    }
}

fn thoughts(conn: &Connection, cmd: ThoughtCommand) -> Result<()> {
    let filter = match &cmd {
        ThoughtCommand::List { thread } => *thread,
        _ => None,
    };
    let mut service = ThoughtService::new(SqliteThoughtRepository::new(conn), filter);
    match cmd {
        ThoughtCommand::List { .. } => print_json(&service.thoughts()),
        ThoughtCommand::Add { content, thread } => {
            print_json(&service.create_thought(&content, Some(thread))?)
        }
        ThoughtCommand::Edit { id, content } => print_json(&service.update_thought(id, &content)?),
        ThoughtCommand::Delete { ids } => {
            service.delete_thoughts(&ids)?;
            print_deleted(&ids)
        }
        ThoughtCommand::Move { id, to } => print_json(&service.move_thought(id, to)?),
        ThoughtCommand::Reorder { ids } => {
            service.reorder_thoughts(&ids)?;
            let thoughts = ids
                .iter()
                .map(|id| service.get_thought(*id))
                .collect::<Result<Vec<_>, _>>()?;
            print_json(&thoughts)
        }
    }
}

/// Repeated ids are deleted once, so they are counted once.
fn print_deleted(ids: &[Uuid]) -> Result<()> {
    let deleted = ids.iter().collect::<HashSet<_>>().len();
    print_json(&serde_json::json!({ "deleted": deleted }))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
