//! Core data layer for TinyThoughts.
//!
//! Collections contain threads, threads contain thoughts, and thoughts may
//! carry tags. This crate owns the store, the per-entity repositories and
//! the observable services built on top of them.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod notify;
pub mod repo;
pub mod seed;
pub mod service;

pub use config::{ConfigError, CoreConfig};
pub use db::{open_db, open_db_in_memory, DbError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::collection::{Collection, CollectionId};
pub use model::tag::{Tag, TagAssociation, TagId};
pub use model::thought::{Thought, ThoughtId};
pub use model::thread::{Thread, ThreadId};
pub use model::validation::ValidationError;
pub use notify::ResultFeed;
pub use repo::collection_repo::{CollectionRepository, SqliteCollectionRepository};
pub use repo::tag_repo::{SqliteTagRepository, TagRepository};
pub use repo::thought_repo::{SqliteThoughtRepository, ThoughtRepository};
pub use repo::thread_repo::{SqliteThreadRepository, ThreadRepository};
pub use repo::{RepoError, RepoResult};
pub use seed::{seed_sample_data, SeedOptions, SeedReport};
pub use service::collection_service::CollectionService;
pub use service::thought_service::ThoughtService;
pub use service::thread_service::ThreadService;
pub use service::{ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
