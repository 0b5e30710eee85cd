//! Thread façade with an optional collection filter.
//!
//! # Invariants
//! - The published list honors the current filter: all threads when unset,
//!   otherwise only threads of that collection.
//! - Blank titles are rejected before the repository is called.

use super::{ids_at, logged, report, run_write, ServiceError, ServiceResult};
use crate::model::collection::CollectionId;
use crate::model::thread::{Thread, ThreadId};
use crate::model::validation::ValidationError;
use crate::model::{has_text, now_epoch_ms};
use crate::notify::ResultFeed;
use crate::repo::thread_repo::ThreadRepository;
use crate::repo::RepoResult;
use log::info;
use std::collections::BTreeSet;
use std::sync::mpsc::Receiver;

pub struct ThreadService<R: ThreadRepository> {
    repo: R,
    collection: Option<CollectionId>,
    feed: ResultFeed<Thread>,
}

impl<R: ThreadRepository> ThreadService<R> {
    /// Creates the service scoped to `collection` (or every collection).
    pub fn new(repo: R, collection: Option<CollectionId>) -> Self {
        let mut service = Self {
            repo,
            collection,
            feed: ResultFeed::new(),
        };
        let _ = service.refresh();
        service
    }

    pub fn threads(&self) -> &[Thread] {
        self.feed.current()
    }

    pub fn subscribe(&mut self) -> Receiver<Vec<Thread>> {
        self.feed.subscribe()
    }

    /// Queries threads, newest modification first, optionally for one
    /// collection.
    pub fn list_threads(&self, collection: Option<CollectionId>) -> ServiceResult<Vec<Thread>> {
        logged("thread_list", self.repo.list_threads(collection))
    }

    pub fn refresh(&mut self) -> ServiceResult<&[Thread]> {
        let threads = self.list_threads(self.collection)?;
        self.feed.publish(threads);
        Ok(self.feed.current())
    }

    /// Changes the collection filter and re-lists.
    pub fn set_collection(&mut self, collection: Option<CollectionId>) -> ServiceResult<&[Thread]> {
        self.collection = collection;
        self.refresh()
    }

    pub fn rebind_store(&mut self, repo: R) -> ServiceResult<&[Thread]> {
        self.repo = repo;
        info!("event=store_rebind module=service status=ok kind=thread");
        self.refresh()
    }

    pub fn get_thread(&self, id: ThreadId) -> ServiceResult<Thread> {
        self.repo
            .get_thread(id)?
            .ok_or(ServiceError::ThreadNotFound(id))
    }

    pub fn create_thread(
        &mut self,
        title: &str,
        summary: Option<&str>,
        collection: CollectionId,
    ) -> ServiceResult<Thread> {
        let thread = Thread::new(collection, title, summary.map(str::to_owned), now_epoch_ms());
        self.write("thread_create", |repo| {
            ensure_title(title)?;
            repo.create_thread(&thread)
        })?;
        Ok(thread)
    }

    pub fn update_thread(
        &mut self,
        id: ThreadId,
        title: &str,
        summary: Option<&str>,
    ) -> ServiceResult<Thread> {
        self.write("thread_update", |repo| {
            ensure_title(title)?;
            repo.update_thread(id, title, summary, now_epoch_ms())
        })
    }

    /// Moves a thread under another collection.
    pub fn move_thread(&mut self, id: ThreadId, collection: CollectionId) -> ServiceResult<Thread> {
        self.write("thread_move", |repo| {
            repo.move_thread(id, collection, now_epoch_ms())
        })
    }

    pub fn delete_thread(&mut self, id: ThreadId) -> ServiceResult<()> {
        self.delete_threads(&[id])
    }

    pub fn delete_threads(&mut self, ids: &[ThreadId]) -> ServiceResult<()> {
        self.write("thread_delete", |repo| repo.delete_threads(ids))
    }

    pub fn delete_threads_at(&mut self, indices: &BTreeSet<usize>) -> ServiceResult<()> {
        let ids = ids_at(self.feed.current(), indices, |thread| thread.id)
            .inspect_err(|err| report("thread_delete", err))?;
        self.delete_threads(&ids)
    }

    pub fn thought_count(&self, id: ThreadId) -> ServiceResult<u64> {
        Ok(self.repo.count_thoughts(id)?)
    }

    fn write<T>(
        &mut self,
        event: &'static str,
        op: impl FnOnce(&R) -> RepoResult<T>,
    ) -> ServiceResult<T> {
        let value = run_write(&self.repo, event, op)?;
        // Refresh failures are already logged; the write itself succeeded.
        let _ = self.refresh();
        Ok(value)
    }
}

fn ensure_title(title: &str) -> RepoResult<()> {
    if !has_text(title) {
        return Err(ValidationError::BlankTitle.into());
    }
    Ok(())
}
