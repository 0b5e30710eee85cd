//! Collection façade with an observable result list.
//!
//! # Responsibility
//! - Provide create/update/delete entry points for collections.
//! - Keep the published list in `last_modified DESC` order after each write.
//!
//! # Invariants
//! - Blank names are rejected before the repository is called.
//! - Deletes cascade to threads, thoughts and tag links.

use super::{ids_at, logged, report, run_write, ServiceError, ServiceResult};
use crate::model::collection::{Collection, CollectionId};
use crate::model::validation::ValidationError;
use crate::model::{has_text, now_epoch_ms};
use crate::notify::ResultFeed;
use crate::repo::collection_repo::CollectionRepository;
use crate::repo::RepoResult;
use log::info;
use std::collections::BTreeSet;
use std::sync::mpsc::Receiver;

/// Observable collection service.
pub struct CollectionService<R: CollectionRepository> {
    repo: R,
    feed: ResultFeed<Collection>,
}

impl<R: CollectionRepository> CollectionService<R> {
    /// Creates the service and publishes the initial list.
    ///
    /// A failing initial query is logged and leaves the list empty.
    pub fn new(repo: R) -> Self {
        let mut service = Self {
            repo,
            feed: ResultFeed::new(),
        };
        let _ = service.refresh();
        service
    }

    /// Last published list.
    pub fn collections(&self) -> &[Collection] {
        self.feed.current()
    }

    /// Subscribes to lists published after this call.
    pub fn subscribe(&mut self) -> Receiver<Vec<Collection>> {
        self.feed.subscribe()
    }

    /// Queries all collections, newest modification first.
    pub fn list_collections(&self) -> ServiceResult<Vec<Collection>> {
        logged("collection_list", self.repo.list_collections())
    }

    /// Re-runs the list query and publishes the result.
    pub fn refresh(&mut self) -> ServiceResult<&[Collection]> {
        let collections = self.list_collections()?;
        self.feed.publish(collections);
        Ok(self.feed.current())
    }

    /// Points the service at another store and re-lists immediately.
    pub fn rebind_store(&mut self, repo: R) -> ServiceResult<&[Collection]> {
        self.repo = repo;
        info!("event=store_rebind module=service status=ok kind=collection");
        self.refresh()
    }

    pub fn get_collection(&self, id: CollectionId) -> ServiceResult<Collection> {
        self.repo
            .get_collection(id)?
            .ok_or(ServiceError::CollectionNotFound(id))
    }

    /// Creates a collection stamped `creation_date = last_modified = now`.
    pub fn create_collection(
        &mut self,
        name: &str,
        summary: Option<&str>,
    ) -> ServiceResult<Collection> {
        let collection = Collection::new(name, summary.map(str::to_owned), now_epoch_ms());
        self.write("collection_create", |repo| {
            ensure_name(name)?;
            repo.create_collection(&collection)
        })?;
        Ok(collection)
    }

    pub fn update_collection(
        &mut self,
        id: CollectionId,
        name: &str,
        summary: Option<&str>,
    ) -> ServiceResult<Collection> {
        self.write("collection_update", |repo| {
            ensure_name(name)?;
            repo.update_collection(id, name, summary, now_epoch_ms())
        })
    }

    pub fn delete_collection(&mut self, id: CollectionId) -> ServiceResult<()> {
        self.delete_collections(&[id])
    }

    /// Deletes every listed collection, or none if any is missing.
    pub fn delete_collections(&mut self, ids: &[CollectionId]) -> ServiceResult<()> {
        self.write("collection_delete", |repo| repo.delete_collections(ids))
    }

    /// Deletes the collections at `indices` of the published list.
    pub fn delete_collections_at(&mut self, indices: &BTreeSet<usize>) -> ServiceResult<()> {
        let ids = ids_at(self.feed.current(), indices, |collection| collection.id)
            .inspect_err(|err| report("collection_delete", err))?;
        self.delete_collections(&ids)
    }

    /// Number of threads in one collection.
    pub fn thread_count(&self, id: CollectionId) -> ServiceResult<u64> {
        Ok(self.repo.count_threads(id)?)
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

fn ensure_name(name: &str) -> RepoResult<()> {
    if !has_text(name) {
        return Err(ValidationError::BlankName.into());
    }
    Ok(())
}
