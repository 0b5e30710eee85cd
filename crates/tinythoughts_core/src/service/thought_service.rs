//! Thought façade: append, edit, move and reorder entries in a thread.
//!
//! # Invariants
//! - New and moved thoughts land at `max(position) + 1` of their thread.
//! - Reordering renumbers the given ids to `0..n` in order.
//! - A thought is never created without a thread.

use super::{ids_at, logged, report, run_write, ServiceError, ServiceResult};
use crate::model::thought::{Thought, ThoughtId};
use crate::model::thread::ThreadId;
use crate::model::validation::ValidationError;
use crate::model::{has_text, now_epoch_ms};
use crate::notify::ResultFeed;
use crate::repo::thought_repo::ThoughtRepository;
use crate::repo::RepoResult;
use log::info;
use std::collections::BTreeSet;
use std::sync::mpsc::Receiver;

pub struct ThoughtService<R: ThoughtRepository> {
    repo: R,
    thread: Option<ThreadId>,
    feed: ResultFeed<Thought>,
}

impl<R: ThoughtRepository> ThoughtService<R> {
    pub fn new(repo: R, thread: Option<ThreadId>) -> Self {
        let mut service = Self {
            repo,
            thread,
            feed: ResultFeed::new(),
        };
        let _ = service.refresh();
        service
    }

    pub fn thoughts(&self) -> &[Thought] {
        self.feed.current()
    }

    pub fn subscribe(&mut self) -> Receiver<Vec<Thought>> {
        self.feed.subscribe()
    }

    /// Queries thoughts by position, newest first on ties.
    pub fn list_thoughts(&self, thread: Option<ThreadId>) -> ServiceResult<Vec<Thought>> {
        logged("thought_list", self.repo.list_thoughts(thread))
    }

    pub fn refresh(&mut self) -> ServiceResult<&[Thought]> {
        let thoughts = self.list_thoughts(self.thread)?;
        self.feed.publish(thoughts);
        Ok(self.feed.current())
    }

    pub fn set_thread(&mut self, thread: Option<ThreadId>) -> ServiceResult<&[Thought]> {
        self.thread = thread;
        self.refresh()
    }

    pub fn rebind_store(&mut self, repo: R) -> ServiceResult<&[Thought]> {
        self.repo = repo;
        info!("event=store_rebind module=service status=ok kind=thought");
        self.refresh()
    }

    pub fn get_thought(&self, id: ThoughtId) -> ServiceResult<Thought> {
        self.repo
            .get_thought(id)?
            .ok_or(ServiceError::ThoughtNotFound(id))
    }

    /// Appends a thought to `thread`, or to the filtered thread when `None`.
    ///
    /// # Errors
    /// - `Validation(BlankContent)` for blank content.
    /// - `Validation(MissingThread)` when neither a thread nor a filter is set.
    /// - `ThreadNotFound` when the target thread does not exist.
    pub fn create_thought(
        &mut self,
        content: &str,
        thread: Option<ThreadId>,
    ) -> ServiceResult<Thought> {
        let target = thread.or(self.thread);
        self.write("thought_create", |repo| {
            if !has_text(content) {
                return Err(ValidationError::BlankContent.into());
            }
            let thread_id = target.ok_or(ValidationError::MissingThread)?;
            let position = repo.next_position(thread_id)?;
            let thought = Thought::new(thread_id, content, position, now_epoch_ms());
            repo.create_thought(&thought)?;
            Ok(thought)
        })
    }

    pub fn update_thought(&mut self, id: ThoughtId, content: &str) -> ServiceResult<Thought> {
        self.write("thought_update", |repo| {
            if !has_text(content) {
                return Err(ValidationError::BlankContent.into());
            }
            repo.update_thought(id, content, now_epoch_ms())
        })
    }

    /// Moves a thought to the end of another thread.
    pub fn move_thought(&mut self, id: ThoughtId, thread: ThreadId) -> ServiceResult<Thought> {
        self.write("thought_move", |repo| {
            repo.move_thought(id, thread, now_epoch_ms())
        })
    }

    /// Renumbers positions to match `ordered_ids`.
    pub fn reorder_thoughts(&mut self, ordered_ids: &[ThoughtId]) -> ServiceResult<()> {
        self.write("thought_reorder", |repo| {
            repo.reorder_thoughts(ordered_ids, now_epoch_ms())
        })
    }

    pub fn delete_thought(&mut self, id: ThoughtId) -> ServiceResult<()> {
        self.delete_thoughts(&[id])
    }

    pub fn delete_thoughts(&mut self, ids: &[ThoughtId]) -> ServiceResult<()> {
        self.write("thought_delete", |repo| repo.delete_thoughts(ids))
    }

    pub fn delete_thoughts_at(&mut self, indices: &BTreeSet<usize>) -> ServiceResult<()> {
        let ids = ids_at(self.feed.current(), indices, |thought| thought.id)
            .inspect_err(|err| report("thought_delete", err))?;
        self.delete_thoughts(&ids)
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
