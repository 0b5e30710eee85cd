//! Published result lists and change subscribers.
//!
//! # Responsibility
//! - Hold the list a service last published for its entity kind.
//! - Push every newly published list to channel subscribers.
//!
//! # Invariants
//! - `current()` only changes through `publish`, so a failed refresh leaves
//!   the previous list in place.
//! - Subscribers whose receiver was dropped are pruned on the next publish.

use std::sync::mpsc::{channel, Receiver, Sender};

/// Current result list plus the channels observing it.
#[derive(Debug)]
pub struct ResultFeed<T> {
    current: Vec<T>,
    subscribers: Vec<Sender<Vec<T>>>,
}

impl<T> Default for ResultFeed<T> {
    fn default() -> Self {
        Self {
            current: Vec::new(),
            subscribers: Vec::new(),
        }
    }
}

impl<T: Clone> ResultFeed<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the last published list.
    pub fn current(&self) -> &[T] {
        &self.current
    }

    /// Registers a subscriber. The receiver sees lists published after this
    /// call, not the current one.
    pub fn subscribe(&mut self) -> Receiver<Vec<T>> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }

    /// Replaces the current list and notifies subscribers.
    pub fn publish(&mut self, items: Vec<T>) {
        self.current = items;
        let current = &self.current;
        self.subscribers
            .retain(|subscriber| subscriber.send(current.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
