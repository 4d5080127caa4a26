//! Incoming Queue Module
//!
//! This module implements the queue of messages received from the broker
//! but not yet handed to the application.
//! Messages are stored in a FIFO queue and drained by the batch receiver.

use crate::{batch::Messages, config::BatchReceivePolicy, Message};
use std::collections::VecDeque;
use tokio::sync::{Notify, RwLock};

/// Queue state guarded by a single lock so the byte total never drifts
/// from the queued messages
struct Inner<M> {
    messages: VecDeque<M>,
    total_bytes: u64,
}

/// Queue of messages waiting for a batch receive
///
/// Uses VecDeque for insertion at the back and removal from the front.
/// Protected by RwLock for concurrent access; `Notify` wakes a receiver
/// waiting for the queue to fill up.
pub struct IncomingQueue<M> {
    inner: RwLock<Inner<M>>,
    arrivals: Notify,
}

impl<M: Message> IncomingQueue<M> {
    /// Creates a new empty queue
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                messages: VecDeque::new(),
                total_bytes: 0,
            }),
            arrivals: Notify::new(),
        }
    }

    /// Add a received message to the back of the queue
    ///
    /// Wakes up a receiver waiting on `notified`.
    pub async fn push(&self, message: M) {
        {
            let mut inner = self.inner.write().await;
            inner.total_bytes += message.size() as u64;
            inner.messages.push_back(message);
        }
        self.arrivals.notify_waiters();
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.messages.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.messages.is_empty()
    }

    /// Cumulative size in bytes of the queued messages
    pub async fn total_bytes(&self) -> u64 {
        self.inner.read().await.total_bytes
    }

    /// Check whether enough messages are queued to complete a batch
    ///
    /// Always `false` when the policy has neither a count nor a byte limit,
    /// in which case only the timeout can close the batch.
    pub async fn has_enough_for(&self, policy: &BatchReceivePolicy) -> bool {
        if policy.max_num_messages <= 0 && policy.max_num_bytes <= 0 {
            return false;
        }

        let inner = self.inner.read().await;
        (policy.max_num_messages > 0 && inner.messages.len() >= policy.max_num_messages as usize)
            || (policy.max_num_bytes > 0 && inner.total_bytes >= policy.max_num_bytes as u64)
    }

    /// Move messages from the front of the queue into `batch`
    ///
    /// Stops at the first message the batch refuses; that message stays at
    /// the front for the next batch.
    ///
    /// # Returns
    /// The number of messages moved
    pub async fn drain_into(&self, batch: &mut Messages<M>) -> usize {
        let mut inner = self.inner.write().await;
        let mut moved = 0;

        while let Some(head) = inner.messages.front() {
            if !batch.can_add(head) {
                break;
            }
            let Some(message) = inner.messages.pop_front() else {
                break;
            };
            let size = message.size() as u64;
            if batch.add(message).is_err() {
                // can_add held a moment ago under the same lock
                break;
            }
            inner.total_bytes -= size;
            moved += 1;
        }

        moved
    }

    /// Future resolving on the next `push`
    ///
    /// Must be created before checking the queue to avoid missing a wakeup.
    pub fn notified(&self) -> tokio::sync::futures::Notified<'_> {
        self.arrivals.notified()
    }
}

impl<M: Message> Default for IncomingQueue<M> {
    fn default() -> Self {
        Self::new()
    }
}
