//! Batch Receiver Module
//!
//! This module implements the driver that owns the fill phase of a batch.
//! It waits on the incoming queue until either enough messages are queued
//! to complete a batch or the policy timeout expires, then moves as many
//! messages as the batch admits.
//!
//! # Trigger Conditions
//! - **Size trigger**: queued messages reach the count or byte limit
//! - **Timeout trigger**: the timeout expires, the batch takes what is queued
//!   (possibly nothing)

use crate::{
    batch::Messages,
    config::{BatchReceivePolicy, ConfigError},
    pool::IncomingQueue,
    Message,
};
use std::sync::Arc;
use tokio::time::{timeout_at, Instant};
use tracing::debug;

/// Drives batch receives from a shared incoming queue
pub struct BatchReceiver<M> {
    /// Queue fed by the consumer's receive path
    queue: Arc<IncomingQueue<M>>,
    /// Limits and timeout applied to every batch
    policy: BatchReceivePolicy,
}

impl<M: Message> BatchReceiver<M> {
    /// Creates a new batch receiver
    ///
    /// # Arguments
    /// * `queue` - Shared reference to the incoming message queue
    /// * `policy` - Batch limits and timeout
    ///
    /// # Returns
    /// An error if the policy sets neither a limit nor a timeout
    pub fn new(queue: Arc<IncomingQueue<M>>, policy: BatchReceivePolicy) -> Result<Self, ConfigError> {
        policy.verify()?;
        Ok(Self { queue, policy })
    }

    pub fn policy(&self) -> &BatchReceivePolicy {
        &self.policy
    }

    /// Receive a batch into a freshly allocated container
    pub async fn batch_receive(&self) -> Messages<M> {
        let mut batch = Messages::from_policy(&self.policy);
        self.batch_receive_into(&mut batch).await;
        batch
    }

    /// Receive a batch into a reused container
    ///
    /// `batch` is cleared first; its own limits are the ones enforced
    /// while filling.
    ///
    /// # Returns
    /// The number of messages received
    pub async fn batch_receive_into(&self, batch: &mut Messages<M>) -> usize {
        batch.clear();
        self.wait_for_trigger().await;

        let received = self.queue.drain_into(batch).await;
        debug!(
            messages = received,
            bytes = batch.total_bytes(),
            "Batch receive completed"
        );
        received
    }

    /// Wait until the queue can complete a batch or the timeout expires
    async fn wait_for_trigger(&self) {
        let deadline = self.policy.timeout().map(|timeout| Instant::now() + timeout);

        loop {
            // Register before checking so a push in between is not missed
            let notified = self.queue.notified();

            if self.queue.has_enough_for(&self.policy).await {
                debug!("Batch size trigger reached");
                return;
            }

            match deadline {
                Some(deadline) => {
                    if timeout_at(deadline, notified).await.is_err() {
                        debug!(timeout_ms = self.policy.timeout_ms, "Batch timeout triggered");
                        return;
                    }
                }
                None => notified.await,
            }
        }
    }
}
