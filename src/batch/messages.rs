//! Bounded Batch Module
//!
//! This module implements the container a batch receive fills.
//! A batch is closed by whichever of its two limits is hit first:
//! the number of messages or their cumulative size in bytes.
//!
//! The container does no locking. It is driven through `&mut self`
//! by a single owner, and only read once the fill phase is over.

use crate::{config::BatchReceivePolicy, BatchError, Message};
use tracing::warn;

/// Upper bound on the slots reserved up front for a count-limited batch
const MAX_PREALLOCATED_MESSAGES: usize = 1024;

/// Ordered, bounded collection of received messages
///
/// Messages keep their insertion order. `count` and `bytes` are running
/// totals maintained by `add` and `clear`, so both checks stay O(1).
#[derive(Debug, Clone)]
pub struct Messages<M> {
    /// Held messages in insertion order
    message_list: Vec<M>,
    /// Maximum number of messages (`<= 0` means unbounded)
    max_number_of_messages: i32,
    /// Maximum cumulative size in bytes (`<= 0` means unbounded)
    max_size_of_messages: i64,
    /// Always equal to `message_list.len()`
    current_number_of_messages: usize,
    /// Always equal to the sum of `size()` over `message_list`
    current_size_of_messages: u64,
}

impl<M: Message> Messages<M> {
    /// Creates an empty batch with fixed limits
    ///
    /// # Arguments
    /// * `max_number_of_messages` - Count limit, `<= 0` for no limit
    /// * `max_size_of_messages` - Byte limit, `<= 0` for no limit
    pub fn new(max_number_of_messages: i32, max_size_of_messages: i64) -> Self {
        let message_list = if max_number_of_messages > 0 {
            Vec::with_capacity((max_number_of_messages as usize).min(MAX_PREALLOCATED_MESSAGES))
        } else {
            Vec::new()
        };

        Self {
            message_list,
            max_number_of_messages,
            max_size_of_messages,
            current_number_of_messages: 0,
            current_size_of_messages: 0,
        }
    }

    /// Creates an empty batch using the limits of a receive policy
    pub fn from_policy(policy: &BatchReceivePolicy) -> Self {
        Self::new(policy.max_num_messages, policy.max_num_bytes)
    }

    /// Check whether `message` can join the batch
    ///
    /// An empty batch always accepts its first message, whatever its size,
    /// so an oversized message can never stall the consumer.
    /// Otherwise the count limit is checked first, then the byte limit.
    /// A refusal is reported as a warning but is not an error.
    pub fn can_add(&self, message: &M) -> bool {
        if self.current_number_of_messages == 0 {
            return true;
        }

        if self.max_number_of_messages > 0
            && self.current_number_of_messages + 1 > self.max_number_of_messages as usize
        {
            warn!(
                max_number_of_messages = self.max_number_of_messages,
                "can't add message to the container, has exceeded the maxNumberOfMessages"
            );
            return false;
        }

        if self.max_size_of_messages > 0
            && self.current_size_of_messages.saturating_add(message.size() as u64)
                > self.max_size_of_messages as u64
        {
            warn!(
                max_size_of_messages = self.max_size_of_messages,
                "can't add message to the container, has exceeded the maxSizeOfMessages"
            );
            return false;
        }

        true
    }

    /// Append a message to the batch
    ///
    /// Passing `None` does nothing. A message refused by `can_add` leaves the
    /// batch untouched and returns `BatchError::CapacityExceeded`.
    pub fn add(&mut self, message: impl Into<Option<M>>) -> Result<(), BatchError> {
        let Some(message) = message.into() else {
            return Ok(());
        };

        if !self.can_add(&message) {
            return Err(BatchError::CapacityExceeded {
                max_messages: self.max_number_of_messages,
                max_bytes: self.max_size_of_messages,
            });
        }

        self.current_number_of_messages += 1;
        self.current_size_of_messages += message.size() as u64;
        self.message_list.push(message);
        Ok(())
    }
}

impl<M> Messages<M> {
    /// Number of messages held
    pub fn len(&self) -> usize {
        debug_assert_eq!(self.current_number_of_messages, self.message_list.len());
        self.current_number_of_messages
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cumulative size in bytes of the held messages
    pub fn total_bytes(&self) -> u64 {
        self.current_size_of_messages
    }

    pub fn max_number_of_messages(&self) -> i32 {
        self.max_number_of_messages
    }

    pub fn max_size_of_messages(&self) -> i64 {
        self.max_size_of_messages
    }

    /// Reset to the empty state, keeping the limits and the allocation
    pub fn clear(&mut self) {
        self.current_number_of_messages = 0;
        self.current_size_of_messages = 0;
        self.message_list.clear();
    }

    /// Held messages in insertion order
    pub fn message_list(&self) -> &[M] {
        &self.message_list
    }

    /// Iterate over the held messages in insertion order
    ///
    /// Each call returns an independent cursor.
    pub fn iter(&self) -> std::slice::Iter<'_, M> {
        self.message_list.iter()
    }
}

impl<'a, M> IntoIterator for &'a Messages<M> {
    type Item = &'a M;
    type IntoIter = std::slice::Iter<'a, M>;

    fn into_iter(self) -> Self::IntoIter {
        self.message_list.iter()
    }
}

impl<M> IntoIterator for Messages<M> {
    type Item = M;
    type IntoIter = std::vec::IntoIter<M>;

    fn into_iter(self) -> Self::IntoIter {
        self.message_list.into_iter()
    }
}
