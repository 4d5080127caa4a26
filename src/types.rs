use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

/// Capability every batched item must expose
///
/// `size` is the serialized byte footprint of the message and must be stable
/// across repeated calls on the same instance.
pub trait Message {
    fn size(&self) -> usize;
}

impl<T: Message + ?Sized> Message for &T {
    fn size(&self) -> usize {
        (**self).size()
    }
}

impl<T: Message + ?Sized> Message for Box<T> {
    fn size(&self) -> usize {
        (**self).size()
    }
}

impl<T: Message + ?Sized> Message for Arc<T> {
    fn size(&self) -> usize {
        (**self).size()
    }
}

/// Identity of a message within its topic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId {
    pub ledger_id: u64,
    pub entry_id: u64,
}

impl MessageId {
    pub fn new(ledger_id: u64, entry_id: u64) -> Self {
        Self { ledger_id, entry_id }
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.ledger_id, self.entry_id)
    }
}

/// Message handed over by the consumer's receive path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedMessage {
    pub id: MessageId,
    pub topic: String,
    pub payload: Vec<u8>,
    /// Publish time in milliseconds since the Unix epoch
    pub publish_time: i64,
    pub properties: HashMap<String, String>,
}

impl ReceivedMessage {
    /// Creates a message stamped with the current time and no properties
    pub fn new(id: MessageId, topic: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            id,
            topic: topic.into(),
            payload: payload.into(),
            publish_time: chrono::Utc::now().timestamp_millis(),
            properties: HashMap::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

impl Message for ReceivedMessage {
    fn size(&self) -> usize {
        self.payload.len()
    }
}

/// Errors raised while filling a batch
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchError {
    /// The candidate would push the batch past one of its limits.
    /// Callers should treat the batch as full.
    #[error("No more space to add messages. (max messages: {max_messages}, max bytes: {max_bytes})")]
    CapacityExceeded { max_messages: i32, max_bytes: i64 },
}
