//! This crate implements the batch-receive side of a pub/sub consumer.
//! Received messages wait in an incoming queue until a batch receiver moves them
//! into a bounded container, closed by a message-count or byte-size limit.

pub mod types; // Message capability, concrete received message and batch errors.
pub mod config; // Batch receive policy and configuration loading.
pub mod pool; // Queue of received messages awaiting a batch receive.
pub mod batch; // Bounded batch container and the receiver that fills it.

// Re-export commonly used types and configurations for easier access.
pub use types::*;
pub use config::{BatchReceivePolicy, Config};
pub use batch::{BatchReceiver, Messages};
