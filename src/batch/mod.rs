//! Batch Receive Module
//!
//! This module handles collecting received messages into bounded batches:
//! - Messages: Ordered container closed by a message-count or byte-size limit
//! - BatchReceiver: Fills containers from the incoming queue on a size or timeout trigger

mod messages;
mod receiver;


pub use messages::Messages;
pub use receiver::BatchReceiver;
