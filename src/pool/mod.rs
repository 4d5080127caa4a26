//! Message Pool Module
//!
//! This module holds messages received from the broker until a batch
//! receive hands them to the application.

mod incoming_queue;

pub use incoming_queue::IncomingQueue;
