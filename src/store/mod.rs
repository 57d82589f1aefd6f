//! In-memory storage module
//!
//! Owns every message and the id sequence. This module knows nothing about
//! HTTP or input validation (loose coupling).

mod error;
mod memory;
mod message;

pub use error::StoreError;
pub use memory::MessageStore;
pub use message::Message;
