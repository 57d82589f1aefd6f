//! messaging-service - an in-memory message repository over HTTP
//!
//! Clients store text, get an id back, and can later fetch, list or delete
//! it, or ask whether it is a palindrome.
//! - `store` owns the messages and the id sequence
//! - `web` validates requests and shapes responses on top of the store
//! - `config` and `logging` are read and installed once at startup

pub mod config;
pub mod logging;
pub mod store;
pub mod web;

/// Re-export commonly used types
pub use store::{Message, MessageStore, StoreError};
pub use web::{ApiError, AppState, ServerConfig};
