//! Store error conditions

use thiserror::Error;

/// Conditions signalled by [`MessageStore`](super::MessageStore)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No message currently has this id
    #[error("input text ID {0} not found ")]
    NotFound(u64),

    /// The store holds no messages at all
    #[error("no messages found")]
    Empty,
}
