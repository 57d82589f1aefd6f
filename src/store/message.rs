//! Message structure returned by the store

use serde::Serialize;

/// A stored message paired with its identifier
///
/// `is_palindrome` is never stored. The handler layer fills it in on read
/// when the caller asks for it, and it is left out of the JSON otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    /// Identifier assigned by the store, starting at 1
    pub id: u64,

    /// The text as submitted
    pub text: String,

    /// Derived palindrome flag
    #[serde(rename = "is-palindrome", skip_serializing_if = "Option::is_none")]
    pub is_palindrome: Option<bool>,
}

impl Message {
    /// Create a message without any derived field
    pub fn new(id: u64, text: impl Into<String>) -> Self {
        Message {
            id,
            text: text.into(),
            is_palindrome: None,
        }
    }

    /// Attach the palindrome flag
    pub fn with_palindrome(mut self, is_palindrome: bool) -> Self {
        self.is_palindrome = Some(is_palindrome);
        self
    }
}
