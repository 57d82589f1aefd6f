//! In-memory message store

use super::error::StoreError;
use super::message::Message;
use siphasher::sip::SipHasher13;
use std::collections::HashMap;
use std::hash::BuildHasherDefault;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Type alias for our hash map with SipHasher
type MessageMap = HashMap<u64, String, BuildHasherDefault<SipHasher13>>;

/// State guarded by the store lock
///
/// The map and the id counter always change together under the write lock.
struct Inner {
    /// id -> text
    messages: MessageMap,

    /// Last id handed out, 0 before the first create
    last_id: u64,
}

/// Thread-safe in-memory message store
///
/// Writers (`create`, `delete`) take the lock exclusively, readers (`get`,
/// `list`) share it. Every critical section is a plain map operation, so no
/// lock is ever held across an await point.
pub struct MessageStore {
    inner: RwLock<Inner>,
}

impl MessageStore {
    /// Create a new store with default capacity
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// Create a new store with specified initial capacity
    pub fn with_capacity(capacity: usize) -> Self {
        MessageStore {
            inner: RwLock::new(Inner {
                messages: HashMap::with_capacity_and_hasher(
                    capacity,
                    BuildHasherDefault::<SipHasher13>::default(),
                ),
                last_id: 0,
            }),
        }
    }

    // A panic elsewhere can't leave Inner half-updated, so poisoning is ignored.
    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store a new message and return it with its freshly assigned id
    ///
    /// The text is stored as given; validation belongs to the caller.
    pub fn create(&self, text: impl Into<String>) -> Message {
        let text = text.into();
        let mut inner = self.write();

        inner.last_id += 1;
        let id = inner.last_id;
        inner.messages.insert(id, text.clone());

        Message::new(id, text)
    }

    /// Get a message by id
    pub fn get(&self, id: u64) -> Result<Message, StoreError> {
        self.read()
            .messages
            .get(&id)
            .map(|text| Message::new(id, text.clone()))
            .ok_or(StoreError::NotFound(id))
    }

    /// Get every stored message, sorted by id
    ///
    /// An empty store is reported as [`StoreError::Empty`] rather than an
    /// empty list.
    pub fn list(&self) -> Result<Vec<Message>, StoreError> {
        let inner = self.read();
        if inner.messages.is_empty() {
            return Err(StoreError::Empty);
        }

        let mut messages: Vec<Message> = inner
            .messages
            .iter()
            .map(|(id, text)| Message::new(*id, text.clone()))
            .collect();
        drop(inner);

        messages.sort_unstable_by_key(|msg| msg.id);
        Ok(messages)
    }

    /// Delete a message by id
    pub fn delete(&self, id: u64) -> Result<(), StoreError> {
        self.write()
            .messages
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    /// Number of messages currently stored
    pub fn len(&self) -> usize {
        self.read().messages.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Last id handed out (0 if nothing was ever created)
    pub fn last_id(&self) -> u64 {
        self.read().last_id
    }
}

impl Default for MessageStore {
    fn default() -> Self {
        Self::new()
    }
}
