//! In-memory document store for testing.

use crate::address::Address;
use crate::error::StorageResult;
use crate::store::DocumentStore;
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// An in-memory document store.
///
/// This store keeps all documents in memory and is suitable for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral streams that don't need persistence
///
/// # Thread Safety
///
/// This store is thread-safe and can be shared across threads.
///
/// # Example
///
/// ```rust
/// use atomlog_storage::{Address, DocumentStore, InMemoryStore};
/// use uuid::Uuid;
///
/// let store = InMemoryStore::new();
/// let address = Address::new(Uuid::new_v4());
/// store.write(&address, b"doc").unwrap();
/// assert_eq!(store.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    documents: RwLock<BTreeMap<Address, Vec<u8>>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    /// Returns `true` if no document has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }

    /// Returns a copy of every stored document.
    ///
    /// Useful for testing and debugging.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<Address, Vec<u8>> {
        self.documents.read().clone()
    }

    /// Removes all documents.
    pub fn clear(&self) {
        self.documents.write().clear();
    }
}

impl DocumentStore for InMemoryStore {
    fn read(&self, address: &Address) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.documents.read().get(address).cloned())
    }

    fn write(&self, address: &Address, document: &[u8]) -> StorageResult<()> {
        self.documents
            .write()
            .insert(address.clone(), document.to_vec());
        Ok(())
    }

    fn addresses(&self) -> StorageResult<Vec<Address>> {
        Ok(self.documents.read().keys().cloned().collect())
    }
}
