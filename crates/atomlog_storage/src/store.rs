//! Document store trait definition.

use crate::address::Address;
use crate::error::StorageResult;

/// A keyed store of opaque documents.
///
/// Stores map an [`Address`] to the bytes most recently written there. They
/// do not interpret those bytes - atomlog owns the feed format.
///
/// # Invariants
///
/// - `write` followed by `read` at the same address returns the written bytes
/// - `write` replaces the whole document; it either succeeds completely or
///   leaves the previous document in place
/// - `read` of an address that was never written returns `Ok(None)`
/// - Stores must be `Send + Sync`; no ordering or locking across addresses
///   is promised
///
/// # Implementors
///
/// - [`super::InMemoryStore`] - For testing
/// - [`super::FileStore`] - For persistent storage
pub trait DocumentStore: Send + Sync {
    /// Reads the document stored at `address`.
    ///
    /// Returns `Ok(None)` if nothing was ever written there.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying medium fails.
    fn read(&self, address: &Address) -> StorageResult<Option<Vec<u8>>>;

    /// Writes `document` at `address`, replacing any previous document.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying medium fails. On error the
    /// previous document (if any) is left untouched.
    fn write(&self, address: &Address, document: &[u8]) -> StorageResult<()>;

    /// Lists every address that currently holds a document, in ascending
    /// order.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying medium cannot be enumerated.
    fn addresses(&self) -> StorageResult<Vec<Address>>;

    /// Returns `true` if a document exists at `address`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying medium fails.
    fn contains(&self, address: &Address) -> StorageResult<bool> {
        Ok(self.read(address)?.is_some())
    }
}
