//! The feed storage contract and the document-store adapter.

use crate::config::DEFAULT_AUTHOR;
use crate::error::{CoreError, CoreResult};
use crate::id::FeedId;
use crate::model::{Author, Feed};
use atomlog_codec::ContentSerializer;
use atomlog_storage::{
    Address, DocumentStore, FileStore, InMemoryStore, StorageError, StorageResult,
};
use std::sync::Arc;
use tracing::trace;

/// Durable storage for feed documents.
///
/// # Contract
///
/// - `read_feed` never fails for absence: an address that holds nothing
///   yields an empty, self-linked index-shaped feed (see
///   [`Feed::empty_index`])
/// - `write_feed` replaces the document at `href` (last write wins), and a
///   following `read_feed` at the same address returns it
/// - No ordering, locking or durability guarantee is required
pub trait AtomEventStorage: Send + Sync {
    /// Reads the document at `href`.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid or the medium fails.
    fn read_feed(&self, href: &str) -> StorageResult<String>;

    /// Writes `document` at `href`.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid or the medium fails.
    fn write_feed(&self, href: &str, document: &str) -> StorageResult<()>;
}

impl<T: AtomEventStorage + ?Sized> AtomEventStorage for Arc<T> {
    fn read_feed(&self, href: &str) -> StorageResult<String> {
        (**self).read_feed(href)
    }

    fn write_feed(&self, href: &str, document: &str) -> StorageResult<()> {
        (**self).write_feed(href, document)
    }
}

/// Reads and decodes the feed at `href`.
///
/// # Errors
///
/// Returns [`CoreError::Storage`] if the read fails, or a format or codec
/// error if the document cannot be decoded.
pub fn read_feed(
    storage: &dyn AtomEventStorage,
    href: &str,
    codec: &dyn ContentSerializer,
) -> CoreResult<Feed> {
    let document = storage.read_feed(href)?;
    Feed::parse(&document, codec)
}

/// Encodes `feed` and writes it at the address of its `self` link.
///
/// # Errors
///
/// Returns [`CoreError::InvalidFormat`] if the feed has no `self` link,
/// or the encode or write error.
pub fn write_feed(
    storage: &dyn AtomEventStorage,
    feed: &Feed,
    codec: &dyn ContentSerializer,
) -> CoreResult<()> {
    let href = feed
        .self_link()
        .ok_or_else(|| {
            CoreError::invalid_format(format!("feed {} has no self link", feed.id()))
        })?
        .href();
    let document = feed.to_xml_string(codec)?;
    storage.write_feed(href, &document)?;
    Ok(())
}

/// Adapts a [`DocumentStore`] to [`AtomEventStorage`].
///
/// Feeds are stored as UTF-8 documents keyed by their [`Address`].
#[derive(Debug, Clone)]
pub struct DocumentStorage<S> {
    store: S,
    author: Author,
}

/// Feed storage held in memory.
pub type InMemoryStorage = DocumentStorage<InMemoryStore>;

/// Feed storage backed by one file per feed.
pub type FileStorage = DocumentStorage<FileStore>;

impl<S: DocumentStore> DocumentStorage<S> {
    /// Wraps a store.
    pub fn new(store: S) -> Self {
        Self {
            store,
            author: Author::new(DEFAULT_AUTHOR),
        }
    }

    /// Sets the author written on synthesized empty feeds.
    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Author::new(author);
        self
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Identifiers of every feed stored under `segment`, in ascending
    /// order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be enumerated.
    pub fn feed_ids(&self, segment: &str) -> CoreResult<Vec<FeedId>> {
        self.store
            .addresses()?
            .into_iter()
            .filter(|address| address.segment() == Some(segment))
            .map(|address| FeedId::new(address.id()))
            .collect()
    }

    /// Addresses of every stored document.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be enumerated.
    pub fn hrefs(&self) -> CoreResult<Vec<String>> {
        Ok(self
            .store
            .addresses()?
            .iter()
            .map(ToString::to_string)
            .collect())
    }

    fn empty_feed(&self, href: &str) -> StorageResult<String> {
        Feed::empty_index(href, self.author.clone())
            .and_then(|feed| feed.to_xml_string_raw())
            .map_err(|e| match e {
                CoreError::InvalidArgument { .. } => StorageError::invalid_address(href),
                other => StorageError::Corrupted(other.to_string()),
            })
    }
}

impl InMemoryStorage {
    /// Creates empty in-memory storage.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(InMemoryStore::new())
    }
}

impl FileStorage {
    /// Opens file storage rooted at `root`, creating the directory if
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(root: impl AsRef<std::path::Path>) -> CoreResult<Self> {
        Ok(Self::new(FileStore::open(root.as_ref())?))
    }
}

impl<S: DocumentStore> AtomEventStorage for DocumentStorage<S> {
    fn read_feed(&self, href: &str) -> StorageResult<String> {
        let address = Address::parse(href)?;
        match self.store.read(&address)? {
            Some(bytes) => {
                String::from_utf8(bytes).map_err(|_| StorageError::InvalidUtf8 {
                    address: address.to_string(),
                })
            }
            None => {
                trace!(href, "synthesizing empty feed");
                self.empty_feed(href)
            }
        }
    }

    fn write_feed(&self, href: &str, document: &str) -> StorageResult<()> {
        let address = Address::parse(href)?;
        self.store.write(&address, document.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{now, Link};
    use atomlog_codec::RawContentSerializer;
    use tempfile::tempdir;

    #[test]
    fn absent_address_reads_as_empty_index() {
        let storage = InMemoryStorage::in_memory();
        let id = FeedId::new_id();
        let feed = read_feed(&storage, &id.href(), &RawContentSerializer).unwrap();
        assert_eq!(feed.id(), id);
        assert_eq!(feed.self_link().map(Link::href), Some(id.href().as_str()));
        assert!(feed.entries().is_empty());
        assert!(storage.store().is_empty());
    }

    #[test]
    fn write_then_read_roundtrips() {
        let storage = InMemoryStorage::in_memory();
        let id = FeedId::new_id();
        let feed = Feed::new(id, "page", now(), Author::new("t"))
            .add_link(Link::self_link(id.href()))
            .add_link(Link::next(FeedId::new_id().href()));
        write_feed(&storage, &feed, &RawContentSerializer).unwrap();
        assert_eq!(
            read_feed(&storage, &id.href(), &RawContentSerializer).unwrap(),
            feed
        );
    }

    #[test]
    fn write_without_self_link_fails() {
        let storage = InMemoryStorage::in_memory();
        let feed = Feed::new(FeedId::new_id(), "page", now(), Author::new("t"));
        assert!(matches!(
            write_feed(&storage, &feed, &RawContentSerializer),
            Err(CoreError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn invalid_address_is_a_storage_error() {
        let storage = InMemoryStorage::in_memory();
        assert!(matches!(
            storage.read_feed("../escape"),
            Err(StorageError::InvalidAddress { .. })
        ));
        assert!(matches!(
            storage.read_feed("00000000-0000-0000-0000-000000000000"),
            Err(StorageError::InvalidAddress { .. })
        ));
    }

    #[test]
    fn feed_ids_lists_a_segment() {
        let storage = InMemoryStorage::in_memory();
        let a = FeedId::new_id();
        let b = FeedId::new_id();
        storage.write_feed(&format!("index/{}", a.href()), "<x/>").unwrap();
        storage.write_feed(&format!("index/{}", b.href()), "<x/>").unwrap();
        storage.write_feed(&FeedId::new_id().href(), "<x/>").unwrap();

        let mut expected = vec![a, b];
        expected.sort();
        assert_eq!(storage.feed_ids("index").unwrap(), expected);
        assert!(storage.feed_ids("other").unwrap().is_empty());
        assert_eq!(storage.hrefs().unwrap().len(), 3);
    }

    #[test]
    fn file_storage_survives_reopen() {
        let dir = tempdir().unwrap();
        let id = FeedId::new_id();
        {
            let storage = FileStorage::open(dir.path()).unwrap();
            storage.write_feed(&id.href(), "<feed/>").unwrap();
        }
        let storage = FileStorage::open(dir.path()).unwrap();
        assert_eq!(storage.read_feed(&id.href()).unwrap(), "<feed/>");
    }

    #[test]
    fn shared_storage_delegates() {
        let storage: Arc<dyn AtomEventStorage> = Arc::new(InMemoryStorage::in_memory());
        let href = FeedId::new_id().href();
        storage.write_feed(&href, "<doc/>").unwrap();
        assert_eq!(storage.read_feed(&href).unwrap(), "<doc/>");
    }
}
