//! Test fixtures.
//!
//! Provides ready-made event streams over in-memory or temporary file
//! storage.

use crate::events::convention_serializer;
use atomlog_core::{
    AtomEventStorage, Config, EventStream, FeedId, FileStorage, InMemoryStorage,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// A test stream with automatic cleanup.
pub struct TestStream {
    /// The stream.
    pub stream: EventStream,
    /// The storage the stream writes to.
    pub storage: Arc<dyn AtomEventStorage>,
    /// The temporary directory (kept alive to prevent cleanup).
    _temp_dir: Option<TempDir>,
}

impl TestStream {
    /// A stream over in-memory storage using the demo events.
    pub fn memory(page_size: usize) -> Self {
        let storage: Arc<dyn AtomEventStorage> = Arc::new(InMemoryStorage::in_memory());
        Self {
            stream: build(FeedId::new_id(), Arc::clone(&storage), page_size),
            storage,
            _temp_dir: None,
        }
    }

    /// A stream over file storage in a fresh temporary directory.
    pub fn file(page_size: usize) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let storage: Arc<dyn AtomEventStorage> =
            Arc::new(FileStorage::open(temp_dir.path()).expect("Failed to open file storage"));
        Self {
            stream: build(FeedId::new_id(), Arc::clone(&storage), page_size),
            storage,
            _temp_dir: Some(temp_dir),
        }
    }

    /// The storage directory if file-based, `None` if in-memory.
    pub fn path(&self) -> Option<PathBuf> {
        self._temp_dir.as_ref().map(|d| d.path().to_path_buf())
    }

    /// Another handle on the same stream with a different page size.
    pub fn with_page_size(&self, page_size: usize) -> EventStream {
        build(self.stream.id(), Arc::clone(&self.storage), page_size)
    }
}

impl std::ops::Deref for TestStream {
    type Target = EventStream;

    fn deref(&self) -> &Self::Target {
        &self.stream
    }
}

/// Builds a stream over `storage` using the demo events.
pub fn build(id: FeedId, storage: Arc<dyn AtomEventStorage>, page_size: usize) -> EventStream {
    EventStream::builder(id)
        .shared_storage(storage)
        .serializer(convention_serializer())
        .config(Config::new().page_size(page_size))
        .build()
        .expect("Failed to build stream")
}

/// Reopens file storage at `path` and builds a stream over it.
pub fn reopen(path: &Path, id: FeedId, page_size: usize) -> EventStream {
    let storage = FileStorage::open(path).expect("Failed to reopen file storage");
    build(id, Arc::new(storage), page_size)
}

/// Runs a test with an in-memory stream.
pub fn with_memory_stream<F, R>(page_size: usize, f: F) -> R
where
    F: FnOnce(&EventStream) -> R,
{
    let test = TestStream::memory(page_size);
    f(&test.stream)
}
