//! Crash simulation for append recovery tests.
//!
//! An append that starts a new page performs three writes: the new page,
//! the old tail (gaining its `next` link), then the index (moving `last`).
//! [`CrashingStorage`] stops accepting writes after a budget, which leaves
//! the stream exactly as a process crash between two of those writes would.
//!
//! ## Usage
//!
//! ```rust
//! use atomlog_testkit::crash::{CrashPoint, CrashingStorage};
//! use atomlog_core::InMemoryStorage;
//! use std::sync::Arc;
//!
//! let storage = CrashingStorage::new(Arc::new(InMemoryStorage::in_memory()));
//! storage.arm(CrashPoint::AfterNewPage);
//! ```

use atomlog_core::AtomEventStorage;
use atomlog_storage::{StorageError, StorageResult};
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Points inside a page-starting append at which a crash can be simulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrashPoint {
    /// The new page was written; the old tail and index were not.
    AfterNewPage,
    /// The new page and the old tail were written; the index was not.
    AfterOldTail,
}

impl CrashPoint {
    /// Number of writes that succeed before the crash.
    pub const fn writes_before_crash(self) -> usize {
        match self {
            Self::AfterNewPage => 1,
            Self::AfterOldTail => 2,
        }
    }
}

const UNLIMITED: usize = usize::MAX;

/// Storage that fails every write once its write budget is spent.
pub struct CrashingStorage {
    inner: Arc<dyn AtomEventStorage>,
    remaining: AtomicUsize,
}

impl CrashingStorage {
    /// Wraps `inner` with an unlimited write budget.
    pub fn new(inner: Arc<dyn AtomEventStorage>) -> Self {
        Self {
            inner,
            remaining: AtomicUsize::new(UNLIMITED),
        }
    }

    /// Lets the next writes up to `point` succeed and fails the rest.
    pub fn arm(&self, point: CrashPoint) {
        self.remaining
            .store(point.writes_before_crash(), Ordering::SeqCst);
    }

    /// Restores the unlimited write budget ("restarts the process").
    pub fn recover(&self) {
        self.remaining.store(UNLIMITED, Ordering::SeqCst);
    }

    /// The wrapped storage.
    pub fn inner(&self) -> &Arc<dyn AtomEventStorage> {
        &self.inner
    }
}

impl AtomEventStorage for CrashingStorage {
    fn read_feed(&self, href: &str) -> StorageResult<String> {
        self.inner.read_feed(href)
    }

    fn write_feed(&self, href: &str, document: &str) -> StorageResult<()> {
        let allowed = self
            .remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| match n {
                0 => None,
                UNLIMITED => Some(UNLIMITED),
                n => Some(n - 1),
            })
            .is_ok();
        if !allowed {
            return Err(StorageError::Io(io::Error::new(
                io::ErrorKind::Other,
                format!("simulated crash before writing {href}"),
            )));
        }
        self.inner.write_feed(href, document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atomlog_core::{FeedId, InMemoryStorage};

    #[test]
    fn budget_is_enforced_then_recovered() {
        let storage = CrashingStorage::new(Arc::new(InMemoryStorage::in_memory()));
        let href = FeedId::new_id().href();
        storage.arm(CrashPoint::AfterNewPage);
        assert!(storage.write_feed(&href, "<a/>").is_ok());
        assert!(matches!(
            storage.write_feed(&href, "<b/>"),
            Err(StorageError::Io(_))
        ));
        assert_eq!(storage.read_feed(&href).unwrap(), "<a/>");
        storage.recover();
        assert!(storage.write_feed(&href, "<c/>").is_ok());
    }
}
