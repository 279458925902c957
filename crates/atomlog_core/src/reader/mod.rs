//! Replaying a stream.
//!
//! Both readers are lazy and restartable: every call to `iter()` starts
//! again from the stream's index. While the entries of one page are being
//! yielded, the next page is fetched on a background thread when
//! prefetching is enabled.

mod backward;
mod forward;

pub use backward::BackwardReader;
pub use forward::ForwardReader;

use crate::chain::{self_href, Visited};
use crate::error::{CoreError, CoreResult};
use crate::id::FeedId;
use crate::model::{rel, Entry, Feed};
use crate::storage::{read_feed, AtomEventStorage};
use atomlog_codec::{ContentSerializer, Payload};
use std::iter::FusedIterator;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{trace, warn};

/// Collaborators shared by a reader and the pages it fetches.
#[derive(Clone)]
pub(crate) struct ReadContext {
    pub(crate) stream: FeedId,
    pub(crate) storage: Arc<dyn AtomEventStorage>,
    pub(crate) codec: Arc<dyn ContentSerializer>,
    pub(crate) prefetch: bool,
}

impl ReadContext {
    pub(crate) fn read(&self, href: &str) -> CoreResult<Feed> {
        read_feed(self.storage.as_ref(), href, self.codec.as_ref())
    }

    pub(crate) fn index(&self) -> CoreResult<Feed> {
        self.read(&self.stream.href())
    }

    /// Starts fetching `href`, on a background thread if prefetching.
    fn fetch(&self, href: String) -> PendingPage {
        if !self.prefetch {
            return PendingPage::Ready(self.read(&href));
        }
        let context = self.clone();
        let target = href.clone();
        let spawned = thread::Builder::new()
            .name("atomlog-prefetch".to_string())
            .spawn(move || context.read(&target));
        match spawned {
            Ok(handle) => PendingPage::Loading(handle),
            Err(e) => {
                warn!(error = %e, "prefetch thread unavailable, reading inline");
                PendingPage::Deferred(href)
            }
        }
    }
}

/// Which way a reader moves along the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    /// Oldest to newest, following `next` links.
    Forward,
    /// Newest to oldest, following `previous` links.
    Backward,
}

impl Direction {
    fn link_rel(self) -> &'static str {
        match self {
            Self::Forward => rel::NEXT,
            Self::Backward => rel::PREVIOUS,
        }
    }

    /// The page a replay starts from, or `None` for a stream never written.
    fn start(self, context: &ReadContext) -> CoreResult<Option<Feed>> {
        match self {
            Self::Forward => forward::first_page(context),
            Self::Backward => backward::last_page(context),
        }
    }
}

enum PendingPage {
    /// The starting page has not been resolved yet.
    Start,
    Loading(JoinHandle<CoreResult<Feed>>),
    Ready(CoreResult<Feed>),
    /// Spawning failed; the page is read when needed.
    Deferred(String),
}

/// Iterator over the payloads of a stream.
///
/// Yields `Err` at most once; the iterator is exhausted afterwards.
pub struct Events {
    context: ReadContext,
    direction: Direction,
    entries: std::vec::IntoIter<Entry>,
    pending: Option<PendingPage>,
    visited: Visited,
}

impl Events {
    pub(crate) fn new(context: ReadContext, direction: Direction) -> Self {
        Self {
            context,
            direction,
            entries: Vec::new().into_iter(),
            pending: Some(PendingPage::Start),
            visited: Visited::default(),
        }
    }

    fn resolve(&mut self, pending: PendingPage) -> CoreResult<Option<Feed>> {
        match pending {
            PendingPage::Start => self.direction.start(&self.context),
            PendingPage::Ready(page) => page.map(Some),
            PendingPage::Loading(handle) => match handle.join() {
                Ok(page) => page.map(Some),
                Err(_) => Err(CoreError::task_failed("prefetch thread panicked")),
            },
            PendingPage::Deferred(href) => self.context.read(&href).map(Some),
        }
    }

    fn enter(&mut self, page: Feed) -> CoreResult<()> {
        self.visited.enter(self_href(&page)?)?;
        trace!(page = %page.id(), entries = page.entries().len(), "reading page");

        self.pending = page
            .link(self.direction.link_rel())
            .map(|l| self.context.fetch(l.href().to_string()));

        let mut entries = page.into_entries();
        if self.direction == Direction::Forward {
            entries.reverse();
        }
        self.entries = entries.into_iter();
        Ok(())
    }

    fn fail(&mut self, error: CoreError) -> Option<CoreResult<Payload>> {
        self.pending = None;
        self.entries = Vec::new().into_iter();
        Some(Err(error))
    }
}

impl Iterator for Events {
    type Item = CoreResult<Payload>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.entries.next() {
                return Some(Ok(entry.into_content()));
            }
            let pending = self.pending.take()?;
            match self.resolve(pending) {
                Ok(Some(page)) => {
                    if let Err(e) = self.enter(page) {
                        return self.fail(e);
                    }
                }
                Ok(None) => return None,
                Err(e) => return self.fail(e),
            }
        }
    }
}

impl FusedIterator for Events {}

impl Drop for Events {
    fn drop(&mut self) {
        // Wait for an in-flight fetch so no thread outlives the reader.
        if let Some(PendingPage::Loading(handle)) = self.pending.take() {
            let _ = handle.join();
        }
    }
}
