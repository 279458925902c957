//! Newest-to-oldest replay.

use super::{Direction, Events, ReadContext};
use crate::chain::resolve_tail;
use crate::error::CoreResult;
use crate::id::FeedId;
use crate::model::{rel, Feed};

/// Replays a stream from its newest entry to its oldest.
///
/// The reader resolves the true tail the same way an append does (from
/// `last`, or `first` when `last` is missing, then along `next` links), and
/// follows `previous` links from there. Each page's entries are yielded in
/// storage order.
#[derive(Clone)]
pub struct BackwardReader {
    context: ReadContext,
}

impl BackwardReader {
    pub(crate) fn new(context: ReadContext) -> Self {
        Self { context }
    }

    /// The stream being read.
    #[must_use]
    pub fn stream(&self) -> FeedId {
        self.context.stream
    }

    /// Starts a new replay from the index.
    #[must_use]
    pub fn iter(&self) -> Events {
        Events::new(self.context.clone(), Direction::Backward)
    }
}

impl IntoIterator for &BackwardReader {
    type Item = CoreResult<atomlog_codec::Payload>;
    type IntoIter = Events;

    fn into_iter(self) -> Events {
        self.iter()
    }
}

pub(super) fn last_page(context: &ReadContext) -> CoreResult<Option<Feed>> {
    let index = context.index()?;
    let Some(start) = index.link(rel::LAST).or_else(|| index.link(rel::FIRST)) else {
        return Ok(None);
    };
    let page = context.read(start.href())?;
    resolve_tail(context.storage.as_ref(), context.codec.as_ref(), page).map(Some)
}
