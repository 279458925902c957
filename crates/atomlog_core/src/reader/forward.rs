//! Oldest-to-newest replay.

use super::{Direction, Events, ReadContext};
use crate::error::CoreResult;
use crate::id::FeedId;
use crate::model::{rel, Feed};

/// Replays a stream from its oldest entry to its newest.
///
/// The reader starts at the index's `first` link and follows `next` links.
/// Each page's entries are yielded in reverse storage order.
#[derive(Clone)]
pub struct ForwardReader {
    context: ReadContext,
}

impl ForwardReader {
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
        Events::new(self.context.clone(), Direction::Forward)
    }
}

impl IntoIterator for &ForwardReader {
    type Item = CoreResult<atomlog_codec::Payload>;
    type IntoIter = Events;

    fn into_iter(self) -> Events {
        self.iter()
    }
}

pub(super) fn first_page(context: &ReadContext) -> CoreResult<Option<Feed>> {
    let index = context.index()?;
    match index.link(rel::FIRST) {
        Some(first) => context.read(first.href()).map(Some),
        None => Ok(None),
    }
}
