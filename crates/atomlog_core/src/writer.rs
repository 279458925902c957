//! Appending entries and growing the page chain.
//!
//! A stream is an index document at the stream's href plus a chain of pages
//! linked `first -> next -> ... -> last`. Each page holds at most
//! `page_size` entries, newest first. Appending never takes a lock: the
//! writer walks from the index's `last` link to the real tail, repairing a
//! stale `last` link on the way, and writes the new page before the
//! documents that point at it. A crash between writes leaves either an
//! unreferenced page (never read) or a stale `last` link (fixed by the next
//! append).

use crate::chain::{resolve_tail, self_href};
use crate::config::Config;
use crate::error::CoreResult;
use crate::id::FeedId;
use crate::model::{now, rel, Author, Entry, Feed, Link};
use crate::storage::{read_feed, write_feed, AtomEventStorage};
use atomlog_codec::{ContentSerializer, Payload};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Appends entries to a stream.
pub struct PageWriter<'a> {
    storage: &'a dyn AtomEventStorage,
    codec: &'a dyn ContentSerializer,
    config: &'a Config,
}

impl<'a> PageWriter<'a> {
    /// Creates a writer over the given collaborators.
    pub fn new(
        storage: &'a dyn AtomEventStorage,
        codec: &'a dyn ContentSerializer,
        config: &'a Config,
    ) -> Self {
        Self {
            storage,
            codec,
            config,
        }
    }

    /// Appends `payload` to `stream` and returns the new entry's id.
    ///
    /// # Errors
    ///
    /// Storage errors propagate unchanged; nothing is rolled back or
    /// retried. A malformed page or an undecodable entry on the tail page
    /// also fails the append.
    pub fn append(&self, stream: FeedId, payload: Payload) -> CoreResult<Uuid> {
        self.config.validate()?;

        let index = read_feed(self.storage, &stream.href(), self.codec)?;
        let mut dirty = false;

        let first = match index.link(rel::FIRST) {
            Some(link) => link.clone(),
            None => {
                dirty = true;
                Link::first(FeedId::new_id().href())
            }
        };
        let mut last = match index.link(rel::LAST) {
            Some(link) => link.clone(),
            None => {
                dirty = true;
                first.to_last_link()
            }
        };

        let recorded = read_feed(self.storage, last.href(), self.codec)?;
        let tail = resolve_tail(self.storage, self.codec, recorded)?;
        let tail_href = self_href(&tail)?.to_string();
        if tail_href != last.href() {
            warn!(
                stream = %stream,
                recorded = last.href(),
                actual = %tail_href,
                "repairing stale last link"
            );
            last = Link::last(tail_href.as_str());
            dirty = true;
        }

        let at = now();
        let entry = Entry::changeset(payload, Author::new(self.config.author.as_str()), at);
        let entry_id = entry.id();

        if tail.entries().len() >= self.config.page_size {
            let page_id = FeedId::new_id();
            let page_href = page_id.href();
            let page = read_feed(self.storage, &page_href, self.codec)?
                .prepend_entry(entry)
                .with_updated(at)
                .add_link(Link::previous(tail_href.as_str()));
            let tail = if tail.link(rel::NEXT).is_none() {
                tail.add_link(Link::next(page_href.as_str()))
            } else {
                tail
            };
            let index = Self::with_bounds(&index, first, Link::last(page_href.as_str()));

            write_feed(self.storage, &page, self.codec)?;
            write_feed(self.storage, &tail, self.codec)?;
            write_feed(self.storage, &index, self.codec)?;
            info!(stream = %stream, page = %page_href, previous = %tail_href, "started new page");
        } else {
            let tail = tail.prepend_entry(entry).with_updated(at);
            write_feed(self.storage, &tail, self.codec)?;
            if dirty {
                let index = Self::with_bounds(&index, first, last);
                write_feed(self.storage, &index, self.codec)?;
            }
            debug!(
                stream = %stream,
                page = %tail_href,
                entries = tail.entries().len(),
                "appended entry"
            );
        }

        Ok(entry_id)
    }

    fn with_bounds(index: &Feed, first: Link, last: Link) -> Feed {
        let links: Vec<Link> = index
            .links()
            .iter()
            .filter(|l| !l.is_first() && !l.is_last())
            .cloned()
            .chain([first, last])
            .collect();
        index.with_links(links).with_updated(now())
    }
}
