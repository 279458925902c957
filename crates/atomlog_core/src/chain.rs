//! Walking the linked chain of pages.

use crate::error::{CoreError, CoreResult};
use crate::model::{rel, Feed};
use crate::storage::{read_feed, AtomEventStorage};
use atomlog_codec::ContentSerializer;
use std::collections::HashSet;

/// The href of a page's `self` link.
pub(crate) fn self_href(feed: &Feed) -> CoreResult<&str> {
    feed.self_link()
        .map(|link| link.href())
        .ok_or_else(|| CoreError::invalid_format(format!("page {} has no self link", feed.id())))
}

/// Tracks visited pages so a looping chain fails instead of spinning.
#[derive(Debug, Default)]
pub(crate) struct Visited(HashSet<String>);

impl Visited {
    pub(crate) fn enter(&mut self, href: &str) -> CoreResult<()> {
        if self.0.insert(href.to_string()) {
            Ok(())
        } else {
            Err(CoreError::invalid_format(format!(
                "page chain loops back to {href}"
            )))
        }
    }
}

/// Follows `next` links from `page` until a page has none and returns it.
pub(crate) fn resolve_tail(
    storage: &dyn AtomEventStorage,
    codec: &dyn ContentSerializer,
    page: Feed,
) -> CoreResult<Feed> {
    let mut visited = Visited::default();
    let mut page = page;
    loop {
        visited.enter(self_href(&page)?)?;
        let Some(next) = page.link(rel::NEXT).map(|l| l.href().to_string()) else {
            return Ok(page);
        };
        page = read_feed(storage, &next, codec)?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::FeedId;
    use crate::model::{now, Author, Link};
    use crate::storage::{write_feed, InMemoryStorage};
    use atomlog_codec::RawContentSerializer;

    fn page(id: FeedId, next: Option<FeedId>) -> Feed {
        let feed = Feed::new(id, "p", now(), Author::new("t")).add_link(Link::self_link(id.href()));
        match next {
            Some(next) => feed.add_link(Link::next(next.href())),
            None => feed,
        }
    }

    #[test]
    fn walks_to_the_end() {
        let storage = InMemoryStorage::in_memory();
        let (a, b, c) = (FeedId::new_id(), FeedId::new_id(), FeedId::new_id());
        for feed in [page(a, Some(b)), page(b, Some(c)), page(c, None)] {
            write_feed(&storage, &feed, &RawContentSerializer).unwrap();
        }
        let start = read_feed(&storage, &a.href(), &RawContentSerializer).unwrap();
        let tail = resolve_tail(&storage, &RawContentSerializer, start).unwrap();
        assert_eq!(tail.id(), c);
    }

    #[test]
    fn unwritten_next_page_is_the_tail() {
        let storage = InMemoryStorage::in_memory();
        let (a, b) = (FeedId::new_id(), FeedId::new_id());
        write_feed(&storage, &page(a, Some(b)), &RawContentSerializer).unwrap();
        let start = read_feed(&storage, &a.href(), &RawContentSerializer).unwrap();
        let tail = resolve_tail(&storage, &RawContentSerializer, start).unwrap();
        assert_eq!(tail.id(), b);
        assert!(tail.entries().is_empty());
    }

    #[test]
    fn loops_are_reported() {
        let storage = InMemoryStorage::in_memory();
        let (a, b) = (FeedId::new_id(), FeedId::new_id());
        write_feed(&storage, &page(a, Some(b)), &RawContentSerializer).unwrap();
        write_feed(&storage, &page(b, Some(a)), &RawContentSerializer).unwrap();
        let start = read_feed(&storage, &a.href(), &RawContentSerializer).unwrap();
        assert!(matches!(
            resolve_tail(&storage, &RawContentSerializer, start),
            Err(CoreError::InvalidFormat { .. })
        ));
    }
}
