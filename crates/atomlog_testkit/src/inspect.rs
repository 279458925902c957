//! Chain inspection for assertions.
//!
//! Pages are read with the pass-through codec, so any stored stream can be
//! inspected without knowing its payload types.

use atomlog_codec::RawContentSerializer;
use atomlog_core::model::rel;
use atomlog_core::{read_feed, AtomEventStorage, Feed, FeedId};
use std::collections::HashSet;

/// Reads a stream's index document.
pub fn index(storage: &dyn AtomEventStorage, stream: FeedId) -> Feed {
    read_feed(storage, &stream.href(), &RawContentSerializer).expect("Failed to read index")
}

/// Reads one document.
pub fn page(storage: &dyn AtomEventStorage, href: &str) -> Feed {
    read_feed(storage, href, &RawContentSerializer).expect("Failed to read page")
}

/// Every page reachable from the index's `first` link, oldest first.
///
/// # Panics
///
/// Panics if a page cannot be read or the chain loops.
pub fn chain(storage: &dyn AtomEventStorage, stream: FeedId) -> Vec<Feed> {
    let index = index(storage, stream);
    let mut pages = Vec::new();
    let mut seen = HashSet::new();
    let mut next = index.link(rel::FIRST).map(|l| l.href().to_string());
    while let Some(href) = next {
        assert!(seen.insert(href.clone()), "page chain loops at {href}");
        let feed = page(storage, &href);
        next = feed.link(rel::NEXT).map(|l| l.href().to_string());
        pages.push(feed);
    }
    pages
}

/// Entry counts per page, oldest page first.
pub fn page_sizes(storage: &dyn AtomEventStorage, stream: FeedId) -> Vec<usize> {
    chain(storage, stream)
        .iter()
        .map(|p| p.entries().len())
        .collect()
}

fn self_href(feed: &Feed) -> &str {
    feed.self_link().expect("page without self link").href()
}

/// Asserts the structural invariants of a written stream:
///
/// - the index has exactly one `first` and one `last` link
/// - `last` names the final page of the chain
/// - every page except the newest holds exactly `page_size` entries and
///   one `next` link; the newest holds none
/// - `previous` links mirror `next` links
pub fn assert_chain(storage: &dyn AtomEventStorage, stream: FeedId, page_size: usize) {
    let index = index(storage, stream);
    assert_eq!(
        index.links().iter().filter(|l| l.is_first()).count(),
        1,
        "index must have one first link"
    );
    assert_eq!(
        index.links().iter().filter(|l| l.is_last()).count(),
        1,
        "index must have one last link"
    );

    let pages = chain(storage, stream);
    let newest = pages.last().expect("written stream has a page");
    assert_eq!(
        index.link(rel::LAST).map(|l| l.href()),
        Some(self_href(newest)),
        "last link must name the tail"
    );
    assert!(newest.link(rel::NEXT).is_none(), "tail must not link onward");
    assert!(
        (1..=page_size).contains(&newest.entries().len()),
        "tail must hold between 1 and {page_size} entries"
    );

    for (older, newer) in pages.iter().zip(pages.iter().skip(1)) {
        assert_eq!(older.entries().len(), page_size, "interior page not full");
        assert_eq!(
            older.links().iter().filter(|l| l.is_next()).count(),
            1,
            "interior page must have one next link"
        );
        assert_eq!(
            newer.link(rel::PREVIOUS).map(|l| l.href()),
            Some(self_href(older)),
            "previous link must mirror next link"
        );
    }
    assert!(
        pages[0].link(rel::PREVIOUS).is_none(),
        "oldest page must not link backward"
    );
}
