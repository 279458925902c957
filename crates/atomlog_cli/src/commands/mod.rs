//! CLI command implementations.

pub mod dump;
pub mod pages;
pub mod verify;

use atomlog_codec::RawContentSerializer;
use atomlog_core::model::rel;
use atomlog_core::{read_feed, AtomEventStorage, Feed, FeedId};
use std::collections::HashSet;
use tracing::debug;

/// Result type shared by the commands.
pub type CommandResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Reads a document without decoding its payloads.
pub fn read_raw(storage: &dyn AtomEventStorage, href: &str) -> CommandResult<Feed> {
    Ok(read_feed(storage, href, &RawContentSerializer)?)
}

/// Pages reachable from the index's `first` link, oldest first.
///
/// Returns the index as well. A loop in the chain is an error.
pub fn walk_chain(
    storage: &dyn AtomEventStorage,
    stream: FeedId,
) -> CommandResult<(Feed, Vec<Feed>)> {
    let index = read_raw(storage, &stream.href())?;
    let mut pages = Vec::new();
    let mut seen = HashSet::new();
    let mut next = index.link(rel::FIRST).map(|l| l.href().to_string());
    while let Some(href) = next {
        if !seen.insert(href.clone()) {
            return Err(format!("page chain loops back to {href}").into());
        }
        debug!(page = %href, "reading page");
        let page = read_raw(storage, &href)?;
        next = page.link(rel::NEXT).map(|l| l.href().to_string());
        pages.push(page);
    }
    Ok((index, pages))
}
