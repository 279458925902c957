//! Pages command implementation.

use super::{walk_chain, CommandResult};
use atomlog_core::model::rel;
use atomlog_core::{FeedId, FileStorage, Link};
use std::path::Path;

/// One page in the chain.
#[derive(Debug)]
pub struct PageInfo {
    /// The page's own address.
    pub href: String,
    /// Number of entries on the page.
    pub entries: usize,
    /// Every link except `self`.
    pub links: Vec<Link>,
}

/// Lists the pages of `stream`, oldest first.
pub fn collect(path: &Path, stream: FeedId) -> CommandResult<Vec<PageInfo>> {
    let storage = FileStorage::open(path)?;
    let (_, pages) = walk_chain(&storage, stream)?;
    Ok(pages
        .iter()
        .map(|page| PageInfo {
            href: page
                .self_link()
                .map(|l| l.href().to_string())
                .unwrap_or_default(),
            entries: page.entries().len(),
            links: page.links_except(rel::SELF).cloned().collect(),
        })
        .collect())
}

/// Runs the pages command.
pub fn run(path: &Path, stream: &str) -> CommandResult<()> {
    let stream: FeedId = stream.parse()?;
    let pages = collect(path, stream)?;

    println!("Stream {stream}");
    if pages.is_empty() {
        println!("  (never written)");
        return Ok(());
    }

    let total: usize = pages.iter().map(|p| p.entries).sum();
    for (i, page) in pages.iter().enumerate() {
        println!("  [{:>3}] {}  {} entries", i + 1, page.href, page.entries);
        for link in &page.links {
            println!("          {link}");
        }
    }
    println!();
    println!("{} pages, {} entries", pages.len(), total);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use atomlog_testkit::prelude::{reopen, Tick};
    use tempfile::TempDir;

    #[test]
    fn lists_pages_oldest_first() {
        let dir = TempDir::new().unwrap();
        let id = FeedId::new_id();
        let stream = reopen(dir.path(), id, 2);
        for n in 0..3 {
            stream.append(Tick { n }).unwrap();
        }

        let pages = collect(dir.path(), id).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].entries, 2);
        assert_eq!(pages[1].entries, 1);
        assert!(pages[0].links.iter().any(|l| l.is_next()));
        assert!(pages[1].links.iter().any(|l| l.is_previous()));
        assert!(run(dir.path(), &id.to_string()).is_ok());
    }

    #[test]
    fn unknown_stream_has_no_pages() {
        let dir = TempDir::new().unwrap();
        assert!(collect(dir.path(), FeedId::new_id()).unwrap().is_empty());
        assert!(run(dir.path(), "not-a-stream").is_err());
    }
}
