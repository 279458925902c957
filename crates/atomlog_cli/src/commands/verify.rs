//! Verify command implementation.

use super::{walk_chain, CommandResult};
use atomlog_core::model::rel;
use atomlog_core::{Feed, FeedId, FileStorage};
use std::path::Path;

/// Verification result.
#[derive(Debug, Default)]
pub struct VerifyResult {
    /// Number of pages checked.
    pub pages_checked: usize,
    /// Number of entries seen.
    pub entries: usize,
    /// Conditions the next append repairs on its own.
    pub warnings: Vec<String>,
    /// Broken invariants.
    pub errors: Vec<String>,
}

impl VerifyResult {
    fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

fn href(page: &Feed) -> &str {
    page.self_link().map(|l| l.href()).unwrap_or("")
}

/// Checks the chain of `stream`.
///
/// `page_size` defaults to the entry count of the oldest page.
pub fn check(path: &Path, stream: FeedId, page_size: Option<usize>) -> CommandResult<VerifyResult> {
    let storage = FileStorage::open(path)?;
    let (index, pages) = walk_chain(&storage, stream)?;
    let mut result = VerifyResult {
        pages_checked: pages.len(),
        entries: pages.iter().map(|p| p.entries().len()).sum(),
        ..VerifyResult::default()
    };

    let firsts = index.links().iter().filter(|l| l.is_first()).count();
    let lasts = index.links().iter().filter(|l| l.is_last()).count();
    if firsts > 1 {
        result.errors.push(format!("index has {firsts} first links"));
    }
    if lasts > 1 {
        result.errors.push(format!("index has {lasts} last links"));
    }
    if !index.entries().is_empty() {
        result
            .errors
            .push(format!("index holds {} entries", index.entries().len()));
    }

    let Some(tail) = pages.last() else {
        if lasts > 0 {
            result.errors.push("index has a last link but no first link".into());
        }
        return Ok(result);
    };

    match index.link(rel::LAST) {
        Some(last) if last.href() == href(tail) => {}
        Some(last) => result.warnings.push(format!(
            "last link names {} but the tail is {}",
            last.href(),
            href(tail)
        )),
        None => result.warnings.push("index has no last link".into()),
    }

    let page_size = page_size.unwrap_or_else(|| pages[0].entries().len());
    if pages[0].link(rel::PREVIOUS).is_some() {
        result
            .errors
            .push(format!("oldest page {} links backward", href(&pages[0])));
    }

    for page in &pages {
        if page.self_link().is_none() {
            result.errors.push(format!("page {} has no self link", page.id()));
        }
        if page.entries().len() > page_size {
            result.errors.push(format!(
                "page {} holds {} entries, more than {page_size}",
                href(page),
                page.entries().len()
            ));
        }
        let newest_first = page
            .entries()
            .windows(2)
            .all(|pair| pair[0].published() >= pair[1].published());
        if !newest_first {
            result
                .errors
                .push(format!("page {} is not ordered newest first", href(page)));
        }
    }

    for (older, newer) in pages.iter().zip(pages.iter().skip(1)) {
        if older.entries().len() != page_size {
            result.errors.push(format!(
                "interior page {} holds {} entries, expected {page_size}",
                href(older),
                older.entries().len()
            ));
        }
        let nexts = older.links().iter().filter(|l| l.is_next()).count();
        if nexts != 1 {
            result
                .errors
                .push(format!("page {} has {nexts} next links", href(older)));
        }
        if newer.link(rel::PREVIOUS).map(|l| l.href()) != Some(href(older)) {
            result.errors.push(format!(
                "page {} does not link back to {}",
                href(newer),
                href(older)
            ));
        }
    }

    Ok(result)
}

/// Runs the verify command.
pub fn run(path: &Path, stream: &str, page_size: Option<usize>) -> CommandResult<()> {
    let stream: FeedId = stream.parse()?;
    println!("Verifying stream {stream} in {:?}", path);
    println!();

    let result = check(path, stream, page_size)?;
    println!("  Pages checked: {}", result.pages_checked);
    println!("  Entries:       {}", result.entries);
    for warning in &result.warnings {
        println!("  warning: {warning}");
    }
    for error in &result.errors {
        println!("  error: {error}");
    }

    println!();
    if result.is_ok() {
        println!("✓ Stream verification passed");
        Ok(())
    } else {
        println!("✗ Stream verification failed");
        Err("Verification failed".into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atomlog_codec::RawContentSerializer;
    use atomlog_core::{write_feed, AtomEventStorage, Link};
    use atomlog_testkit::prelude::{reopen, Tick};
    use tempfile::TempDir;

    fn written(page_size: usize, count: u64) -> (TempDir, FeedId) {
        let dir = TempDir::new().unwrap();
        let id = FeedId::new_id();
        let stream = reopen(dir.path(), id, page_size);
        for n in 0..count {
            stream.append(Tick { n }).unwrap();
        }
        (dir, id)
    }

    #[test]
    fn healthy_stream_passes() {
        let (dir, id) = written(3, 7);
        let result = check(dir.path(), id, Some(3)).unwrap();
        assert!(result.is_ok(), "{:?}", result.errors);
        assert!(result.warnings.is_empty());
        assert_eq!(result.pages_checked, 3);
        assert_eq!(result.entries, 7);
        assert!(run(dir.path(), &id.href(), None).is_ok());
    }

    #[test]
    fn empty_stream_passes() {
        let dir = TempDir::new().unwrap();
        let result = check(dir.path(), FeedId::new_id(), None).unwrap();
        assert!(result.is_ok());
        assert_eq!(result.pages_checked, 0);
    }

    #[test]
    fn stale_last_link_is_a_warning() {
        let (dir, id) = written(2, 3);
        let storage = FileStorage::open(dir.path()).unwrap();
        let index = super::super::read_raw(&storage, &id.href()).unwrap();
        let first = index.link(rel::FIRST).unwrap().clone();
        let links: Vec<Link> = index
            .links_except(rel::LAST)
            .cloned()
            .chain([first.to_last_link()])
            .collect();
        write_feed(&storage, &index.with_links(links), &RawContentSerializer).unwrap();

        let result = check(dir.path(), id, None).unwrap();
        assert!(result.is_ok());
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn wrong_page_size_is_an_error() {
        let (dir, id) = written(2, 5);
        let result = check(dir.path(), id, Some(3)).unwrap();
        assert!(!result.is_ok());
        let storage = FileStorage::open(dir.path()).unwrap();
        assert!(storage.read_feed(&id.href()).is_ok());
    }
}
