//! Dump command implementation.

use super::{read_raw, CommandResult};
use atomlog_codec::RawContent;
use atomlog_core::{AtomEventStorage, FileStorage};
use std::path::Path;

/// Returns the document stored at `address`.
///
/// An address with nothing stored yields the synthesized empty feed.
pub fn document(path: &Path, address: &str) -> CommandResult<String> {
    let storage = FileStorage::open(path)?;
    Ok(storage.read_feed(address)?)
}

/// Describes the document at `address` line by line.
pub fn summary(path: &Path, address: &str) -> CommandResult<Vec<String>> {
    let storage = FileStorage::open(path)?;
    let feed = read_raw(&storage, address)?;

    let mut lines = vec![
        format!("id:      {}", feed.id()),
        format!("title:   {}", feed.title()),
        format!("updated: {}", feed.updated().to_rfc3339()),
        format!("author:  {}", feed.author().name()),
    ];
    lines.extend(feed.links().iter().map(|l| format!("link:    {l}")));
    for entry in feed.entries() {
        let content = entry
            .content()
            .downcast_ref::<RawContent>()
            .map(|raw| format!("{{{}}}{}", raw.0.namespace, raw.0.name))
            .unwrap_or_default();
        lines.push(format!(
            "entry:   {} {} {}",
            entry.id(),
            entry.published().to_rfc3339(),
            content
        ));
    }
    Ok(lines)
}

/// Runs the dump command.
pub fn run(path: &Path, address: &str, summarize: bool) -> CommandResult<()> {
    if summarize {
        for line in summary(path, address)? {
            println!("{line}");
        }
    } else {
        println!("{}", document(path, address)?);
    }
    Ok(())
}
