//! Atom feed document model.
//!
//! Pages and index documents are Atom feeds:
//!
//! ```text
//! <feed xmlns="http://www.w3.org/2005/Atom">
//!   <id>urn:uuid:...</id>
//!   <title type="text">...</title>
//!   <updated>2024-03-01T12:30:00.123456+00:00</updated>
//!   <author><name>...</name></author>
//!   <link href="..." rel="..."/>*
//!   <entry>...</entry>*               (newest first)
//! </feed>
//! ```
//!
//! All model values are immutable; `with_*` methods return a changed copy.

mod author;
mod entry;
mod feed;
mod link;

pub use author::Author;
pub use entry::Entry;
pub use feed::Feed;
pub use link::{rel, Link};

use crate::error::{CoreError, CoreResult};
use atomlog_codec::XmlElement;
use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use uuid::Uuid;

/// The Atom namespace.
pub const ATOM_NAMESPACE: &str = "http://www.w3.org/2005/Atom";

/// Media type of entry content.
pub const CONTENT_TYPE: &str = "application/xml";

/// The current time with a UTC offset.
#[must_use]
pub fn now() -> DateTime<FixedOffset> {
    Utc::now().fixed_offset()
}

pub(crate) fn atom(name: &str) -> XmlElement {
    XmlElement::new(ATOM_NAMESPACE, name)
}

pub(crate) fn atom_text(name: &str, text: impl Into<String>) -> XmlElement {
    atom(name).with_text(text)
}

pub(crate) fn format_timestamp(at: &DateTime<FixedOffset>) -> String {
    at.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}

/// Fails unless `element` is the Atom element `name`.
pub(crate) fn expect_atom(element: &XmlElement, name: &str) -> CoreResult<()> {
    if element.is(ATOM_NAMESPACE, name) {
        return Ok(());
    }
    Err(CoreError::invalid_format(format!(
        "expected <{name}> in {ATOM_NAMESPACE}, found <{}> in {:?}",
        element.name, element.namespace
    )))
}

pub(crate) fn required_child<'a>(
    parent: &'a XmlElement,
    name: &str,
) -> CoreResult<&'a XmlElement> {
    parent.child(ATOM_NAMESPACE, name).ok_or_else(|| {
        CoreError::invalid_format(format!("<{}> has no <{name}> element", parent.name))
    })
}

pub(crate) fn parse_timestamp(element: &XmlElement) -> CoreResult<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(element.text.trim()).map_err(|e| {
        CoreError::invalid_format(format!(
            "<{}> is not an RFC 3339 timestamp: {e}",
            element.name
        ))
    })
}

pub(crate) fn parse_uuid(element: &XmlElement) -> CoreResult<Uuid> {
    Uuid::parse_str(element.text.trim()).map_err(|e| {
        CoreError::invalid_format(format!("<{}> is not a UUID: {e}", element.name))
    })
}

/// Compares two link lists as multisets.
pub(crate) fn same_links(a: &[Link], b: &[Link]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut a: Vec<&Link> = a.iter().collect();
    let mut b: Vec<&Link> = b.iter().collect();
    a.sort();
    b.sort();
    a == b
}
