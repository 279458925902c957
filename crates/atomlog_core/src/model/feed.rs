//! Atom feeds: stream pages and index documents.

use super::{
    atom, atom_text, expect_atom, format_timestamp, now, parse_timestamp, required_child,
    same_links, Author, Entry, Link, ATOM_NAMESPACE,
};
use crate::error::{CoreError, CoreResult};
use crate::id::FeedId;
use atomlog_codec::{ContentSerializer, RawContentSerializer, XmlElement};
use chrono::{DateTime, FixedOffset};

/// A page of a stream, or the stream's index document.
///
/// Entries are held newest first.
#[derive(Debug, Clone)]
pub struct Feed {
    id: FeedId,
    title: String,
    updated: DateTime<FixedOffset>,
    author: Author,
    entries: Vec<Entry>,
    links: Vec<Link>,
}

impl Feed {
    /// Creates a feed with no entries or links.
    pub fn new(
        id: FeedId,
        title: impl Into<String>,
        updated: DateTime<FixedOffset>,
        author: Author,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            updated,
            author,
            entries: Vec::new(),
            links: Vec::new(),
        }
    }

    /// The empty, self-linked document a provider returns for an address
    /// that holds nothing yet.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidArgument`] if the last segment of `href`
    /// is not a feed identifier.
    pub fn empty_index(href: &str, author: Author) -> CoreResult<Self> {
        let id = FeedId::from_href(href)?;
        Ok(Self::new(id, format!("Index of event stream {id}"), now(), author)
            .add_link(Link::self_link(href)))
    }

    /// The feed id.
    #[must_use]
    pub fn id(&self) -> FeedId {
        self.id
    }

    /// The title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// When the feed was last updated.
    #[must_use]
    pub fn updated(&self) -> DateTime<FixedOffset> {
        self.updated
    }

    /// The author.
    #[must_use]
    pub fn author(&self) -> &Author {
        &self.author
    }

    /// The entries, newest first.
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Consumes the feed and returns its entries, newest first.
    #[must_use]
    pub fn into_entries(self) -> Vec<Entry> {
        self.entries
    }

    /// The links.
    #[must_use]
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// The first link with relation `rel`.
    #[must_use]
    pub fn link(&self, rel: &str) -> Option<&Link> {
        self.links.iter().find(|l| l.has_rel(rel))
    }

    /// The feed's `self` link.
    #[must_use]
    pub fn self_link(&self) -> Option<&Link> {
        self.link(super::rel::SELF)
    }

    /// All links whose relation is not `rel`.
    pub fn links_except<'a>(&'a self, rel: &'a str) -> impl Iterator<Item = &'a Link> + 'a {
        self.links.iter().filter(move |l| !l.has_rel(rel))
    }

    /// Returns a copy with a different title.
    #[must_use]
    pub fn with_title(&self, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..self.clone()
        }
    }

    /// Returns a copy with a different update time.
    #[must_use]
    pub fn with_updated(&self, updated: DateTime<FixedOffset>) -> Self {
        Self {
            updated,
            ..self.clone()
        }
    }

    /// Returns a copy with the entries replaced (newest first).
    #[must_use]
    pub fn with_entries(&self, entries: impl IntoIterator<Item = Entry>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
            ..self.clone()
        }
    }

    /// Returns a copy with the links replaced.
    #[must_use]
    pub fn with_links(&self, links: impl IntoIterator<Item = Link>) -> Self {
        Self {
            links: links.into_iter().collect(),
            ..self.clone()
        }
    }

    /// Returns the feed with one more link.
    #[must_use]
    pub fn add_link(mut self, link: Link) -> Self {
        self.links.push(link);
        self
    }

    /// Returns the feed with `entry` placed before all others.
    #[must_use]
    pub fn prepend_entry(mut self, entry: Entry) -> Self {
        self.entries.insert(0, entry);
        self
    }

    /// Writes the `<feed>` element, encoding entry payloads with `codec`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Codec`] if a payload cannot be encoded.
    pub fn to_element(&self, codec: &dyn ContentSerializer) -> CoreResult<XmlElement> {
        let mut feed = atom("feed")
            .with_child(atom_text("id", self.id.to_string()))
            .with_child(atom_text("title", self.title.as_str()).with_attribute("type", "text"))
            .with_child(atom_text("updated", format_timestamp(&self.updated)))
            .with_child(self.author.to_element());
        for link in &self.links {
            feed.push_child(link.to_element());
        }
        for entry in &self.entries {
            feed.push_child(entry.to_element(codec)?);
        }
        Ok(feed)
    }

    /// Reads a `<feed>` element, decoding entry payloads with `codec`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidFormat`] if the element is malformed, or
    /// [`CoreError::Codec`] if an entry's content cannot be decoded.
    pub fn from_element(element: &XmlElement, codec: &dyn ContentSerializer) -> CoreResult<Self> {
        expect_atom(element, "feed")?;

        let id_element = required_child(element, "id")?;
        let id = FeedId::parse(&id_element.text).map_err(|e| {
            CoreError::invalid_format(format!("<id> is not a feed identifier: {e}"))
        })?;
        let links = element
            .children_named(ATOM_NAMESPACE, "link")
            .map(Link::from_element)
            .collect::<CoreResult<Vec<_>>>()?;
        let entries = element
            .children_named(ATOM_NAMESPACE, "entry")
            .map(|e| Entry::from_element(e, codec))
            .collect::<CoreResult<Vec<_>>>()?;

        Ok(Self {
            id,
            title: required_child(element, "title")?.text.clone(),
            updated: parse_timestamp(required_child(element, "updated")?)?,
            author: Author::from_element(required_child(element, "author")?)?,
            entries,
            links,
        })
    }

    /// Parses a feed document.
    ///
    /// # Errors
    ///
    /// Returns an error if the markup is malformed or not a valid feed.
    pub fn parse(xml: &str, codec: &dyn ContentSerializer) -> CoreResult<Self> {
        Self::from_element(&XmlElement::parse(xml)?, codec)
    }

    /// Serializes as a document.
    ///
    /// # Errors
    ///
    /// Returns an error if a payload cannot be encoded.
    pub fn to_xml_string(&self, codec: &dyn ContentSerializer) -> CoreResult<String> {
        Ok(self.to_element(codec)?.to_xml_string()?)
    }

    /// Serializes an entry-less feed, which needs no payload codec.
    pub(crate) fn to_xml_string_raw(&self) -> CoreResult<String> {
        self.to_xml_string(&RawContentSerializer)
    }
}

impl PartialEq for Feed {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.title == other.title
            && self.updated == other.updated
            && self.author == other.author
            && self.entries == other.entries
            && same_links(&self.links, &other.links)
    }
}
