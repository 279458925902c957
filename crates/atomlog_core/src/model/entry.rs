//! Atom entries.

use super::{
    atom, atom_text, expect_atom, format_timestamp, parse_timestamp, parse_uuid, required_child,
    same_links, Author, Link, ATOM_NAMESPACE, CONTENT_TYPE,
};
use crate::error::{CoreError, CoreResult};
use atomlog_codec::{ContentSerializer, Payload, XmlElement};
use chrono::{DateTime, FixedOffset};
use uuid::Uuid;

/// One appended event: an Atom entry whose content is the encoded payload.
#[derive(Debug, Clone)]
pub struct Entry {
    id: Uuid,
    title: String,
    published: DateTime<FixedOffset>,
    updated: DateTime<FixedOffset>,
    author: Author,
    content: Payload,
    links: Vec<Link>,
}

impl Entry {
    /// Creates an entry with no links.
    pub fn new(
        id: Uuid,
        title: impl Into<String>,
        published: DateTime<FixedOffset>,
        updated: DateTime<FixedOffset>,
        author: Author,
        content: Payload,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            published,
            updated,
            author,
            content,
            links: Vec::new(),
        }
    }

    /// Creates a changeset entry for `content`: a fresh id, the title
    /// `Changeset <uuid>`, both timestamps set to `at`, and a self link to
    /// the entry's id.
    pub fn changeset(content: Payload, author: Author, at: DateTime<FixedOffset>) -> Self {
        let id = Uuid::new_v4();
        Self::new(id, format!("Changeset {id}"), at, at, author, content)
            .add_link(Link::self_link(id.hyphenated().to_string()))
    }

    /// The entry id.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// When the entry was first published.
    #[must_use]
    pub fn published(&self) -> DateTime<FixedOffset> {
        self.published
    }

    /// When the entry was last updated.
    #[must_use]
    pub fn updated(&self) -> DateTime<FixedOffset> {
        self.updated
    }

    /// The author.
    #[must_use]
    pub fn author(&self) -> &Author {
        &self.author
    }

    /// The payload.
    #[must_use]
    pub fn content(&self) -> &Payload {
        &self.content
    }

    /// Consumes the entry and returns its payload.
    #[must_use]
    pub fn into_content(self) -> Payload {
        self.content
    }

    /// The links.
    #[must_use]
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// The entry's `self` link, if present.
    #[must_use]
    pub fn self_link(&self) -> Option<&Link> {
        self.links.iter().find(|l| l.is_self())
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

    /// Returns a copy with a different payload.
    #[must_use]
    pub fn with_content(&self, content: Payload) -> Self {
        Self {
            content,
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

    /// Returns the entry with one more link.
    #[must_use]
    pub fn add_link(mut self, link: Link) -> Self {
        self.links.push(link);
        self
    }

    /// Writes the `<entry>` element, encoding the payload with `codec`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Codec`] if the payload cannot be encoded.
    pub fn to_element(&self, codec: &dyn ContentSerializer) -> CoreResult<XmlElement> {
        let content = atom("content")
            .with_attribute("type", CONTENT_TYPE)
            .with_child(codec.serialize(&self.content)?);

        let mut entry = atom("entry")
            .with_child(atom_text("id", self.id.urn().to_string()))
            .with_child(atom_text("title", self.title.as_str()).with_attribute("type", "text"))
            .with_child(atom_text("published", format_timestamp(&self.published)))
            .with_child(atom_text("updated", format_timestamp(&self.updated)))
            .with_child(self.author.to_element());
        for link in &self.links {
            entry.push_child(link.to_element());
        }
        entry.push_child(content);
        Ok(entry)
    }

    /// Reads an `<entry>` element, decoding its content with `codec`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidFormat`] if the element is malformed, or
    /// [`CoreError::Codec`] if the content cannot be decoded.
    pub fn from_element(element: &XmlElement, codec: &dyn ContentSerializer) -> CoreResult<Self> {
        expect_atom(element, "entry")?;

        let content = required_child(element, "content")?;
        match content.attribute("type") {
            Some(CONTENT_TYPE) => {}
            Some(other) => {
                return Err(CoreError::invalid_format(format!(
                    "<content> has type {other:?}, expected {CONTENT_TYPE:?}"
                )))
            }
            None => {
                return Err(CoreError::invalid_format(
                    "<content> has no type attribute",
                ))
            }
        }
        let [payload] = content.children.as_slice() else {
            return Err(CoreError::invalid_format(format!(
                "<content> must contain exactly one element, found {}",
                content.children.len()
            )));
        };

        let links = element
            .children_named(ATOM_NAMESPACE, "link")
            .map(Link::from_element)
            .collect::<CoreResult<Vec<_>>>()?;

        Ok(Self {
            id: parse_uuid(required_child(element, "id")?)?,
            title: required_child(element, "title")?.text.clone(),
            published: parse_timestamp(required_child(element, "published")?)?,
            updated: parse_timestamp(required_child(element, "updated")?)?,
            author: Author::from_element(required_child(element, "author")?)?,
            content: codec.deserialize(payload)?,
            links,
        })
    }

    /// Parses a standalone `<entry>` document.
    ///
    /// # Errors
    ///
    /// Returns an error if the markup is malformed or not a valid entry.
    pub fn parse(xml: &str, codec: &dyn ContentSerializer) -> CoreResult<Self> {
        Self::from_element(&XmlElement::parse(xml)?, codec)
    }

    /// Serializes as a standalone document.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be encoded.
    pub fn to_xml_string(&self, codec: &dyn ContentSerializer) -> CoreResult<String> {
        Ok(self.to_element(codec)?.to_xml_string()?)
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.title == other.title
            && self.published == other.published
            && self.updated == other.updated
            && self.author == other.author
            && self.content == other.content
            && same_links(&self.links, &other.links)
    }
}
