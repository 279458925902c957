//! Atom links.

use super::{atom, expect_atom};
use crate::error::{CoreError, CoreResult};
use atomlog_codec::XmlElement;

/// Link relation names.
pub mod rel {
    /// The document's own address.
    pub const SELF: &str = "self";
    /// The oldest page of a stream (index only).
    pub const FIRST: &str = "first";
    /// The newest page of a stream (index only).
    pub const LAST: &str = "last";
    /// The chronologically next page.
    pub const NEXT: &str = "next";
    /// The chronologically previous page.
    pub const PREVIOUS: &str = "previous";
    /// The source a document was derived from.
    pub const VIA: &str = "via";
}

/// A typed link: a relation and a target address.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Link {
    rel: String,
    href: String,
}

impl Link {
    /// Creates a link.
    pub fn new(rel: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            rel: rel.into(),
            href: href.into(),
        }
    }

    /// Creates a `self` link.
    pub fn self_link(href: impl Into<String>) -> Self {
        Self::new(rel::SELF, href)
    }

    /// Creates a `first` link.
    pub fn first(href: impl Into<String>) -> Self {
        Self::new(rel::FIRST, href)
    }

    /// Creates a `last` link.
    pub fn last(href: impl Into<String>) -> Self {
        Self::new(rel::LAST, href)
    }

    /// Creates a `next` link.
    pub fn next(href: impl Into<String>) -> Self {
        Self::new(rel::NEXT, href)
    }

    /// Creates a `previous` link.
    pub fn previous(href: impl Into<String>) -> Self {
        Self::new(rel::PREVIOUS, href)
    }

    /// Creates a `via` link.
    pub fn via(href: impl Into<String>) -> Self {
        Self::new(rel::VIA, href)
    }

    /// The relation.
    #[must_use]
    pub fn rel(&self) -> &str {
        &self.rel
    }

    /// The target address.
    #[must_use]
    pub fn href(&self) -> &str {
        &self.href
    }

    /// Returns `true` if this link has relation `rel`.
    #[must_use]
    pub fn has_rel(&self, rel: &str) -> bool {
        self.rel == rel
    }

    /// Returns `true` for a `self` link.
    #[must_use]
    pub fn is_self(&self) -> bool {
        self.has_rel(rel::SELF)
    }

    /// Returns `true` for a `first` link.
    #[must_use]
    pub fn is_first(&self) -> bool {
        self.has_rel(rel::FIRST)
    }

    /// Returns `true` for a `last` link.
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.has_rel(rel::LAST)
    }

    /// Returns `true` for a `next` link.
    #[must_use]
    pub fn is_next(&self) -> bool {
        self.has_rel(rel::NEXT)
    }

    /// Returns `true` for a `previous` link.
    #[must_use]
    pub fn is_previous(&self) -> bool {
        self.has_rel(rel::PREVIOUS)
    }

    /// Returns `true` for a `via` link.
    #[must_use]
    pub fn is_via(&self) -> bool {
        self.has_rel(rel::VIA)
    }

    /// The same target with a different relation.
    #[must_use]
    pub fn with_rel(&self, rel: impl Into<String>) -> Self {
        Self::new(rel, self.href.clone())
    }

    /// The same target as a `self` link.
    #[must_use]
    pub fn to_self_link(&self) -> Self {
        self.with_rel(rel::SELF)
    }

    /// The same target as a `first` link.
    #[must_use]
    pub fn to_first_link(&self) -> Self {
        self.with_rel(rel::FIRST)
    }

    /// The same target as a `last` link.
    #[must_use]
    pub fn to_last_link(&self) -> Self {
        self.with_rel(rel::LAST)
    }

    /// The same target as a `next` link.
    #[must_use]
    pub fn to_next_link(&self) -> Self {
        self.with_rel(rel::NEXT)
    }

    /// The same target as a `previous` link.
    #[must_use]
    pub fn to_previous_link(&self) -> Self {
        self.with_rel(rel::PREVIOUS)
    }

    /// The same target as a `via` link.
    #[must_use]
    pub fn to_via_link(&self) -> Self {
        self.with_rel(rel::VIA)
    }

    /// Writes `<link href="..." rel="..."/>`.
    #[must_use]
    pub fn to_element(&self) -> XmlElement {
        atom("link")
            .with_attribute("href", self.href.as_str())
            .with_attribute("rel", self.rel.as_str())
    }

    /// Reads a `<link>` element.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidFormat`] if the element is not an Atom
    /// link or lacks `href` or `rel`.
    pub fn from_element(element: &XmlElement) -> CoreResult<Self> {
        expect_atom(element, "link")?;
        let href = element
            .attribute("href")
            .ok_or_else(|| CoreError::invalid_format("<link> has no href attribute"))?;
        let rel = element
            .attribute("rel")
            .ok_or_else(|| CoreError::invalid_format("<link> has no rel attribute"))?;
        Ok(Self::new(rel, href))
    }

    /// Parses a standalone `<link>` document.
    ///
    /// # Errors
    ///
    /// Returns an error if the markup is malformed or not a valid link.
    pub fn parse(xml: &str) -> CoreResult<Self> {
        Self::from_element(&XmlElement::parse(xml)?)
    }

    /// Serializes as a standalone document.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn to_xml_string(&self) -> CoreResult<String> {
        Ok(self.to_element().to_xml_string()?)
    }
}

impl std::fmt::Display for Link {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.rel, self.href)
    }
}
