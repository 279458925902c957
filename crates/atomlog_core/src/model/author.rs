//! Atom authors.

use super::{atom, atom_text, expect_atom, required_child};
use crate::error::CoreResult;
use atomlog_codec::XmlElement;

/// The author of an entry or feed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Author {
    name: String,
}

impl Author {
    /// Creates an author.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The author's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Writes `<author><name>...</name></author>`.
    #[must_use]
    pub fn to_element(&self) -> XmlElement {
        atom("author").with_child(atom_text("name", self.name.as_str()))
    }

    /// Reads an `<author>` element.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CoreError::InvalidFormat`] if the element is not an
    /// Atom author or has no `<name>`.
    pub fn from_element(element: &XmlElement) -> CoreResult<Self> {
        expect_atom(element, "author")?;
        Ok(Self::new(required_child(element, "name")?.text.as_str()))
    }

    /// Parses a standalone `<author>` document.
    ///
    /// # Errors
    ///
    /// Returns an error if the markup is malformed or not a valid author.
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    #[test]
    fn roundtrip() {
        let author = Author::new("Grace & co");
        assert_eq!(Author::parse(&author.to_xml_string().unwrap()).unwrap(), author);
    }

    #[test]
    fn missing_name_is_a_format_error() {
        let err = Author::parse(r#"<author xmlns="http://www.w3.org/2005/Atom"/>"#).unwrap_err();
        assert!(matches!(err, CoreError::InvalidFormat { .. }));
        assert!(err.to_string().contains("<name>"));
    }
}
