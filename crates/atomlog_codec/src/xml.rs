//! A small namespace-aware XML element tree.
//!
//! Feed documents and event payloads are both read into [`XmlElement`]
//! trees before they are interpreted. Every element carries its resolved
//! namespace URI and local name; prefixes are a serialization detail and
//! are not kept.

use crate::error::{CodecError, CodecResult};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::{NsReader, Writer};
use serde::Serialize;

/// An XML element with its resolved namespace.
///
/// Mixed content is not modelled: an element keeps the concatenation of
/// its text nodes in [`XmlElement::text`], and whitespace between child
/// elements is dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct XmlElement {
    /// Namespace URI, or an empty string for no namespace.
    pub namespace: String,
    /// Local name.
    pub name: String,
    /// Attributes in document order, excluding namespace declarations.
    pub attributes: Vec<(String, String)>,
    /// Child elements in document order.
    pub children: Vec<XmlElement>,
    /// Text content.
    pub text: String,
}

impl XmlElement {
    /// Creates an empty element.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the text content.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Appends an attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Appends a child element.
    #[must_use]
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    /// Appends a child element in place.
    pub fn push_child(&mut self, child: XmlElement) {
        self.children.push(child);
    }

    /// Returns the value of the attribute with the given local name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns the first child with the given namespace and local name.
    #[must_use]
    pub fn child<'a>(&'a self, namespace: &str, name: &str) -> Option<&'a XmlElement> {
        self.children
            .iter()
            .find(|c| c.namespace == namespace && c.name == name)
    }

    /// Iterates over children with the given namespace and local name.
    pub fn children_named<'a>(
        &'a self,
        namespace: &'a str,
        name: &'a str,
    ) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children
            .iter()
            .filter(move |c| c.namespace == namespace && c.name == name)
    }

    /// Returns `true` if this element has the given namespace and local name.
    #[must_use]
    pub fn is(&self, namespace: &str, name: &str) -> bool {
        self.namespace == namespace && self.name == name
    }

    /// Parses a document and returns its root element.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Xml`] if the markup is malformed, uses an
    /// undeclared prefix, or has no single root element.
    pub fn parse(xml: &str) -> CodecResult<Self> {
        let mut reader = NsReader::from_str(xml);
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            let (namespace, event) = reader.read_resolved_event().map_err(CodecError::xml)?;
            match event {
                Event::Start(start) => {
                    let element = Self::open(namespace, &start)?;
                    stack.push(element);
                }
                Event::Empty(start) => {
                    let element = Self::open(namespace, &start)?;
                    Self::close(element, &mut stack, &mut root)?;
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| CodecError::xml("unexpected closing tag"))?;
                    Self::close(element, &mut stack, &mut root)?;
                }
                Event::Text(text) => {
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(&text.unescape().map_err(CodecError::xml)?);
                    }
                }
                Event::CData(data) => {
                    if let Some(top) = stack.last_mut() {
                        let data = data.into_inner();
                        let data = std::str::from_utf8(&data).map_err(CodecError::xml)?;
                        top.text.push_str(data);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(CodecError::xml(format!("unclosed element <{}>", open.name)));
        }
        root.ok_or_else(|| CodecError::xml("document has no root element"))
    }

    fn open(namespace: ResolveResult<'_>, start: &BytesStart<'_>) -> CodecResult<Self> {
        let namespace = match namespace {
            ResolveResult::Bound(Namespace(uri)) => {
                String::from_utf8(uri.to_vec()).map_err(CodecError::xml)?
            }
            ResolveResult::Unbound => String::new(),
            ResolveResult::Unknown(prefix) => {
                return Err(CodecError::xml(format!(
                    "undeclared namespace prefix {}",
                    String::from_utf8_lossy(&prefix)
                )));
            }
        };
        let name = std::str::from_utf8(start.local_name().as_ref())
            .map_err(CodecError::xml)?
            .to_string();

        let mut element = Self::new(namespace, name);
        for attribute in start.attributes() {
            let attribute = attribute.map_err(CodecError::xml)?;
            if attribute.key.as_namespace_binding().is_some() {
                continue;
            }
            let key = std::str::from_utf8(attribute.key.local_name().as_ref())
                .map_err(CodecError::xml)?
                .to_string();
            let value = attribute.unescape_value().map_err(CodecError::xml)?;
            element.attributes.push((key, value.into_owned()));
        }
        Ok(element)
    }

    fn close(
        mut element: XmlElement,
        stack: &mut [XmlElement],
        root: &mut Option<XmlElement>,
    ) -> CodecResult<()> {
        if !element.children.is_empty() && element.text.trim().is_empty() {
            element.text.clear();
        }
        match stack.last_mut() {
            Some(parent) => parent.children.push(element),
            None if root.is_some() => {
                return Err(CodecError::xml("document has more than one root element"));
            }
            None => *root = Some(element),
        }
        Ok(())
    }

    /// Serializes this element as a standalone document fragment.
    ///
    /// Namespaces are written as default-namespace declarations wherever
    /// an element's namespace differs from its parent's.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Xml`] if writing fails.
    pub fn to_xml_string(&self) -> CodecResult<String> {
        let mut writer = Writer::new(Vec::new());
        self.write_to(&mut writer, None)?;
        String::from_utf8(writer.into_inner()).map_err(CodecError::xml)
    }

    fn write_to(&self, writer: &mut Writer<Vec<u8>>, inherited: Option<&str>) -> CodecResult<()> {
        let mut start = BytesStart::new(self.name.as_str());
        let declare = match inherited {
            Some(parent) => parent != self.namespace,
            None => !self.namespace.is_empty(),
        };
        if declare {
            start.push_attribute(("xmlns", self.namespace.as_str()));
        }
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.children.is_empty() && self.text.is_empty() {
            writer
                .write_event(Event::Empty(start))
                .map_err(CodecError::xml)?;
            return Ok(());
        }

        writer
            .write_event(Event::Start(start))
            .map_err(CodecError::xml)?;
        if !self.text.is_empty() {
            writer
                .write_event(Event::Text(BytesText::new(&self.text)))
                .map_err(CodecError::xml)?;
        }
        for child in &self.children {
            child.write_to(writer, Some(&self.namespace))?;
        }
        writer
            .write_event(Event::End(BytesEnd::new(self.name.as_str())))
            .map_err(CodecError::xml)?;
        Ok(())
    }
}
