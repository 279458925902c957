//! Intermediate content tree produced by the encoder.

use crate::naming::Naming;
use crate::xml::XmlElement;

/// Element name used for scalar items inside a wrapped sequence.
pub(crate) const ITEM_ELEMENT: &str = "item";

/// Attribute marking an omitted field that a trailing item would shadow.
pub(crate) const NIL_ATTRIBUTE: &str = "nil";

/// A serialized value before it is laid out as XML.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Value {
    /// `None` or unit; produces no element.
    Absent,
    /// A scalar rendered as element text.
    Text(String),
    /// A record with named fields.
    Record(Record),
    /// An ordered collection.
    Seq(Vec<Value>),
    /// A collection held in `Some`. Always wrapped in its field element so
    /// that an empty one stays distinguishable from `None`.
    OptionalSeq(Vec<Value>),
    /// An enum variant carrying a scalar: `<variant>text</variant>`.
    Tagged(String, String),
}

/// A record: a struct, or an enum variant carrying fields.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Record {
    /// Element name of the record itself.
    pub name: String,
    /// Fields in declaration order, already converted to element names.
    pub fields: Vec<(String, Value)>,
    /// The last written field is a collection whose items are laid out
    /// directly inside the record.
    pub trailing_items: bool,
    /// The record is an enum variant and `name` is the variant's.
    pub variant: bool,
}

impl Record {
    pub(crate) fn new(name: &str, naming: Naming) -> Self {
        Self {
            name: naming.element_name(name),
            fields: Vec::new(),
            trailing_items: false,
            variant: false,
        }
    }

    /// Lays out the record as an element named `name` in `namespace`.
    pub(crate) fn into_element(self, name: &str, namespace: &str) -> XmlElement {
        let mut element = XmlElement::new(namespace, name);
        let mut fields = self.fields;
        let tail = if self.trailing_items && matches!(fields.last(), Some((_, Value::Seq(_)))) {
            fields.pop()
        } else {
            None
        };
        let items: Vec<XmlElement> = match tail {
            Some((field, Value::Seq(items))) => items
                .into_iter()
                .filter_map(|item| item_element(item, &field, namespace))
                .collect(),
            _ => Vec::new(),
        };

        for (field, value) in fields {
            match value {
                // Otherwise the reader binds the first trailing item here.
                Value::Absent if items.iter().any(|i| i.name.eq_ignore_ascii_case(&field)) => {
                    element.push_child(
                        XmlElement::new(namespace, field).with_attribute(NIL_ATTRIBUTE, "true"),
                    );
                }
                value => {
                    if let Some(child) = field_element(value, &field, namespace) {
                        element.push_child(child);
                    }
                }
            }
        }
        for item in items {
            element.push_child(item);
        }
        element
    }
}

/// The element for a named field.
fn field_element(value: Value, field: &str, namespace: &str) -> Option<XmlElement> {
    let element = XmlElement::new(namespace, field);
    match value {
        Value::Absent => None,
        Value::Text(text) => Some(element.with_text(text)),
        Value::Record(record) => {
            let name = record.name.clone();
            Some(element.with_child(record.into_element(&name, namespace)))
        }
        Value::Tagged(variant, text) => {
            Some(element.with_child(XmlElement::new(namespace, variant).with_text(text)))
        }
        Value::Seq(items) | Value::OptionalSeq(items) => {
            let mut element = element;
            for item in items {
                if let Some(child) = item_element(item, ITEM_ELEMENT, namespace) {
                    element.push_child(child);
                }
            }
            Some(element)
        }
    }
}

/// The element for a collection item; records name themselves.
pub(crate) fn item_element(value: Value, scalar_name: &str, namespace: &str) -> Option<XmlElement> {
    match value {
        Value::Record(record) => {
            let name = record.name.clone();
            Some(record.into_element(&name, namespace))
        }
        Value::Tagged(variant, text) => Some(XmlElement::new(namespace, variant).with_text(text)),
        other => field_element(other, scalar_name, namespace),
    }
}
