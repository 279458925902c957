//! # atomlog Codec
//!
//! XML content codecs for atomlog event payloads.
//!
//! Every event appended to a stream is stored as the content of an Atom
//! entry. This crate turns Rust values into that content and back:
//!
//! - [`ConventionSerializer`] derives element names from Rust names and
//!   reads through a [`TypeCatalog`] of registered types
//! - [`ContractSerializer`] uses an explicit name/namespace mapping per type
//! - [`RawContentSerializer`] passes content through untouched
//!
//! Payload types only need `Serialize`, `Deserialize`, `PartialEq` and
//! `Debug`.
//!
//! ## Content layout
//!
//! - The root element is the record; each field becomes a child element
//! - A nested record is wrapped in its field's element
//! - A collection in the last field is written as sibling elements; any
//!   other collection is wrapped in its field's element
//! - `None` fields are omitted
//! - Identifiers (`Uuid`) are written as `urn:uuid:` URNs
//! - Tuples and maps are not supported
//!
//! ## Usage
//!
//! ```
//! use atomlog_codec::{ContentSerializer, ConventionSerializer, Payload, TypeCatalog, XmlElement};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct EmailChanged {
//!     email: String,
//! }
//!
//! let codec = ConventionSerializer::new(TypeCatalog::new().with::<EmailChanged>());
//! let payload = Payload::new(EmailChanged { email: "ada@example.com".into() });
//!
//! let xml = codec.serialize(&payload).unwrap().to_xml_string().unwrap();
//! let element = XmlElement::parse(&xml).unwrap();
//! assert_eq!(codec.deserialize(&element).unwrap(), payload);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod contract;
mod convention;
mod decoder;
mod encoder;
mod error;
mod naming;
mod payload;
mod raw;
mod value;
mod xml;

pub use contract::{
    ContractSerializer, DataContract, TypeResolutionEntry, TypeResolutionTable, TypeResolver,
};
pub use convention::{CatalogEntry, ConventionSerializer, TypeCatalog};
pub use decoder::from_element;
pub use encoder::to_element;
pub use error::{CodecError, CodecResult};
pub use naming::{to_kebab_case, to_pascal_case, Naming, TypePath};
pub use payload::{Event, Payload};
pub use raw::{RawContent, RawContentSerializer};
pub use xml::XmlElement;

/// Converts between payloads and the content elements of feed entries.
///
/// Implementations must be usable from several threads at once.
pub trait ContentSerializer: Send + Sync {
    /// Writes a payload as a content element.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload's type is unknown to this serializer
    /// or its shape cannot be written.
    fn serialize(&self, payload: &Payload) -> CodecResult<XmlElement>;

    /// Reads a content element back into a payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the element's identity cannot be resolved or its
    /// shape does not match the resolved type.
    fn deserialize(&self, element: &XmlElement) -> CodecResult<Payload>;
}

impl<S: ContentSerializer + ?Sized> ContentSerializer for std::sync::Arc<S> {
    fn serialize(&self, payload: &Payload) -> CodecResult<XmlElement> {
        (**self).serialize(payload)
    }

    fn deserialize(&self, element: &XmlElement) -> CodecResult<Payload> {
        (**self).deserialize(element)
    }
}
