//! Pass-through content for tools that do not know the payload types.

use crate::error::{CodecError, CodecResult};
use crate::payload::Payload;
use crate::xml::XmlElement;
use crate::ContentSerializer;
use serde::Serialize;

/// Content kept as an uninterpreted element tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawContent(pub XmlElement);

/// A [`ContentSerializer`] that reads any content as [`RawContent`] and
/// writes [`RawContent`] back unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawContentSerializer;

impl ContentSerializer for RawContentSerializer {
    fn serialize(&self, payload: &Payload) -> CodecResult<XmlElement> {
        payload
            .downcast_ref::<RawContent>()
            .map(|raw| raw.0.clone())
            .ok_or_else(|| CodecError::unsupported(payload.type_path()))
    }

    fn deserialize(&self, element: &XmlElement) -> CodecResult<Payload> {
        Ok(Payload::new(RawContent(element.clone())))
    }
}
