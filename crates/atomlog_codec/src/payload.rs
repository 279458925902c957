//! Type-erased event payloads.

use crate::error::CodecResult;
use crate::{decoder, encoder};
use crate::naming::{Naming, TypePath};
use crate::xml::XmlElement;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// A value that can travel through an event stream.
///
/// Implemented for every `Serialize + PartialEq + Debug` type that is
/// `Send + Sync + 'static`; there is nothing to implement by hand.
pub trait Event: Any + fmt::Debug + Send + Sync {
    /// Full Rust path of the concrete type.
    fn type_path(&self) -> &'static str;

    /// Writes the value as an element named `name` in `namespace`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value's shape cannot be written as XML.
    fn to_element(&self, name: &str, namespace: &str, naming: Naming) -> CodecResult<XmlElement>;

    /// The value as [`Any`], for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Structural equality against another event.
    fn eq_event(&self, other: &dyn Event) -> bool;
}

impl<T> Event for T
where
    T: Serialize + PartialEq + fmt::Debug + Send + Sync + 'static,
{
    fn type_path(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn to_element(&self, name: &str, namespace: &str, naming: Naming) -> CodecResult<XmlElement> {
        encoder::to_element(self, name, namespace, naming)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn eq_event(&self, other: &dyn Event) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }
}

pub(crate) type DecodeFn = fn(&XmlElement, Naming) -> CodecResult<Payload>;

/// Reads an element as a `T` and wraps it.
pub(crate) fn decode_as<T: Event + DeserializeOwned>(
    element: &XmlElement,
    naming: Naming,
) -> CodecResult<Payload> {
    decoder::from_element::<T>(element, naming).map(Payload::new)
}

/// An event value together with its logical namespace.
///
/// Cloning a payload shares the underlying value.
#[derive(Clone)]
pub struct Payload {
    value: Arc<dyn Event>,
    namespace: String,
}

impl Payload {
    /// Wraps a value; the namespace is derived from its module path.
    pub fn new<T: Event>(value: T) -> Self {
        let namespace = TypePath::parse(std::any::type_name::<T>()).namespace_urn();
        Self {
            value: Arc::new(value),
            namespace,
        }
    }

    /// The logical namespace, e.g. `urn:my-app:events`.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The wrapped value.
    #[must_use]
    pub fn value(&self) -> &dyn Event {
        self.value.as_ref()
    }

    /// Full Rust path of the wrapped value's type.
    #[must_use]
    pub fn type_path(&self) -> &'static str {
        self.value.type_path()
    }

    /// [`TypeId`] of the wrapped value.
    #[must_use]
    pub fn value_type_id(&self) -> TypeId {
        self.value.as_any().type_id()
    }

    /// Returns the wrapped value if it is a `T`.
    #[must_use]
    pub fn downcast_ref<T: Event>(&self) -> Option<&T> {
        self.value.as_any().downcast_ref::<T>()
    }

    /// Returns `true` if the wrapped value is a `T`.
    #[must_use]
    pub fn is<T: Event>(&self) -> bool {
        self.value.as_any().is::<T>()
    }
}

impl PartialEq for Payload {
    fn eq(&self, other: &Self) -> bool {
        self.value.eq_event(other.value.as_ref())
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.value, f)
    }
}
