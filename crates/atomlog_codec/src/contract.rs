//! Fixed-mapping content serialization.
//!
//! Each payload type is mapped explicitly to an element local name and
//! namespace, either through the [`DataContract`] trait or by hand. Field
//! and nested type names are written exactly as declared.

use crate::error::{CodecError, CodecResult};
use crate::naming::Naming;
use crate::payload::{decode_as, DecodeFn, Event, Payload};
use crate::xml::XmlElement;
use crate::ContentSerializer;
use serde::de::DeserializeOwned;
use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

/// Declares the element identity of a payload type.
///
/// ```
/// use atomlog_codec::DataContract;
///
/// struct OrderPlaced;
///
/// impl DataContract for OrderPlaced {
///     const NAME: &'static str = "OrderPlaced";
///     const NAMESPACE: &'static str = "http://example.com/orders/2024";
/// }
/// ```
pub trait DataContract {
    /// Element local name.
    const NAME: &'static str;
    /// Element namespace URI.
    const NAMESPACE: &'static str;
}

/// One mapping between a Rust type and an element identity.
#[derive(Clone)]
pub struct TypeResolutionEntry {
    local_name: String,
    namespace: String,
    type_id: TypeId,
    type_path: &'static str,
    decode: DecodeFn,
}

impl TypeResolutionEntry {
    /// Maps `T` to `{namespace}local_name`.
    pub fn new<T: Event + DeserializeOwned>(
        local_name: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            local_name: local_name.into(),
            namespace: namespace.into(),
            type_id: TypeId::of::<T>(),
            type_path: std::any::type_name::<T>(),
            decode: decode_as::<T>,
        }
    }

    /// Element local name.
    #[must_use]
    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// Element namespace.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Full Rust path of the mapped type.
    #[must_use]
    pub fn type_path(&self) -> &'static str {
        self.type_path
    }

    /// [`TypeId`] of the mapped type.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    fn decode(&self, element: &XmlElement) -> CodecResult<Payload> {
        (self.decode)(element, Naming::Verbatim)
    }
}

impl fmt::Debug for TypeResolutionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeResolutionEntry")
            .field("local_name", &self.local_name)
            .field("namespace", &self.namespace)
            .field("type_path", &self.type_path)
            .finish()
    }
}

/// Two-way mapping between element identities and Rust types.
pub trait TypeResolver: Send + Sync {
    /// Finds the entry for an element identity.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Lookup`] if the identity is not mapped.
    fn resolve(&self, local_name: &str, namespace: &str) -> CodecResult<&TypeResolutionEntry>;

    /// Finds the entry for a Rust type.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Lookup`] if the type is not mapped.
    fn resolve_type(&self, type_id: TypeId) -> CodecResult<&TypeResolutionEntry>;
}

/// A [`TypeResolver`] backed by a list of entries.
#[derive(Debug, Clone, Default)]
pub struct TypeResolutionTable {
    entries: Vec<TypeResolutionEntry>,
}

impl TypeResolutionTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps `T` using its [`DataContract`] identity.
    #[must_use]
    pub fn register<T: Event + DataContract + DeserializeOwned>(self) -> Self {
        self.map::<T>(T::NAME, T::NAMESPACE)
    }

    /// Maps `T` to `{namespace}local_name`, replacing any earlier mapping
    /// of `T`.
    #[must_use]
    pub fn map<T: Event + DeserializeOwned>(
        mut self,
        local_name: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        self.insert(TypeResolutionEntry::new::<T>(local_name, namespace));
        self
    }

    /// Adds an entry, replacing any earlier entry for the same type.
    pub fn insert(&mut self, entry: TypeResolutionEntry) {
        self.entries.retain(|e| e.type_id != entry.type_id);
        self.entries.push(entry);
    }

    /// Number of mapped types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<TypeResolutionEntry> for TypeResolutionTable {
    fn from_iter<I: IntoIterator<Item = TypeResolutionEntry>>(iter: I) -> Self {
        let mut table = Self::new();
        for entry in iter {
            table.insert(entry);
        }
        table
    }
}

impl TypeResolver for TypeResolutionTable {
    fn resolve(&self, local_name: &str, namespace: &str) -> CodecResult<&TypeResolutionEntry> {
        let mut matches = self
            .entries
            .iter()
            .filter(|e| e.local_name == local_name && e.namespace == namespace);
        let identity = || format!("{{{namespace}}}{local_name}");
        match (matches.next(), matches.next()) {
            (Some(entry), None) => Ok(entry),
            (None, _) => Err(CodecError::lookup(identity(), "no mapped type")),
            (Some(_), Some(_)) => Err(CodecError::lookup(identity(), "mapped to several types")),
        }
    }

    fn resolve_type(&self, type_id: TypeId) -> CodecResult<&TypeResolutionEntry> {
        self.entries
            .iter()
            .find(|e| e.type_id == type_id)
            .ok_or_else(|| CodecError::lookup(format!("{type_id:?}"), "type is not mapped"))
    }
}

/// Reads and writes payloads through a [`TypeResolver`].
#[derive(Clone)]
pub struct ContractSerializer {
    resolver: Arc<dyn TypeResolver>,
}

impl ContractSerializer {
    /// Creates a serializer using `resolver`.
    pub fn new(resolver: impl TypeResolver + 'static) -> Self {
        Self {
            resolver: Arc::new(resolver),
        }
    }

    /// Creates a serializer sharing an existing resolver.
    #[must_use]
    pub fn with_resolver(resolver: Arc<dyn TypeResolver>) -> Self {
        Self { resolver }
    }
}

impl fmt::Debug for ContractSerializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractSerializer").finish_non_exhaustive()
    }
}

impl ContentSerializer for ContractSerializer {
    fn serialize(&self, payload: &Payload) -> CodecResult<XmlElement> {
        let entry = self
            .resolver
            .resolve_type(payload.value_type_id())
            .map_err(|_| CodecError::lookup(payload.type_path(), "type is not mapped"))?;
        payload
            .value()
            .to_element(&entry.local_name, &entry.namespace, Naming::Verbatim)
    }

    fn deserialize(&self, element: &XmlElement) -> CodecResult<Payload> {
        self.resolver
            .resolve(&element.name, &element.namespace)?
            .decode(element)
    }
}
