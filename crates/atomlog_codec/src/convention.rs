//! Convention-based content serialization.
//!
//! Element names are derived from Rust names: the root element is the
//! kebab-cased type name and its namespace is a URN built from the module
//! path (`my_app::events::UserCreated` becomes `<user-created
//! xmlns="urn:my-app:events">`). Reading goes the other way through a
//! [`TypeCatalog`] of registered types.

use crate::error::{CodecError, CodecResult};
use crate::naming::{Naming, TypePath};
use crate::payload::{decode_as, DecodeFn, Event, Payload};
use crate::xml::XmlElement;
use crate::ContentSerializer;
use serde::de::DeserializeOwned;
use std::collections::BTreeSet;

/// A type known to a [`TypeCatalog`].
#[derive(Clone)]
pub struct CatalogEntry {
    local_name: String,
    namespace: String,
    type_argument: Option<String>,
    type_path: &'static str,
    decode: DecodeFn,
}

impl CatalogEntry {
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

    /// Full Rust path of the type.
    #[must_use]
    pub fn type_path(&self) -> &'static str {
        self.type_path
    }

    /// Decodes an element as this entry's type.
    ///
    /// # Errors
    ///
    /// Returns an error if the element does not have the type's shape.
    pub fn decode(&self, element: &XmlElement) -> CodecResult<Payload> {
        (self.decode)(element, Naming::Convention)
    }
}

impl std::fmt::Debug for CatalogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogEntry")
            .field("local_name", &self.local_name)
            .field("namespace", &self.namespace)
            .field("type_argument", &self.type_argument)
            .field("type_path", &self.type_path)
            .finish()
    }
}

/// The set of payload types a [`ConventionSerializer`] can read.
///
/// A type with a single generic argument may be registered once per
/// argument; such entries are told apart by the element name of the
/// wrapped record.
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    entries: Vec<CatalogEntry>,
}

impl TypeCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `T`. Registering the same type twice has no effect.
    pub fn register<T: Event + DeserializeOwned>(&mut self) -> &mut Self {
        let type_path = std::any::type_name::<T>();
        if self.entries.iter().any(|e| e.type_path == type_path) {
            return self;
        }
        let path = TypePath::parse(type_path);
        self.entries.push(CatalogEntry {
            local_name: path.element_name(),
            namespace: path.namespace_urn(),
            type_argument: path.generic_argument().map(TypePath::element_name),
            type_path,
            decode: decode_as::<T>,
        });
        self
    }

    /// Builder form of [`TypeCatalog::register`].
    #[must_use]
    pub fn with<T: Event + DeserializeOwned>(mut self) -> Self {
        self.register::<T>();
        self
    }

    /// Number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered entries, in registration order.
    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    /// Finds the single entry matching a content element.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Lookup`] if no entry or more than one entry
    /// matches.
    pub fn lookup(&self, element: &XmlElement) -> CodecResult<&CatalogEntry> {
        let identity = || format!("{{{}}}{}", element.namespace, element.name);
        let candidates: Vec<&CatalogEntry> = self
            .entries
            .iter()
            .filter(|e| e.local_name == element.name && e.namespace == element.namespace)
            .collect();

        match candidates.as_slice() {
            [] => Err(CodecError::lookup(identity(), "no registered type")),
            [only] => Ok(*only),
            _ => {
                let mut narrowed = with_argument_in(&candidates, &wrapped_names(element));
                if narrowed.is_empty() {
                    narrowed = with_argument_in(&candidates, &child_names(element));
                }
                match narrowed.as_slice() {
                    [only] => Ok(*only),
                    [] => Err(CodecError::lookup(identity(), "no generic argument matches")),
                    _ => Err(CodecError::lookup(
                        identity(),
                        format!("{} registered types match", narrowed.len()),
                    )),
                }
            }
        }
    }
}

fn with_argument_in<'c>(
    candidates: &[&'c CatalogEntry],
    tags: &BTreeSet<&str>,
) -> Vec<&'c CatalogEntry> {
    candidates
        .iter()
        .copied()
        .filter(|e| {
            e.type_argument
                .as_ref()
                .is_some_and(|a| tags.contains(a.as_str()))
        })
        .collect()
}

/// Names of records wrapped in a field element of `element`.
fn wrapped_names(element: &XmlElement) -> BTreeSet<&str> {
    element
        .children
        .iter()
        .filter_map(|child| match child.children.as_slice() {
            [only] => Some(only.name.as_str()),
            _ => None,
        })
        .collect()
}

/// Names of the direct children, which include trailing records.
fn child_names(element: &XmlElement) -> BTreeSet<&str> {
    element.children.iter().map(|c| c.name.as_str()).collect()
}

/// Reads and writes payloads using naming conventions.
///
/// # Example
///
/// ```
/// use atomlog_codec::{ContentSerializer, ConventionSerializer, Payload, TypeCatalog};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, PartialEq, Serialize, Deserialize)]
/// struct UserCreated {
///     user_id: u32,
///     name: String,
/// }
///
/// let codec = ConventionSerializer::new(TypeCatalog::new().with::<UserCreated>());
/// let payload = Payload::new(UserCreated { user_id: 1, name: "Ada".into() });
///
/// let element = codec.serialize(&payload).unwrap();
/// assert_eq!(element.name, "user-created");
/// assert_eq!(element.children[0].name, "user-id");
/// assert_eq!(codec.deserialize(&element).unwrap(), payload);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConventionSerializer {
    catalog: TypeCatalog,
}

impl ConventionSerializer {
    /// Creates a serializer reading the types in `catalog`.
    #[must_use]
    pub fn new(catalog: TypeCatalog) -> Self {
        Self { catalog }
    }

    /// The catalog used for reading.
    #[must_use]
    pub fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }
}

impl ContentSerializer for ConventionSerializer {
    fn serialize(&self, payload: &Payload) -> CodecResult<XmlElement> {
        let path = TypePath::parse(payload.type_path());
        payload
            .value()
            .to_element(&path.element_name(), payload.namespace(), Naming::Convention)
    }

    fn deserialize(&self, element: &XmlElement) -> CodecResult<Payload> {
        self.catalog.lookup(element)?.decode(element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use uuid::Uuid;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct UserCreated {
        user_id: Uuid,
        display_name: String,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct EmailVerified {
        user_id: Uuid,
        email: String,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Envelope<T> {
        sender: String,
        item: T,
    }

    mod other {
        use serde::{Deserialize, Serialize};

        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        pub struct UserCreated {
            pub login: String,
        }
    }

    const NS: &str = "urn:atomlog-codec:convention:tests";

    fn created() -> UserCreated {
        UserCreated {
            user_id: Uuid::new_v4(),
            display_name: "Ada".into(),
        }
    }

    fn codec() -> ConventionSerializer {
        ConventionSerializer::new(
            TypeCatalog::new()
                .with::<UserCreated>()
                .with::<EmailVerified>()
                .with::<other::UserCreated>()
                .with::<Envelope<UserCreated>>()
                .with::<Envelope<EmailVerified>>(),
        )
    }

    #[test]
    fn root_name_and_namespace_follow_the_type() {
        let element = codec().serialize(&Payload::new(created())).unwrap();
        assert_eq!(element.name, "user-created");
        assert_eq!(element.namespace, NS);
        assert_eq!(element.children[0].name, "user-id");
        assert_eq!(element.children[1].name, "display-name");
    }

    #[test]
    fn roundtrip_through_markup() {
        let codec = codec();
        let payload = Payload::new(created());
        let xml = codec.serialize(&payload).unwrap().to_xml_string().unwrap();
        let back = codec.deserialize(&XmlElement::parse(&xml).unwrap()).unwrap();
        assert_eq!(back, payload);
        assert!(back.is::<UserCreated>());
    }

    #[test]
    fn same_name_in_other_module_is_distinct() {
        let codec = codec();
        let payload = Payload::new(other::UserCreated {
            login: "ada".into(),
        });
        let element = codec.serialize(&payload).unwrap();
        assert_eq!(element.namespace, format!("{NS}:other"));
        assert!(codec.deserialize(&element).unwrap().is::<other::UserCreated>());
    }

    #[test]
    fn generic_instantiations_are_told_apart() {
        let codec = codec();
        let verified = Envelope {
            sender: "svc".into(),
            item: EmailVerified {
                user_id: Uuid::new_v4(),
                email: "a@b.c".into(),
            },
        };
        let element = codec.serialize(&Payload::new(verified.clone())).unwrap();
        assert_eq!(element.name, "envelope");
        assert_eq!(element.children[1].children[0].name, "email-verified");

        let back = codec.deserialize(&element).unwrap();
        assert_eq!(back.downcast_ref::<Envelope<EmailVerified>>(), Some(&verified));

        let created = Envelope {
            sender: "svc".into(),
            item: created(),
        };
        let element = codec.serialize(&Payload::new(created.clone())).unwrap();
        let back = codec.deserialize(&element).unwrap();
        assert_eq!(back.downcast_ref::<Envelope<UserCreated>>(), Some(&created));
    }

    #[test]
    fn unregistered_element_is_a_lookup_error() {
        let element = XmlElement::new(NS, "order-shipped");
        assert!(matches!(
            codec().deserialize(&element),
            Err(CodecError::Lookup { .. })
        ));
        let element = XmlElement::new("urn:elsewhere", "user-created");
        assert!(matches!(
            codec().deserialize(&element),
            Err(CodecError::Lookup { .. })
        ));
    }

    #[test]
    fn ambiguous_generic_is_a_lookup_error() {
        let element = XmlElement::new(NS, "envelope")
            .with_child(XmlElement::new(NS, "sender").with_text("svc"));
        assert!(matches!(
            codec().deserialize(&element),
            Err(CodecError::Lookup { .. })
        ));
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Renaming {
        from: String,
        to: String,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    enum AccountEvent {
        Opened { owner: String },
        Renamed(Renaming),
        Closed(u32),
        Frozen,
    }

    #[test]
    fn enum_payload_keeps_its_variant() {
        let codec = ConventionSerializer::new(TypeCatalog::new().with::<AccountEvent>());
        for event in [
            AccountEvent::Opened {
                owner: "ada".into(),
            },
            AccountEvent::Renamed(Renaming {
                from: "a".into(),
                to: "b".into(),
            }),
            AccountEvent::Closed(7),
        ] {
            let payload = Payload::new(event.clone());
            let xml = codec.serialize(&payload).unwrap().to_xml_string().unwrap();
            let element = XmlElement::parse(&xml).unwrap();
            assert_eq!(element.name, "account-event");
            assert_eq!(element.children.len(), 1);
            assert_eq!(codec.deserialize(&element).unwrap(), payload);
        }

        let opened = codec
            .serialize(&Payload::new(AccountEvent::Opened {
                owner: "ada".into(),
            }))
            .unwrap();
        assert_eq!(opened.children[0].name, "opened");
        assert_eq!(opened.children[0].children[0].text, "ada");
    }

    #[test]
    fn unit_variant_payload_is_unsupported() {
        assert!(matches!(
            codec().serialize(&Payload::new(AccountEvent::Frozen)),
            Err(CodecError::Unsupported { .. })
        ));
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Item {
        label: String,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Other {
        code: u32,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Wrap<T> {
        item: T,
    }

    #[test]
    fn field_named_like_an_argument_does_not_pick_the_instantiation() {
        let codec = ConventionSerializer::new(
            TypeCatalog::new().with::<Wrap<Item>>().with::<Wrap<Other>>(),
        );
        let other = Wrap {
            item: Other { code: 3 },
        };
        let element = codec.serialize(&Payload::new(other.clone())).unwrap();
        assert_eq!(element.children[0].name, "item");
        let back = codec.deserialize(&element).unwrap();
        assert_eq!(back.downcast_ref::<Wrap<Other>>(), Some(&other));

        let item = Wrap {
            item: Item {
                label: "x".into(),
            },
        };
        let element = codec.serialize(&Payload::new(item.clone())).unwrap();
        let back = codec.deserialize(&element).unwrap();
        assert_eq!(back.downcast_ref::<Wrap<Item>>(), Some(&item));
    }

    #[test]
    fn trailing_records_pick_the_instantiation() {
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        struct Many<T> {
            source: String,
            items: Vec<T>,
        }
        let codec = ConventionSerializer::new(
            TypeCatalog::new().with::<Many<Item>>().with::<Many<Other>>(),
        );
        let many = Many {
            source: "s".into(),
            items: vec![Other { code: 1 }, Other { code: 2 }],
        };
        let element = codec.serialize(&Payload::new(many.clone())).unwrap();
        let back = codec.deserialize(&element).unwrap();
        assert_eq!(back.downcast_ref::<Many<Other>>(), Some(&many));
    }

    #[test]
    fn duplicate_registration_is_ignored() {
        let mut catalog = TypeCatalog::new();
        catalog.register::<UserCreated>().register::<UserCreated>();
        assert_eq!(catalog.len(), 1);
    }
}
