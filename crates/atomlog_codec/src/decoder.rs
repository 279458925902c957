//! Serde deserializer reading XML content elements.
//!
//! Fields are bound to child elements by name. The last declared field of a
//! record also receives any children left over once the other fields are
//! bound; this is how a trailing collection, written as sibling elements,
//! is read back. An omitted field shadowed by such an item is written as an
//! empty element carrying `nil="true"`.

use crate::error::{CodecError, CodecResult};
use crate::naming::Naming;
use crate::value::NIL_ATTRIBUTE;
use crate::xml::XmlElement;
use serde::de::value::StrDeserializer;
use serde::de::{self, DeserializeOwned, DeserializeSeed, IntoDeserializer, Visitor};
use std::str::FromStr;
use uuid::Uuid;

/// Deserializes a value from a content element.
///
/// # Errors
///
/// Returns [`CodecError::MissingElement`] when a required field has no
/// element, and [`CodecError::Conversion`] when leaf text cannot be
/// converted.
pub fn from_element<T: DeserializeOwned>(element: &XmlElement, naming: Naming) -> CodecResult<T> {
    T::deserialize(ElementDeserializer {
        element,
        role: Role::Root,
        naming,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    /// The content element. An enum is carried by its only child.
    Root,
    /// The element is the value itself: a record or a collection item.
    Record,
    /// The element is named after a field and wraps the value.
    Property,
}

#[derive(Clone, Copy)]
struct ElementDeserializer<'a> {
    element: &'a XmlElement,
    role: Role,
    naming: Naming,
}

impl<'a> ElementDeserializer<'a> {
    fn with_role(self, element: &'a XmlElement, role: Role) -> Self {
        Self {
            element,
            role,
            naming: self.naming,
        }
    }

    fn parse<T: FromStr>(&self, target: &'static str) -> CodecResult<T> {
        let text = self.element.text.trim();
        text.parse()
            .map_err(|_| CodecError::conversion(text, target))
    }

    fn parse_char(&self) -> CodecResult<char> {
        let text = self.element.text.as_str();
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(CodecError::conversion(text, "char")),
        }
    }

    fn is_nil(&self) -> bool {
        self.role == Role::Property && self.element.attribute(NIL_ATTRIBUTE) == Some("true")
    }

    fn parse_bool(&self) -> CodecResult<bool> {
        match self.element.text.trim() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            other => Err(CodecError::conversion(other, "bool")),
        }
    }

    fn items(&self) -> ItemAccess<'a> {
        ItemAccess {
            items: self.element.children.iter().collect::<Vec<_>>().into_iter(),
            naming: self.naming,
        }
    }

    /// The element holding a record's fields.
    fn record_element(&self, name: &str) -> &'a XmlElement {
        match (self.role, self.element.children.as_slice()) {
            (Role::Property, [only]) if self.naming.matches(name, &only.name) => only,
            _ => self.element,
        }
    }

    /// Candidate variant names, each with the element carrying its content.
    ///
    /// A record names its variant with its own element name. A field or the
    /// content root carries the variant in its only child, and a unit variant
    /// is written as text.
    fn variant_candidates(&self) -> Vec<(&'a str, Option<&'a XmlElement>)> {
        let element = self.element;
        match (self.role, element.children.as_slice()) {
            (Role::Record, []) => vec![
                (element.name.as_str(), Some(element)),
                (element.text.trim(), None),
            ],
            (Role::Record, _) => vec![(element.name.as_str(), Some(element))],
            (_, [only]) => vec![(only.name.as_str(), Some(only))],
            (_, _) => vec![(element.text.trim(), None)],
        }
    }
}

macro_rules! parse_number {
    ($($method:ident => $visit:ident : $ty:ty),* $(,)?) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> CodecResult<V::Value> {
                visitor.$visit(self.parse::<$ty>(stringify!($ty))?)
            }
        )*
    };
}

impl<'de, 'a> de::Deserializer<'de> for ElementDeserializer<'a> {
    type Error = CodecError;

    fn is_human_readable(&self) -> bool {
        false
    }

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> CodecResult<V::Value> {
        if self.element.children.is_empty() {
            visitor.visit_str(&self.element.text)
        } else {
            Err(CodecError::unsupported(format!(
                "self-describing read of <{}>",
                self.element.name
            )))
        }
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> CodecResult<V::Value> {
        visitor.visit_bool(self.parse_bool()?)
    }

    parse_number! {
        deserialize_i8 => visit_i8: i8,
        deserialize_i16 => visit_i16: i16,
        deserialize_i32 => visit_i32: i32,
        deserialize_i64 => visit_i64: i64,
        deserialize_i128 => visit_i128: i128,
        deserialize_u8 => visit_u8: u8,
        deserialize_u16 => visit_u16: u16,
        deserialize_u32 => visit_u32: u32,
        deserialize_u64 => visit_u64: u64,
        deserialize_u128 => visit_u128: u128,
        deserialize_f32 => visit_f32: f32,
        deserialize_f64 => visit_f64: f64,
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> CodecResult<V::Value> {
        visitor.visit_char(self.parse_char()?)
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> CodecResult<V::Value> {
        visitor.visit_str(&self.element.text)
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> CodecResult<V::Value> {
        visitor.visit_string(self.element.text.clone())
    }

    fn deserialize_bytes<V: Visitor<'de>>(self, visitor: V) -> CodecResult<V::Value> {
        let id: Uuid = self.parse("uuid")?;
        visitor.visit_bytes(id.as_bytes())
    }

    fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> CodecResult<V::Value> {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> CodecResult<V::Value> {
        if self.is_nil() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> CodecResult<V::Value> {
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> CodecResult<V::Value> {
        visitor.visit_unit()
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> CodecResult<V::Value> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> CodecResult<V::Value> {
        visitor.visit_seq(self.items())
    }

    fn deserialize_tuple<V: Visitor<'de>>(self, _len: usize, _visitor: V) -> CodecResult<V::Value> {
        Err(CodecError::unsupported("tuple"))
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        _len: usize,
        _visitor: V,
    ) -> CodecResult<V::Value> {
        Err(CodecError::unsupported(format!("tuple struct {name}")))
    }

    fn deserialize_map<V: Visitor<'de>>(self, _visitor: V) -> CodecResult<V::Value> {
        Err(CodecError::unsupported("map"))
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> CodecResult<V::Value> {
        let element = self.record_element(name);
        visitor.visit_map(FieldAccess::new(element, fields, self.naming))
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> CodecResult<V::Value> {
        let candidates = self.variant_candidates();
        let found = candidates.iter().find_map(|&(tag, content)| {
            variants
                .iter()
                .copied()
                .find(|v| self.naming.matches(v, tag))
                .map(|variant| (variant, content))
        });
        let Some((variant, content)) = found else {
            let tag = candidates.last().map_or("", |(tag, _)| *tag);
            return Err(CodecError::lookup(tag, format!("not a variant of {name}")));
        };
        visitor.visit_enum(EnumContent {
            variant,
            content: content.map(|element| self.with_role(element, Role::Record)),
        })
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> CodecResult<V::Value> {
        visitor.visit_str(&self.element.text)
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> CodecResult<V::Value> {
        visitor.visit_unit()
    }
}

/// Children left over for the last field of a record.
struct GroupDeserializer<'a> {
    field: &'static str,
    elements: Vec<&'a XmlElement>,
    naming: Naming,
}

impl<'a> GroupDeserializer<'a> {
    /// The single element standing for a non-collection value.
    fn single(&self) -> CodecResult<ElementDeserializer<'a>> {
        let named: Vec<&XmlElement> = self
            .elements
            .iter()
            .copied()
            .filter(|e| self.naming.matches(self.field, &e.name))
            .collect();
        let element = match (named.as_slice(), self.elements.as_slice()) {
            ([one], _) | ([], [one]) => *one,
            _ => return Err(CodecError::missing_element(self.field)),
        };
        Ok(ElementDeserializer {
            element,
            role: Role::Property,
            naming: self.naming,
        })
    }
}

macro_rules! forward_to_single {
    ($($method:ident),* $(,)?) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> CodecResult<V::Value> {
                self.single()?.$method(visitor)
            }
        )*
    };
}

impl<'de, 'a> de::Deserializer<'de> for GroupDeserializer<'a> {
    type Error = CodecError;

    fn is_human_readable(&self) -> bool {
        false
    }

    forward_to_single! {
        deserialize_any, deserialize_bool,
        deserialize_i8, deserialize_i16, deserialize_i32, deserialize_i64, deserialize_i128,
        deserialize_u8, deserialize_u16, deserialize_u32, deserialize_u64, deserialize_u128,
        deserialize_f32, deserialize_f64, deserialize_char,
        deserialize_str, deserialize_string, deserialize_bytes, deserialize_byte_buf,
        deserialize_unit, deserialize_map, deserialize_identifier,
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> CodecResult<V::Value> {
        // An optional value is never written as trailing items.
        if self.elements.is_empty() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self.single()?)
        }
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> CodecResult<V::Value> {
        visitor.visit_seq(ItemAccess {
            items: self.elements.into_iter(),
            naming: self.naming,
        })
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        visitor: V,
    ) -> CodecResult<V::Value> {
        self.single()?.deserialize_unit_struct(name, visitor)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> CodecResult<V::Value> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_tuple<V: Visitor<'de>>(self, len: usize, visitor: V) -> CodecResult<V::Value> {
        self.single()?.deserialize_tuple(len, visitor)
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        len: usize,
        visitor: V,
    ) -> CodecResult<V::Value> {
        self.single()?.deserialize_tuple_struct(name, len, visitor)
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> CodecResult<V::Value> {
        self.single()?.deserialize_struct(name, fields, visitor)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> CodecResult<V::Value> {
        self.single()?.deserialize_enum(name, variants, visitor)
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> CodecResult<V::Value> {
        visitor.visit_unit()
    }
}

struct ItemAccess<'a> {
    items: std::vec::IntoIter<&'a XmlElement>,
    naming: Naming,
}

impl<'de, 'a> de::SeqAccess<'de> for ItemAccess<'a> {
    type Error = CodecError;

    fn next_element_seed<T: DeserializeSeed<'de>>(
        &mut self,
        seed: T,
    ) -> CodecResult<Option<T::Value>> {
        match self.items.next() {
            Some(element) => seed
                .deserialize(ElementDeserializer {
                    element,
                    role: Role::Record,
                    naming: self.naming,
                })
                .map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.items.len())
    }
}

enum Binding<'a> {
    Element(&'a XmlElement),
    Group(Vec<&'a XmlElement>),
}

struct FieldAccess<'a> {
    bindings: std::vec::IntoIter<(&'static str, Binding<'a>)>,
    pending: Option<(&'static str, Binding<'a>)>,
    naming: Naming,
}

impl<'a> FieldAccess<'a> {
    fn new(element: &'a XmlElement, fields: &'static [&'static str], naming: Naming) -> Self {
        let children: Vec<&XmlElement> = element.children.iter().collect();
        let mut consumed = vec![false; children.len()];
        let mut bindings = Vec::with_capacity(fields.len());

        if let Some((last, head)) = fields.split_last() {
            for &field in head {
                let found = (0..children.len())
                    .find(|&i| !consumed[i] && naming.matches(field, &children[i].name));
                if let Some(i) = found {
                    consumed[i] = true;
                    bindings.push((field, Binding::Element(children[i])));
                }
            }
            let rest = children
                .iter()
                .zip(&consumed)
                .filter(|(_, used)| !**used)
                .map(|(child, _)| *child)
                .collect();
            bindings.push((*last, Binding::Group(rest)));
        }

        Self {
            bindings: bindings.into_iter(),
            pending: None,
            naming,
        }
    }
}

impl<'de, 'a> de::MapAccess<'de> for FieldAccess<'a> {
    type Error = CodecError;

    fn next_key_seed<K: DeserializeSeed<'de>>(&mut self, seed: K) -> CodecResult<Option<K::Value>> {
        match self.bindings.next() {
            Some((field, binding)) => {
                self.pending = Some((field, binding));
                let key: StrDeserializer<'_, CodecError> = field.into_deserializer();
                seed.deserialize(key).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> CodecResult<V::Value> {
        match self.pending.take() {
            Some((_, Binding::Element(element))) => seed.deserialize(ElementDeserializer {
                element,
                role: Role::Property,
                naming: self.naming,
            }),
            Some((field, Binding::Group(elements))) => seed.deserialize(GroupDeserializer {
                field,
                elements,
                naming: self.naming,
            }),
            None => Err(CodecError::format("value requested before key")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.bindings.len())
    }
}

struct EnumContent<'a> {
    variant: &'static str,
    content: Option<ElementDeserializer<'a>>,
}

impl<'de, 'a> de::EnumAccess<'de> for EnumContent<'a> {
    type Error = CodecError;
    type Variant = Self;

    fn variant_seed<V: DeserializeSeed<'de>>(self, seed: V) -> CodecResult<(V::Value, Self)> {
        let key: StrDeserializer<'_, CodecError> = self.variant.into_deserializer();
        let value = seed.deserialize(key)?;
        Ok((value, self))
    }
}

impl<'de, 'a> de::VariantAccess<'de> for EnumContent<'a> {
    type Error = CodecError;

    fn unit_variant(self) -> CodecResult<()> {
        Ok(())
    }

    fn newtype_variant_seed<T: DeserializeSeed<'de>>(self, seed: T) -> CodecResult<T::Value> {
        match self.content {
            Some(content) => seed.deserialize(content),
            None => Err(CodecError::missing_element(self.variant)),
        }
    }

    fn tuple_variant<V: Visitor<'de>>(self, _len: usize, _visitor: V) -> CodecResult<V::Value> {
        Err(CodecError::unsupported(format!(
            "tuple variant {}",
            self.variant
        )))
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        fields: &'static [&'static str],
        visitor: V,
    ) -> CodecResult<V::Value> {
        match self.content {
            Some(content) => {
                visitor.visit_map(FieldAccess::new(content.element, fields, content.naming))
            }
            None => Err(CodecError::missing_element(self.variant)),
        }
    }
}
