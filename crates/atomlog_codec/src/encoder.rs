//! Serde serializer producing XML content elements.

use crate::error::{CodecError, CodecResult};
use crate::naming::Naming;
use crate::value::{item_element, Record, Value, ITEM_ELEMENT};
use crate::xml::XmlElement;
use serde::ser::{self, Impossible, Serialize};
use uuid::Uuid;

/// Serializes `value` as an element named `name` in `namespace`.
///
/// The value must serialize as a record or as a sequence. An enum variant
/// carrying content is written as a single child element named after the
/// variant.
///
/// # Errors
///
/// Returns [`CodecError::Unsupported`] for tuples, maps, unit variants and
/// scalar roots.
pub fn to_element<T: Serialize + ?Sized>(
    value: &T,
    name: &str,
    namespace: &str,
    naming: Naming,
) -> CodecResult<XmlElement> {
    match value.serialize(ValueSerializer { naming })? {
        Value::Record(record) if record.variant => {
            let variant = record.name.clone();
            Ok(XmlElement::new(namespace, name).with_child(record.into_element(&variant, namespace)))
        }
        Value::Record(record) => Ok(record.into_element(name, namespace)),
        Value::Tagged(variant, text) => Ok(XmlElement::new(namespace, name)
            .with_child(XmlElement::new(namespace, variant).with_text(text))),
        Value::Seq(items) | Value::OptionalSeq(items) => {
            let mut element = XmlElement::new(namespace, name);
            for item in items {
                if let Some(child) = item_element(item, ITEM_ELEMENT, namespace) {
                    element.push_child(child);
                }
            }
            Ok(element)
        }
        _ => Err(CodecError::unsupported(format!(
            "{name}: content must serialize as a record"
        ))),
    }
}

#[derive(Clone, Copy)]
struct ValueSerializer {
    naming: Naming,
}

impl ValueSerializer {
    fn text(value: impl ToString) -> CodecResult<Value> {
        Ok(Value::Text(value.to_string()))
    }
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = CodecError;
    type SerializeSeq = SeqBuilder;
    type SerializeTuple = Impossible<Value, CodecError>;
    type SerializeTupleStruct = Impossible<Value, CodecError>;
    type SerializeTupleVariant = Impossible<Value, CodecError>;
    type SerializeMap = Impossible<Value, CodecError>;
    type SerializeStruct = RecordBuilder;
    type SerializeStructVariant = RecordBuilder;

    fn is_human_readable(&self) -> bool {
        false
    }

    fn serialize_bool(self, v: bool) -> CodecResult<Value> {
        Self::text(v)
    }

    fn serialize_i8(self, v: i8) -> CodecResult<Value> {
        Self::text(v)
    }

    fn serialize_i16(self, v: i16) -> CodecResult<Value> {
        Self::text(v)
    }

    fn serialize_i32(self, v: i32) -> CodecResult<Value> {
        Self::text(v)
    }

    fn serialize_i64(self, v: i64) -> CodecResult<Value> {
        Self::text(v)
    }

    fn serialize_i128(self, v: i128) -> CodecResult<Value> {
        Self::text(v)
    }

    fn serialize_u8(self, v: u8) -> CodecResult<Value> {
        Self::text(v)
    }

    fn serialize_u16(self, v: u16) -> CodecResult<Value> {
        Self::text(v)
    }

    fn serialize_u32(self, v: u32) -> CodecResult<Value> {
        Self::text(v)
    }

    fn serialize_u64(self, v: u64) -> CodecResult<Value> {
        Self::text(v)
    }

    fn serialize_u128(self, v: u128) -> CodecResult<Value> {
        Self::text(v)
    }

    fn serialize_f32(self, v: f32) -> CodecResult<Value> {
        Self::text(v)
    }

    fn serialize_f64(self, v: f64) -> CodecResult<Value> {
        Self::text(v)
    }

    fn serialize_char(self, v: char) -> CodecResult<Value> {
        Self::text(v)
    }

    fn serialize_str(self, v: &str) -> CodecResult<Value> {
        Self::text(v)
    }

    // Only identifiers travel as raw bytes; they are written in URN form.
    fn serialize_bytes(self, v: &[u8]) -> CodecResult<Value> {
        let id = Uuid::from_slice(v).map_err(|_| CodecError::unsupported("byte string"))?;
        Self::text(id.urn())
    }

    fn serialize_none(self) -> CodecResult<Value> {
        Ok(Value::Absent)
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> CodecResult<Value> {
        match value.serialize(self)? {
            Value::Seq(items) => Ok(Value::OptionalSeq(items)),
            other => Ok(other),
        }
    }

    fn serialize_unit(self) -> CodecResult<Value> {
        Ok(Value::Text(String::new()))
    }

    fn serialize_unit_struct(self, name: &'static str) -> CodecResult<Value> {
        Ok(Value::Record(Record::new(name, self.naming)))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
    ) -> CodecResult<Value> {
        Ok(Value::Text(self.naming.element_name(variant)))
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> CodecResult<Value> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        value: &T,
    ) -> CodecResult<Value> {
        let variant = self.naming.element_name(variant);
        match value.serialize(self)? {
            Value::Record(record) => Ok(Value::Record(Record {
                name: variant,
                variant: true,
                ..record
            })),
            Value::Text(text) => Ok(Value::Tagged(variant, text)),
            _ => Err(CodecError::unsupported(format!("variant {variant}"))),
        }
    }

    fn serialize_seq(self, len: Option<usize>) -> CodecResult<SeqBuilder> {
        Ok(SeqBuilder {
            naming: self.naming,
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, _len: usize) -> CodecResult<Self::SerializeTuple> {
        Err(CodecError::unsupported("tuple"))
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> CodecResult<Self::SerializeTupleStruct> {
        Err(CodecError::unsupported(format!("tuple struct {name}")))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _index: u32,
        variant: &'static str,
        _len: usize,
    ) -> CodecResult<Self::SerializeTupleVariant> {
        Err(CodecError::unsupported(format!(
            "tuple variant {name}::{variant}"
        )))
    }

    fn serialize_map(self, _len: Option<usize>) -> CodecResult<Self::SerializeMap> {
        Err(CodecError::unsupported("map"))
    }

    fn serialize_struct(self, name: &'static str, _len: usize) -> CodecResult<RecordBuilder> {
        Ok(RecordBuilder::new(name, self.naming))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        _len: usize,
    ) -> CodecResult<RecordBuilder> {
        let mut builder = RecordBuilder::new(variant, self.naming);
        builder.record.variant = true;
        Ok(builder)
    }
}

struct SeqBuilder {
    naming: Naming,
    items: Vec<Value>,
}

impl ser::SerializeSeq for SeqBuilder {
    type Ok = Value;
    type Error = CodecError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> CodecResult<()> {
        let item = value.serialize(ValueSerializer {
            naming: self.naming,
        })?;
        if item != Value::Absent {
            self.items.push(item);
        }
        Ok(())
    }

    fn end(self) -> CodecResult<Value> {
        Ok(Value::Seq(self.items))
    }
}

struct RecordBuilder {
    naming: Naming,
    record: Record,
}

impl RecordBuilder {
    fn new(name: &str, naming: Naming) -> Self {
        Self {
            naming,
            record: Record::new(name, naming),
        }
    }

    fn field<T: Serialize + ?Sized>(&mut self, key: &'static str, value: &T) -> CodecResult<()> {
        let value = value.serialize(ValueSerializer {
            naming: self.naming,
        })?;
        self.record.trailing_items = matches!(value, Value::Seq(_));
        self.record
            .fields
            .push((self.naming.element_name(key), value));
        Ok(())
    }
}

impl ser::SerializeStruct for RecordBuilder {
    type Ok = Value;
    type Error = CodecError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> CodecResult<()> {
        self.field(key, value)
    }

    // A skipped field after a collection means the collection is not last.
    fn skip_field(&mut self, _key: &'static str) -> CodecResult<()> {
        self.record.trailing_items = false;
        Ok(())
    }

    fn end(self) -> CodecResult<Value> {
        Ok(Value::Record(self.record))
    }
}

impl ser::SerializeStructVariant for RecordBuilder {
    type Ok = Value;
    type Error = CodecError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> CodecResult<()> {
        self.field(key, value)
    }

    fn skip_field(&mut self, _key: &'static str) -> CodecResult<()> {
        self.record.trailing_items = false;
        Ok(())
    }

    fn end(self) -> CodecResult<Value> {
        Ok(Value::Record(self.record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    const NS: &str = "urn:test";

    #[derive(Serialize)]
    struct Address {
        street_name: String,
        zip: u32,
    }

    #[derive(Serialize)]
    #[allow(dead_code)]
    enum Status {
        Active,
        Suspended { reason: String },
        Code(u16),
    }

    #[derive(Serialize)]
    struct Customer {
        id: Uuid,
        name: String,
        nickname: Option<String>,
        home: Address,
        status: Status,
        tags: Vec<String>,
        orders: Vec<Address>,
    }

    fn customer() -> Customer {
        Customer {
            id: Uuid::from_u128(7),
            name: "Ada".into(),
            nickname: None,
            home: Address {
                street_name: "Main".into(),
                zip: 1234,
            },
            status: Status::Active,
            tags: vec!["a".into(), "b".into()],
            orders: vec![Address {
                street_name: "Side".into(),
                zip: 1,
            }],
        }
    }

    #[test]
    fn struct_fields_become_kebab_children() {
        let element = to_element(&customer(), "customer", NS, Naming::Convention).unwrap();
        let names: Vec<&str> = element.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "name", "home", "status", "tags", "address"]);
        assert!(element.children.iter().all(|c| c.namespace == NS));
    }

    #[test]
    fn uuid_is_written_as_urn() {
        let element = to_element(&customer(), "customer", NS, Naming::Convention).unwrap();
        assert_eq!(
            element.children[0].text,
            "urn:uuid:00000000-0000-0000-0000-000000000007"
        );
    }

    #[test]
    fn nested_record_is_wrapped_in_field_element() {
        let element = to_element(&customer(), "customer", NS, Naming::Convention).unwrap();
        let home = &element.children[2];
        assert_eq!(home.children.len(), 1);
        let address = &home.children[0];
        assert_eq!(address.name, "address");
        assert_eq!(address.children[0].name, "street-name");
        assert_eq!(address.children[1].text, "1234");
    }

    #[test]
    fn unit_variant_is_kebab_text() {
        let element = to_element(&customer(), "customer", NS, Naming::Convention).unwrap();
        assert_eq!(element.children[3].text, "active");
    }

    #[test]
    fn non_trailing_collection_is_wrapped() {
        let element = to_element(&customer(), "customer", NS, Naming::Convention).unwrap();
        let tags = &element.children[4];
        assert_eq!(tags.name, "tags");
        let items: Vec<&str> = tags.children.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(items, vec!["a", "b"]);
        assert!(tags.children.iter().all(|c| c.name == ITEM_ELEMENT));
    }

    #[test]
    fn trailing_collection_is_flattened() {
        let element = to_element(&customer(), "customer", NS, Naming::Convention).unwrap();
        let last = element.children.last().unwrap();
        assert_eq!(last.name, "address");
        assert_eq!(last.children[0].text, "Side");
    }

    #[test]
    fn verbatim_naming_keeps_declared_names() {
        let element = to_element(&customer(), "Customer", NS, Naming::Verbatim).unwrap();
        assert_eq!(element.name, "Customer");
        assert_eq!(element.children[2].children[0].name, "Address");
        assert_eq!(element.children[2].children[0].children[0].name, "street_name");
        assert_eq!(element.children[3].text, "Active");
    }

    #[test]
    fn enum_variants_with_content() {
        #[derive(Serialize)]
        struct Holder {
            first: Status,
            second: Status,
        }
        let holder = Holder {
            first: Status::Suspended {
                reason: "late".into(),
            },
            second: Status::Code(42),
        };
        let element = to_element(&holder, "holder", NS, Naming::Convention).unwrap();
        let suspended = &element.children[0].children[0];
        assert_eq!(suspended.name, "suspended");
        assert_eq!(suspended.children[0].text, "late");
        let code = &element.children[1].children[0];
        assert_eq!(code.name, "code");
        assert_eq!(code.text, "42");
    }

    #[test]
    fn skipped_trailing_field_keeps_collection_wrapped() {
        #[derive(Serialize)]
        struct Partial {
            items: Vec<u8>,
            #[serde(skip_serializing_if = "Option::is_none")]
            note: Option<String>,
        }
        let element = to_element(
            &Partial {
                items: vec![1, 2],
                note: None,
            },
            "partial",
            NS,
            Naming::Convention,
        )
        .unwrap();
        assert_eq!(element.children.len(), 1);
        assert_eq!(element.children[0].name, "items");
        assert_eq!(element.children[0].children.len(), 2);
    }

    #[test]
    fn optional_trailing_collection_stays_wrapped() {
        #[derive(Serialize)]
        struct Tagged {
            owner: String,
            tags: Option<Vec<String>>,
        }
        let element = to_element(
            &Tagged {
                owner: "me".into(),
                tags: Some(vec![]),
            },
            "tagged",
            NS,
            Naming::Convention,
        )
        .unwrap();
        assert_eq!(element.children.len(), 2);
        assert_eq!(element.children[1].name, "tags");
        assert!(element.children[1].children.is_empty());
    }

    #[test]
    fn enum_root_wraps_the_variant() {
        let element = to_element(
            &Status::Suspended {
                reason: "late".into(),
            },
            "status",
            NS,
            Naming::Convention,
        )
        .unwrap();
        assert_eq!(element.name, "status");
        assert_eq!(element.children.len(), 1);
        assert_eq!(element.children[0].name, "suspended");
        assert_eq!(element.children[0].children[0].text, "late");

        let element = to_element(&Status::Code(3), "status", NS, Naming::Convention).unwrap();
        assert_eq!(element.children[0].name, "code");
        assert_eq!(element.children[0].text, "3");

        assert!(matches!(
            to_element(&Status::Active, "status", NS, Naming::Convention),
            Err(CodecError::Unsupported { .. })
        ));
    }

    #[test]
    fn unsupported_shapes_are_rejected() {
        #[derive(Serialize)]
        struct WithTuple {
            pair: (u8, u8),
        }
        assert!(matches!(
            to_element(&WithTuple { pair: (1, 2) }, "t", NS, Naming::Convention),
            Err(CodecError::Unsupported { .. })
        ));
        assert!(matches!(
            to_element(&5u32, "n", NS, Naming::Convention),
            Err(CodecError::Unsupported { .. })
        ));
    }
}
