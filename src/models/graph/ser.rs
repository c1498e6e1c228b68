//! # Graph Capture Serializer
//!
//! A `serde::Serializer` that records any `Serialize` value as a [`Node`]
//! tree, keeping struct field declaration order. This is how the crate sees
//! the "properties" of a value without runtime reflection.
//!
//! | Rust value | Node |
//! |------------|------|
//! | `bool`, integers, floats, `char`, `&str`, bytes | `Scalar` |
//! | `None`, `()`, unit structs | `Null` |
//! | `Some(x)`, newtype structs | captured as `x` |
//! | `Vec<T>`, slices, sets, tuples | `Seq` |
//! | structs | `Object` (kind `Struct`, named after the struct) |
//! | maps | `Object` (kind `Map`, keys rendered as text) |
//! | unit enum variants | `Scalar::Str(variant)` |
//! | data enum variants | `Object` named after the enum, one field named after the variant |
//!
//! Fields dropped by `skip_serializing_if` are recorded as `Null` so every
//! instance of a struct exposes the same property keys.
//!
//! Every container opened below the configured depth limit fails with
//! [`CsvError::CyclicStructure`]; this is what stops `Rc`/`RefCell` cycles
//! from recursing until the stack overflows.

use serde::ser::{self, Serialize};

use crate::error::{CsvError, Result};
use crate::models::graph::node::{Node, Object, ObjectKind, Scalar};

/// Capture `value` as a [`Node`] tree, failing once nesting exceeds `max_depth`.
pub fn to_node<T: ?Sized + Serialize>(value: &T, max_depth: usize) -> Result<Node> {
    value.serialize(NodeSerializer::new(max_depth))
}

/// Serializer producing [`Node`]s. Cheap to copy; carries only the depth budget.
#[derive(Debug, Clone, Copy)]
pub struct NodeSerializer {
    depth: usize,
    max_depth: usize,
}

impl NodeSerializer {
    pub fn new(max_depth: usize) -> Self {
        NodeSerializer { depth: 0, max_depth }
    }

    /// Serializer for the members of a container opened at this level.
    fn nested(self) -> Result<NodeSerializer> {
        let depth = self.depth + 1;
        if depth > self.max_depth {
            return Err(CsvError::CyclicStructure { max_depth: self.max_depth });
        }
        Ok(NodeSerializer { depth, max_depth: self.max_depth })
    }
}

fn single_field(type_name: &str, key: &str, value: Node) -> Node {
    Node::Object(Object {
        type_name: type_name.to_string(),
        kind: ObjectKind::Struct,
        fields: vec![(key.to_string(), value)],
    })
}

impl ser::Serializer for NodeSerializer {
    type Ok = Node;
    type Error = CsvError;

    type SerializeSeq = SeqCapture;
    type SerializeTuple = SeqCapture;
    type SerializeTupleStruct = SeqCapture;
    type SerializeTupleVariant = VariantSeqCapture;
    type SerializeMap = MapCapture;
    type SerializeStruct = StructCapture;
    type SerializeStructVariant = VariantStructCapture;

    fn serialize_bool(self, v: bool) -> Result<Node> {
        Ok(Node::Scalar(Scalar::Bool(v)))
    }

    fn serialize_i8(self, v: i8) -> Result<Node> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i16(self, v: i16) -> Result<Node> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i32(self, v: i32) -> Result<Node> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i64(self, v: i64) -> Result<Node> {
        Ok(Node::Scalar(Scalar::I64(v)))
    }

    fn serialize_i128(self, v: i128) -> Result<Node> {
        Ok(Node::Scalar(Scalar::I128(v)))
    }

    fn serialize_u8(self, v: u8) -> Result<Node> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u16(self, v: u16) -> Result<Node> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u32(self, v: u32) -> Result<Node> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u64(self, v: u64) -> Result<Node> {
        Ok(Node::Scalar(Scalar::U64(v)))
    }

    fn serialize_u128(self, v: u128) -> Result<Node> {
        Ok(Node::Scalar(Scalar::U128(v)))
    }

    fn serialize_f32(self, v: f32) -> Result<Node> {
        Ok(Node::Scalar(Scalar::F32(v)))
    }

    fn serialize_f64(self, v: f64) -> Result<Node> {
        Ok(Node::Scalar(Scalar::F64(v)))
    }

    fn serialize_char(self, v: char) -> Result<Node> {
        Ok(Node::Scalar(Scalar::Char(v)))
    }

    fn serialize_str(self, v: &str) -> Result<Node> {
        Ok(Node::Scalar(Scalar::Str(v.to_owned())))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Node> {
        Ok(Node::Scalar(Scalar::Bytes(v.to_vec())))
    }

    fn serialize_none(self) -> Result<Node> {
        Ok(Node::Null)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Node> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Node> {
        Ok(Node::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Node> {
        Ok(Node::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Node> {
        Ok(Node::Scalar(Scalar::Str(variant.to_owned())))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Node> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Node> {
        let inner = value.serialize(self.nested()?)?;
        Ok(single_field(name, variant, inner))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqCapture> {
        Ok(SeqCapture { inner: self.nested()?, items: Vec::with_capacity(len.unwrap_or(0)) })
    }

    fn serialize_tuple(self, len: usize) -> Result<SeqCapture> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SeqCapture> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<VariantSeqCapture> {
        Ok(VariantSeqCapture {
            enum_name: name,
            variant,
            seq: SeqCapture { inner: self.nested()?.nested()?, items: Vec::with_capacity(len) },
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<MapCapture> {
        Ok(MapCapture {
            inner: self.nested()?,
            fields: Vec::with_capacity(len.unwrap_or(0)),
            pending_key: None,
        })
    }

    fn serialize_struct(self, name: &'static str, len: usize) -> Result<StructCapture> {
        Ok(StructCapture { inner: self.nested()?, type_name: name, fields: Vec::with_capacity(len) })
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<VariantStructCapture> {
        Ok(VariantStructCapture {
            enum_name: name,
            variant,
            body: StructCapture {
                inner: self.nested()?.nested()?,
                type_name: variant,
                fields: Vec::with_capacity(len),
            },
        })
    }
}

/// Collects sequence, tuple and tuple-struct elements.
pub struct SeqCapture {
    inner: NodeSerializer,
    items: Vec<Node>,
}

impl SeqCapture {
    fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.items.push(value.serialize(self.inner)?);
        Ok(())
    }
}

impl ser::SerializeSeq for SeqCapture {
    type Ok = Node;
    type Error = CsvError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<Node> {
        Ok(Node::Seq(self.items))
    }
}

impl ser::SerializeTuple for SeqCapture {
    type Ok = Node;
    type Error = CsvError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<Node> {
        Ok(Node::Seq(self.items))
    }
}

impl ser::SerializeTupleStruct for SeqCapture {
    type Ok = Node;
    type Error = CsvError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<Node> {
        Ok(Node::Seq(self.items))
    }
}

/// Tuple variant: `E::V(a, b)` becomes `E { V: [a, b] }`.
pub struct VariantSeqCapture {
    enum_name: &'static str,
    variant: &'static str,
    seq: SeqCapture,
}

impl ser::SerializeTupleVariant for VariantSeqCapture {
    type Ok = Node;
    type Error = CsvError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.seq.push(value)
    }

    fn end(self) -> Result<Node> {
        Ok(single_field(self.enum_name, self.variant, Node::Seq(self.seq.items)))
    }
}

/// Collects map entries; keys must capture as scalars.
pub struct MapCapture {
    inner: NodeSerializer,
    fields: Vec<(String, Node)>,
    pending_key: Option<String>,
}

impl ser::SerializeMap for MapCapture {
    type Ok = Node;
    type Error = CsvError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<()> {
        match key.serialize(self.inner)? {
            Node::Scalar(s) => {
                self.pending_key = Some(s.to_string());
                Ok(())
            }
            other => Err(CsvError::UnsupportedValue(format!(
                "map keys must be scalars, found {}",
                other.kind_name()
            ))),
        }
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        let key = self
            .pending_key
            .take()
            .ok_or_else(|| CsvError::Serialize("map value serialised before its key".into()))?;
        self.fields.push((key, value.serialize(self.inner)?));
        Ok(())
    }

    fn end(self) -> Result<Node> {
        Ok(Node::Object(Object { type_name: String::new(), kind: ObjectKind::Map, fields: self.fields }))
    }
}

/// Collects struct fields in declaration order.
pub struct StructCapture {
    inner: NodeSerializer,
    type_name: &'static str,
    fields: Vec<(String, Node)>,
}

impl StructCapture {
    fn into_node(self) -> Node {
        Node::Object(Object {
            type_name: self.type_name.to_string(),
            kind: ObjectKind::Struct,
            fields: self.fields,
        })
    }
}

impl ser::SerializeStruct for StructCapture {
    type Ok = Node;
    type Error = CsvError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, key: &'static str, value: &T) -> Result<()> {
        self.fields.push((key.to_string(), value.serialize(self.inner)?));
        Ok(())
    }

    fn skip_field(&mut self, key: &'static str) -> Result<()> {
        self.fields.push((key.to_string(), Node::Null));
        Ok(())
    }

    fn end(self) -> Result<Node> {
        Ok(self.into_node())
    }
}

/// Struct variant: `E::V { a }` becomes `E { V: V { a } }`.
pub struct VariantStructCapture {
    enum_name: &'static str,
    variant: &'static str,
    body: StructCapture,
}

impl ser::SerializeStructVariant for VariantStructCapture {
    type Ok = Node;
    type Error = CsvError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, key: &'static str, value: &T) -> Result<()> {
        ser::SerializeStruct::serialize_field(&mut self.body, key, value)
    }

    fn skip_field(&mut self, key: &'static str) -> Result<()> {
        ser::SerializeStruct::skip_field(&mut self.body, key)
    }

    fn end(self) -> Result<Node> {
        let (enum_name, variant) = (self.enum_name, self.variant);
        Ok(single_field(enum_name, variant, self.body.into_node()))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::BTreeMap;
    use std::rc::Rc;

    use serde::Serialize;

    use super::*;
    use crate::test_helpers::{sample_order, Person};

    #[test]
    fn struct_fields_keep_declaration_order() {
        let node = to_node(&Person::new("Nate", "Zaugg"), 8).unwrap();
        let obj = node.as_object().unwrap();
        assert_eq!(obj.type_name, "Person");
        assert_eq!(obj.kind, ObjectKind::Struct);
        let keys: Vec<_> = obj.fields.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["Id", "FirstName", "LastName"]);
    }

    #[test]
    fn nested_collections_become_sequences() {
        let node = to_node(&sample_order(), 8).unwrap();
        let items = node.field("Items").and_then(Node::as_seq).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].field("Name"), Some(&Node::from("Galaxy S5")));
    }

    #[derive(Serialize)]
    enum Shape {
        Empty,
        Circle(f64),
        Rect { w: u32, h: u32 },
        Pair(i32, i32),
    }

    #[test]
    fn enum_variants_capture() {
        assert_eq!(to_node(&Shape::Empty, 8).unwrap(), Node::from("Empty"));

        let circle = to_node(&Shape::Circle(2.5), 8).unwrap();
        assert_eq!(circle.type_name(), Some("Shape"));
        assert_eq!(circle.field("Circle"), Some(&Node::from(2.5f64)));

        let rect = to_node(&Shape::Rect { w: 3, h: 4 }, 8).unwrap();
        let body = rect.field("Rect").unwrap();
        assert_eq!(body.type_name(), Some("Rect"));
        assert_eq!(body.field("h"), Some(&Node::from(4u32)));

        let pair = to_node(&Shape::Pair(1, 2), 8).unwrap();
        assert_eq!(pair.field("Pair").and_then(Node::as_seq).map(<[Node]>::len), Some(2));
    }

    #[test]
    fn maps_render_keys_as_text() {
        let mut m = BTreeMap::new();
        m.insert(2u32, "two");
        m.insert(1u32, "one");
        let node = to_node(&m, 8).unwrap();
        let obj = node.as_object().unwrap();
        assert_eq!(obj.kind, ObjectKind::Map);
        assert_eq!(obj.fields[0], ("1".to_string(), Node::from("one")));
    }

    #[test]
    fn compound_map_keys_are_rejected() {
        let mut m = BTreeMap::new();
        m.insert(vec![1u8], 1u8);
        assert!(matches!(to_node(&m, 8), Err(CsvError::UnsupportedValue(_))));
    }

    #[derive(Serialize)]
    struct Sparse {
        a: u8,
        #[serde(skip_serializing_if = "Option::is_none")]
        b: Option<u8>,
        #[serde(skip)]
        _hidden: u8,
    }

    #[test]
    fn skipped_fields_are_recorded_as_null() {
        let node = to_node(&Sparse { a: 1, b: None, _hidden: 9 }, 8).unwrap();
        let obj = node.as_object().unwrap();
        assert_eq!(obj.fields.len(), 2);
        assert_eq!(obj.field("b"), Some(&Node::Null));
    }

    #[derive(Serialize)]
    struct Link {
        name: &'static str,
        next: Option<Rc<RefCell<Link>>>,
    }

    #[test]
    fn cyclic_graph_fails_instead_of_overflowing() {
        let a = Rc::new(RefCell::new(Link { name: "a", next: None }));
        let b = Rc::new(RefCell::new(Link { name: "b", next: Some(a.clone()) }));
        a.borrow_mut().next = Some(b.clone());

        let res = to_node(&*a.borrow(), 16);
        assert!(matches!(res, Err(CsvError::CyclicStructure { max_depth: 16 })));

        // break the cycle so the test does not leak
        a.borrow_mut().next = None;
    }
}
