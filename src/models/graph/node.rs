//! # Object Graph Nodes
//!
//! Owned, order-preserving tree that stands in for a live object graph.
//! Values reach it through serde (see [`to_node`](super::ser::to_node)) or are
//! built by hand with the constructors below.
//!
//! ## Canonical text
//! [`Scalar`] values render the same way on every platform:
//! - integers in plain decimal
//! - floats through Rust `Display` (`300.0` → `300`, `0.25` → `0.25`, `NaN`, `inf`)
//! - booleans as `true` / `false`
//! - chars and text verbatim
//! - bytes as lower-case hex
//!
//! Dates, times and decimals arrive as text, since that is how chrono and
//! rust_decimal serialise them.

use std::fmt;

/// A plain value that always maps to exactly one column.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Char(char),
    I64(i64),
    U64(u64),
    I128(i128),
    U128(u128),
    F32(f32),
    F64(f64),
    Str(String),
    Bytes(Vec<u8>),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(v) => write!(f, "{}", v),
            Scalar::Char(v) => write!(f, "{}", v),
            Scalar::I64(v) => write!(f, "{}", v),
            Scalar::U64(v) => write!(f, "{}", v),
            Scalar::I128(v) => write!(f, "{}", v),
            Scalar::U128(v) => write!(f, "{}", v),
            Scalar::F32(v) => write!(f, "{}", v),
            Scalar::F64(v) => write!(f, "{}", v),
            Scalar::Str(v) => f.write_str(v),
            Scalar::Bytes(v) => {
                for b in v {
                    write!(f, "{:02x}", b)?;
                }
                Ok(())
            }
        }
    }
}

impl Scalar {
    /// Numeric view used by numeric formatters.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Scalar::I64(v) => Some(v as f64),
            Scalar::U64(v) => Some(v as f64),
            Scalar::I128(v) => Some(v as f64),
            Scalar::U128(v) => Some(v as f64),
            Scalar::F32(v) => Some(v as f64),
            Scalar::F64(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// Whether an object came from a struct (fixed fields) or a map (dynamic keys).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Struct,
    Map,
}

/// An object with named properties in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    /// Struct or variant name. Empty for maps.
    pub type_name: String,
    pub kind: ObjectKind,
    pub fields: Vec<(String, Node)>,
}

impl Object {
    /// Look up a property by key.
    pub fn field(&self, key: &str) -> Option<&Node> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

/// One node of a captured object graph.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Null,
    Scalar(Scalar),
    Seq(Vec<Node>),
    Object(Object),
}

impl Node {
    /// Build a struct-like object.
    pub fn object<K, I>(type_name: impl Into<String>, fields: I) -> Node
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Node)>,
    {
        Node::Object(Object {
            type_name: type_name.into(),
            kind: ObjectKind::Struct,
            fields: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        })
    }

    /// Build a map-like object.
    pub fn map<K, I>(fields: I) -> Node
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Node)>,
    {
        Node::Object(Object {
            type_name: String::new(),
            kind: ObjectKind::Map,
            fields: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        })
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Node::Null)
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Node::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&[Node]> {
        match self {
            Node::Seq(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Node::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Struct name for objects, `None` for everything else.
    pub fn type_name(&self) -> Option<&str> {
        self.as_object().map(|o| o.type_name.as_str())
    }

    /// Property of an object node.
    pub fn field(&self, key: &str) -> Option<&Node> {
        self.as_object().and_then(|o| o.field(key))
    }

    /// Short description used in error messages.
    pub(crate) fn kind_name(&self) -> &'static str {
        match self {
            Node::Null => "null",
            Node::Scalar(_) => "scalar",
            Node::Seq(_) => "sequence",
            Node::Object(_) => "object",
        }
    }
}

macro_rules! scalar_from {
    ($($t:ty => $variant:ident as $conv:ty),* $(,)?) => {
        $(
            impl From<$t> for Node {
                fn from(v: $t) -> Self {
                    Node::Scalar(Scalar::$variant(v as $conv))
                }
            }
        )*
    };
}

scalar_from! {
    i8 => I64 as i64, i16 => I64 as i64, i32 => I64 as i64, i64 => I64 as i64,
    u8 => U64 as u64, u16 => U64 as u64, u32 => U64 as u64, u64 => U64 as u64,
    f32 => F32 as f32, f64 => F64 as f64,
}

impl From<bool> for Node {
    fn from(v: bool) -> Self {
        Node::Scalar(Scalar::Bool(v))
    }
}

impl From<char> for Node {
    fn from(v: char) -> Self {
        Node::Scalar(Scalar::Char(v))
    }
}

impl From<&str> for Node {
    fn from(v: &str) -> Self {
        Node::Scalar(Scalar::Str(v.to_string()))
    }
}

impl From<String> for Node {
    fn from(v: String) -> Self {
        Node::Scalar(Scalar::Str(v))
    }
}

impl<T: Into<Node>> From<Option<T>> for Node {
    fn from(v: Option<T>) -> Self {
        v.map_or(Node::Null, Into::into)
    }
}

impl<T: Into<Node>> From<Vec<T>> for Node {
    fn from(v: Vec<T>) -> Self {
        Node::Seq(v.into_iter().map(Into::into).collect())
    }
}
