//! # Custom Serializer
//!
//! Take over row production for a whole type, bypassing the generic
//! property walk.
//!
//! Register implementations with
//! [`Serializer::push_serializer`](crate::serializer::Serializer::push_serializer).
//! On every run the registered serializers are asked in reverse registration
//! order (most recent first) whether they handle the prototype's type name.
//! The first that answers `true` supplies the columns and writes every row;
//! when none does the generic walk is used.

use std::io::Write;

use crate::error::Result;
use crate::models::graph::node::Node;
use crate::settings::CsvSettings;

/// Per-type row serializer.
pub trait CustomSerializer: Send + Sync {
    /// Whether this serializer produces rows for values named `type_name`.
    ///
    /// `type_name` is the struct (or enum) name captured from serde; it is
    /// empty for maps.
    fn will_serialize(&self, type_name: &str) -> bool;

    /// Column names as unjoined parts, e.g. `["Person", "Address", "Street"]`.
    ///
    /// Parts are joined with the configured name path delimiter.
    fn column_names(&self) -> Vec<Vec<String>>;

    /// Write one row for `value`, without the line terminator.
    ///
    /// The bytes are written verbatim, so the implementation is responsible
    /// for delimiting, quoting and encoding.
    fn serialize_row(&self, output: &mut dyn Write, settings: &CsvSettings, value: &Node) -> Result<()>;
}
