//! # Serializer
//!
//! Entry point: turns one object, or a homogeneous sequence of objects, into
//! CSV on any [`std::io::Write`] sink.
//!
//! A run captures the value as a [`Node`] graph, picks the prototype (the
//! value itself, or the first non-null element of a sequence), and then
//! either hands every instance to a registered [`CustomSerializer`] or
//! discovers columns from the prototype and materialises one row per
//! instance.
//!
//! ```
//! use graphcsv::Serializer;
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! #[serde(rename_all = "PascalCase")]
//! struct Person { first_name: String, last_name: String }
//!
//! let serializer = Serializer::new();
//! let mut out = Vec::new();
//! serializer.serialize(&mut out, &Person { first_name: "Nate".into(), last_name: "Zaugg".into() })?;
//! assert_eq!(out, "\u{feff}FirstName,LastName\r\nNate,Zaugg\r\n".as_bytes());
//! # Ok::<(), graphcsv::error::CsvError>(())
//! ```

use std::fmt;
use std::io::Write;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::models::discovery::{prototype, SchemaDiscoverer};
use crate::models::graph::node::Node;
use crate::models::graph::ser::to_node;
use crate::models::materializer::{instances, populate_row};
use crate::models::schema::column::Column;
use crate::models::schema::markers::PropertyMarkers;
use crate::models::writers::csv_builder::CsvBuilder;
use crate::settings::CsvSettings;
use crate::traits::custom_serializer::CustomSerializer;
use crate::utils::join_parts;

/// Object graph to CSV serializer.
///
/// Holds the run configuration, property markers and the custom serializer
/// stack. A `Serializer` is not changed by a run and can be reused.
#[derive(Default)]
pub struct Serializer {
    pub settings: CsvSettings,
    pub markers: PropertyMarkers,
    serializers: Vec<Box<dyn CustomSerializer>>,
}

impl Serializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(mut self, settings: CsvSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_markers(mut self, markers: PropertyMarkers) -> Self {
        self.markers = markers;
        self
    }

    /// Register a custom serializer. Later registrations are asked first.
    pub fn push_serializer(&mut self, serializer: impl CustomSerializer + 'static) {
        self.serializers.push(Box::new(serializer));
    }

    /// Remove the most recently registered custom serializer.
    pub fn pop_serializer(&mut self) -> Option<Box<dyn CustomSerializer>> {
        self.serializers.pop()
    }

    pub fn clear_serializers(&mut self) {
        self.serializers.clear();
    }

    /// Serialise `value` to `output`.
    ///
    /// # Errors
    /// - [`CsvError::Configuration`](crate::error::CsvError::Configuration) for unusable settings
    /// - [`CsvError::InvalidArgument`](crate::error::CsvError::InvalidArgument) for a null value
    /// - [`CsvError::UnsupportedValue`](crate::error::CsvError::UnsupportedValue) when rows are not objects
    /// - [`CsvError::CyclicStructure`](crate::error::CsvError::CyclicStructure) for runaway nesting
    /// - [`CsvError::Io`](crate::error::CsvError::Io) from the sink
    pub fn serialize<W, T>(&self, output: W, value: &T) -> Result<()>
    where
        W: Write,
        T: ?Sized + Serialize,
    {
        self.settings.validate()?;
        let node = to_node(value, self.settings.max_depth)?;
        self.serialize_node(output, &node)
    }

    /// Serialise an already captured graph.
    pub fn serialize_node<W: Write>(&self, output: W, value: &Node) -> Result<()> {
        self.settings.validate()?;
        let settings = &self.settings;
        let mut csv = CsvBuilder::new(settings, output);

        let Some(proto) = prototype(value)? else {
            debug!("nothing to serialise");
            return csv.close();
        };

        let custom = proto
            .type_name()
            .and_then(|name| self.serializers.iter().rev().find(|s| s.will_serialize(name)));

        match custom {
            Some(custom) => {
                debug!(type_name = proto.type_name().unwrap_or_default(), "using custom serializer");
                let names = custom.column_names();
                csv.add_columns(names.iter().map(|parts| {
                    Arc::new(Column::named(join_parts(parts, &settings.name_path_delimiter)))
                }))?;
                let mut buf = Vec::new();
                for instance in instances(value) {
                    buf.clear();
                    custom.serialize_row(&mut buf, settings, instance)?;
                    csv.add_raw_row(&buf)?;
                }
            }
            None => {
                let columns = SchemaDiscoverer::new(settings, &self.markers).discover(value)?;
                csv.add_columns(columns.into_iter().map(Arc::new))?;
                for instance in instances(value) {
                    let row = csv.add_row()?;
                    if let Err(e) = populate_row(row, instance, settings) {
                        csv.discard_last_row();
                        return Err(e);
                    }
                }
            }
        }

        csv.close()
    }

    /// Serialise `value` into a fresh byte vector.
    pub fn to_vec<T: ?Sized + Serialize>(&self, value: &T) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.serialize(&mut out, value)?;
        Ok(out)
    }
}

impl fmt::Debug for Serializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Serializer")
            .field("settings", &self.settings)
            .field("markers", &self.markers)
            .field("serializers", &self.serializers.len())
            .finish()
    }
}
