pub mod traits {
    pub mod custom_serializer;
    pub mod value_formatter;
}

pub mod models {
    pub mod graph {
        pub mod node;
        pub mod ser;
    }
    pub mod schema {
        pub mod column;
        pub mod markers;
        pub mod row;
    }
    pub mod encoders {
        pub mod csv;
    }
    pub mod writers {
        pub mod csv_builder;
        pub mod csv_writer;
    }
    pub mod discovery;
    pub mod formatters;
    pub mod materializer;
    pub mod resolver;
}

pub mod constants;
pub mod enums;
pub mod error;
pub mod serializer;
pub mod settings;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use crate::error::{CsvError, Result};
pub use crate::models::graph::node::{Node, Object, ObjectKind, Scalar};
pub use crate::models::graph::ser::to_node;
pub use crate::models::schema::column::{Column, PathSegment};
pub use crate::models::schema::markers::PropertyMarkers;
pub use crate::models::schema::row::{Cell, Row};
pub use crate::models::writers::csv_builder::CsvBuilder;
pub use crate::models::writers::csv_writer::CsvWriter;
pub use crate::serializer::Serializer;
pub use crate::settings::CsvSettings;
pub use crate::traits::custom_serializer::CustomSerializer;
pub use crate::traits::value_formatter::ValueFormatter;
