//! # CSV Writer
//!
//! Convenience sink pairing a [`Serializer`] with a destination.
//! Wraps any [`std::io::Write`] and serialises values on demand.
//!
//! ## Features
//! - Pluggable destination: in-memory (`Vec<u8>`) or files (`std::fs::File`)
//! - Settings, markers and custom serializers come from the wrapped [`Serializer`]
//! - Each `write_*` call is one complete run: byte-order mark and header included
//!
//! ## Quick start
//! ```no_run
//! use graphcsv::models::writers::csv_writer::CsvWriter;
//! use graphcsv::settings::CsvSettings;
//! # #[derive(serde::Serialize)] struct Person { name: String }
//! # let people = vec![Person { name: "Nate".into() }];
//!
//! // In-memory
//! let mut w = CsvWriter::new_vec();
//! w.write_value(&people)?;
//! let bytes = w.into_inner();
//!
//! // To a file, custom settings
//! let settings = CsvSettings { field_delimiter: ";".into(), ..Default::default() };
//! let mut wf = CsvWriter::to_path_with_settings("out.csv", settings)?;
//! wf.write_value(&people)?;
//! wf.flush()?;
//! # Ok::<(), graphcsv::error::CsvError>(())
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::models::graph::node::Node;
use crate::serializer::Serializer;
use crate::settings::CsvSettings;

/// A CSV sink for serde values and captured graphs.
pub struct CsvWriter<W: Write> {
    writer: W,
    serializer: Serializer,
}

impl CsvWriter<Vec<u8>> {
    /// In-memory writer with default settings.
    pub fn new_vec() -> Self {
        Self::new(Vec::new())
    }

    /// Consume the writer and return the CSV bytes.
    pub fn into_inner(self) -> Vec<u8> {
        self.writer
    }
}

impl<W: Write> CsvWriter<W> {
    pub fn new(writer: W) -> Self {
        Self::with_serializer(writer, Serializer::new())
    }

    pub fn with_serializer(writer: W, serializer: Serializer) -> Self {
        CsvWriter { writer, serializer }
    }

    pub fn serializer(&self) -> &Serializer {
        &self.serializer
    }

    pub fn serializer_mut(&mut self) -> &mut Serializer {
        &mut self.serializer
    }

    /// Serialise one object or a sequence of objects.
    pub fn write_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.serializer.serialize(&mut self.writer, value)
    }

    /// Serialise an already captured graph.
    pub fn write_node(&mut self, value: &Node) -> Result<()> {
        self.serializer.serialize_node(&mut self.writer, value)
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

impl CsvWriter<BufWriter<File>> {
    /// Create (or truncate) `path` with default settings.
    pub fn to_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::to_path_with_settings(path, CsvSettings::default())
    }

    pub fn to_path_with_settings<P: AsRef<Path>>(path: P, settings: CsvSettings) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::with_serializer(BufWriter::new(file), Serializer::new().with_settings(settings)))
    }
}
