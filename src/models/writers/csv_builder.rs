//! # CSV Builder
//!
//! Row buffer in front of an [`std::io::Write`] sink.
//!
//! Columns are fixed before the first row. Rows are retained until two newer
//! rows exist, so the most recent rows can still be edited or duplicated;
//! anything older is written out and dropped from memory.
//!
//! The sink is touched lazily: the byte-order mark and header are written
//! when the first row leaves the buffer, so a run without rows writes
//! nothing at all.
//!
//! ```
//! use std::sync::Arc;
//! use graphcsv::models::schema::column::Column;
//! use graphcsv::models::writers::csv_builder::CsvBuilder;
//! use graphcsv::settings::CsvSettings;
//!
//! let settings = CsvSettings { write_byte_order_mark: false, ..Default::default() };
//! let mut csv = CsvBuilder::new(&settings, Vec::new());
//! csv.add_column(Arc::new(Column::named("FirstName")))?;
//! csv.add_column(Arc::new(Column::named("LastName")))?;
//! let row = csv.add_row()?;
//! row.set(0, "Nate")?;
//! row.set(1, "Zaugg")?;
//! let bytes = csv.finish()?;
//! assert_eq!(bytes, b"FirstName,LastName\r\nNate,Zaugg\r\n");
//! # Ok::<(), graphcsv::error::CsvError>(())
//! ```

use std::collections::VecDeque;
use std::io::Write;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::constants::ROW_RETENTION_DEPTH;
use crate::error::{CsvError, Result};
use crate::models::encoders::csv::{byte_order_mark, encode_text, format_record};
use crate::models::schema::column::Column;
use crate::models::schema::row::Row;
use crate::settings::CsvSettings;

pub struct CsvBuilder<'s, W: Write> {
    settings: Option<&'s CsvSettings>,
    output: Option<W>,
    writer_created: bool,
    closed: bool,
    row_count: usize,
    columns: Vec<Arc<Column>>,
    rows: VecDeque<Row>,
}

impl<W: Write> Default for CsvBuilder<'_, W> {
    /// A detached builder: rows can be assembled but nothing can be written.
    fn default() -> Self {
        Self::with_parts(None, None)
    }
}

impl<'s, W: Write> CsvBuilder<'s, W> {
    pub fn new(settings: &'s CsvSettings, output: W) -> Self {
        Self::with_parts(Some(settings), Some(output))
    }

    fn with_parts(settings: Option<&'s CsvSettings>, output: Option<W>) -> Self {
        CsvBuilder {
            settings,
            output,
            writer_created: false,
            closed: false,
            row_count: 0,
            columns: Vec::new(),
            rows: VecDeque::new(),
        }
    }

    /// Append a column.
    ///
    /// # Errors
    /// [`CsvError::InvalidOperation`] once any row has been added.
    pub fn add_column(&mut self, column: Arc<Column>) -> Result<()> {
        if self.row_count > 0 {
            return Err(CsvError::InvalidOperation(
                "Columns cannot be added once rows exist.".into(),
            ));
        }
        self.columns.push(column);
        Ok(())
    }

    pub fn add_columns<I>(&mut self, columns: I) -> Result<()>
    where
        I: IntoIterator<Item = Arc<Column>>,
    {
        for column in columns {
            self.add_column(column)?;
        }
        Ok(())
    }

    pub fn columns(&self) -> &[Arc<Column>] {
        &self.columns
    }

    /// Append an empty row and return it for population.
    ///
    /// Rows older than the newest two are written out first.
    pub fn add_row(&mut self) -> Result<&mut Row> {
        let row = Row::new(&self.columns);
        self.push_row(row)
    }

    /// Append a copy of the most recent row.
    ///
    /// # Errors
    /// [`CsvError::InvalidOperation`] when no buffered row exists.
    pub fn duplicate_last_row(&mut self) -> Result<&mut Row> {
        let copy = self.rows.back().cloned().ok_or_else(|| {
            CsvError::InvalidOperation("There are no rows available to duplicate.".into())
        })?;
        self.push_row(copy)
    }

    /// Write a pre-serialised row verbatim, followed by the line delimiter.
    ///
    /// Buffered rows are written first so output order matches call order.
    ///
    /// # Errors
    /// [`CsvError::InvalidOperation`] once the builder has been closed.
    pub fn add_raw_row(&mut self, bytes: &[u8]) -> Result<()> {
        self.ensure_open()?;
        self.write_buffered(0)?;
        self.start()?;
        let settings = self.settings()?;
        let terminator = encode_text(&settings.line_delimiter, settings)?;
        let output = self.output_mut()?;
        output.write_all(bytes)?;
        output.write_all(&terminator)?;
        self.row_count += 1;
        Ok(())
    }

    /// Drop the most recent row if it has not been written yet.
    ///
    /// Used to abandon a row whose population failed, so that a later close
    /// does not write it half filled.
    pub fn discard_last_row(&mut self) -> Option<Row> {
        let row = self.rows.pop_back()?;
        self.row_count -= 1;
        Some(row)
    }

    /// Rows still held in memory, oldest first.
    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    /// Rows added so far, written or not.
    #[inline]
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Value at (`row` number, `column` index) if the row is still buffered.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.iter().find(|r| r.number() == row).and_then(|r| r.get(column))
    }

    /// Set the value at (`row` number, `column` index).
    ///
    /// # Errors
    /// [`CsvError::InvalidOperation`] when the row has already been written
    /// or the column index is out of range.
    pub fn set_cell(&mut self, row: usize, column: usize, value: impl Into<String>) -> Result<()> {
        let target = self
            .rows
            .iter_mut()
            .find(|r| r.number() == row)
            .ok_or_else(|| CsvError::InvalidOperation(format!("row {row} is not buffered")))?;
        target.set(column, value)
    }

    /// The sink, if attached.
    pub fn get_ref(&self) -> Option<&W> {
        self.output.as_ref()
    }

    /// Write every remaining row and flush the sink.
    ///
    /// Closing twice, or closing a builder whose sink was never written to
    /// and has no rows, completes without touching the sink.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        let pending = self.rows.len();
        self.write_buffered(0)?;
        if self.writer_created {
            if let Some(output) = self.output.as_mut() {
                output.flush()?;
            }
            debug!(rows = self.row_count, flushed = pending, "csv closed");
        }
        Ok(())
    }

    /// Close and hand back the sink.
    ///
    /// # Errors
    /// [`CsvError::Configuration`] for a detached builder.
    pub fn finish(mut self) -> Result<W> {
        self.close()?;
        self.output
            .take()
            .ok_or_else(|| CsvError::Configuration("no output has been configured".into()))
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(CsvError::InvalidOperation("The builder has been closed.".into()));
        }
        Ok(())
    }

    /// Make room for `row`, then number and buffer it.
    ///
    /// The count only moves once older rows are safely written.
    fn push_row(&mut self, mut row: Row) -> Result<&mut Row> {
        self.ensure_open()?;
        self.write_buffered(ROW_RETENTION_DEPTH - 1)?;
        self.row_count += 1;
        row.set_number(self.row_count);
        self.rows.push_back(row);
        self.rows
            .back_mut()
            .ok_or_else(|| CsvError::InvalidOperation("row buffer is empty".into()))
    }

    /// Write out buffered rows until only `keep` remain.
    ///
    /// A row that fails to write stays at the front of the buffer.
    fn write_buffered(&mut self, keep: usize) -> Result<()> {
        while self.rows.len() > keep {
            let Some(row) = self.rows.pop_front() else { break };
            if let Err(e) = self.write_row(&row) {
                self.rows.push_front(row);
                return Err(e);
            }
        }
        Ok(())
    }

    fn write_row(&mut self, row: &Row) -> Result<()> {
        self.start()?;
        let settings = self.settings()?;
        let line = format_record(row.cells().iter().map(|c| c.value()), settings);
        let bytes = encode_text(&line, settings)?;
        self.output_mut()?.write_all(&bytes)?;
        Ok(())
    }

    /// Emit the byte-order mark and header the first time anything is written.
    fn start(&mut self) -> Result<()> {
        if self.writer_created {
            return Ok(());
        }
        let settings = self.settings()?;
        let output = self
            .output
            .as_mut()
            .ok_or_else(|| CsvError::Configuration("no output has been configured".into()))?;

        if let Some(bom) = byte_order_mark(settings) {
            output.write_all(bom)?;
        }
        if settings.write_headers {
            let header = format_record(self.columns.iter().map(|c| c.name()), settings);
            output.write_all(&encode_text(&header, settings)?)?;
        }
        self.writer_created = true;
        Ok(())
    }

    fn settings(&self) -> Result<&'s CsvSettings> {
        self.settings
            .ok_or_else(|| CsvError::Configuration("no settings have been configured".into()))
    }

    fn output_mut(&mut self) -> Result<&mut W> {
        self.output
            .as_mut()
            .ok_or_else(|| CsvError::Configuration("no output has been configured".into()))
    }
}

impl<W: Write> Drop for CsvBuilder<'_, W> {
    fn drop(&mut self) {
        if self.closed || self.output.is_none() || self.settings.is_none() {
            return;
        }
        if let Err(e) = self.close() {
            warn!(error = %e, "failed to close csv output");
        }
    }
}
