//! # Rows and Cells
//!
//! A [`Row`] holds one [`Cell`] per column, in column order. Cells are
//! addressable by position or by column identity (`Arc` pointer equality).

use std::ops::Index;
use std::sync::Arc;

use crate::error::{CsvError, Result};
use crate::models::schema::column::Column;

/// A column reference plus its resolved text. Empty until materialised.
#[derive(Debug, Clone)]
pub struct Cell {
    column: Arc<Column>,
    value: String,
}

impl Cell {
    /// An empty cell for `column`.
    pub fn new(column: Arc<Column>) -> Self {
        Cell { column, value: String::new() }
    }

    /// The column this cell belongs to.
    #[inline]
    pub fn column(&self) -> &Arc<Column> {
        &self.column
    }

    /// Rendered text, empty until set.
    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replace the rendered text.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }
}

/// One output line worth of cells.
#[derive(Debug, Clone)]
pub struct Row {
    number: usize,
    cells: Vec<Cell>,
}

impl Row {
    /// Empty row against a fixed column list.
    pub fn new(columns: &[Arc<Column>]) -> Self {
        Row { number: 0, cells: columns.iter().cloned().map(Cell::new).collect() }
    }

    /// 1-based position of the row within its run (0 when detached).
    #[inline]
    pub fn number(&self) -> usize {
        self.number
    }

    pub(crate) fn set_number(&mut self, number: usize) {
        self.number = number;
    }

    /// Number of cells, equal to the number of columns.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True for a row built against no columns.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cells in column order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cells in column order, for population.
    pub fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Value at column position `index`.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(Cell::value)
    }

    /// Set the value at `index`.
    ///
    /// # Errors
    /// [`CsvError::InvalidOperation`] if `index` is past the last column.
    pub fn set(&mut self, index: usize, value: impl Into<String>) -> Result<()> {
        let len = self.cells.len();
        let cell = self.cells.get_mut(index).ok_or_else(|| {
            CsvError::InvalidOperation(format!("column index {index} out of range for {len} columns"))
        })?;
        cell.set_value(value);
        Ok(())
    }

    /// Value of the cell belonging to `column`.
    pub fn value_of(&self, column: &Arc<Column>) -> Option<&str> {
        self.cells.iter().find(|c| Arc::ptr_eq(&c.column, column)).map(Cell::value)
    }

    /// Set the value of the cell belonging to `column`.
    ///
    /// # Errors
    /// [`CsvError::InvalidOperation`] if the column is not part of this row.
    pub fn set_by_column(&mut self, column: &Arc<Column>, value: impl Into<String>) -> Result<()> {
        let cell = self
            .cells
            .iter_mut()
            .find(|c| Arc::ptr_eq(&c.column, column))
            .ok_or_else(|| CsvError::InvalidOperation(format!("column '{}' is not part of this row", column)))?;
        cell.set_value(value);
        Ok(())
    }
}

impl Index<usize> for Row {
    type Output = str;

    fn index(&self, index: usize) -> &str {
        self.cells[index].value()
    }
}
