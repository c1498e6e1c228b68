//! # Columns
//!
//! Static description of one output column: the display name written in the
//! header, the access path used to fetch its value from each row instance,
//! and an optional formatter.

use std::fmt;
use std::sync::Arc;

use crate::traits::value_formatter::ValueFormatter;

/// One step of an access path.
///
/// `index` is set when the step lands on a child collection that was expanded
/// into indexed column groups; it selects the 1-based element to continue from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathSegment {
    pub key: String,
    pub index: Option<usize>,
}

impl PathSegment {
    /// A step into the property `key`.
    pub fn new(key: impl Into<String>) -> Self {
        PathSegment { key: key.into(), index: None }
    }

    /// A step into the `index`-th (1-based) element of the collection at `key`.
    pub fn indexed(key: impl Into<String>, index: usize) -> Self {
        PathSegment { key: key.into(), index: Some(index) }
    }
}

/// A named, path-addressed slot present in every row of a run.
///
/// Columns are immutable once created; builders and rows share them through `Arc`.
#[derive(Clone)]
pub struct Column {
    name: String,
    path: Vec<PathSegment>,
    formatter: Option<Arc<dyn ValueFormatter>>,
}

impl Column {
    /// A column displayed as `name` whose value is found by following `path`.
    pub fn new(name: impl Into<String>, path: Vec<PathSegment>) -> Self {
        Column { name: name.into(), path, formatter: None }
    }

    /// A column with no access path, filled in by hand or by a custom serializer.
    pub fn named(name: impl Into<String>) -> Self {
        Column::new(name, Vec::new())
    }

    /// Render this column's values with `formatter` instead of canonical text.
    pub fn with_formatter(mut self, formatter: Arc<dyn ValueFormatter>) -> Self {
        self.formatter = Some(formatter);
        self
    }

    /// Display name written to the header.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Steps from a row instance to this column's value.
    #[inline]
    pub fn path(&self) -> &[PathSegment] {
        &self.path
    }

    /// 1-based position of the innermost expanded collection on the path.
    pub fn collection_index(&self) -> Option<usize> {
        self.path.iter().rev().find_map(|seg| seg.index)
    }

    /// Property keys of the path joined with `.`, independent of display naming.
    pub fn access_path(&self) -> String {
        let keys: Vec<&str> = self.path.iter().map(|seg| seg.key.as_str()).collect();
        keys.join(".")
    }

    /// Formatter attached by a property marker, if any.
    pub fn formatter(&self) -> Option<&Arc<dyn ValueFormatter>> {
        self.formatter.as_ref()
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("formatter", &self.formatter.is_some())
            .finish()
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_index_is_innermost() {
        let col = Column::new(
            "Items1.Parts2.Name",
            vec![PathSegment::indexed("Items", 1), PathSegment::indexed("Parts", 2), PathSegment::new("Name")],
        );
        assert_eq!(col.collection_index(), Some(2));
        assert_eq!(col.access_path(), "Items.Parts.Name");
        assert_eq!(col.to_string(), "Items1.Parts2.Name");
    }

    #[test]
    fn plain_column_has_no_index() {
        let col = Column::new("FirstName", vec![PathSegment::new("FirstName")]);
        assert_eq!(col.collection_index(), None);
        assert!(col.formatter().is_none());
    }
}
