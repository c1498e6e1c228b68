//! # Value Formatter
//!
//! Override how a resolved value is turned into cell text for one column.
//!
//! Formatters are attached per property through
//! [`PropertyMarkers::format`](crate::models::schema::markers::PropertyMarkers::format)
//! and are only called for values that resolved. Absent values stay empty.
//!
//! Any `Fn(&Node) -> String + Send + Sync` closure is a formatter.

use crate::models::graph::node::Node;

/// Turns a resolved value into its display string.
///
/// Implementations must not retain references to the value.
pub trait ValueFormatter: Send + Sync {
    /// Render `value` for output. Quoting is applied afterwards by the writer.
    fn format(&self, value: &Node) -> String;
}

impl<F> ValueFormatter for F
where
    F: Fn(&Node) -> String + Send + Sync,
{
    fn format(&self, value: &Node) -> String {
        self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_formatters() {
        let f = |v: &Node| format!("<{}>", v.as_scalar().map(|s| s.to_string()).unwrap_or_default());
        assert_eq!(f.format(&Node::from(7i32)), "<7>");
    }
}
