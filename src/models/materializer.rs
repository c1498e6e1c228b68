//! # Row Materialiser
//!
//! Fills rows with cell text by resolving every column's access path on a
//! row instance. Absent values become the empty string; present values go
//! through the column's formatter, or the canonical text otherwise.

use std::sync::Arc;

use crate::error::Result;
use crate::models::graph::node::Node;
use crate::models::resolver::resolve;
use crate::models::schema::column::Column;
use crate::models::schema::row::Row;
use crate::settings::CsvSettings;

/// The instances that become rows: each element of a sequence, or the value itself.
pub fn instances(value: &Node) -> std::slice::Iter<'_, Node> {
    match value {
        Node::Seq(items) => items.iter(),
        other => std::slice::from_ref(other).iter(),
    }
}

/// Canonical text of a resolved value.
///
/// Sequences (left unexpanded) join their scalar items with
/// `collection_item_delimiter`; objects have no text of their own.
pub fn render(value: &Node, settings: &CsvSettings) -> String {
    match value {
        Node::Null | Node::Object(_) => String::new(),
        Node::Scalar(s) => s.to_string(),
        Node::Seq(items) => {
            let parts: Vec<String> =
                items.iter().filter_map(Node::as_scalar).map(|s| s.to_string()).collect();
            parts.join(&settings.collection_item_delimiter)
        }
    }
}

/// Resolve every cell of `row` against `instance`.
///
/// # Errors
/// [`CsvError::UnresolvablePath`](crate::error::CsvError::UnresolvablePath)
/// when a column path does not exist on the instance.
pub fn populate_row(row: &mut Row, instance: &Node, settings: &CsvSettings) -> Result<()> {
    for cell in row.cells_mut() {
        let text = {
            let column = cell.column();
            match resolve(column.path(), instance)? {
                None => String::new(),
                Some(value) => match column.formatter() {
                    Some(formatter) => formatter.format(value),
                    None => render(value, settings),
                },
            }
        };
        cell.set_value(text);
    }
    Ok(())
}

/// Build a detached row for `instance` over `columns`.
pub fn materialize(columns: &[Arc<Column>], instance: &Node, settings: &CsvSettings) -> Result<Row> {
    let mut row = Row::new(columns);
    populate_row(&mut row, instance, settings)?;
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::discovery::SchemaDiscoverer;
    use crate::models::graph::ser::to_node;
    use crate::models::schema::column::PathSegment;
    use crate::models::schema::markers::PropertyMarkers;
    use crate::test_helpers::{fixture_markers, sample_order, OrderItem};

    fn columns_for(node: &Node, settings: &CsvSettings, markers: &PropertyMarkers) -> Vec<Arc<Column>> {
        SchemaDiscoverer::new(settings, markers)
            .discover(node)
            .unwrap()
            .into_iter()
            .map(Arc::new)
            .collect()
    }

    #[test]
    fn order_row_matches_columns() {
        let settings = CsvSettings::default();
        let node = to_node(&sample_order(), 8).unwrap();
        let cols = columns_for(&node, &settings, &fixture_markers());
        let row = materialize(&cols, &node, &settings).unwrap();
        assert_eq!(row.len(), cols.len());
        let values: Vec<&str> = row.cells().iter().map(|c| c.value()).collect();
        assert_eq!(
            values,
            [
                "Order/12", "2015-06-01T00:00:00", "Nate", "Zaugg", "300", "22", "322",
                "Galaxy S5", "My phone is nice!", "200", "1", "200",
                "Xoom Tablet", "I like Xoom tab", "100", "1", "100",
            ]
        );
    }

    #[test]
    fn later_rows_with_fewer_items_render_blank() {
        let settings = CsvSettings::default();
        let proto = to_node(&sample_order(), 8).unwrap();
        let cols = columns_for(&proto, &settings, &fixture_markers());

        let mut short = sample_order();
        short.items.truncate(1);
        let row = materialize(&cols, &to_node(&short, 8).unwrap(), &settings).unwrap();
        assert_eq!(row.get(7), Some("Galaxy S5"));
        assert_eq!(row.get(12), Some(""));
        assert_eq!(row.get(16), Some(""));
    }

    #[test]
    fn formatter_overrides_canonical_text() {
        let settings = CsvSettings::default();
        let markers = fixture_markers().format("Order", "Total", |v: &Node| {
            format!("${:.2}", v.as_scalar().and_then(|s| s.as_f64()).unwrap_or_default())
        });
        let node = to_node(&sample_order(), 8).unwrap();
        let cols = columns_for(&node, &settings, &markers);
        let row = materialize(&cols, &node, &settings).unwrap();
        assert_eq!(row.get(6), Some("$322.00"));
    }

    #[test]
    fn absent_values_skip_the_formatter() {
        let settings = CsvSettings::default();
        let col = Arc::new(
            Column::new("Customer", vec![PathSegment::new("Customer")])
                .with_formatter(Arc::new(|_: &Node| "never".to_string())),
        );
        let mut order = sample_order();
        order.customer = None;
        let row = materialize(&[col], &to_node(&order, 8).unwrap(), &settings).unwrap();
        assert_eq!(row.get(0), Some(""));
    }

    #[test]
    fn unexpanded_collection_joins_scalars() {
        let settings = CsvSettings::default();
        let node = Node::object("Tagged", [("Tags", Node::from(vec!["a", "b", "c"]))]);
        let col = Arc::new(Column::new("Tags", vec![PathSegment::new("Tags")]));
        let row = materialize(&[col], &node, &settings).unwrap();
        assert_eq!(row.get(0), Some("a;b;c"));
    }

    #[test]
    fn null_instance_gives_blank_row() {
        let settings = CsvSettings::default();
        let item = to_node(&OrderItem::new("1", "Galaxy S5", "", 1, 200.0), 8).unwrap();
        let cols = columns_for(&item, &settings, &fixture_markers());
        let row = materialize(&cols, &Node::Null, &settings).unwrap();
        assert!(row.cells().iter().all(|c| c.value().is_empty()));
    }

    #[test]
    fn instances_unwrap_sequences_only() {
        let single = Node::object("A", [("x", Node::from(1i32))]);
        assert_eq!(instances(&single).count(), 1);
        let many = Node::Seq(vec![single.clone(), single]);
        assert_eq!(instances(&many).count(), 2);
    }
}
