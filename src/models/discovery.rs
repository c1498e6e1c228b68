//! # Schema Discovery
//!
//! Derives the ordered column list for a run from one representative
//! instance (the prototype).
//!
//! The walk is depth-first and pre-order over the prototype's properties in
//! declaration order:
//! - properties marked ignored by an enabled convention are skipped
//! - child collections are expanded per element into indexed groups
//!   (`Items1.Name`, `Items2.Name`) when `convert_child_collections_to_rows` is on;
//!   groups for different indices are never merged
//! - nested objects are recursed into, prefixing names with the parent path
//! - scalars, nulls and unexpanded collections become exactly one column
//!
//! Struct fields keep declaration order. Map keys are sorted, so a `HashMap`
//! property gives the same columns on every run. Once discovered, column
//! order is fixed and never re-sorted.

use tracing::{debug, trace};

use crate::error::{CsvError, Result};
use crate::models::graph::node::{Node, Object, ObjectKind};
use crate::models::schema::column::{Column, PathSegment};
use crate::models::schema::markers::PropertyMarkers;
use crate::settings::CsvSettings;
use crate::utils::join_name;

/// The instance whose shape defines the schema.
///
/// Sequences are unwrapped to their first non-null element; an empty (or
/// all-null) sequence has no prototype and yields zero columns.
///
/// # Errors
/// [`CsvError::InvalidArgument`] when `value` itself is null.
pub fn prototype(value: &Node) -> Result<Option<&Node>> {
    match value {
        Node::Null => Err(CsvError::InvalidArgument("value must not be null".into())),
        Node::Seq(items) => Ok(items.iter().find(|n| !n.is_null())),
        other => Ok(Some(other)),
    }
}

/// Walks a prototype to produce columns.
pub struct SchemaDiscoverer<'a> {
    settings: &'a CsvSettings,
    markers: &'a PropertyMarkers,
}

impl<'a> SchemaDiscoverer<'a> {
    pub fn new(settings: &'a CsvSettings, markers: &'a PropertyMarkers) -> Self {
        SchemaDiscoverer { settings, markers }
    }

    /// Discover the columns for `value` (a single object or a sequence of them).
    ///
    /// # Errors
    /// - [`CsvError::InvalidArgument`] if `value` is null
    /// - [`CsvError::UnsupportedValue`] if the prototype is not an object
    /// - [`CsvError::CyclicStructure`] if nesting exceeds `max_depth`
    pub fn discover(&self, value: &Node) -> Result<Vec<Column>> {
        let Some(proto) = prototype(value)? else {
            debug!("empty sequence, no columns discovered");
            return Ok(Vec::new());
        };
        let obj = proto.as_object().ok_or_else(|| {
            CsvError::UnsupportedValue(format!(
                "rows must be objects, found {}",
                proto.kind_name()
            ))
        })?;

        let mut columns = Vec::new();
        self.walk(obj, &[], None, 1, &mut columns)?;
        debug!(type_name = %obj.type_name, columns = columns.len(), "discovered schema");
        Ok(columns)
    }

    fn walk(
        &self,
        obj: &Object,
        access: &[PathSegment],
        display: Option<&str>,
        depth: usize,
        out: &mut Vec<Column>,
    ) -> Result<()> {
        if depth > self.settings.max_depth {
            return Err(CsvError::CyclicStructure { max_depth: self.settings.max_depth });
        }

        let owner = obj.type_name.as_str();
        let mut fields: Vec<&(String, Node)> = obj.fields.iter().collect();
        if obj.kind == ObjectKind::Map {
            fields.sort_by(|a, b| a.0.cmp(&b.0));
        }
        for (key, value) in fields {
            if self.markers.is_ignored(owner, key, self.settings) {
                trace!(owner, property = %key, "ignored by marker");
                continue;
            }

            let label = self.markers.display_name(owner, key, self.settings).unwrap_or(key.as_str());
            let name = self.child_name(display, label);
            let mut path = access.to_vec();
            path.push(PathSegment::new(key.as_str()));

            match value {
                Node::Seq(items) if self.settings.convert_child_collections_to_rows => {
                    for (i, item) in items.iter().enumerate() {
                        let position = i + 1;
                        let item_name = format!("{name}{position}");
                        let mut item_path = path.clone();
                        if let Some(last) = item_path.last_mut() {
                            last.index = Some(position);
                        }
                        match item {
                            Node::Object(child) => {
                                self.walk(child, &item_path, Some(&item_name), depth + 1, out)?
                            }
                            _ => out.push(self.leaf(item_name, item_path, owner, key)),
                        }
                    }
                }
                Node::Object(child) => self.walk(child, &path, Some(&name), depth + 1, out)?,
                _ => out.push(self.leaf(name, path, owner, key)),
            }
        }
        Ok(())
    }

    fn child_name(&self, parent: Option<&str>, label: &str) -> String {
        if self.settings.show_full_name_path {
            join_name(parent, label, &self.settings.name_path_delimiter)
        } else {
            label.to_string()
        }
    }

    fn leaf(&self, name: String, path: Vec<PathSegment>, owner: &str, key: &str) -> Column {
        trace!(column = %name, "column");
        let column = Column::new(name, path);
        match self.markers.formatter(owner, key) {
            Some(f) => column.with_formatter(f),
            None => column,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::graph::ser::to_node;
    use crate::test_helpers::{fixture_markers, sample_order, Person};

    fn names(columns: &[Column]) -> Vec<&str> {
        columns.iter().map(Column::name).collect()
    }

    fn discover(value: &Node, settings: &CsvSettings) -> Result<Vec<Column>> {
        let markers = fixture_markers();
        SchemaDiscoverer::new(settings, &markers).discover(value)
    }

    #[test]
    fn flat_object_yields_one_column_per_scalar() {
        let node = to_node(&Person::new("Nate", "Zaugg"), 8).unwrap();
        let cols = discover(&node, &CsvSettings::default()).unwrap();
        assert_eq!(names(&cols), ["FirstName", "LastName"]);
        assert_eq!(cols[0].path(), &[PathSegment::new("FirstName")]);
    }

    #[test]
    fn nested_objects_and_collections_flatten_in_order() {
        let node = to_node(&sample_order(), 8).unwrap();
        let cols = discover(&node, &CsvSettings::default()).unwrap();
        assert_eq!(
            names(&cols),
            [
                "Id", "OrderDate", "Customer.FirstName", "Customer.LastName", "Subtotal", "Tax", "Total",
                "Items1.Name", "Items1.ShortDescription", "Items1.PricePerQty", "Items1.Qty", "Items1.LineTotal",
                "Items2.Name", "Items2.ShortDescription", "Items2.PricePerQty", "Items2.Qty", "Items2.LineTotal",
            ]
        );
        let item2_name = &cols[12];
        assert_eq!(item2_name.path(), &[PathSegment::indexed("Items", 2), PathSegment::new("Name")]);
        assert_eq!(item2_name.collection_index(), Some(2));
    }

    #[test]
    fn short_names_keep_full_access_path() {
        let node = to_node(&sample_order(), 8).unwrap();
        let settings = CsvSettings { show_full_name_path: false, ..Default::default() };
        let cols = discover(&node, &settings).unwrap();
        let customer_first = cols.iter().find(|c| c.access_path() == "Customer.FirstName").unwrap();
        assert_eq!(customer_first.name(), "FirstName");
    }

    #[test]
    fn custom_name_path_delimiter() {
        let node = to_node(&sample_order(), 8).unwrap();
        let settings = CsvSettings { name_path_delimiter: "_".into(), ..Default::default() };
        let cols = discover(&node, &settings).unwrap();
        assert!(names(&cols).contains(&"Customer_FirstName"));
        assert!(names(&cols).contains(&"Items2_LineTotal"));
    }

    #[test]
    fn collections_stay_single_column_when_not_expanded() {
        let node = to_node(&sample_order(), 8).unwrap();
        let settings = CsvSettings { convert_child_collections_to_rows: false, ..Default::default() };
        let cols = discover(&node, &settings).unwrap();
        assert_eq!(names(&cols).last(), Some(&"Items"));
    }

    #[test]
    fn null_nested_object_yields_single_column() {
        let mut order = sample_order();
        order.customer = None;
        let node = to_node(&order, 8).unwrap();
        let cols = discover(&node, &CsvSettings::default()).unwrap();
        assert_eq!(&names(&cols)[..4], ["Id", "OrderDate", "Customer", "Subtotal"]);
    }

    #[test]
    fn scalar_collection_items_become_indexed_columns() {
        let node = Node::object("Tagged", [("Tags", Node::from(vec!["a", "b"]))]);
        let cols = discover(&node, &CsvSettings::default()).unwrap();
        assert_eq!(names(&cols), ["Tags1", "Tags2"]);
        assert_eq!(cols[1].path(), &[PathSegment::indexed("Tags", 2)]);
    }

    #[test]
    fn sequence_uses_first_non_null_element() {
        let people = Node::Seq(vec![
            Node::Null,
            to_node(&Person::new("Nate", "Zaugg"), 8).unwrap(),
        ]);
        let cols = discover(&people, &CsvSettings::default()).unwrap();
        assert_eq!(names(&cols), ["FirstName", "LastName"]);
        assert!(discover(&Node::Seq(Vec::new()), &CsvSettings::default()).unwrap().is_empty());
    }

    #[test]
    fn null_and_scalar_roots_are_rejected() {
        let settings = CsvSettings::default();
        assert!(matches!(discover(&Node::Null, &settings), Err(CsvError::InvalidArgument(_))));
        assert!(matches!(discover(&Node::from(3i32), &settings), Err(CsvError::UnsupportedValue(_))));
    }

    #[test]
    fn depth_limit_stops_runaway_nesting() {
        let mut node = Node::object("Leaf", [("v", Node::from(1i32))]);
        for _ in 0..10 {
            node = Node::object("Wrap", [("inner", node)]);
        }
        let settings = CsvSettings { max_depth: 5, ..Default::default() };
        assert!(matches!(discover(&node, &settings), Err(CsvError::CyclicStructure { max_depth: 5 })));
    }

    #[test]
    fn map_keys_are_sorted() {
        let mut visits = std::collections::HashMap::new();
        for key in ["zeta", "alpha", "mid", "beta"] {
            visits.insert(key, 1u32);
        }
        let node = Node::map([
            ("when", Node::from("today")),
            ("counts", to_node(&visits, 8).unwrap()),
        ]);
        let cols = discover(&node, &CsvSettings::default()).unwrap();
        assert_eq!(
            names(&cols),
            ["counts.alpha", "counts.beta", "counts.mid", "counts.zeta", "when"]
        );
    }

    #[test]
    fn struct_fields_keep_declaration_order() {
        let node = Node::object("T", [("b", Node::from(1i32)), ("a", Node::from(2i32))]);
        let cols = discover(&node, &CsvSettings::default()).unwrap();
        assert_eq!(names(&cols), ["b", "a"]);
    }

    #[test]
    fn renamed_property_changes_display_only() {
        let markers = PropertyMarkers::new().rename("Person", "FirstName", "Given");
        let node = to_node(&Person::new("Nate", "Zaugg"), 8).unwrap();
        let settings = CsvSettings::default();
        let cols = SchemaDiscoverer::new(&settings, &markers).discover(&node).unwrap();
        assert_eq!(names(&cols), ["Id", "Given", "LastName"]);
        assert_eq!(cols[1].access_path(), "FirstName");
    }
}
