//! # Path Resolver
//!
//! Walks a column's access path on one row instance.
//!
//! - a null anywhere along the path resolves the whole path to absent
//! - a step carrying a collection index selects that 1-based element when the
//!   value is a sequence; an index past the end is absent
//! - a missing map key is absent (maps are dynamic)
//! - a missing struct property, or a scalar where an object was expected, is
//!   a structural defect and fails with [`CsvError::UnresolvablePath`]

use crate::error::{CsvError, Result};
use crate::models::graph::node::{Node, ObjectKind};
use crate::models::schema::column::PathSegment;

/// Resolve `path` against `instance`. `Ok(None)` means absent.
pub fn resolve<'n>(path: &[PathSegment], instance: &'n Node) -> Result<Option<&'n Node>> {
    let mut current = instance;
    for seg in path {
        let obj = match current {
            Node::Null => return Ok(None),
            Node::Object(obj) => obj,
            other => {
                return Err(CsvError::unresolvable(
                    describe(path),
                    format!("expected an object before '{}', found {}", seg.key, other.kind_name()),
                ))
            }
        };

        let next = match obj.field(&seg.key) {
            Some(next) => next,
            None if obj.kind == ObjectKind::Map => return Ok(None),
            None => {
                return Err(CsvError::unresolvable(
                    describe(path),
                    format!("'{}' has no property '{}'", obj.type_name, seg.key),
                ))
            }
        };

        current = match (seg.index, next) {
            (Some(index), Node::Seq(items)) => {
                match index.checked_sub(1).and_then(|i| items.get(i)) {
                    Some(item) => item,
                    None => return Ok(None),
                }
            }
            _ => next,
        };
    }

    Ok(if current.is_null() { None } else { Some(current) })
}

fn describe(path: &[PathSegment]) -> String {
    let parts: Vec<String> = path
        .iter()
        .map(|seg| match seg.index {
            Some(i) => format!("{}[{}]", seg.key, i),
            None => seg.key.clone(),
        })
        .collect();
    parts.join(".")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::graph::ser::to_node;
    use crate::test_helpers::sample_order;

    fn order() -> Node {
        to_node(&sample_order(), 8).unwrap()
    }

    #[test]
    fn resolves_nested_property() {
        let node = order();
        let path = [PathSegment::new("Customer"), PathSegment::new("LastName")];
        assert_eq!(resolve(&path, &node).unwrap(), Some(&Node::from("Zaugg")));
    }

    #[test]
    fn resolves_indexed_collection_element() {
        let node = order();
        let path = [PathSegment::indexed("Items", 2), PathSegment::new("Name")];
        assert_eq!(resolve(&path, &node).unwrap(), Some(&Node::from("Xoom Tablet")));
    }

    #[test]
    fn index_out_of_range_is_absent() {
        let node = order();
        let path = [PathSegment::indexed("Items", 3), PathSegment::new("Name")];
        assert_eq!(resolve(&path, &node).unwrap(), None);
    }

    #[test]
    fn null_intermediate_short_circuits() {
        let mut o = sample_order();
        o.customer = None;
        let node = to_node(&o, 8).unwrap();
        let path = [PathSegment::new("Customer"), PathSegment::new("FirstName")];
        assert_eq!(resolve(&path, &node).unwrap(), None);
    }

    #[test]
    fn missing_struct_property_fails_loudly() {
        let node = order();
        let path = [PathSegment::new("Customer"), PathSegment::new("MiddleName")];
        let err = resolve(&path, &node).unwrap_err();
        assert!(matches!(err, CsvError::UnresolvablePath { ref path, .. } if path == "Customer.MiddleName"));
    }

    #[test]
    fn scalar_in_the_middle_fails_loudly() {
        let node = order();
        let path = [PathSegment::new("Id"), PathSegment::new("Length")];
        assert!(matches!(resolve(&path, &node), Err(CsvError::UnresolvablePath { .. })));
    }

    #[test]
    fn missing_map_key_is_absent() {
        let node = Node::map([("a", Node::from(1i32))]);
        assert_eq!(resolve(&[PathSegment::new("b")], &node).unwrap(), None);
        assert_eq!(resolve(&[PathSegment::new("a")], &node).unwrap(), Some(&Node::from(1i32)));
    }
}
