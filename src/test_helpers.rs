//! # Test Helpers - *Object Graph Fixtures*
//!
//! Deterministic serde fixtures shared by the unit tests: a flat `Person`
//! and an `Order` with a nested customer and a child collection of items.
//! Field names serialise in PascalCase so column names read like
//! `Customer.FirstName` and `Items1.Name`.

use serde::Serialize;

use crate::error::Result;
use crate::models::schema::markers::PropertyMarkers;
use crate::serializer::Serializer;

// -------------------- Fixtures -------------------- //

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct Person {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
}

impl Person {
    pub(crate) fn new(first_name: &str, last_name: &str) -> Self {
        Person { id: "1".into(), first_name: first_name.into(), last_name: last_name.into() }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct OrderItem {
    pub id: String,
    pub name: String,
    pub short_description: String,
    pub price_per_qty: f64,
    pub qty: u32,
    pub line_total: f64,
}

impl OrderItem {
    pub(crate) fn new(id: &str, name: &str, short_description: &str, qty: u32, price_per_qty: f64) -> Self {
        OrderItem {
            id: id.into(),
            name: name.into(),
            short_description: short_description.into(),
            price_per_qty,
            qty,
            line_total: price_per_qty * f64::from(qty),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct Order {
    pub id: String,
    pub order_date: String,
    pub customer: Option<Person>,
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
    pub items: Vec<OrderItem>,
}

/// `Order/12` for Nate Zaugg with two items.
pub(crate) fn sample_order() -> Order {
    Order {
        id: "Order/12".into(),
        order_date: "2015-06-01T00:00:00".into(),
        customer: Some(Person::new("Nate", "Zaugg")),
        subtotal: 300.0,
        tax: 22.0,
        total: 322.0,
        items: vec![
            OrderItem::new("1", "Galaxy S5", "My phone is nice!", 1, 200.0),
            OrderItem::new("2", "Xoom Tablet", "I like Xoom tab", 1, 100.0),
        ],
    }
}

/// Hide the identifier properties of people and items.
pub(crate) fn fixture_markers() -> PropertyMarkers {
    PropertyMarkers::new().ignore("Person", "Id").ignore("OrderItem", "Id")
}

/// Serialise with `serializer` and decode the output as UTF-8.
pub(crate) fn serialize_to_string<T: ?Sized + Serialize>(serializer: &Serializer, value: &T) -> Result<String> {
    let bytes = serializer.to_vec(value)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
