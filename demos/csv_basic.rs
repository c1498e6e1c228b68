//! Basic object graph to CSV example.
//!
//! This example demonstrates how to:
//! - Serialise a sequence of nested orders to a CSV file
//! - Hide and rename properties with markers
//! - Attach a formatter to a numeric property
//!
//! Run with `RUST_LOG=graphcsv=debug` to see run-level events.

use std::fs::File;
use std::io::BufWriter;

use graphcsv::models::formatters::FixedPrecision;
use graphcsv::models::writers::csv_writer::CsvWriter;
use graphcsv::{CsvSettings, PropertyMarkers, Serializer};
use serde::Serialize;
use tempfile::tempdir;
use tracing_subscriber::EnvFilter;

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct Person {
    id: u32,
    first_name: String,
    last_name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct OrderItem {
    name: String,
    qty: u32,
    price_per_qty: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct Order {
    id: String,
    customer: Option<Person>,
    total: f64,
    items: Vec<OrderItem>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let orders = create_sample_orders();
    println!("Created {} orders", orders.len());

    let markers = PropertyMarkers::new()
        .ignore("Person", "Id")
        .rename("Order", "Id", "OrderNumber")
        .format("Order", "Total", FixedPrecision(2));
    let settings = CsvSettings { write_byte_order_mark: false, ..Default::default() };
    let serializer = Serializer::new().with_settings(settings).with_markers(markers);

    // Create a temporary directory for our example
    let temp_dir = tempdir()?;
    let file_path = temp_dir.path().join("orders.csv");

    let file = BufWriter::new(File::create(&file_path)?);
    let mut writer = CsvWriter::with_serializer(file, serializer);
    writer.write_value(&orders)?;
    writer.flush()?;
    drop(writer);
    println!("Wrote orders to CSV file: {}", file_path.display());

    print!("{}", std::fs::read_to_string(&file_path)?);
    Ok(())
}

/// The first order decides the columns, so it carries the most items.
fn create_sample_orders() -> Vec<Order> {
    vec![
        Order {
            id: "Order/12".into(),
            customer: Some(Person { id: 7, first_name: "Nate".into(), last_name: "Zaugg".into() }),
            total: 322.0,
            items: vec![
                OrderItem { name: "Galaxy S5".into(), qty: 1, price_per_qty: 200.0 },
                OrderItem { name: "Xoom Tablet".into(), qty: 1, price_per_qty: 100.0 },
            ],
        },
        Order {
            id: "Order/13".into(),
            customer: None,
            total: 9.5,
            items: vec![OrderItem { name: "Cable, \"USB-C\"".into(), qty: 2, price_per_qty: 4.75 }],
        },
    ]
}
