//! # Value Formatters
//!
//! Stock [`ValueFormatter`]s for attaching to properties with
//! [`PropertyMarkers::format`](crate::models::schema::markers::PropertyMarkers::format).
//!
//! - [`FixedPrecision`] - numbers with a fixed count of decimal places
//! - [`UpperCase`] - canonical text upper-cased
//! - [`DateTimeFormat`] - RFC 3339 / ISO-8601 text re-rendered with a strftime
//!   pattern (`datetime` feature)

use crate::models::graph::node::Node;
use crate::traits::value_formatter::ValueFormatter;

/// Fixed decimal places for numeric scalars. Other values render canonically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPrecision(pub usize);

impl ValueFormatter for FixedPrecision {
    fn format(&self, value: &Node) -> String {
        match value.as_scalar() {
            Some(s) => match s.as_f64() {
                Some(v) => format!("{:.*}", self.0, v),
                None => s.to_string(),
            },
            None => String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UpperCase;

impl ValueFormatter for UpperCase {
    fn format(&self, value: &Node) -> String {
        value.as_scalar().map(|s| s.to_string().to_uppercase()).unwrap_or_default()
    }
}

#[cfg(feature = "datetime")]
pub use datetime::DateTimeFormat;

#[cfg(feature = "datetime")]
mod datetime {
    use std::fmt::Write as _;

    use chrono::{DateTime, NaiveDate, NaiveDateTime};

    use crate::models::graph::node::Node;
    use crate::traits::value_formatter::ValueFormatter;

    /// Re-render date/time text with a strftime `pattern`.
    ///
    /// Accepts RFC 3339 (`2015-06-01T00:00:00Z`), naive date-times
    /// (`2015-06-01T00:00:00`, optional fraction) and plain dates
    /// (`2015-06-01`, as midnight). Anything else passes through unchanged.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct DateTimeFormat {
        pattern: String,
    }

    impl DateTimeFormat {
        pub fn new(pattern: impl Into<String>) -> Self {
            DateTimeFormat { pattern: pattern.into() }
        }

        fn parse(text: &str) -> Option<NaiveDateTime> {
            if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
                return Some(dt.naive_local());
            }
            if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
                return Some(dt);
            }
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        }
    }

    impl ValueFormatter for DateTimeFormat {
        fn format(&self, value: &Node) -> String {
            let Some(text) = value.as_scalar().map(|s| s.to_string()) else {
                return String::new();
            };
            let Some(parsed) = Self::parse(&text) else {
                return text;
            };
            // Invalid patterns surface as fmt errors rather than panics.
            let mut out = String::new();
            match write!(out, "{}", parsed.format(&self.pattern)) {
                Ok(()) => out,
                Err(_) => text,
            }
        }
    }

}
