//! # Property Markers
//!
//! Per-property ignore, rename and formatter markers, keyed by the owning
//! type name and the property key as captured from serde.
//!
//! Each ignore/rename marker is declared under a [`Convention`]. Schema
//! discovery only asks capability questions ("is this property ignored?",
//! "what is it called?") and the answer honours the convention toggles in
//! [`CsvSettings`].
//!
//! Serde attributes (`#[serde(skip)]`, `#[serde(rename = "..")]`) already
//! shape the captured graph and need no marker.
//!
//! ```
//! use graphcsv::enums::Convention;
//! use graphcsv::models::schema::markers::PropertyMarkers;
//! use graphcsv::settings::CsvSettings;
//!
//! let markers = PropertyMarkers::new()
//!     .ignore("Person", "Id")
//!     .ignore_for(Convention::Json, "Person", "Secret")
//!     .rename("Person", "FirstName", "Given Name");
//!
//! let settings = CsvSettings::default();
//! assert!(markers.is_ignored("Person", "Id", &settings));
//! assert_eq!(markers.display_name("Person", "FirstName", &settings), Some("Given Name"));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::enums::Convention;
use crate::settings::CsvSettings;
use crate::traits::value_formatter::ValueFormatter;

#[derive(Clone)]
enum Marker {
    Ignore(Convention),
    Rename(Convention, String),
    Format(Arc<dyn ValueFormatter>),
}

/// Registry of property markers.
#[derive(Clone, Default)]
pub struct PropertyMarkers {
    entries: HashMap<String, HashMap<String, Vec<Marker>>>,
}

impl PropertyMarkers {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(mut self, owner: &str, property: &str, marker: Marker) -> Self {
        self.entries
            .entry(owner.to_string())
            .or_default()
            .entry(property.to_string())
            .or_default()
            .push(marker);
        self
    }

    /// Ignore `owner.property` under the native convention.
    pub fn ignore(self, owner: &str, property: &str) -> Self {
        self.ignore_for(Convention::Native, owner, property)
    }

    /// Ignore `owner.property` when `convention` is enabled.
    pub fn ignore_for(self, convention: Convention, owner: &str, property: &str) -> Self {
        self.push(owner, property, Marker::Ignore(convention))
    }

    /// Display `owner.property` as `name` under the native convention.
    pub fn rename(self, owner: &str, property: &str, name: impl Into<String>) -> Self {
        self.rename_for(Convention::Native, owner, property, name)
    }

    /// Display `owner.property` as `name` when `convention` is enabled.
    pub fn rename_for(
        self,
        convention: Convention,
        owner: &str,
        property: &str,
        name: impl Into<String>,
    ) -> Self {
        self.push(owner, property, Marker::Rename(convention, name.into()))
    }

    /// Render values of `owner.property` through `formatter`.
    pub fn format(self, owner: &str, property: &str, formatter: impl ValueFormatter + 'static) -> Self {
        self.push(owner, property, Marker::Format(Arc::new(formatter)))
    }

    fn markers(&self, owner: &str, property: &str) -> &[Marker] {
        self.entries
            .get(owner)
            .and_then(|props| props.get(property))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether any enabled convention marks the property as ignored.
    pub fn is_ignored(&self, owner: &str, property: &str, settings: &CsvSettings) -> bool {
        self.markers(owner, property)
            .iter()
            .any(|m| matches!(m, Marker::Ignore(c) if c.is_enabled(settings)))
    }

    /// Display name from the highest-precedence enabled rename, if any.
    pub fn display_name(&self, owner: &str, property: &str, settings: &CsvSettings) -> Option<&str> {
        let markers = self.markers(owner, property);
        Convention::ALL.iter().filter(|c| c.is_enabled(settings)).find_map(|conv| {
            markers.iter().find_map(|m| match m {
                Marker::Rename(c, name) if c == conv => Some(name.as_str()),
                _ => None,
            })
        })
    }

    /// Formatter attached to the property, most recently registered wins.
    pub fn formatter(&self, owner: &str, property: &str) -> Option<Arc<dyn ValueFormatter>> {
        self.markers(owner, property).iter().rev().find_map(|m| match m {
            Marker::Format(f) => Some(f.clone()),
            _ => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for PropertyMarkers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<String> = self
            .entries
            .iter()
            .flat_map(|(o, props)| props.keys().map(move |p| format!("{o}.{p}")))
            .collect();
        keys.sort();
        f.debug_struct("PropertyMarkers").field("properties", &keys).finish()
    }
}
