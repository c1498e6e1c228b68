//! # CSV Settings
//!
//! Read-only configuration for one serialisation run: delimiters, quoting,
//! header emission, line-break handling, output encoding, column naming,
//! marker conventions and child-collection flattening.
//!
//! Construct with [`Default`] and override fields with struct-update syntax:
//!
//! ```
//! use graphcsv::settings::CsvSettings;
//!
//! let settings = CsvSettings { field_delimiter: ";".into(), write_headers: false, ..Default::default() };
//! assert_eq!(settings.line_delimiter, "\r\n");
//! ```
//!
//! Settings also (de)serialise through serde, so they can be loaded from any
//! configuration format. Missing fields take their defaults and the encoding
//! is stored as its WHATWG label.

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_COLLECTION_ITEM_DELIMITER, DEFAULT_FIELD_DELIMITER, DEFAULT_LINE_DELIMITER,
    DEFAULT_MAX_DEPTH, DEFAULT_NAME_PATH_DELIMITER, DEFAULT_QUOTE_DELIMITER,
};
use crate::error::{CsvError, Result};

/// Options controlling how object graphs are flattened and written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvSettings {
    /// Delimiter between fields in a row. Default: `,`.
    pub field_delimiter: String,
    /// Delimiter used to quote fields. Default: `"`.
    pub quote_delimiter: String,
    /// Terminator written after every line, header included. Default: CR+LF.
    pub line_delimiter: String,
    /// Whether a header line is emitted before the first data row.
    pub write_headers: bool,
    /// Quote every field, whether it needs it or not.
    pub quote_all_values: bool,
    /// Strip CR and replace LF with a space inside field values before quoting.
    pub remove_line_breaks_in_fields: bool,
    /// Output text encoding. Default: UTF-8.
    #[serde(with = "encoding_label")]
    pub text_encoding: &'static Encoding,
    /// Write the byte-order mark when the output encoding is UTF-8.
    pub write_byte_order_mark: bool,
    /// Prefix nested column names with their parents, e.g. `Customer.FirstName`.
    pub show_full_name_path: bool,
    /// Separator between parts of a displayed column name. Default: `.`.
    pub name_path_delimiter: String,
    /// Observe markers declared under [`Convention::Xml`](crate::enums::Convention::Xml).
    pub use_xml_markers: bool,
    /// Observe markers declared under [`Convention::Json`](crate::enums::Convention::Json).
    pub use_json_markers: bool,
    /// Observe markers declared under [`Convention::Serializer`](crate::enums::Convention::Serializer).
    pub use_serializer_markers: bool,
    /// Expand child collections into indexed column groups (`Items1.Name`, `Items2.Name`).
    pub convert_child_collections_to_rows: bool,
    /// Joins item texts when a collection is written as a single column.
    pub collection_item_delimiter: String,
    /// Maximum nesting depth before a graph is treated as cyclic.
    pub max_depth: usize,
}

impl Default for CsvSettings {
    fn default() -> Self {
        CsvSettings {
            field_delimiter: DEFAULT_FIELD_DELIMITER.to_string(),
            quote_delimiter: DEFAULT_QUOTE_DELIMITER.to_string(),
            line_delimiter: DEFAULT_LINE_DELIMITER.to_string(),
            write_headers: true,
            quote_all_values: false,
            remove_line_breaks_in_fields: true,
            text_encoding: UTF_8,
            write_byte_order_mark: true,
            show_full_name_path: true,
            name_path_delimiter: DEFAULT_NAME_PATH_DELIMITER.to_string(),
            use_xml_markers: true,
            use_json_markers: true,
            use_serializer_markers: true,
            convert_child_collections_to_rows: true,
            collection_item_delimiter: DEFAULT_COLLECTION_ITEM_DELIMITER.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl CsvSettings {
    /// Check the settings can drive a run.
    ///
    /// # Errors
    /// [`CsvError::Configuration`] for an empty field, line or name path
    /// delimiter, or a zero depth limit.
    pub fn validate(&self) -> Result<()> {
        if self.field_delimiter.is_empty() {
            return Err(CsvError::Configuration("field delimiter must not be empty".into()));
        }
        if self.line_delimiter.is_empty() {
            return Err(CsvError::Configuration("line delimiter must not be empty".into()));
        }
        if self.name_path_delimiter.is_empty() {
            return Err(CsvError::Configuration("name path delimiter must not be empty".into()));
        }
        if self.max_depth == 0 {
            return Err(CsvError::Configuration("max depth must be at least 1".into()));
        }
        Ok(())
    }

    /// The encoding bytes are actually produced in.
    ///
    /// UTF-16LE and UTF-16BE are kept as given. Other labels follow encoding_rs,
    /// so `replacement` writes UTF-8.
    #[inline]
    pub fn output_encoding(&self) -> &'static Encoding {
        if self.text_encoding == UTF_16LE || self.text_encoding == UTF_16BE {
            return self.text_encoding;
        }
        self.text_encoding.output_encoding()
    }
}

mod encoding_label {
    use encoding_rs::Encoding;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(enc: &&'static Encoding, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(enc.name())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<&'static Encoding, D::Error> {
        let label = String::deserialize(d)?;
        Encoding::for_label(label.as_bytes())
            .ok_or_else(|| de::Error::custom(format!("unknown text encoding '{label}'")))
    }
}

#[cfg(test)]
mod tests {
    use encoding_rs::WINDOWS_1252;

    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let s = CsvSettings::default();
        assert_eq!(s.field_delimiter, ",");
        assert_eq!(s.quote_delimiter, "\"");
        assert_eq!(s.line_delimiter, "\r\n");
        assert!(s.write_headers);
        assert!(!s.quote_all_values);
        assert!(s.remove_line_breaks_in_fields);
        assert_eq!(s.text_encoding, UTF_8);
        assert!(s.show_full_name_path);
        assert!(s.convert_child_collections_to_rows);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn empty_delimiters_are_rejected() {
        let s = CsvSettings { field_delimiter: String::new(), ..Default::default() };
        assert!(matches!(s.validate(), Err(CsvError::Configuration(_))));
        let s = CsvSettings { line_delimiter: String::new(), ..Default::default() };
        assert!(matches!(s.validate(), Err(CsvError::Configuration(_))));
        let s = CsvSettings { max_depth: 0, ..Default::default() };
        assert!(matches!(s.validate(), Err(CsvError::Configuration(_))));
    }

    #[test]
    fn loads_partial_config_with_defaults() {
        let s: CsvSettings = serde_json::from_str(
            r#"{ "field_delimiter": "\t", "write_headers": false, "text_encoding": "windows-1252" }"#,
        )
        .unwrap();
        assert_eq!(s.field_delimiter, "\t");
        assert!(!s.write_headers);
        assert_eq!(s.text_encoding, WINDOWS_1252);
        assert_eq!(s.line_delimiter, "\r\n");
    }

    #[test]
    fn unknown_encoding_label_fails() {
        let res: std::result::Result<CsvSettings, _> =
            serde_json::from_str(r#"{ "text_encoding": "klingon" }"#);
        assert!(res.is_err());
    }

    #[test]
    fn encoding_roundtrips_as_label() {
        let s = CsvSettings { text_encoding: WINDOWS_1252, ..Default::default() };
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains("\"windows-1252\""));
        let back: CsvSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn utf16_output_keeps_byte_order() {
        let le = CsvSettings { text_encoding: UTF_16LE, ..Default::default() };
        assert_eq!(le.output_encoding(), UTF_16LE);
        let be = CsvSettings { text_encoding: UTF_16BE, ..Default::default() };
        assert_eq!(be.output_encoding(), UTF_16BE);
        let legacy = CsvSettings { text_encoding: WINDOWS_1252, ..Default::default() };
        assert_eq!(legacy.output_encoding(), WINDOWS_1252);
    }
}
