// --- Defaults for CSV output ---

pub const DEFAULT_FIELD_DELIMITER: &str = ",";
pub const DEFAULT_QUOTE_DELIMITER: &str = "\"";
pub const DEFAULT_LINE_DELIMITER: &str = "\r\n";
pub const DEFAULT_NAME_PATH_DELIMITER: &str = ".";
pub const DEFAULT_COLLECTION_ITEM_DELIMITER: &str = ";";

/// Nesting limit used by the capture serializer and schema discovery.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Rows kept in memory behind the newest one so the last row can still be duplicated.
pub const ROW_RETENTION_DEPTH: usize = 2;

pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
pub const UTF16LE_BOM: &[u8] = b"\xFF\xFE";
pub const UTF16BE_BOM: &[u8] = b"\xFE\xFF";
