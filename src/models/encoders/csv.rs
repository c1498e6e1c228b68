//! CSV field and record encoding.
//! - Quotes a field when it contains the field delimiter, the quote delimiter, CR or LF,
//!   or unconditionally when `quote_all_values` is set.
//! - Embedded quote delimiters are doubled inside a quoted field.
//! - With `remove_line_breaks_in_fields`, CR is dropped and LF becomes a space
//!   *before* the quoting decision, so a value needing quotes only for its
//!   line breaks comes out unquoted.
//! - Header names and cell values go through the same rule.

use std::borrow::Cow;

use encoding_rs::{UTF_16BE, UTF_16LE, UTF_8};

use crate::constants::{UTF16BE_BOM, UTF16LE_BOM, UTF8_BOM};
use crate::error::{CsvError, Result};
use crate::settings::CsvSettings;

#[inline]
pub fn needs_quotes(s: &str, settings: &CsvSettings) -> bool {
    s.contains(settings.field_delimiter.as_str())
        || (!settings.quote_delimiter.is_empty() && s.contains(settings.quote_delimiter.as_str()))
        || s.contains('\r')
        || s.contains('\n')
}

/// Drop CR and replace LF with a single space.
#[inline]
pub fn strip_line_breaks(s: &str) -> Cow<'_, str> {
    if !s.contains(['\r', '\n']) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\r' => {}
            '\n' => out.push(' '),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Apply line-break handling and quoting to one field.
pub fn format_field<'a>(s: &'a str, settings: &CsvSettings) -> Cow<'a, str> {
    let value = if settings.remove_line_breaks_in_fields {
        strip_line_breaks(s)
    } else {
        Cow::Borrowed(s)
    };

    if !(settings.quote_all_values || needs_quotes(&value, settings)) {
        return value;
    }

    let quote = settings.quote_delimiter.as_str();
    let mut out = String::with_capacity(value.len() + 2 * quote.len());
    out.push_str(quote);
    if quote.is_empty() {
        out.push_str(&value);
    } else {
        let doubled = quote.repeat(2);
        out.push_str(&value.replace(quote, &doubled));
    }
    out.push_str(quote);
    Cow::Owned(out)
}

/// Format fields into one line, including the line delimiter.
pub fn format_record<'a, I>(fields: I, settings: &CsvSettings) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut line = String::new();
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            line.push_str(&settings.field_delimiter);
        }
        line.push_str(&format_field(field, settings));
    }
    line.push_str(&settings.line_delimiter);
    line
}

/// Encode text into the configured output encoding.
///
/// # Errors
/// [`CsvError::Encoding`] when the text holds characters the target encoding
/// cannot represent.
pub fn encode_text<'a>(text: &'a str, settings: &CsvSettings) -> Result<Cow<'a, [u8]>> {
    let encoding = settings.output_encoding();
    if encoding == UTF_8 {
        return Ok(Cow::Borrowed(text.as_bytes()));
    }
    if encoding == UTF_16LE {
        return Ok(Cow::Owned(text.encode_utf16().flat_map(u16::to_le_bytes).collect()));
    }
    if encoding == UTF_16BE {
        return Ok(Cow::Owned(text.encode_utf16().flat_map(u16::to_be_bytes).collect()));
    }
    let (bytes, _, had_errors) = encoding.encode(text);
    if had_errors {
        return Err(CsvError::Encoding(format!(
            "text is not representable in {}",
            encoding.name()
        )));
    }
    Ok(bytes)
}

/// Byte-order mark to write at the start of the output, if any.
///
/// UTF-8 and both UTF-16 byte orders carry one. Legacy encodings have none.
pub fn byte_order_mark(settings: &CsvSettings) -> Option<&'static [u8]> {
    if !settings.write_byte_order_mark {
        return None;
    }
    let encoding = settings.output_encoding();
    if encoding == UTF_8 {
        Some(UTF8_BOM)
    } else if encoding == UTF_16LE {
        Some(UTF16LE_BOM)
    } else if encoding == UTF_16BE {
        Some(UTF16BE_BOM)
    } else {
        None
    }
}
