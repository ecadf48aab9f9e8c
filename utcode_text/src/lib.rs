//! utcode_text renders utcode documents as human-readable text.
//!
//! This crate is primarily used as a binary (`utcode2text`) for pretty-printing
//! arbitrary utcode documents without knowing their record types. Documents
//! are decoded into a dynamic [`utcode::Value`] tree, so base64 text payloads
//! appear decoded.

mod format;

pub use crate::format::Style;

/// Decodes a utcode document and formats it as indented text.
pub fn utcode2text(data: &[u8]) -> Result<String, utcode::DecodeError> {
    render(data, Style::Pretty)
}

/// Decodes a utcode document and formats it on a single line.
pub fn utcode2text_compact(data: &[u8]) -> Result<String, utcode::DecodeError> {
    render(data, Style::Compact)
}

fn render(data: &[u8], style: Style) -> Result<String, utcode::DecodeError> {
    let value: utcode::Value = utcode::from_slice(data)?;
    Ok(format::to_text(&value, style))
}
