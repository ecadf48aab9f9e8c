//! Field schema for record types.
//!
//! A record is encoded as a dictionary keyed by the wire keys of its
//! participating fields, in declaration order. `#[derive(Record)]` builds the
//! [`FieldDescriptor`] table once per type at compile time; the functions here
//! resolve wire keys from it and drive the dictionary traversal.

use std::borrow::Cow;

use log::trace;

use crate::decode::Reader;
use crate::encode::Writer;
use crate::{Decode, DecodeResult, EncodeResult, Tag};

/// Declared name of a record field and its optional wire key override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub rename: Option<&'static str>,
}

impl FieldDescriptor {
    pub const fn new(name: &'static str, rename: Option<&'static str>) -> Self {
        Self { name, rename }
    }

    pub fn wire_key(&self) -> Cow<'static, str> {
        wire_key(self.name, self.rename)
    }
}

/// Wire key of a field: the override when given, otherwise the declared
/// name with its first character lower-cased.
pub fn wire_key<'a>(name: &'a str, rename: Option<&'a str>) -> Cow<'a, str> {
    if let Some(rename) = rename {
        return Cow::Borrowed(rename);
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_uppercase() => {
            Cow::Owned(first.to_lowercase().chain(chars).collect())
        }
        _ => Cow::Borrowed(name),
    }
}

/// Record types whose fields map onto dictionary entries.
///
/// Usually implemented with `#[derive(Record)]`, which also provides the
/// [`crate::Encode`] and [`crate::Decode`] impls through [`encode_record`]
/// and [`decode_record_into`].
pub trait Record: Sized {
    /// Participating fields in declaration order.
    const FIELDS: &'static [FieldDescriptor];

    /// A record with every participating field absent and the rest defaulted.
    fn absent() -> Self;

    /// Encodes the field at `index` in [`Record::FIELDS`].
    fn encode_field(&self, index: usize, writer: &mut Writer<'_>) -> EncodeResult<()>;

    /// Decodes the next value into the field at `index` in [`Record::FIELDS`].
    fn decode_field(&mut self, index: usize, reader: &mut Reader<'_>) -> DecodeResult<()>;
}

/// Ordered (wire key, field index) pairs of a record type.
pub fn resolve<R: Record>() -> Vec<(Cow<'static, str>, usize)> {
    R::FIELDS
        .iter()
        .enumerate()
        .map(|(index, field)| (field.wire_key(), index))
        .collect()
}

pub fn encode_record<R: Record>(record: &R, writer: &mut Writer<'_>) -> EncodeResult<()> {
    writer.begin_dict();
    for (key, index) in resolve::<R>() {
        writer.write_key(&key);
        record.encode_field(index, writer)?;
    }
    writer.end();
    Ok(())
}

/// Decodes a dictionary into `record`.
///
/// Keys are matched regardless of order, unknown keys are skipped and fields
/// the document does not mention keep their current value.
pub fn decode_record_into<R: Record + Decode>(
    record: &mut R,
    reader: &mut Reader<'_>,
) -> DecodeResult<()> {
    let Some(token) = reader.read_present(record)? else {
        return Ok(());
    };
    if token.tag() != Tag::Dict {
        return Err(reader.mismatch("record", token));
    }

    let fields = resolve::<R>();
    while let Some(key) = reader.next_key()? {
        match fields.iter().find(|(wire_key, _)| wire_key == key) {
            Some(&(_, index)) => record.decode_field(index, reader)?,
            None => {
                trace!("skipping unknown key {key:?} at offset {}", reader.offset());
                reader.skip_value()?;
            }
        }
    }
    Ok(())
}
