use std::collections::BTreeMap;

use bytes::Bytes;

use crate::decode::Reader;
use crate::encode::Writer;
use crate::{Decode, DecodeResult, Encode, EncodeResult, Tag};

/// A dynamically typed utcode value.
///
/// This is what the decoder creates when no destination type is known, the
/// counterpart of decoding into a concrete type.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// `n:e`, a nil or missing value.
    #[default]
    Absent,

    Bool(bool),

    /// Any integer that fits `i128`, which covers every `u64`.
    Integer(i128),

    Float(f64),

    /// Text from an `s` or `u` token whose payload is valid UTF-8.
    Text(String),

    /// Payload of an `s` or `u` token that is not valid UTF-8.
    Bytes(Bytes),

    /// Dictionary entries. Key order on the wire is not preserved.
    Dict(BTreeMap<String, Value>),

    List(Vec<Value>),
}

impl Value {
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i128(&self) -> Option<i128> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Integers that fit `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        self.as_i128().and_then(|n| i64::try_from(n).ok())
    }

    /// Non-negative integers that fit `u64`.
    pub fn as_u64(&self) -> Option<u64> {
        self.as_i128().and_then(|n| u64::try_from(n).ok())
    }

    /// Floats, and integers widened to floats.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Raw bytes of text or byte payloads.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Text(s) => Some(s.as_bytes()),
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Dict(entries) => Some(entries),
            _ => None,
        }
    }

    /// Looks up `key` when this value is a dictionary.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_dict().and_then(|entries| entries.get(key))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(i128::from(n))
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Integer(i128::from(n))
    }
}

impl From<i128> for Value {
    fn from(n: i128) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Bytes> for Value {
    fn from(b: Bytes) -> Self {
        Value::Bytes(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(entries: BTreeMap<String, Value>) -> Self {
        Value::Dict(entries)
    }
}

impl Encode for Value {
    fn encode(&self, writer: &mut Writer<'_>) -> EncodeResult<()> {
        match self {
            Value::Absent => writer.write_absent(),
            Value::Bool(b) => writer.write_bool(*b),
            Value::Integer(n) => writer.write_signed(*n),
            Value::Float(f) => writer.write_f64(*f),
            Value::Text(s) => writer.write_text(s),
            Value::Bytes(b) => writer.write_bytes(b),
            Value::Dict(entries) => return entries.encode(writer),
            Value::List(items) => return writer.write_seq(items),
        }
        Ok(())
    }
}

impl Decode for Value {
    fn absent() -> Self {
        Value::Absent
    }

    /// Lists and dictionaries already held by `self` are grown in place when
    /// the document carries the same container; anything else is replaced by
    /// a freshly created value.
    fn decode_into(&mut self, reader: &mut Reader<'_>) -> DecodeResult<()> {
        let Some(token) = reader.read_present(self)? else {
            return Ok(());
        };

        match token.tag() {
            Tag::List => {
                let mut items = match std::mem::take(self) {
                    Value::List(items) => items,
                    _ => Vec::new(),
                };
                let result = decode_items(&mut items, reader);
                *self = Value::List(items);
                result
            }
            Tag::Dict => {
                let mut entries = match std::mem::take(self) {
                    Value::Dict(entries) => entries,
                    _ => BTreeMap::new(),
                };
                let result = decode_entries(&mut entries, reader);
                *self = Value::Dict(entries);
                result
            }
            Tag::Bool => {
                *self = Value::Bool(reader.read_bool()?);
                Ok(())
            }
            Tag::Integer => {
                *self = Value::Integer(reader.read_integer()?);
                Ok(())
            }
            Tag::Float => {
                *self = Value::Float(reader.read_float(token)?);
                Ok(())
            }
            Tag::RawText | Tag::EncodedText => {
                let payload = reader.read_payload(token)?.into_owned();
                *self = match String::from_utf8(payload) {
                    Ok(text) => Value::Text(text),
                    Err(err) => Value::Bytes(Bytes::from(err.into_bytes())),
                };
                Ok(())
            }
            Tag::Absent | Tag::Custom => Err(reader.mismatch("value", token)),
        }
    }
}

fn decode_items(items: &mut Vec<Value>, reader: &mut Reader<'_>) -> DecodeResult<()> {
    let mut count = 0;
    while reader.next_element()? {
        match items.get_mut(count) {
            Some(item) => item.decode_into(reader)?,
            None => items.push(Value::decode(reader)?),
        }
        count += 1;
    }
    Ok(())
}

fn decode_entries(
    entries: &mut BTreeMap<String, Value>,
    reader: &mut Reader<'_>,
) -> DecodeResult<()> {
    while let Some(key) = reader.next_key()? {
        match entries.get_mut(key) {
            Some(entry) => entry.decode_into(reader)?,
            None => {
                let value = Value::decode(reader)?;
                entries.insert(key.to_string(), value);
            }
        }
    }
    Ok(())
}
