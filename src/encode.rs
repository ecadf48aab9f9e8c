use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::io;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use log::trace;

use crate::wire::{DOCUMENT_PREFIX, DELIMITER, END, FLOAT_END, KEY, Tag};
use crate::{Encode, EncodeError, EncodeErrorKind, EncodeResult};

/// Writer function registered for a custom category.
///
/// It receives the value being encoded and appends the payload bytes of the
/// `c` token; the framing is written by the encoder.
pub type CustomWriter = Box<dyn Fn(&dyn Any, &mut Vec<u8>) -> EncodeResult<()> + Send + Sync>;

/// Serialize a value to a utcode document.
pub fn to_vec<T: Encode + ?Sized>(value: &T) -> EncodeResult<Vec<u8>> {
    Encoder::new().encode(value)
}

/// Serialize a value and write the document to `sink`.
pub fn to_writer<T: Encode + ?Sized, W: io::Write>(sink: W, value: &T) -> EncodeResult<()> {
    Encoder::new().encode_to_writer(value, sink)
}

/// Encodes values, optionally with writers for custom categories.
///
/// The registry is only read while encoding; registering a category while
/// another thread encodes with the same instance needs outside locking.
#[derive(Default)]
pub struct Encoder {
    registry: HashMap<String, CustomWriter>,
}

impl Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) the writer used for `category`.
    pub fn register<F>(&mut self, category: impl Into<String>, writer: F)
    where
        F: Fn(&dyn Any, &mut Vec<u8>) -> EncodeResult<()> + Send + Sync + 'static,
    {
        let category = category.into();
        trace!("registering custom encoder for category {category:?}");
        self.registry.insert(category, Box::new(writer));
    }

    /// Encodes `value` into a new document.
    pub fn encode<T: Encode + ?Sized>(&self, value: &T) -> EncodeResult<Vec<u8>> {
        let mut buffer = Vec::new();
        self.encode_into(value, &mut buffer)?;
        Ok(buffer)
    }

    /// Appends a document for `value` to `sink`.
    ///
    /// On error `sink` is restored to its previous length.
    pub fn encode_into<T: Encode + ?Sized>(
        &self,
        value: &T,
        sink: &mut Vec<u8>,
    ) -> EncodeResult<()> {
        let start = sink.len();
        sink.extend_from_slice(DOCUMENT_PREFIX);

        let result = value.encode(&mut Writer {
            buffer: sink,
            registry: &self.registry,
        });
        if result.is_err() {
            sink.truncate(start);
        }
        result
    }
}

impl Encoder {
    /// Encodes `value` and writes the whole document to `sink`.
    ///
    /// The document is built in memory first, so nothing reaches `sink`
    /// when encoding fails.
    pub fn encode_to_writer<T: Encode + ?Sized, W: io::Write>(
        &self,
        value: &T,
        mut sink: W,
    ) -> EncodeResult<()> {
        let document = self.encode(value)?;
        sink.write_all(&document)?;
        trace!("wrote {}-byte document", document.len());
        Ok(())
    }
}

impl fmt::Debug for Encoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut categories: Vec<_> = self.registry.keys().collect();
        categories.sort();
        f.debug_struct("Encoder")
            .field("categories", &categories)
            .finish()
    }
}

/// Output side of an encode call, handed to [`Encode`] implementations.
pub struct Writer<'a> {
    buffer: &'a mut Vec<u8>,
    registry: &'a HashMap<String, CustomWriter>,
}

impl Writer<'_> {
    fn write_tag(&mut self, tag: Tag) {
        self.buffer.push(tag.into());
        self.buffer.push(DELIMITER);
    }

    fn write_length_prefixed(&mut self, lead: u8, payload: &[u8]) {
        self.buffer.push(lead);
        self.buffer
            .extend_from_slice(payload.len().to_string().as_bytes());
        self.buffer.push(DELIMITER);
        self.buffer.extend_from_slice(payload);
    }

    pub fn write_absent(&mut self) {
        self.write_tag(Tag::Absent);
        self.buffer.push(END);
    }

    pub fn write_bool(&mut self, value: bool) {
        self.write_tag(Tag::Bool);
        self.buffer.push(if value { b'1' } else { b'0' });
    }

    pub fn write_signed(&mut self, value: i128) {
        self.write_tag(Tag::Integer);
        self.buffer.extend_from_slice(value.to_string().as_bytes());
        self.buffer.push(END);
    }

    pub fn write_unsigned(&mut self, value: u128) {
        self.write_tag(Tag::Integer);
        self.buffer.extend_from_slice(value.to_string().as_bytes());
        self.buffer.push(END);
    }

    pub fn write_f64(&mut self, value: f64) {
        self.write_float_literal(value.to_string(), value.is_finite());
    }

    pub fn write_f32(&mut self, value: f32) {
        self.write_float_literal(value.to_string(), value.is_finite());
    }

    // Integral values still carry a fractional part so they keep the `f` tag.
    fn write_float_literal(&mut self, mut literal: String, finite: bool) {
        if finite && !literal.contains('.') {
            literal.push_str(".0");
        }
        self.write_tag(Tag::Float);
        self.buffer.extend_from_slice(literal.as_bytes());
        self.buffer.push(FLOAT_END);
    }

    /// Writes text as a base64 `u` token.
    pub fn write_text(&mut self, value: &str) {
        self.write_bytes(value.as_bytes());
    }

    /// Writes a byte buffer as a base64 `u` token, exactly like text.
    pub fn write_bytes(&mut self, value: &[u8]) {
        let encoded = STANDARD.encode(value);
        self.write_length_prefixed(Tag::EncodedText.into(), encoded.as_bytes());
    }

    pub fn begin_dict(&mut self) {
        self.write_tag(Tag::Dict);
    }

    pub fn write_key(&mut self, key: &str) {
        self.write_length_prefixed(KEY, key.as_bytes());
    }

    pub fn begin_list(&mut self) {
        self.write_tag(Tag::List);
    }

    /// Closes the innermost dictionary or list.
    pub fn end(&mut self) {
        self.buffer.push(END);
    }

    /// Writes every item of a sequence as a list.
    pub fn write_seq<'v, T, I>(&mut self, items: I) -> EncodeResult<()>
    where
        T: Encode + 'v,
        I: IntoIterator<Item = &'v T>,
    {
        self.begin_list();
        for item in items {
            item.encode(self)?;
        }
        self.end();
        Ok(())
    }

    /// Delegates to the writer registered for `category`.
    pub fn write_custom(&mut self, category: &str, value: &dyn Any) -> EncodeResult<()> {
        let Some(custom) = self.registry.get(category) else {
            return Err(EncodeError::new(EncodeErrorKind::UnregisteredCategory(
                category.to_string(),
            )));
        };
        trace!("encoding custom category {category:?}");

        let mut payload = Vec::new();
        custom(value, &mut payload)?;
        self.write_length_prefixed(Tag::Custom.into(), &payload);
        Ok(())
    }
}

/// Value types encoded through a writer registered on the [`Encoder`].
pub trait CustomCategory: Any {
    const CATEGORY: &'static str;
}

/// Wraps a value so it is encoded by its category's registered writer.
///
/// There is no decode counterpart: `c` tokens always fail to decode.
#[derive(Debug, Clone, PartialEq)]
pub struct Custom<T>(pub T);

impl<T: CustomCategory> Encode for Custom<T> {
    fn encode(&self, writer: &mut Writer<'_>) -> EncodeResult<()> {
        writer.write_custom(T::CATEGORY, &self.0)
    }
}
