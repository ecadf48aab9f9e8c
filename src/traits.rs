use std::borrow::Cow;
use std::sync::Arc;

use crate::decode::Reader;
use crate::encode::Writer;
use crate::{DecodeResult, EncodeResult};

/// Types that can be written as a utcode value.
pub trait Encode {
    /// Writes exactly one wire value for `self`.
    fn encode(&self, writer: &mut Writer<'_>) -> EncodeResult<()>;
}

/// Types that can be reconstructed from a utcode value.
///
/// `decode_into` is bind mode: it decodes into an existing destination, which
/// lets containers reuse storage and records keep fields the document does not
/// mention. `decode` is create mode and starts from [`Decode::absent`].
pub trait Decode: Sized {
    /// The value a destination holds after decoding `n:e`.
    fn absent() -> Self;

    /// Decodes the next wire value into `self`.
    fn decode_into(&mut self, reader: &mut Reader<'_>) -> DecodeResult<()>;

    /// Decodes the next wire value into a freshly created `Self`.
    fn decode(reader: &mut Reader<'_>) -> DecodeResult<Self> {
        let mut value = Self::absent();
        value.decode_into(reader)?;
        Ok(value)
    }
}

/// Text-shaped types usable as dictionary keys.
pub trait MapKey: Sized {
    fn as_key(&self) -> &str;

    fn from_key(key: &str) -> Self;
}

impl MapKey for String {
    fn as_key(&self) -> &str {
        self
    }

    fn from_key(key: &str) -> Self {
        key.to_string()
    }
}

impl MapKey for Arc<str> {
    fn as_key(&self) -> &str {
        self
    }

    fn from_key(key: &str) -> Self {
        Arc::from(key)
    }
}

impl MapKey for Box<str> {
    fn as_key(&self) -> &str {
        self
    }

    fn from_key(key: &str) -> Self {
        Box::from(key)
    }
}

impl MapKey for Cow<'static, str> {
    fn as_key(&self) -> &str {
        self
    }

    fn from_key(key: &str) -> Self {
        Cow::Owned(key.to_string())
    }
}
