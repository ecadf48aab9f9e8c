//! utcode is a self-describing text serialization format.
//!
//! Every document starts with `ut:` and is followed by a single tagged value.
//! Scalars are short literals (`i:42e`, `f:2.5z`, `b:1`), text is either raw
//! (`s5:hello`) or base64-encoded (`u8:aGVsbG8=`), and containers nest
//! (`d:k4:nameu4:Zm9ve`, `l:i:1ei:2ee`).
//!
//! # Examples
//!
//! ```
//! use utcode::{Record, from_slice, to_vec};
//!
//! #[allow(non_snake_case)]
//! #[derive(Debug, PartialEq, Record)]
//! struct Shirt {
//!     pub Name: String,
//!     pub Size: Option<u32>,
//! }
//!
//! let shirt = Shirt { Name: "foo".to_string(), Size: Some(3) };
//! let bytes = to_vec(&shirt).unwrap();
//! assert_eq!(bytes, b"ut:d:k4:nameu4:Zm9vk4:sizei:3ee");
//!
//! let parsed: Shirt = from_slice(&bytes).unwrap();
//! assert_eq!(parsed, shirt);
//! ```

mod buf;
mod decode;
mod encode;
mod error;
mod schema;
mod traits;
mod types;
mod value;
mod wire;

pub use crate::decode::{MAX_DEPTH, Reader, decode_into, from_bytes, from_slice};
pub use crate::encode::{
    Custom, CustomCategory, CustomWriter, Encoder, Writer, to_vec, to_writer,
};
pub use crate::error::{
    DecodeError, DecodeErrorKind, DecodeResult, EncodeError, EncodeErrorKind, EncodeResult,
};
pub use crate::schema::{
    FieldDescriptor, Record, decode_record_into, encode_record, resolve, wire_key,
};
pub use crate::traits::{Decode, Encode, MapKey};
pub use crate::value::Value;
pub use crate::wire::{DOCUMENT_PREFIX, Tag, Token};

/// Derives [`Record`], [`Encode`] and [`Decode`] for a struct with named fields.
///
/// Only `pub` fields are written. Other fields, and fields marked
/// `#[utcode(skip)]`, are left at `Default::default()` when a record is
/// created by the decoder. `#[utcode(rename = "...")]` replaces the derived
/// wire key.
///
/// # Example
///
/// ```
/// use utcode::Record;
///
/// #[derive(Record)]
/// struct Image {
///     pub Url: String,
///     #[utcode(rename = "w")]
///     pub Width: u32,
///     cache_hits: u64,
/// }
/// ```
pub use utcode_derive::Record;
