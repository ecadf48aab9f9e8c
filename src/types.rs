use std::collections::{BTreeMap, HashMap, VecDeque};
use std::hash::{BuildHasher, Hash};
use std::sync::Arc;

use bytes::Bytes;

use crate::decode::Reader;
use crate::encode::Writer;
use crate::{Decode, DecodeErrorKind, DecodeResult, Encode, EncodeResult, MapKey, Tag};

macro_rules! impl_integer {
    ($write:ident, $wide:ty, $($ty:ty),*) => {$(
        impl Encode for $ty {
            fn encode(&self, writer: &mut Writer<'_>) -> EncodeResult<()> {
                writer.$write(*self as $wide);
                Ok(())
            }
        }

        impl Decode for $ty {
            fn absent() -> Self {
                0
            }

            fn decode_into(&mut self, reader: &mut Reader<'_>) -> DecodeResult<()> {
                let Some(token) = reader.read_present(self)? else {
                    return Ok(());
                };
                match token.tag() {
                    Tag::Integer => *self = reader.read_integer()?,
                    _ => return Err(reader.mismatch("integer", token)),
                }
                Ok(())
            }
        }
    )*};
}

impl_integer!(write_signed, i128, i8, i16, i32, i64, i128, isize);
impl_integer!(write_unsigned, u128, u8, u16, u32, u64, u128, usize);

macro_rules! impl_float {
    ($write:ident, $ty:ty) => {
        impl Encode for $ty {
            fn encode(&self, writer: &mut Writer<'_>) -> EncodeResult<()> {
                writer.$write(*self);
                Ok(())
            }
        }

        impl Decode for $ty {
            fn absent() -> Self {
                0.0
            }

            fn decode_into(&mut self, reader: &mut Reader<'_>) -> DecodeResult<()> {
                let Some(token) = reader.read_present(self)? else {
                    return Ok(());
                };
                match token.tag() {
                    Tag::Float | Tag::Integer => *self = reader.read_float(token)? as $ty,
                    _ => return Err(reader.mismatch("float", token)),
                }
                Ok(())
            }
        }
    };
}

impl_float!(write_f32, f32);
impl_float!(write_f64, f64);

impl Encode for bool {
    fn encode(&self, writer: &mut Writer<'_>) -> EncodeResult<()> {
        writer.write_bool(*self);
        Ok(())
    }
}

impl Decode for bool {
    fn absent() -> Self {
        false
    }

    fn decode_into(&mut self, reader: &mut Reader<'_>) -> DecodeResult<()> {
        let Some(token) = reader.read_present(self)? else {
            return Ok(());
        };
        match token.tag() {
            Tag::Bool => *self = reader.read_bool()?,
            _ => return Err(reader.mismatch("boolean", token)),
        }
        Ok(())
    }
}

impl Encode for str {
    fn encode(&self, writer: &mut Writer<'_>) -> EncodeResult<()> {
        writer.write_text(self);
        Ok(())
    }
}

impl Encode for String {
    fn encode(&self, writer: &mut Writer<'_>) -> EncodeResult<()> {
        writer.write_text(self);
        Ok(())
    }
}

impl Decode for String {
    fn absent() -> Self {
        String::new()
    }

    fn decode_into(&mut self, reader: &mut Reader<'_>) -> DecodeResult<()> {
        let Some(token) = reader.read_present(self)? else {
            return Ok(());
        };
        match token.tag() {
            Tag::RawText | Tag::EncodedText => *self = reader.read_text(token)?.into_owned(),
            _ => return Err(reader.mismatch("text", token)),
        }
        Ok(())
    }
}

impl Decode for Arc<str> {
    fn absent() -> Self {
        Arc::from("")
    }

    fn decode_into(&mut self, reader: &mut Reader<'_>) -> DecodeResult<()> {
        let Some(token) = reader.read_present(self)? else {
            return Ok(());
        };
        match token.tag() {
            Tag::RawText | Tag::EncodedText => *self = Arc::from(reader.read_text(token)?),
            _ => return Err(reader.mismatch("text", token)),
        }
        Ok(())
    }
}

impl Encode for Bytes {
    fn encode(&self, writer: &mut Writer<'_>) -> EncodeResult<()> {
        writer.write_bytes(self);
        Ok(())
    }
}

impl Decode for Bytes {
    fn absent() -> Self {
        Bytes::new()
    }

    fn decode_into(&mut self, reader: &mut Reader<'_>) -> DecodeResult<()> {
        let Some(token) = reader.read_present(self)? else {
            return Ok(());
        };
        match token.tag() {
            Tag::RawText | Tag::EncodedText => {
                *self = Bytes::from(reader.read_payload(token)?.into_owned())
            }
            _ => return Err(reader.mismatch("byte buffer", token)),
        }
        Ok(())
    }
}

impl<T: Encode + ?Sized> Encode for &T {
    fn encode(&self, writer: &mut Writer<'_>) -> EncodeResult<()> {
        (**self).encode(writer)
    }
}

impl<T: Encode + ?Sized> Encode for Box<T> {
    fn encode(&self, writer: &mut Writer<'_>) -> EncodeResult<()> {
        (**self).encode(writer)
    }
}

impl<T: Decode> Decode for Box<T> {
    fn absent() -> Self {
        Box::new(T::absent())
    }

    fn decode_into(&mut self, reader: &mut Reader<'_>) -> DecodeResult<()> {
        (**self).decode_into(reader)
    }
}

impl<T: Encode + ?Sized> Encode for Arc<T> {
    fn encode(&self, writer: &mut Writer<'_>) -> EncodeResult<()> {
        (**self).encode(writer)
    }
}

impl<T: Encode> Encode for Option<T> {
    fn encode(&self, writer: &mut Writer<'_>) -> EncodeResult<()> {
        match self {
            Some(value) => value.encode(writer),
            None => {
                writer.write_absent();
                Ok(())
            }
        }
    }
}

impl<T: Decode> Decode for Option<T> {
    fn absent() -> Self {
        None
    }

    fn decode_into(&mut self, reader: &mut Reader<'_>) -> DecodeResult<()> {
        if reader.peek_tag()? == Tag::Absent {
            reader.read_present(self)?;
            return Ok(());
        }
        match self {
            Some(value) => value.decode_into(reader),
            None => {
                *self = Some(T::decode(reader)?);
                Ok(())
            }
        }
    }
}

impl<T: Encode> Encode for [T] {
    fn encode(&self, writer: &mut Writer<'_>) -> EncodeResult<()> {
        writer.write_seq(self)
    }
}

impl<T: Encode, const N: usize> Encode for [T; N] {
    fn encode(&self, writer: &mut Writer<'_>) -> EncodeResult<()> {
        writer.write_seq(self)
    }
}

impl<T: Decode, const N: usize> Decode for [T; N] {
    fn absent() -> Self {
        std::array::from_fn(|_| T::absent())
    }

    fn decode_into(&mut self, reader: &mut Reader<'_>) -> DecodeResult<()> {
        let Some(token) = reader.read_present(self)? else {
            return Ok(());
        };
        if token.tag() != Tag::List {
            return Err(reader.mismatch("array", token));
        }

        let mut count = 0;
        while reader.next_element()? {
            match self.get_mut(count) {
                Some(element) => element.decode_into(reader)?,
                None => reader.skip_value()?,
            }
            count += 1;
        }

        if count != N {
            return Err(crate::DecodeError::new(
                DecodeErrorKind::ArrayLength {
                    expected: N,
                    actual: count,
                },
                token.offset(),
            ));
        }
        Ok(())
    }
}

// Bind mode on sequences overwrites existing elements in place and appends the
// rest; elements past the end of the document's list are kept.
macro_rules! impl_sequence {
    ($seq:ident, $push:ident) => {
        impl<T: Encode> Encode for $seq<T> {
            fn encode(&self, writer: &mut Writer<'_>) -> EncodeResult<()> {
                writer.write_seq(self)
            }
        }

        impl<T: Decode> Decode for $seq<T> {
            fn absent() -> Self {
                $seq::new()
            }

            fn decode_into(&mut self, reader: &mut Reader<'_>) -> DecodeResult<()> {
                let Some(token) = reader.read_present(self)? else {
                    return Ok(());
                };
                if token.tag() != Tag::List {
                    return Err(reader.mismatch("list", token));
                }

                let mut count = 0;
                while reader.next_element()? {
                    match self.get_mut(count) {
                        Some(element) => element.decode_into(reader)?,
                        None => self.$push(T::decode(reader)?),
                    }
                    count += 1;
                }
                Ok(())
            }
        }
    };
}

impl_sequence!(Vec, push);
impl_sequence!(VecDeque, push_back);

#[cfg(feature = "smallvec")]
impl<A: smallvec::Array> Encode for smallvec::SmallVec<A>
where
    A::Item: Encode,
{
    fn encode(&self, writer: &mut Writer<'_>) -> EncodeResult<()> {
        writer.write_seq(self.iter())
    }
}

#[cfg(feature = "smallvec")]
impl<A: smallvec::Array> Decode for smallvec::SmallVec<A>
where
    A::Item: Decode,
{
    fn absent() -> Self {
        smallvec::SmallVec::new()
    }

    fn decode_into(&mut self, reader: &mut Reader<'_>) -> DecodeResult<()> {
        let Some(token) = reader.read_present(self)? else {
            return Ok(());
        };
        if token.tag() != Tag::List {
            return Err(reader.mismatch("list", token));
        }

        let mut count = 0;
        while reader.next_element()? {
            match self.get_mut(count) {
                Some(element) => element.decode_into(reader)?,
                None => self.push(A::Item::decode(reader)?),
            }
            count += 1;
        }
        Ok(())
    }
}

fn encode_entries<'v, K, V, I>(writer: &mut Writer<'_>, entries: I) -> EncodeResult<()>
where
    K: MapKey + 'v,
    V: Encode + 'v,
    I: IntoIterator<Item = (&'v K, &'v V)>,
{
    writer.begin_dict();
    for (key, value) in entries {
        writer.write_key(key.as_key());
        value.encode(writer)?;
    }
    writer.end();
    Ok(())
}

// Bind mode on maps keeps entries the document does not mention; keys it does
// mention are replaced, so a repeated key resolves to its last value.
fn decode_entries<V, F>(reader: &mut Reader<'_>, mut insert: F) -> DecodeResult<()>
where
    V: Decode,
    F: FnMut(&str, V),
{
    while let Some(key) = reader.next_key()? {
        let value = V::decode(reader)?;
        insert(key, value);
    }
    Ok(())
}

impl<K: MapKey, V: Encode, S> Encode for HashMap<K, V, S> {
    fn encode(&self, writer: &mut Writer<'_>) -> EncodeResult<()> {
        encode_entries(writer, self)
    }
}

impl<K, V, S> Decode for HashMap<K, V, S>
where
    K: MapKey + Eq + Hash,
    V: Decode,
    S: BuildHasher + Default,
{
    fn absent() -> Self {
        HashMap::default()
    }

    fn decode_into(&mut self, reader: &mut Reader<'_>) -> DecodeResult<()> {
        let Some(token) = reader.read_present(self)? else {
            return Ok(());
        };
        if token.tag() != Tag::Dict {
            return Err(reader.mismatch("map", token));
        }
        decode_entries(reader, |key, value| {
            self.insert(K::from_key(key), value);
        })
    }
}

impl<K: MapKey, V: Encode> Encode for BTreeMap<K, V> {
    fn encode(&self, writer: &mut Writer<'_>) -> EncodeResult<()> {
        encode_entries(writer, self)
    }
}

impl<K: MapKey + Ord, V: Decode> Decode for BTreeMap<K, V> {
    fn absent() -> Self {
        BTreeMap::new()
    }

    fn decode_into(&mut self, reader: &mut Reader<'_>) -> DecodeResult<()> {
        let Some(token) = reader.read_present(self)? else {
            return Ok(());
        };
        if token.tag() != Tag::Dict {
            return Err(reader.mismatch("map", token));
        }
        decode_entries(reader, |key, value| {
            self.insert(K::from_key(key), value);
        })
    }
}
