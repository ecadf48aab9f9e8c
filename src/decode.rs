use std::borrow::Cow;
use std::num::IntErrorKind;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use log::debug;

use crate::buf::Cursor;
use crate::wire::{DELIMITER, DOCUMENT_PREFIX, END, FLOAT_END, KEY, Tag, Token};
use crate::{Decode, DecodeError, DecodeErrorKind, DecodeResult};

/// Containers nested deeper than this are rejected instead of exhausting the stack.
pub const MAX_DEPTH: usize = 256;

/// Decode a utcode document into a newly created value.
///
/// Decoding into [`crate::Value`] (or `Option<Value>`) produces a dynamic
/// tree when no static destination type is known.
pub fn from_slice<T: Decode>(data: &[u8]) -> DecodeResult<T> {
    let mut value = T::absent();
    decode_into(data, &mut value)?;
    Ok(value)
}

/// Decode a utcode document held in a `Bytes` buffer.
pub fn from_bytes<T: Decode>(data: Bytes) -> DecodeResult<T> {
    from_slice(&data)
}

/// Decode a utcode document into an existing destination.
pub fn decode_into<T: Decode>(data: &[u8], destination: &mut T) -> DecodeResult<()> {
    let result = Reader::new(data).and_then(|mut reader| {
        destination.decode_into(&mut reader)?;
        reader.finish()
    });
    if let Err(err) = &result {
        debug!("failed to decode {}-byte document: {err}", data.len());
    }
    result
}

/// Input side of a decode call, handed to [`Decode`] implementations.
pub struct Reader<'a> {
    cursor: Cursor<'a>,
    depth: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> DecodeResult<Self> {
        let mut cursor = Cursor::new(data);
        if !data.starts_with(DOCUMENT_PREFIX) {
            return Err(cursor.error(DecodeErrorKind::MissingPrefix));
        }
        cursor.read(DOCUMENT_PREFIX.len())?;
        Ok(Reader { cursor, depth: 0 })
    }

    fn finish(&self) -> DecodeResult<()> {
        if self.cursor.remaining() > 0 {
            return Err(self.cursor.error(DecodeErrorKind::ExtraData {
                bytes_remaining: self.cursor.remaining(),
            }));
        }
        Ok(())
    }

    /// Current byte offset into the document.
    pub fn offset(&self) -> usize {
        self.cursor.offset()
    }

    fn error_at(kind: DecodeErrorKind, offset: usize) -> DecodeError {
        DecodeError::new(kind, offset)
    }

    /// Error for a value whose wire tag does not fit the destination.
    pub fn mismatch(&self, expected: &'static str, token: Token) -> DecodeError {
        Self::error_at(
            DecodeErrorKind::TypeMismatch {
                expected,
                found: token.tag.as_char(),
            },
            token.offset,
        )
    }

    /// Looks at the tag of the next value without consuming it.
    pub fn peek_tag(&self) -> DecodeResult<Tag> {
        let byte = self.cursor.peek().ok_or_else(|| {
            self.cursor.error(DecodeErrorKind::InsufficientData {
                needed: 1,
                available: 0,
            })
        })?;
        Tag::from_byte(byte).ok_or_else(|| self.cursor.error(DecodeErrorKind::InvalidTag(byte)))
    }

    /// Reads a tag token up to and including its `:` delimiter.
    pub fn read_token(&mut self) -> DecodeResult<Token> {
        let offset = self.cursor.offset();
        let byte = self.cursor.read_byte()?;
        let tag = Tag::from_byte(byte)
            .ok_or_else(|| Self::error_at(DecodeErrorKind::InvalidTag(byte), offset))?;

        if tag == Tag::Custom {
            return Err(Self::error_at(DecodeErrorKind::CustomUnsupported, offset));
        }

        let length = if tag.is_length_prefixed() {
            self.read_length(tag.as_char(), offset)?
        } else {
            if self.cursor.read_byte()? != DELIMITER {
                return Err(Self::error_at(DecodeErrorKind::InvalidLength, offset));
            }
            0
        };

        if matches!(tag, Tag::Dict | Tag::List) {
            if self.depth == MAX_DEPTH {
                return Err(Self::error_at(DecodeErrorKind::TooDeep(MAX_DEPTH), offset));
            }
            self.depth += 1;
        }

        Ok(Token {
            tag,
            length,
            offset,
        })
    }

    /// Reads the next token unless it is `n:e`, in which case `destination`
    /// is reset to its absent value and `None` is returned.
    pub fn read_present<T: Decode>(&mut self, destination: &mut T) -> DecodeResult<Option<Token>> {
        let token = self.read_token()?;
        if token.tag == Tag::Absent {
            self.read_absent()?;
            *destination = T::absent();
            return Ok(None);
        }
        Ok(Some(token))
    }

    fn read_length(&mut self, tag: char, offset: usize) -> DecodeResult<usize> {
        let digits = self.cursor.read_until(DELIMITER, tag)?;
        let valid = !digits.is_empty()
            && digits.iter().all(u8::is_ascii_digit)
            && (digits.len() == 1 || digits[0] != b'0');
        if !valid {
            return Err(Self::error_at(DecodeErrorKind::InvalidLength, offset));
        }
        std::str::from_utf8(digits)
            .ok()
            .and_then(|digits| digits.parse().ok())
            .ok_or_else(|| Self::error_at(DecodeErrorKind::InvalidLength, offset))
    }

    /// Consumes the terminator of an `n` token.
    pub fn read_absent(&mut self) -> DecodeResult<()> {
        let offset = self.cursor.offset();
        if self.cursor.read_byte()? != END {
            return Err(Self::error_at(DecodeErrorKind::Unterminated('n'), offset));
        }
        Ok(())
    }

    /// Reads the flag byte of a `b` token; anything but `0` is true.
    pub fn read_bool(&mut self) -> DecodeResult<bool> {
        Ok(self.cursor.read_byte()? != b'0')
    }

    fn read_literal(&mut self, terminator: u8, tag: char) -> DecodeResult<&'a str> {
        let offset = self.cursor.offset();
        let literal = self.cursor.read_until(terminator, tag)?;
        std::str::from_utf8(literal)
            .map_err(|_| Self::error_at(DecodeErrorKind::InvalidUtf8, offset))
    }

    /// Reads the literal of an `i` token and narrows it to `T`.
    pub fn read_integer<T>(&mut self) -> DecodeResult<T>
    where
        T: TryFrom<i128> + TryFrom<u128>,
    {
        let offset = self.cursor.offset();
        let literal = self.read_literal(END, 'i')?;
        let (negative, magnitude) =
            parse_integer(literal).map_err(|kind| Self::error_at(kind, offset))?;

        let narrowed = if !negative {
            <T as TryFrom<u128>>::try_from(magnitude).ok()
        } else if magnitude <= i128::MAX as u128 + 1 {
            // i128::MIN has no positive counterpart, the wrapping negation maps it onto itself.
            <T as TryFrom<i128>>::try_from((magnitude as i128).wrapping_neg()).ok()
        } else {
            None
        };
        narrowed.ok_or_else(|| {
            Self::error_at(DecodeErrorKind::IntegerOverflow(literal.to_string()), offset)
        })
    }

    /// Reads the literal of an `i` or `f` token as a float.
    pub fn read_float(&mut self, token: Token) -> DecodeResult<f64> {
        let offset = self.cursor.offset();
        match token.tag {
            Tag::Integer => {
                let literal = self.read_literal(END, 'i')?;
                let (negative, magnitude) =
                    parse_integer(literal).map_err(|kind| Self::error_at(kind, offset))?;
                let value = magnitude as f64;
                Ok(if negative { -value } else { value })
            }
            _ => {
                let literal = self.read_literal(FLOAT_END, 'f')?;
                literal.parse().map_err(|_| {
                    Self::error_at(DecodeErrorKind::InvalidFloat(literal.to_string()), offset)
                })
            }
        }
    }

    /// Reads the payload of an `s` or `u` token.
    ///
    /// Raw text is borrowed from the document; base64 payloads are decoded.
    pub fn read_payload(&mut self, token: Token) -> DecodeResult<Cow<'a, [u8]>> {
        let offset = self.cursor.offset();
        let payload = self.cursor.read(token.length)?;
        match token.tag {
            Tag::EncodedText => STANDARD
                .decode(payload)
                .map(Cow::Owned)
                .map_err(|_| Self::error_at(DecodeErrorKind::InvalidBase64, offset)),
            _ => Ok(Cow::Borrowed(payload)),
        }
    }

    /// Reads the payload of an `s` or `u` token as UTF-8 text.
    pub fn read_text(&mut self, token: Token) -> DecodeResult<Cow<'a, str>> {
        let offset = self.cursor.offset();
        let invalid = |_| Self::error_at(DecodeErrorKind::InvalidUtf8, offset);
        match self.read_payload(token)? {
            Cow::Borrowed(bytes) => std::str::from_utf8(bytes).map(Cow::Borrowed).map_err(invalid),
            Cow::Owned(bytes) => String::from_utf8(bytes)
                .map(Cow::Owned)
                .map_err(|err| invalid(err.utf8_error())),
        }
    }

    /// Returns the next key of a dictionary, or `None` after consuming its terminator.
    pub fn next_key(&mut self) -> DecodeResult<Option<&'a str>> {
        let offset = self.cursor.offset();
        match self.cursor.peek() {
            None => Err(Self::error_at(DecodeErrorKind::Unterminated('d'), offset)),
            Some(END) => {
                self.cursor.read_byte()?;
                self.depth = self.depth.saturating_sub(1);
                Ok(None)
            }
            Some(KEY) => {
                self.cursor.read_byte()?;
                let length = self.read_length('k', offset)?;
                let key = self.cursor.read(length)?;
                std::str::from_utf8(key)
                    .map(Some)
                    .map_err(|_| Self::error_at(DecodeErrorKind::InvalidUtf8, offset))
            }
            Some(other) => Err(Self::error_at(DecodeErrorKind::ExpectedKey(other), offset)),
        }
    }

    /// Whether a list has another element; consumes the terminator when it does not.
    pub fn next_element(&mut self) -> DecodeResult<bool> {
        match self.cursor.peek() {
            None => Err(self.cursor.error(DecodeErrorKind::Unterminated('l'))),
            Some(END) => {
                self.cursor.read_byte()?;
                self.depth = self.depth.saturating_sub(1);
                Ok(false)
            }
            Some(_) => Ok(true),
        }
    }

    /// Consumes the next value without materializing it.
    pub fn skip_value(&mut self) -> DecodeResult<()> {
        let token = self.read_token()?;
        match token.tag {
            Tag::Absent => self.read_absent(),
            Tag::Bool => self.cursor.read_byte().map(drop),
            Tag::Integer => self.read_literal(END, 'i').map(drop),
            Tag::Float => self.read_literal(FLOAT_END, 'f').map(drop),
            Tag::RawText | Tag::EncodedText => self.cursor.read(token.length).map(drop),
            Tag::Dict => {
                while self.next_key()?.is_some() {
                    self.skip_value()?;
                }
                Ok(())
            }
            Tag::List => {
                while self.next_element()? {
                    self.skip_value()?;
                }
                Ok(())
            }
            Tag::Custom => Err(Self::error_at(
                DecodeErrorKind::CustomUnsupported,
                token.offset,
            )),
        }
    }
}

/// Splits an integer literal into sign and magnitude.
///
/// Accepts an optional sign and the `0x`, `0o`, `0b` prefixes, with a bare
/// leading `0` selecting octal.
fn parse_integer(literal: &str) -> Result<(bool, u128), DecodeErrorKind> {
    let invalid = || DecodeErrorKind::InvalidInteger(literal.to_string());

    let (negative, unsigned) = match literal.as_bytes().first() {
        Some(b'-') => (true, &literal[1..]),
        Some(b'+') => (false, &literal[1..]),
        _ => (false, literal),
    };

    let prefixed = |lower: &str, upper: &str| {
        unsigned
            .strip_prefix(lower)
            .or_else(|| unsigned.strip_prefix(upper))
    };
    let (radix, digits) = if let Some(digits) = prefixed("0x", "0X") {
        (16, digits)
    } else if let Some(digits) = prefixed("0o", "0O") {
        (8, digits)
    } else if let Some(digits) = prefixed("0b", "0B") {
        (2, digits)
    } else if unsigned.len() > 1 && unsigned.starts_with('0') {
        (8, &unsigned[1..])
    } else {
        (10, unsigned)
    };

    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return Err(invalid());
    }

    match u128::from_str_radix(digits, radix) {
        Ok(magnitude) => Ok((negative, magnitude)),
        Err(err) if *err.kind() == IntErrorKind::PosOverflow => {
            Err(DecodeErrorKind::IntegerOverflow(literal.to_string()))
        }
        Err(_) => Err(invalid()),
    }
}
