use crate::{DecodeError, DecodeErrorKind, DecodeResult};

/// Read cursor over an immutable document buffer.
///
/// Every read advances the cursor and fails instead of running past the end.
pub(crate) struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Cursor { data, pos: 0 }
    }

    pub(crate) fn offset(&self) -> usize {
        self.pos
    }

    pub(crate) fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub(crate) fn peek(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    pub(crate) fn error(&self, kind: DecodeErrorKind) -> DecodeError {
        DecodeError::new(kind, self.pos)
    }

    pub(crate) fn read(&mut self, amt: usize) -> DecodeResult<&'a [u8]> {
        if amt > self.remaining() {
            return Err(self.error(DecodeErrorKind::InsufficientData {
                needed: amt,
                available: self.remaining(),
            }));
        }
        let result = &self.data[self.pos..self.pos + amt];
        self.pos += amt;
        Ok(result)
    }

    pub(crate) fn read_byte(&mut self) -> DecodeResult<u8> {
        Ok(self.read(1)?[0])
    }

    /// Returns the bytes before the next `delimiter` and consumes the delimiter.
    ///
    /// `tag` names the value being read when the delimiter is missing.
    pub(crate) fn read_until(&mut self, delimiter: u8, tag: char) -> DecodeResult<&'a [u8]> {
        let rest = &self.data[self.pos..];
        let Some(count) = rest.iter().position(|&b| b == delimiter) else {
            return Err(self.error(DecodeErrorKind::Unterminated(tag)));
        };
        let result = &rest[..count];
        self.pos += count + 1;
        Ok(result)
    }
}
