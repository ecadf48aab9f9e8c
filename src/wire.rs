/// Literal prefix every utcode document starts with.
pub const DOCUMENT_PREFIX: &[u8] = b"ut:";

/// Separates a tag (and its inline length) from the payload.
pub(crate) const DELIMITER: u8 = b':';

/// Closes integers, absent markers, dictionaries and lists.
pub(crate) const END: u8 = b'e';

/// Closes float literals.
pub(crate) const FLOAT_END: u8 = b'z';

/// Leading byte of a dictionary key token.
pub(crate) const KEY: u8 = b'k';

/// Wire-level tags that introduce a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Tag {
    Absent = b'n',
    Bool = b'b',
    Integer = b'i',
    Float = b'f',
    RawText = b's',
    EncodedText = b'u',
    Dict = b'd',
    List = b'l',
    Custom = b'c',
}

impl Tag {
    pub(crate) fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'n' => Some(Tag::Absent),
            b'b' => Some(Tag::Bool),
            b'i' => Some(Tag::Integer),
            b'f' => Some(Tag::Float),
            b's' => Some(Tag::RawText),
            b'u' => Some(Tag::EncodedText),
            b'd' => Some(Tag::Dict),
            b'l' => Some(Tag::List),
            b'c' => Some(Tag::Custom),
            _ => None,
        }
    }

    /// Whether the token for this tag carries an inline byte length.
    pub(crate) fn is_length_prefixed(self) -> bool {
        matches!(self, Tag::RawText | Tag::EncodedText | Tag::Custom)
    }

    pub fn as_char(self) -> char {
        self as u8 as char
    }
}

impl From<Tag> for u8 {
    fn from(tag: Tag) -> u8 {
        tag as u8
    }
}

/// A tag token read from the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub(crate) tag: Tag,
    pub(crate) length: usize,
    pub(crate) offset: usize,
}

impl Token {
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Payload length for `s` and `u` tokens, zero otherwise.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Offset of the tag byte in the document.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::Tag;

    #[test]
    fn test_tag_from_byte() {
        assert_eq!(Tag::from_byte(b'n'), Some(Tag::Absent));
        assert_eq!(Tag::from_byte(b'u'), Some(Tag::EncodedText));
        assert_eq!(Tag::from_byte(b'd'), Some(Tag::Dict));
        assert_eq!(Tag::from_byte(b'c'), Some(Tag::Custom));
        assert_eq!(Tag::from_byte(b'e'), None);
        assert_eq!(Tag::from_byte(b'k'), None);
        assert_eq!(Tag::from_byte(b'x'), None);
    }

    #[test]
    fn test_length_prefixed() {
        assert!(Tag::RawText.is_length_prefixed());
        assert!(Tag::EncodedText.is_length_prefixed());
        assert!(!Tag::Integer.is_length_prefixed());
        assert!(!Tag::Dict.is_length_prefixed());
    }
}
