use thiserror::Error;

/// Specific kinds of decoding errors that can occur when reading utcode data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeErrorKind {
    #[error("document does not start with `ut:`")]
    MissingPrefix,

    #[error("unexpected end of input: need {needed} bytes, have {available}")]
    InsufficientData { needed: usize, available: usize },

    #[error("invalid wire type {:?}", as_char(.0))]
    InvalidTag(u8),

    #[error("invalid length in tag token")]
    InvalidLength,

    #[error("expected dictionary key token, found {:?}", as_char(.0))]
    ExpectedKey(u8),

    #[error("missing terminator for '{0}' value")]
    Unterminated(char),

    #[error("invalid integer literal {0:?}")]
    InvalidInteger(String),

    #[error("integer literal {0:?} does not fit the destination")]
    IntegerOverflow(String),

    #[error("invalid float literal {0:?}")]
    InvalidFloat(String),

    #[error("invalid base64 payload")]
    InvalidBase64,

    #[error("invalid UTF-8 in text")]
    InvalidUtf8,

    #[error("type mismatch: cannot decode '{found}' into {expected}")]
    TypeMismatch { expected: &'static str, found: char },

    #[error("array length mismatch: expected {expected} elements, got {actual}")]
    ArrayLength { expected: usize, actual: usize },

    #[error("nesting deeper than {0} containers")]
    TooDeep(usize),

    #[error("custom values cannot be decoded")]
    CustomUnsupported,

    #[error("extra data after decoding: {bytes_remaining} bytes remaining")]
    ExtraData { bytes_remaining: usize },
}

/// Error type returned when decoding utcode data fails.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("decode error at offset {offset}: {kind}")]
pub struct DecodeError {
    kind: DecodeErrorKind,
    offset: usize,
}

impl DecodeError {
    /// Creates a new DecodeError with the given kind, raised at `offset`.
    pub const fn new(kind: DecodeErrorKind, offset: usize) -> Self {
        Self { kind, offset }
    }

    /// Returns the specific kind of decode error that occurred.
    pub fn kind(&self) -> &DecodeErrorKind {
        &self.kind
    }

    /// Byte offset into the document at which decoding failed.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

fn as_char(byte: &u8) -> char {
    char::from(*byte)
}

/// Result type for decoding operations.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Specific kinds of encoding errors that can occur when writing utcode data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeErrorKind {
    #[error("no encoder registered for custom category {0:?}")]
    UnregisteredCategory(String),

    #[error("custom encoder failed: {0}")]
    Custom(String),

    #[error("I/O error: {message}")]
    Io {
        kind: std::io::ErrorKind,
        message: String,
    },
}

/// Error type returned when encoding to utcode fails.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("encode error: {kind}")]
pub struct EncodeError {
    kind: EncodeErrorKind,
}

impl EncodeError {
    /// Creates a new EncodeError with the given kind.
    pub fn new(kind: EncodeErrorKind) -> Self {
        Self { kind }
    }

    /// Shorthand for custom writers reporting their own failure.
    pub fn custom(message: impl Into<String>) -> Self {
        Self::new(EncodeErrorKind::Custom(message.into()))
    }

    /// Returns the specific kind of encode error that occurred.
    pub fn kind(&self) -> &EncodeErrorKind {
        &self.kind
    }
}

impl From<std::io::Error> for EncodeError {
    fn from(err: std::io::Error) -> Self {
        Self::new(EncodeErrorKind::Io {
            kind: err.kind(),
            message: err.to_string(),
        })
    }
}

/// Result type for encoding operations.
pub type EncodeResult<T> = Result<T, EncodeError>;
