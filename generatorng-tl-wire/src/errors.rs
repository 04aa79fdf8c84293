use std::fmt;

/// Errors raised while encoding or decoding TL values.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// Ran out of bytes before the value was fully read.
    UnexpectedEof,
    /// Decoded a constructor id that the expected type does not have.
    UnexpectedConstructor {
        /// The id found on the wire.
        id: u32,
    },
    /// A string payload was not valid UTF-8.
    InvalidUtf8,
    /// The schema model has no type with this name.
    UnknownType {
        /// Target type name.
        name: String,
    },
    /// The schema model has no method with this name or id.
    UnknownMethod {
        /// Formatted method name, or the id in hex.
        name: String,
    },
    /// A value does not fit the type the schema expects.
    TypeMismatch {
        /// Target type name.
        expected: String,
    },
    /// An unconditional field has no value.
    MissingField {
        /// Member-formatted field name.
        name: String,
    },
    /// A string or bytes payload longer than the three-byte length header
    /// can express.
    PayloadTooLarge {
        /// Payload length in bytes.
        len: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof => write!(f, "unexpected end of buffer"),
            Self::UnexpectedConstructor { id } => write!(f, "unexpected constructor id: {id:#010x}"),
            Self::InvalidUtf8 => write!(f, "string is not valid UTF-8"),
            Self::UnknownType { name } => write!(f, "unknown type `{name}`"),
            Self::UnknownMethod { name } => write!(f, "unknown method `{name}`"),
            Self::TypeMismatch { expected } => write!(f, "value does not match type `{expected}`"),
            Self::MissingField { name } => write!(f, "missing value for field `{name}`"),
            Self::PayloadTooLarge { len } => write!(f, "payload of {len} bytes exceeds the TL length limit"),
        }
    }
}

impl std::error::Error for Error {}

/// Specialized `Result` for the codec.
pub type Result<T> = std::result::Result<T, Error>;
