use std::fmt;
use std::num::ParseIntError;

/// Errors produced while parsing a single parameter token.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamParseError {
    /// An empty string was encountered where a name/type was expected.
    Empty,
    /// A flag expression (`name.N?Type`) was malformed.
    InvalidFlag,
    /// A flag expression names a flags field that was not declared before it.
    MissingFlagField {
        /// The undeclared flags field, e.g. `"flags2"`.
        name: String,
    },
    /// A generic `<…>` argument was malformed (missing closing `>`).
    InvalidGeneric,
    /// A conditional type appeared where the dialect has no flag syntax (JSON).
    UnexpectedFlag,
    /// A bare `name` with no `:type`, e.g. old-style `? = Int`.
    NotImplemented,
}

impl fmt::Display for ParamParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty token"),
            Self::InvalidFlag => write!(f, "invalid flag expression"),
            Self::MissingFlagField { name } => write!(f, "flag refers to undeclared field `{name}`"),
            Self::InvalidGeneric => write!(f, "invalid generic argument (unclosed `<`)"),
            Self::UnexpectedFlag => write!(f, "conditional fields are not supported in this dialect"),
            Self::NotImplemented => write!(f, "parameter without `:type` is not supported"),
        }
    }
}

impl std::error::Error for ParamParseError {}

/// Errors produced while parsing a complete TL definition.
#[derive(Debug, PartialEq)]
pub enum ParseError {
    /// The input was blank.
    Empty,
    /// No `= Type` was found.
    MissingType,
    /// The name (before `=`) was missing or had empty namespace components.
    MissingName,
    /// The `#id` hex literal was unparseable.
    InvalidId(ParseIntError),
    /// A numeric id outside both the `i32` and the `u32` range.
    IdOutOfRange(i64),
    /// A parameter was invalid.
    InvalidParam(ParamParseError),
    /// The input ended in the middle of a definition (no closing `;`).
    Unterminated,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty definition"),
            Self::MissingType => write!(f, "missing `= Type`"),
            Self::MissingName => write!(f, "missing or malformed name"),
            Self::InvalidId(e) => write!(f, "invalid constructor ID: {e}"),
            Self::IdOutOfRange(n) => write!(f, "constructor ID {n} does not fit 32 bits"),
            Self::InvalidParam(e) => write!(f, "invalid parameter: {e}"),
            Self::Unterminated => write!(f, "definition is not terminated with `;`"),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidId(e) => Some(e),
            Self::InvalidParam(e) => Some(e),
            _ => None,
        }
    }
}

/// A [`ParseError`] pinned to the schema line it came from.
#[derive(Debug, PartialEq)]
pub struct LineError {
    /// 1-based line number where the definition starts.
    pub line: usize,
    /// The offending definition text.
    pub content: String,
    /// What went wrong.
    pub error: ParseError,
}

impl fmt::Display for LineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {} (`{}`)", self.line, self.error, self.content)
    }
}

impl std::error::Error for LineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Errors that abort reading a whole schema. No partial result is produced.
#[derive(Debug)]
pub enum SchemaError {
    /// A TL-text definition could not be parsed.
    Syntax(LineError),
    /// The JSON document itself is malformed or has the wrong shape.
    Json(serde_json::Error),
    /// A JSON entry parsed as JSON but not as a TL definition.
    InvalidEntry {
        /// The `predicate` / `method` of the entry.
        name: String,
        /// What went wrong.
        error: ParseError,
    },
    /// The JSON document spells some ids in hex and others in decimal.
    MixedIds {
        /// The first entry whose id fixed the spelling.
        first: String,
        /// The first entry spelled the other way.
        second: String,
    },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax(e) => write!(f, "TL syntax error at {e}"),
            Self::Json(e) => write!(f, "JSON schema error: {e}"),
            Self::InvalidEntry { name, error } => write!(f, "invalid schema entry `{name}`: {error}"),
            Self::MixedIds { first, second } => write!(
                f,
                "ids of `{first}` and `{second}` use different spellings (hex vs. decimal)"
            ),
        }
    }
}

impl std::error::Error for SchemaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Syntax(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::InvalidEntry { error, .. } => Some(error),
            Self::MixedIds { .. } => None,
        }
    }
}

impl From<LineError> for SchemaError {
    fn from(e: LineError) -> Self { Self::Syntax(e) }
}

impl From<serde_json::Error> for SchemaError {
    fn from(e: serde_json::Error) -> Self { Self::Json(e) }
}
