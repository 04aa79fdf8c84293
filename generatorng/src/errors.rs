use std::fmt;
use std::io;
use std::path::PathBuf;

use generatorng_tl_gen::GenerateError;
use generatorng_tl_parser::errors::SchemaError;

/// Process exit status. The discriminant is what the shell sees.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    NoError = 0,
    InvalidAction = 1,
    InvalidArgument = 2,
    SchemaReadError = 3,
    UnableToResolveTypes = 4,
    NetworkError = 5,
    ServerError = 6,
    FileAccessError = 7,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code as u8)
    }
}

/// Everything that can end a run early.
#[derive(Debug)]
pub enum RunError {
    /// Zero or several of the action flags were given.
    InvalidAction { given: usize },
    /// The schema file could not be read.
    ReadSchema { path: PathBuf, source: io::Error },
    /// The schema file was read but does not parse.
    Schema(SchemaError),
    /// The model could not be turned into code.
    Generate(GenerateError),
    /// The schema download failed before a response arrived.
    Network(reqwest::Error),
    /// The server answered with a non-success status.
    Server { url: String, status: u16 },
    /// A single file could not be written.
    Write { path: PathBuf, source: io::Error },
    /// Some target files could not be patched. The rest were.
    FileAccess { failed: Vec<PathBuf> },
}

impl RunError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::InvalidAction { .. } => ExitCode::InvalidAction,
            Self::ReadSchema { .. } | Self::Schema(_) => ExitCode::SchemaReadError,
            Self::Generate(_) => ExitCode::UnableToResolveTypes,
            Self::Network(_) => ExitCode::NetworkError,
            Self::Server { .. } => ExitCode::ServerError,
            Self::Write { .. } | Self::FileAccess { .. } => ExitCode::FileAccessError,
        }
    }
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAction { given: 0 } => write!(
                f,
                "no action given; use one of --generate-from-json, --generate-from-text, --fetch-json, --format-json"
            ),
            Self::InvalidAction { given } => write!(f, "{given} actions given, expected exactly one"),
            Self::ReadSchema { path, source } => write!(f, "cannot read schema {}: {source}", path.display()),
            Self::Schema(e) => write!(f, "{e}"),
            Self::Generate(e) => write!(f, "{e}"),
            Self::Network(e) => write!(f, "network error: {e}"),
            Self::Server { url, status } => write!(f, "{url} answered HTTP {status}"),
            Self::Write { path, source } => write!(f, "cannot write {}: {source}", path.display()),
            Self::FileAccess { failed } => {
                write!(f, "{} target files could not be patched:", failed.len())?;
                for path in failed {
                    write!(f, "\n  {}", path.display())?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ReadSchema { source, .. } | Self::Write { source, .. } => Some(source),
            Self::Schema(e) => Some(e),
            Self::Generate(e) => Some(e),
            Self::Network(e) => Some(e),
            Self::InvalidAction { .. } | Self::Server { .. } | Self::FileAccess { .. } => None,
        }
    }
}

impl From<SchemaError> for RunError {
    fn from(e: SchemaError) -> Self { Self::Schema(e) }
}

impl From<GenerateError> for RunError {
    fn from(e: GenerateError) -> Self { Self::Generate(e) }
}

impl From<reqwest::Error> for RunError {
    fn from(e: reqwest::Error) -> Self { Self::Network(e) }
}
