//! Parser for Telegram's [Type Language] (TL) schemas.
//!
//! Two dialects are understood and both produce the same [`Definition`] AST,
//! which `generatorng-tl-gen` turns into its schema model:
//!
//! * native `.tl` text ([`parse_tl_file`], [`parse_tl_schema`]);
//! * the JSON dump published by Telegram ([`parse_json_schema`]).
//!
//! # Quick start
//!
//! ```rust
//! use generatorng_tl_parser::parse_tl_schema;
//!
//! let src = "user#12345 id:long name:string = User;";
//! let defs = parse_tl_schema(src).unwrap();
//! assert_eq!(defs[0].id, 0x12345);
//! ```
//!
//! [Type Language]: https://core.telegram.org/mtproto/TL

#![deny(unsafe_code)]
#![warn(missing_docs)]

/// Parse error types for TL schema parsing.
pub mod errors;
pub mod tl;
mod iterator;
mod json;
mod utils;

use errors::{LineError, SchemaError};
use tl::Definition;

pub use json::{format_json_schema, parse_json_schema};

/// Parses a complete TL schema file, yielding [`Definition`]s one by one.
///
/// Lines starting with `//` are treated as comments and skipped.
/// The special `---functions---` and `---types---` section markers switch
/// the [`tl::Category`] applied to the following definitions.
///
/// The iterator stops after the first error, which carries the line number
/// and text of the malformed definition.
pub fn parse_tl_file(contents: &str) -> impl Iterator<Item = Result<Definition, LineError>> + '_ {
    iterator::TlIterator::new(contents)
}

/// Parses a complete TL schema, aborting on the first malformed definition.
pub fn parse_tl_schema(contents: &str) -> Result<Vec<Definition>, SchemaError> {
    let defs = parse_tl_file(contents).collect::<Result<Vec<_>, _>>()?;
    log::info!("[parser] TL schema: {} definitions", defs.len());
    Ok(defs)
}
