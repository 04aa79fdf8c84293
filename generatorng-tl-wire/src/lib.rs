//! Reference TL binary codec driven by the generatorng schema model.
//!
//! The C++ emitters write stream operators that put each field on the wire
//! in schema order, gated by flag bits. This crate performs the same walk at
//! runtime over a baked [`SchemaModel`](generatorng_tl_gen::SchemaModel), so
//! the contract can be exercised from Rust.
//!
//! # Usage
//!
//! ```rust,no_run
//! use generatorng_tl_gen::{Config, build_model};
//! use generatorng_tl_parser::parse_tl_schema;
//! use generatorng_tl_wire::{Value, WireCodec};
//!
//! let defs = parse_tl_schema(&std::fs::read_to_string("scheme.tl").unwrap()).unwrap();
//! let model = build_model(&defs, &Config::default());
//! let codec = WireCodec::new(&model);
//!
//! let request = codec.encode_request("helpGetConfig", &[]).unwrap();
//! // Send `request` over an MTProto connection, then:
//! # let reply: Vec<u8> = Vec::new();
//! let config: Value = codec.decode_result("helpGetConfig", &reply).unwrap();
//! ```

#![deny(unsafe_code)]

mod codec;
pub mod deserialize;
pub mod errors;
pub mod serialize;
mod value;

pub use codec::WireCodec;
pub use deserialize::{Cursor, Deserializable};
pub use errors::{Error, Result};
pub use serialize::Serializable;
pub use value::{Object, Value};

/// `boolTrue#997275b5 = Bool`
pub const BOOL_TRUE: u32 = 0x997275b5;
/// `boolFalse#bc799737 = Bool`
pub const BOOL_FALSE: u32 = 0xbc799737;
/// `vector#1cb5c415 {t:Type} # [ t ] = Vector t`
pub const VECTOR_ID: u32 = 0x1cb5c415;
