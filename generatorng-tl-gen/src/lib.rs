//! Turns a parsed TL schema into C++ fragments and patches them into
//! hand-maintained files.
//!
//! The pipeline is: definitions → [`SchemaModel`] → indirections and baking
//! → dependency resolution → emitters → [`Generated`] sections, which
//! [`patch`] splices between marker comments.
//!
//! # Usage
//!
//! ```no_run
//! use generatorng_tl_gen::{Config, PriorSections, Section, generate};
//! use generatorng_tl_parser::parse_tl_schema;
//! use std::fs;
//!
//! let schema = fs::read_to_string("scheme.tl").unwrap();
//! let defs = parse_tl_schema(&schema).unwrap();
//!
//! let mut prior = PriorSections::new();
//! let target = fs::read_to_string("CTelegramStream.cpp").unwrap();
//! prior.read_file("CTelegramStream.cpp", &target).unwrap();
//!
//! let generated = generate(&defs, &Config::default(), &prior).unwrap();
//! print!("{}", generated.get(Section::StreamReadDefs));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod bake;
mod emit;
mod grouper;
mod metadata;
pub mod codegen;
pub mod model;
pub mod namegen;
pub mod patch;
pub mod resolver;
pub mod sections;

pub use bake::bake;
pub use codegen::{Config, GenerateError, Generated, build_model, generate, generate_model};
pub use model::SchemaModel;
pub use sections::{FILES, PriorSections, Section};
